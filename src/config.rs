//! Run configuration: the scalar loan form fields

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::Result;
use crate::loan::{default_period_inputs, LoanParameters, PeriodInput, ResetFrequency};

/// Default principal amount of the bond
pub const DEFAULT_PRINCIPAL: f64 = 4_000_000.0;
/// Default maturity in years
pub const DEFAULT_DURATION_YEARS: u32 = 3;
/// Default fixed rate (bp)
pub const DEFAULT_FIXED_RATE_BP: f64 = 200.0;
/// Default floating rate (bp)
pub const DEFAULT_FLOATING_RATE_BP: f64 = 350.0;

/// Loan form fields, loadable from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanConfig {
    pub principal: f64,
    pub duration_years: u32,
    pub fixed_rate_bp: f64,
    pub floating_rate_bp: f64,
    pub reset_frequency: ResetFrequency,
    pub payment_in_kind: bool,
    pub hedge_cost: f64,
}

impl Default for LoanConfig {
    fn default() -> Self {
        Self {
            principal: DEFAULT_PRINCIPAL,
            duration_years: DEFAULT_DURATION_YEARS,
            fixed_rate_bp: DEFAULT_FIXED_RATE_BP,
            floating_rate_bp: DEFAULT_FLOATING_RATE_BP,
            reset_frequency: ResetFrequency::Annual,
            payment_in_kind: false,
            hedge_cost: 0.0,
        }
    }
}

impl LoanConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validated loan parameters
    pub fn parameters(&self) -> Result<LoanParameters> {
        LoanParameters::new(
            self.principal,
            self.duration_years,
            self.reset_frequency,
            self.payment_in_kind,
            self.hedge_cost,
        )
    }

    /// Input table populated with the configured rates and no prepayments
    pub fn default_inputs(&self) -> Result<Vec<PeriodInput>> {
        let params = self.parameters()?;
        Ok(default_period_inputs(
            &params,
            self.fixed_rate_bp,
            self.floating_rate_bp,
        ))
    }
}
