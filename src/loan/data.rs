//! Loan parameter and input-table structures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{LoanError, Result};

/// Reference/reset period of the floating rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ResetFrequency {
    /// Reset every 12 months (one period per year)
    #[default]
    #[serde(rename = "12 months")]
    Annual,
    /// Reset every 6 months
    #[serde(rename = "6 months")]
    SemiAnnual,
    /// Reset every 3 months
    #[serde(rename = "3 months")]
    Quarterly,
}

impl ResetFrequency {
    /// Number of rate periods in one loan year
    pub fn periods_per_year(&self) -> u32 {
        match self {
            ResetFrequency::Annual => 1,
            ResetFrequency::SemiAnnual => 2,
            ResetFrequency::Quarterly => 4,
        }
    }

    /// Label used by the input form
    pub fn as_str(&self) -> &'static str {
        match self {
            ResetFrequency::Annual => "12 months",
            ResetFrequency::SemiAnnual => "6 months",
            ResetFrequency::Quarterly => "3 months",
        }
    }
}

impl fmt::Display for ResetFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResetFrequency {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "12 months" | "12m" | "annual" => Ok(ResetFrequency::Annual),
            "6 months" | "6m" | "semiannual" => Ok(ResetFrequency::SemiAnnual),
            "3 months" | "3m" | "quarterly" => Ok(ResetFrequency::Quarterly),
            _ => Err(LoanError::UnknownResetFrequency(s.to_string())),
        }
    }
}

/// Longest maturity accepted, in years
pub const MAX_DURATION_YEARS: u32 = 1_000;

/// Scalar loan terms, fixed for one computation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Principal amount of the bond at issue
    pub principal: f64,

    /// Maturity in whole years
    pub duration_years: u32,

    /// Floating rate reset frequency (drives periods per year)
    pub reset_frequency: ResetFrequency,

    /// Capitalize year-end interest instead of paying it (except at maturity)
    pub payment_in_kind: bool,

    /// Up-front cost of a hedging instrument, added to the total net cost
    pub hedge_cost: f64,
}

impl LoanParameters {
    /// Build validated parameters
    pub fn new(
        principal: f64,
        duration_years: u32,
        reset_frequency: ResetFrequency,
        payment_in_kind: bool,
        hedge_cost: f64,
    ) -> Result<Self> {
        let params = Self {
            principal,
            duration_years,
            reset_frequency,
            payment_in_kind,
            hedge_cost,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn periods_per_year(&self) -> u32 {
        self.reset_frequency.periods_per_year()
    }

    /// Total number of rate periods over the life of the loan
    pub fn total_periods(&self) -> usize {
        self.duration_years as usize * self.periods_per_year() as usize
    }

    /// Total number of rate periods as a 1-based period index bound
    fn last_period(&self) -> u32 {
        self.duration_years.saturating_mul(self.periods_per_year())
    }

    /// Year (1-based) that a 1-based period index falls in
    pub fn year_of_period(&self, period: u32) -> u32 {
        period.div_ceil(self.periods_per_year())
    }

    /// Check scalar constraints
    pub fn validate(&self) -> Result<()> {
        if !self.principal.is_finite() || self.principal <= 0.0 {
            return Err(LoanError::invalid(
                "principal",
                format!("must be a finite amount > 0, got {}", self.principal),
            ));
        }
        if self.duration_years == 0 {
            return Err(LoanError::invalid("duration_years", "must be at least 1 year"));
        }
        if self.duration_years > MAX_DURATION_YEARS {
            return Err(LoanError::invalid(
                "duration_years",
                format!("must be at most {} years, got {}", MAX_DURATION_YEARS, self.duration_years),
            ));
        }
        if !self.hedge_cost.is_finite() {
            return Err(LoanError::invalid(
                "hedge_cost",
                format!("must be finite, got {}", self.hedge_cost),
            ));
        }
        Ok(())
    }
}

/// One row of the editable rate/prepayment table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodInput {
    /// Loan year (1-based)
    pub year: u32,

    /// Period index (1-based)
    pub period: u32,

    /// Floating rate for the period, in basis points
    pub floating_rate_bp: f64,

    /// Fixed rate for the period, in basis points
    pub fixed_rate_bp: f64,

    /// Prepayment made at the end of the period
    #[serde(default)]
    pub prepayment: f64,
}

impl PeriodInput {
    /// Fixed plus floating rate, in basis points
    pub fn total_rate_bp(&self) -> f64 {
        self.floating_rate_bp + self.fixed_rate_bp
    }
}

/// Default-populate the input table: one row per period, constant rates, no prepayments
pub fn default_period_inputs(
    params: &LoanParameters,
    fixed_rate_bp: f64,
    floating_rate_bp: f64,
) -> Vec<PeriodInput> {
    (1..=params.last_period())
        .map(|period| PeriodInput {
            year: params.year_of_period(period),
            period,
            floating_rate_bp,
            fixed_rate_bp,
            prepayment: 0.0,
        })
        .collect()
}

/// Return a copy of `inputs` with the floating rate moved by `shift_bp` for
/// every period from `from_year` onwards. Shifted rates floor at 0 bp.
pub fn apply_floating_shift(inputs: &[PeriodInput], from_year: u32, shift_bp: f64) -> Vec<PeriodInput> {
    inputs
        .iter()
        .map(|row| {
            let mut row = row.clone();
            if row.year >= from_year {
                row.floating_rate_bp = (row.floating_rate_bp + shift_bp).max(0.0);
            }
            row
        })
        .collect()
}
