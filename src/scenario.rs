//! What-if scenario runner
//!
//! Holds one base set of loan terms and input table, then evaluates many
//! variations of it. Each scenario is an independent schedule computation,
//! so batches run in parallel.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cost::cost_of_funds;
use crate::error::Result;
use crate::loan::{apply_floating_shift, LoanParameters, PeriodInput};
use crate::schedule::{compute_schedule, Schedule};

/// A named variation on the base loan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,

    /// Floating rate shift in basis points, applied from `shift_from_year`
    #[serde(default)]
    pub floating_shift_bp: f64,

    /// First loan year the shift applies to
    #[serde(default = "default_shift_year")]
    pub shift_from_year: u32,

    /// Override the payment-in-kind flag
    #[serde(default)]
    pub payment_in_kind: Option<bool>,

    /// Override the hedge cost
    #[serde(default)]
    pub hedge_cost: Option<f64>,
}

fn default_shift_year() -> u32 {
    1
}

impl Scenario {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shift_from_year: 1,
            ..Default::default()
        }
    }

    /// Shift the floating rate from a given year onwards
    pub fn with_floating_shift(mut self, from_year: u32, shift_bp: f64) -> Self {
        self.shift_from_year = from_year;
        self.floating_shift_bp = shift_bp;
        self
    }

    pub fn with_payment_in_kind(mut self, payment_in_kind: bool) -> Self {
        self.payment_in_kind = Some(payment_in_kind);
        self
    }

    pub fn with_hedge_cost(mut self, hedge_cost: f64) -> Self {
        self.hedge_cost = Some(hedge_cost);
        self
    }
}

/// Outcome of one scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub name: String,
    pub schedule: Schedule,
    pub cost_of_funds: Option<f64>,
}

/// Base loan plus input table, reused across scenarios
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    params: LoanParameters,
    inputs: Vec<PeriodInput>,
}

impl ScenarioRunner {
    pub fn new(params: LoanParameters, inputs: Vec<PeriodInput>) -> Self {
        Self { params, inputs }
    }

    /// Compute the base case without any variation
    pub fn base(&self) -> Result<Schedule> {
        compute_schedule(&self.params, &self.inputs)
    }

    /// Run a single scenario
    pub fn run(&self, scenario: &Scenario) -> Result<ScenarioResult> {
        let mut params = self.params.clone();
        if let Some(pik) = scenario.payment_in_kind {
            params.payment_in_kind = pik;
        }
        if let Some(hedge_cost) = scenario.hedge_cost {
            params.hedge_cost = hedge_cost;
        }

        let inputs = if scenario.floating_shift_bp != 0.0 {
            apply_floating_shift(&self.inputs, scenario.shift_from_year, scenario.floating_shift_bp)
        } else {
            self.inputs.clone()
        };

        let schedule = compute_schedule(&params, &inputs)?;
        let cost_of_funds = cost_of_funds(&schedule, &params);

        Ok(ScenarioResult {
            name: scenario.name.clone(),
            schedule,
            cost_of_funds,
        })
    }

    /// Run scenarios in parallel; results keep the order of `scenarios`
    pub fn run_batch(&self, scenarios: &[Scenario]) -> Result<Vec<ScenarioResult>> {
        log::debug!("running {} scenarios", scenarios.len());
        scenarios.par_iter().map(|s| self.run(s)).collect()
    }

    pub fn params(&self) -> &LoanParameters {
        &self.params
    }

    pub fn inputs(&self) -> &[PeriodInput] {
        &self.inputs
    }
}
