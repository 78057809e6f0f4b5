//! Loan terms and the per-period input table

mod data;
pub mod loader;

pub use data::{
    apply_floating_shift, default_period_inputs, LoanParameters, PeriodInput, ResetFrequency,
    MAX_DURATION_YEARS,
};
pub use loader::{load_period_inputs, load_period_inputs_from_reader};
