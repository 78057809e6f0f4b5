//! Amortization schedule computation

mod state;
mod engine;
mod rows;

pub use engine::{compute_schedule, AmortizationEngine};
pub use rows::{PeriodResult, Schedule, SummaryTotals, YearEndRow};
