//! Loan Simulator - amortization schedules for blended fixed/floating rate bonds
//!
//! This library provides:
//! - Loan terms and a per-period rate/prepayment input table
//! - Single-pass amortization with payment-in-kind capitalization and prepayments
//! - Year-end rollups, summary totals and all-in cost of funds
//! - What-if scenario batches
//! - CSV/JSON exports of the computed schedule

pub mod error;
pub mod loan;
pub mod schedule;
pub mod cost;
pub mod scenario;
pub mod config;
pub mod export;

// Re-export commonly used types
pub use error::{LoanError, Result};
pub use loan::{LoanParameters, PeriodInput, ResetFrequency};
pub use schedule::{compute_schedule, AmortizationEngine, PeriodResult, Schedule, SummaryTotals, YearEndRow};
pub use cost::cost_of_funds;
pub use scenario::{Scenario, ScenarioRunner};
pub use config::LoanConfig;
