//! Error types for loan parameter validation, loading and export

use thiserror::Error;

/// Errors raised while building inputs, computing a schedule or exporting it
#[derive(Debug, Error)]
pub enum LoanError {
    /// A caller-supplied value violates an input constraint.
    /// `period` is the 1-based period index when the violation is per-row.
    #[error("Invalid input: {field}{} - {reason}", period_suffix(.period))]
    InvalidInput {
        field: String,
        period: Option<u32>,
        reason: String,
    },

    #[error("Unknown reset frequency: {0} (expected \"12 months\", \"6 months\" or \"3 months\")")]
    UnknownResetFrequency(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn period_suffix(period: &Option<u32>) -> String {
    match period {
        Some(p) => format!(" (period {})", p),
        None => String::new(),
    }
}

impl LoanError {
    /// Invalid scalar parameter
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        LoanError::InvalidInput {
            field: field.to_string(),
            period: None,
            reason: reason.into(),
        }
    }

    /// Invalid value on a specific period row
    pub fn invalid_period(field: &str, period: u32, reason: impl Into<String>) -> Self {
        LoanError::InvalidInput {
            field: field.to_string(),
            period: Some(period),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
