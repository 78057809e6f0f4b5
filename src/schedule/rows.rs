//! Schedule output structures

use serde::{Deserialize, Serialize};

/// One computed schedule row, carrying its period inputs alongside the results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodResult {
    // Period inputs
    pub year: u32,
    pub period: u32,
    pub floating_rate_bp: f64,
    pub fixed_rate_bp: f64,
    pub total_rate_bp: f64,
    pub prepayment: f64,

    /// Principal balance at the start of the period
    pub principal: f64,

    // Year-end postings (zero on every other period)
    pub interest_added_to_principal: f64,
    pub interest_due: f64,
    pub interest_due_floating: f64,
    pub interest_due_fixed: f64,
    pub net_cash_outflow: f64,
}

/// Year-end subset of a schedule row, used for charting and summaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearEndRow {
    pub year: u32,
    pub principal: f64,
    pub interest_added_to_principal: f64,
    pub interest_due: f64,
    pub interest_due_floating: f64,
    pub interest_due_fixed: f64,
    pub net_cash_outflow: f64,
}

impl From<&PeriodResult> for YearEndRow {
    fn from(row: &PeriodResult) -> Self {
        Self {
            year: row.year,
            principal: row.principal,
            interest_added_to_principal: row.interest_added_to_principal,
            interest_due: row.interest_due,
            interest_due_floating: row.interest_due_floating,
            interest_due_fixed: row.interest_due_fixed,
            net_cash_outflow: row.net_cash_outflow,
        }
    }
}

/// Totals over a full schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryTotals {
    /// Sum of net cash outflows, less the principal, plus the hedge cost
    pub total_net_cost: f64,
    pub total_floating_interest: f64,
    pub total_fixed_interest: f64,
    pub total_capitalized_interest: f64,
    pub total_prepayment: f64,
    pub hedge_cost: f64,
    /// Principal outstanding at the start of the final period
    pub final_principal: f64,
    pub periods_per_year: u32,
    pub payment_in_kind: bool,
}

/// Complete schedule: per-period rows and summary totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub rows: Vec<PeriodResult>,
    pub summary: SummaryTotals,
}

impl Schedule {
    /// One row per loan year, taken from each year's final period
    pub fn year_end_rows(&self) -> Vec<YearEndRow> {
        let periods = self.summary.periods_per_year as usize;
        self.rows
            .iter()
            .enumerate()
            .filter(|(i, _)| (i + 1) % periods == 0)
            .map(|(_, row)| YearEndRow::from(row))
            .collect()
    }

    /// Net cash outflow per period, in period order
    pub fn net_cash_outflows(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.net_cash_outflow).collect()
    }
}
