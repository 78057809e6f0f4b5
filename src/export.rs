//! Tabular exports of a computed schedule

use serde::Serialize;
use std::io::Write;

use crate::error::Result;
use crate::schedule::{PeriodResult, Schedule, YearEndRow};

/// Full-table export row, one per period
#[derive(Debug, Serialize)]
struct ScheduleCsvRow {
    #[serde(rename = "Year")]
    year: u32,
    #[serde(rename = "Period")]
    period: u32,
    #[serde(rename = "Floating interest rate")]
    floating_rate_bp: f64,
    #[serde(rename = "Fixed interest rate")]
    fixed_rate_bp: f64,
    #[serde(rename = "Total interest rate")]
    total_rate_bp: f64,
    #[serde(rename = "Prepayment")]
    prepayment: f64,
    #[serde(rename = "Principal Amount")]
    principal: f64,
    #[serde(rename = "Interest added to Principal")]
    interest_added_to_principal: f64,
    #[serde(rename = "Interest to be paid")]
    interest_due: f64,
    #[serde(rename = "Interest due to Floating interest rate")]
    interest_due_floating: f64,
    #[serde(rename = "Interest due to Fixed interest rate")]
    interest_due_fixed: f64,
    #[serde(rename = "Net cash outflow")]
    net_cash_outflow: f64,
}

impl From<&PeriodResult> for ScheduleCsvRow {
    fn from(r: &PeriodResult) -> Self {
        Self {
            year: r.year,
            period: r.period,
            floating_rate_bp: r.floating_rate_bp,
            fixed_rate_bp: r.fixed_rate_bp,
            total_rate_bp: r.total_rate_bp,
            prepayment: r.prepayment,
            principal: r.principal,
            interest_added_to_principal: r.interest_added_to_principal,
            interest_due: r.interest_due,
            interest_due_floating: r.interest_due_floating,
            interest_due_fixed: r.interest_due_fixed,
            net_cash_outflow: r.net_cash_outflow,
        }
    }
}

/// Year-end export row
#[derive(Debug, Serialize)]
struct YearEndCsvRow {
    #[serde(rename = "Year")]
    year: u32,
    #[serde(rename = "Principal Amount")]
    principal: f64,
    #[serde(rename = "Interest added to Principal")]
    interest_added_to_principal: f64,
    #[serde(rename = "Interest to be paid")]
    interest_due: f64,
    #[serde(rename = "Interest due to Floating interest rate")]
    interest_due_floating: f64,
    #[serde(rename = "Interest due to Fixed interest rate")]
    interest_due_fixed: f64,
    #[serde(rename = "Net cash outflow")]
    net_cash_outflow: f64,
}

impl From<&YearEndRow> for YearEndCsvRow {
    fn from(r: &YearEndRow) -> Self {
        Self {
            year: r.year,
            principal: r.principal,
            interest_added_to_principal: r.interest_added_to_principal,
            interest_due: r.interest_due,
            interest_due_floating: r.interest_due_floating,
            interest_due_fixed: r.interest_due_fixed,
            net_cash_outflow: r.net_cash_outflow,
        }
    }
}

/// Write every period of the schedule, inputs and results, as CSV
pub fn write_schedule_csv<W: Write>(writer: W, schedule: &Schedule) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in &schedule.rows {
        wtr.serialize(ScheduleCsvRow::from(row))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write one row per loan year
pub fn write_year_end_csv<W: Write>(writer: W, schedule: &Schedule) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in &schedule.year_end_rows() {
        wtr.serialize(YearEndCsvRow::from(row))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Summary totals as pretty-printed JSON
pub fn summary_json(schedule: &Schedule) -> Result<String> {
    Ok(serde_json::to_string_pretty(&schedule.summary)?)
}

/// Format an amount with two decimals and comma-grouped thousands
pub fn format_thousands(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}
