//! Load an edited rate/prepayment table from CSV

use super::PeriodInput;
use crate::error::Result;
use csv::Reader;
use std::path::Path;

/// Raw CSV row matching the input table export columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Year")]
    year: u32,
    #[serde(rename = "Period")]
    period: u32,
    #[serde(rename = "Floating interest rate")]
    floating_rate_bp: f64,
    #[serde(rename = "Fixed interest rate")]
    fixed_rate_bp: f64,
    #[serde(rename = "Prepayment", default)]
    prepayment: Option<f64>,
}

impl From<CsvRow> for PeriodInput {
    fn from(row: CsvRow) -> Self {
        PeriodInput {
            year: row.year,
            period: row.period,
            floating_rate_bp: row.floating_rate_bp,
            fixed_rate_bp: row.fixed_rate_bp,
            prepayment: row.prepayment.unwrap_or(0.0),
        }
    }
}

/// Load period inputs from a CSV file, in file order
pub fn load_period_inputs<P: AsRef<Path>>(path: P) -> Result<Vec<PeriodInput>> {
    let reader = Reader::from_path(path)?;
    collect_rows(reader)
}

/// Load period inputs from any reader (e.g., string buffer, request body)
pub fn load_period_inputs_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<PeriodInput>> {
    collect_rows(Reader::from_reader(reader))
}

fn collect_rows<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<PeriodInput>> {
    let mut inputs = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        inputs.push(row.into());
    }

    log::debug!("loaded {} period input rows", inputs.len());
    Ok(inputs)
}
