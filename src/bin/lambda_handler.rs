//! AWS Lambda handler for computing loan schedules
//!
//! Accepts the loan fields (and optionally an edited input table) as JSON and
//! returns the full schedule, year-end rows, summary and cost of funds.
//! Invocations share no state.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use loan_simulator::{
    compute_schedule, cost_of_funds, LoanConfig, PeriodInput, PeriodResult, SummaryTotals,
    YearEndRow,
};

/// Input for one schedule computation
#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    /// Loan form fields; missing fields take the form defaults
    #[serde(flatten)]
    pub loan: LoanConfig,

    /// Edited input table; defaults to constant rates and no prepayments
    #[serde(default)]
    pub periods: Option<Vec<PeriodInput>>,
}

/// Output from the computation
#[derive(Debug, Serialize, Default)]
pub struct ScheduleResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryTotals>,
    pub cost_of_funds_pct: Option<f64>,
    pub year_end: Vec<YearEndRow>,
    pub rows: Vec<PeriodResult>,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn compute(request: ScheduleRequest) -> loan_simulator::Result<ScheduleResponse> {
    let params = request.loan.parameters()?;
    let inputs = match request.periods {
        Some(periods) => periods,
        None => request.loan.default_inputs()?,
    };

    let schedule = compute_schedule(&params, &inputs)?;
    let cost_of_funds_pct = cost_of_funds(&schedule, &params).map(|r| r * 100.0);

    Ok(ScheduleResponse {
        year_end: schedule.year_end_rows(),
        cost_of_funds_pct,
        summary: Some(schedule.summary),
        rows: schedule.rows,
        ..Default::default()
    })
}

/// Compute a response, reporting invalid input in the `error` field
fn respond(request: ScheduleRequest) -> ScheduleResponse {
    let start = Instant::now();

    let mut response = match compute(request) {
        Ok(response) => response,
        Err(e) => {
            log::warn!("rejected request: {}", e);
            ScheduleResponse {
                error: Some(e.to_string()),
                ..Default::default()
            }
        }
    };
    response.execution_time_ms = start.elapsed().as_millis() as u64;

    response
}

async fn handler(event: LambdaEvent<ScheduleRequest>) -> Result<ScheduleResponse, Error> {
    Ok(respond(event.payload))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
