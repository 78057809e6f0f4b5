//! All-in cost of funds for a computed schedule
//!
//! The borrower receives the principal (net of any hedge cost) up front and
//! pays each period's net cash outflow. The cost of funds is the internal
//! rate of return of that series, annualized by compounding the periodic
//! rate over the periods in a year.

use crate::loan::LoanParameters;
use crate::schedule::Schedule;

const TOLERANCE: f64 = 1e-12;
const MAX_ITERATIONS: usize = 500;
const RATE_FLOOR: f64 = -0.99;
const RATE_CEILING: f64 = 10.0;

/// Borrower-side cashflows: inflow at t0, one outflow per period after
pub fn borrower_cashflows(schedule: &Schedule, params: &LoanParameters) -> Vec<f64> {
    std::iter::once(params.principal - params.hedge_cost)
        .chain(schedule.net_cash_outflows().into_iter().map(|cf| -cf))
        .collect()
}

/// Annualized cost of funds, or `None` if the cashflows have no IRR
pub fn cost_of_funds(schedule: &Schedule, params: &LoanParameters) -> Option<f64> {
    let cashflows = borrower_cashflows(schedule, params);
    periodic_irr(&cashflows)
        .map(|rate| (1.0 + rate).powi(params.periods_per_year() as i32) - 1.0)
}

/// Per-period internal rate of return of `cashflows` (index = period)
pub fn periodic_irr(cashflows: &[f64]) -> Option<f64> {
    let has_inflow = cashflows.iter().any(|&cf| cf > 0.0);
    let has_outflow = cashflows.iter().any(|&cf| cf < 0.0);
    if !has_inflow || !has_outflow {
        return None;
    }

    newton(cashflows).or_else(|| bisect(cashflows))
}

/// Net present value and its derivative at a periodic rate
fn npv_with_slope(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let growth = 1.0 + rate;
    let mut discount = 1.0;
    let mut npv = 0.0;
    let mut slope = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        npv += cf * discount;
        // d/dr of cf * (1+r)^-t
        slope -= t as f64 * cf * discount / growth;
        discount /= growth;
    }

    (npv, slope)
}

fn newton(cashflows: &[f64]) -> Option<f64> {
    let mut rate = 0.01;

    for _ in 0..MAX_ITERATIONS {
        let (npv, slope) = npv_with_slope(cashflows, rate);
        if slope.abs() < f64::EPSILON {
            return None;
        }

        let next = (rate - npv / slope).clamp(RATE_FLOOR, RATE_CEILING);
        if (next - rate).abs() < TOLERANCE {
            return Some(next);
        }
        rate = next;
    }

    None
}

fn bisect(cashflows: &[f64]) -> Option<f64> {
    let npv = |rate: f64| npv_with_slope(cashflows, rate).0;

    let (mut low, mut high) = (RATE_FLOOR, RATE_CEILING);
    let mut npv_low = npv(low);
    if npv_low * npv(high) > 0.0 {
        return None;
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = 0.5 * (low + high);
        let npv_mid = npv(mid);
        if npv_mid.abs() < TOLERANCE || high - low < TOLERANCE {
            return Some(mid);
        }
        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    None
}
