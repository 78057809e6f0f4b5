//! Amortization engine: single forward pass over the rate periods

use log::{debug, trace, warn};

use super::rows::{PeriodResult, Schedule, SummaryTotals};
use super::state::{ScheduleState, YearEndInterest};
use crate::error::{LoanError, Result};
use crate::loan::{LoanParameters, PeriodInput};

/// Computes amortization schedules for one set of loan terms
#[derive(Debug, Clone)]
pub struct AmortizationEngine {
    params: LoanParameters,
}

impl AmortizationEngine {
    /// Create an engine for validated loan terms
    pub fn new(params: LoanParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Run the schedule for one input table.
    ///
    /// Inputs are checked in full before any row is computed; a violation
    /// returns `InvalidInput` and no partial schedule.
    pub fn compute(&self, inputs: &[PeriodInput]) -> Result<Schedule> {
        self.validate_inputs(inputs)?;

        let params = &self.params;
        let periods_per_year = params.periods_per_year();
        let last = inputs.len() - 1;

        debug!(
            "computing schedule: principal={} years={} periods/year={} pik={}",
            params.principal, params.duration_years, periods_per_year, params.payment_in_kind
        );

        let mut state = ScheduleState::new(params.principal);
        let mut rows = Vec::with_capacity(inputs.len());

        for (i, input) in inputs.iter().enumerate() {
            if i > 0 {
                state.advance_period();
            }
            state.accrual.accrue(input);

            let mut row = Self::blank_row(input, state.principal);

            if (i + 1) % periods_per_year as usize == 0 {
                self.post_year_end(&mut row, &state, i == last);
                state.accrual.reset();
            }

            if row.prepayment > row.principal + row.interest_added_to_principal {
                warn!(
                    "period {}: prepayment {} exceeds outstanding principal {}",
                    row.period, row.prepayment, row.principal
                );
            }

            state.prior_capitalized = row.interest_added_to_principal;
            state.prior_prepayment = row.prepayment;
            rows.push(row);
        }

        let summary = self.summarize(&rows);
        debug!(
            "schedule complete: {} rows, total net cost {}",
            rows.len(),
            summary.total_net_cost
        );

        Ok(Schedule { rows, summary })
    }

    /// Row with the period's inputs and opening principal, nothing posted
    fn blank_row(input: &PeriodInput, principal: f64) -> PeriodResult {
        PeriodResult {
            year: input.year,
            period: input.period,
            floating_rate_bp: input.floating_rate_bp,
            fixed_rate_bp: input.fixed_rate_bp,
            total_rate_bp: input.total_rate_bp(),
            prepayment: input.prepayment,
            principal,
            interest_added_to_principal: 0.0,
            interest_due: 0.0,
            interest_due_floating: 0.0,
            interest_due_fixed: 0.0,
            net_cash_outflow: 0.0,
        }
    }

    /// Post interest, capitalization and cash outflow on a year's final period
    fn post_year_end(&self, row: &mut PeriodResult, state: &ScheduleState, maturity: bool) {
        let interest = YearEndInterest::on_principal(
            row.principal,
            &state.accrual,
            self.params.periods_per_year(),
        );

        row.interest_due = interest.blended;
        row.interest_due_floating = interest.floating;
        row.interest_due_fixed = interest.fixed;

        // Interest at maturity is always settled in cash
        if !maturity && self.params.payment_in_kind {
            row.interest_added_to_principal = row.interest_due;
            row.interest_due = 0.0;
        }

        row.net_cash_outflow = if maturity {
            row.principal + row.interest_due + row.prepayment
        } else {
            row.interest_due + row.prepayment
        };

        trace!(
            "year {} end (period {}): principal={} interest={} capitalized={} outflow={}",
            row.year,
            row.period,
            row.principal,
            row.interest_due,
            row.interest_added_to_principal,
            row.net_cash_outflow
        );
    }

    fn summarize(&self, rows: &[PeriodResult]) -> SummaryTotals {
        let total_outflow: f64 = rows.iter().map(|r| r.net_cash_outflow).sum();

        SummaryTotals {
            total_net_cost: total_outflow - self.params.principal + self.params.hedge_cost,
            total_floating_interest: rows.iter().map(|r| r.interest_due_floating).sum(),
            total_fixed_interest: rows.iter().map(|r| r.interest_due_fixed).sum(),
            total_capitalized_interest: rows.iter().map(|r| r.interest_added_to_principal).sum(),
            total_prepayment: rows.iter().map(|r| r.prepayment).sum(),
            hedge_cost: self.params.hedge_cost,
            final_principal: rows.last().map(|r| r.principal).unwrap_or(self.params.principal),
            periods_per_year: self.params.periods_per_year(),
            payment_in_kind: self.params.payment_in_kind,
        }
    }

    fn validate_inputs(&self, inputs: &[PeriodInput]) -> Result<()> {
        let periods_per_year = self.params.periods_per_year() as usize;

        if inputs.is_empty() {
            return Err(LoanError::invalid("periods", "input table is empty"));
        }
        if inputs.len() % periods_per_year != 0 {
            return Err(LoanError::invalid(
                "periods",
                format!(
                    "{} rows is not a whole number of years at {} periods per year",
                    inputs.len(),
                    periods_per_year
                ),
            ));
        }
        if inputs.len() != self.params.total_periods() {
            return Err(LoanError::invalid(
                "periods",
                format!(
                    "expected {} rows ({} years x {} periods), got {}",
                    self.params.total_periods(),
                    self.params.duration_years,
                    periods_per_year,
                    inputs.len()
                ),
            ));
        }

        for (i, input) in inputs.iter().enumerate() {
            let period = i as u32 + 1;
            check_non_negative("floating_rate_bp", period, input.floating_rate_bp)?;
            check_non_negative("fixed_rate_bp", period, input.fixed_rate_bp)?;
            check_non_negative("prepayment", period, input.prepayment)?;
        }

        Ok(())
    }
}

fn check_non_negative(field: &str, period: u32, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LoanError::invalid_period(
            field,
            period,
            format!("must be a finite value >= 0, got {}", value),
        ))
    }
}

/// Compute the full schedule and summary for one run
pub fn compute_schedule(params: &LoanParameters, inputs: &[PeriodInput]) -> Result<Schedule> {
    AmortizationEngine::new(params.clone())?.compute(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::{default_period_inputs, ResetFrequency};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn params(
        principal: f64,
        years: u32,
        reset: ResetFrequency,
        pik: bool,
    ) -> LoanParameters {
        LoanParameters::new(principal, years, reset, pik, 0.0).unwrap()
    }

    #[test]
    fn test_cash_pay_annual_schedule() {
        let p = params(4_000_000.0, 3, ResetFrequency::Annual, false);
        let inputs = default_period_inputs(&p, 200.0, 350.0);
        let schedule = compute_schedule(&p, &inputs).unwrap();
        let rows = &schedule.rows;

        assert_eq!(rows.len(), 3);
        for row in rows {
            assert_eq!(row.principal, 4_000_000.0);
            assert_relative_eq!(row.interest_due, 220_000.0, epsilon = 1e-6);
            assert_relative_eq!(row.interest_due_floating, 140_000.0, epsilon = 1e-6);
            assert_relative_eq!(row.interest_due_fixed, 80_000.0, epsilon = 1e-6);
            assert_eq!(row.interest_added_to_principal, 0.0);
        }
        assert_relative_eq!(rows[0].net_cash_outflow, 220_000.0, epsilon = 1e-6);
        assert_relative_eq!(rows[1].net_cash_outflow, 220_000.0, epsilon = 1e-6);
        assert_relative_eq!(rows[2].net_cash_outflow, 4_220_000.0, epsilon = 1e-6);

        assert_relative_eq!(schedule.summary.total_net_cost, 660_000.0, epsilon = 1e-6);
        assert_relative_eq!(schedule.summary.total_floating_interest, 420_000.0, epsilon = 1e-6);
        assert_relative_eq!(schedule.summary.total_fixed_interest, 240_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_payment_in_kind_capitalizes_until_maturity() {
        let p = params(4_000_000.0, 3, ResetFrequency::Annual, true);
        let inputs = default_period_inputs(&p, 200.0, 350.0);
        let rows = compute_schedule(&p, &inputs).unwrap().rows;

        assert_eq!(rows[0].interest_due, 0.0);
        assert_relative_eq!(rows[0].interest_added_to_principal, 220_000.0, epsilon = 1e-6);
        assert_eq!(rows[0].net_cash_outflow, 0.0);

        assert_relative_eq!(rows[1].principal, 4_220_000.0, epsilon = 1e-6);
        assert_eq!(rows[1].interest_due, 0.0);
        assert_relative_eq!(rows[1].interest_added_to_principal, 232_100.0, epsilon = 1e-6);
        assert_eq!(rows[1].net_cash_outflow, 0.0);

        assert_relative_eq!(rows[2].principal, 4_452_100.0, epsilon = 1e-6);
        assert_relative_eq!(rows[2].interest_due, 244_865.5, epsilon = 1e-6);
        assert_eq!(rows[2].interest_added_to_principal, 0.0);
        assert_relative_eq!(rows[2].net_cash_outflow, 4_696_965.5, epsilon = 1e-6);

        let summary = compute_schedule(&p, &inputs).unwrap().summary;
        assert_relative_eq!(summary.total_capitalized_interest, 452_100.0, epsilon = 1e-6);
        assert_eq!(summary.total_prepayment, 0.0);
        assert_relative_eq!(summary.final_principal, 4_452_100.0, epsilon = 1e-6);
        assert!(summary.payment_in_kind);
    }

    #[test]
    fn test_prepayment_reduces_next_principal() {
        let p = params(4_000_000.0, 2, ResetFrequency::Annual, false);
        let mut inputs = default_period_inputs(&p, 0.0, 0.0);
        inputs[0].prepayment = 500_000.0;

        let schedule = compute_schedule(&p, &inputs).unwrap();
        let rows = &schedule.rows;

        assert_eq!(rows[0].principal, 4_000_000.0);
        assert_eq!(rows[0].net_cash_outflow, 500_000.0);
        assert_eq!(rows[1].principal, 3_500_000.0);
        assert_eq!(rows[1].net_cash_outflow, 3_500_000.0);

        assert_eq!(schedule.summary.total_prepayment, 500_000.0);
        assert_eq!(schedule.summary.final_principal, 3_500_000.0);
        assert_eq!(schedule.summary.total_capitalized_interest, 0.0);
    }

    #[test]
    fn test_non_year_end_periods_post_nothing() {
        let p = params(1_000_000.0, 3, ResetFrequency::Quarterly, true);
        let mut inputs = default_period_inputs(&p, 150.0, 425.0);
        inputs[5].prepayment = 10_000.0;

        let schedule = compute_schedule(&p, &inputs).unwrap();
        assert_eq!(schedule.rows.len(), 12);

        for (i, row) in schedule.rows.iter().enumerate() {
            if (i + 1) % 4 != 0 {
                assert_eq!(row.interest_due, 0.0);
                assert_eq!(row.interest_due_floating, 0.0);
                assert_eq!(row.interest_due_fixed, 0.0);
                assert_eq!(row.interest_added_to_principal, 0.0);
                assert_eq!(row.net_cash_outflow, 0.0);
            } else if i < 11 {
                assert_eq!(row.net_cash_outflow, row.interest_due + row.prepayment);
            }
        }

        let last = schedule.rows.last().unwrap();
        assert_eq!(last.interest_added_to_principal, 0.0);
        assert_eq!(
            last.net_cash_outflow,
            last.principal + last.interest_due + last.prepayment
        );
    }

    #[test]
    fn test_principal_recurrence_holds() {
        let p = params(2_500_000.0, 4, ResetFrequency::SemiAnnual, true);
        let mut inputs = default_period_inputs(&p, 100.0, 300.0);
        inputs[2].prepayment = 100_000.0;
        inputs[5].prepayment = 50_000.0;

        let rows = compute_schedule(&p, &inputs).unwrap().rows;

        assert_eq!(rows[0].principal, 2_500_000.0);
        for i in 1..rows.len() {
            let expected =
                rows[i - 1].principal + rows[i - 1].interest_added_to_principal - rows[i - 1].prepayment;
            assert_eq!(rows[i].principal, expected);
        }
    }

    #[test]
    fn test_intra_year_rates_are_averaged() {
        let p = params(1_000_000.0, 1, ResetFrequency::SemiAnnual, false);
        let mut inputs = default_period_inputs(&p, 200.0, 300.0);
        inputs[1].floating_rate_bp = 500.0;

        let rows = compute_schedule(&p, &inputs).unwrap().rows;

        // (500 + 700) / 10000 / 2 = 6%
        assert_relative_eq!(rows[1].interest_due, 60_000.0, epsilon = 1e-6);
        assert_relative_eq!(rows[1].interest_due_floating, 40_000.0, epsilon = 1e-6);
        assert_relative_eq!(rows[1].interest_due_fixed, 20_000.0, epsilon = 1e-6);
        assert_relative_eq!(rows[1].net_cash_outflow, 1_060_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_interest_uses_year_end_principal() {
        // A mid-year prepayment lowers the principal the whole year's rate is applied to
        let p = params(1_000_000.0, 2, ResetFrequency::SemiAnnual, false);
        let mut inputs = default_period_inputs(&p, 0.0, 1000.0);
        inputs[0].prepayment = 200_000.0;

        let rows = compute_schedule(&p, &inputs).unwrap().rows;

        assert_eq!(rows[0].net_cash_outflow, 0.0);
        assert_eq!(rows[1].principal, 800_000.0);
        assert_relative_eq!(rows[1].interest_due, 80_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_rates_repay_principal_only() {
        let p = params(750_000.0, 3, ResetFrequency::Quarterly, true);
        let mut inputs = default_period_inputs(&p, 0.0, 0.0);
        inputs[11].prepayment = 1_000.0;

        let schedule = compute_schedule(&p, &inputs).unwrap();

        for row in &schedule.rows {
            assert_eq!(row.interest_due, 0.0);
            assert_eq!(row.interest_due_floating, 0.0);
            assert_eq!(row.interest_due_fixed, 0.0);
            assert_eq!(row.interest_added_to_principal, 0.0);
        }
        assert_eq!(schedule.rows[11].net_cash_outflow, 751_000.0);
        assert_abs_diff_eq!(schedule.summary.total_net_cost, 1_000.0);
    }

    #[test]
    fn test_recompute_is_identical() {
        let p = LoanParameters::new(3_000_000.0, 5, ResetFrequency::Quarterly, true, 12_500.0).unwrap();
        let mut inputs = default_period_inputs(&p, 215.0, 335.0);
        inputs[7].floating_rate_bp = 480.0;
        inputs[9].prepayment = 125_000.0;

        let first = compute_schedule(&p, &inputs).unwrap();
        let second = compute_schedule(&p, &inputs).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.rows.len(), 20);
    }

    #[test]
    fn test_hedge_cost_added_to_net_cost() {
        let p = LoanParameters::new(4_000_000.0, 3, ResetFrequency::Annual, false, 25_000.0).unwrap();
        let inputs = default_period_inputs(&p, 200.0, 350.0);
        let summary = compute_schedule(&p, &inputs).unwrap().summary;

        assert_relative_eq!(summary.total_net_cost, 685_000.0, epsilon = 1e-6);
        assert_eq!(summary.hedge_cost, 25_000.0);
        assert_eq!(summary.periods_per_year, 1);
        assert!(!summary.payment_in_kind);
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let p = params(1_000_000.0, 3, ResetFrequency::SemiAnnual, false);
        let mut inputs = default_period_inputs(&p, 200.0, 350.0);

        inputs.pop();
        let err = compute_schedule(&p, &inputs).unwrap_err();
        assert!(matches!(err, LoanError::InvalidInput { ref field, .. } if field == "periods"));

        inputs.pop();
        let err = compute_schedule(&p, &inputs).unwrap_err();
        assert!(matches!(err, LoanError::InvalidInput { ref field, .. } if field == "periods"));

        let err = compute_schedule(&p, &[]).unwrap_err();
        assert!(matches!(err, LoanError::InvalidInput { ref field, .. } if field == "periods"));
    }

    #[test]
    fn test_rejects_negative_values_with_period() {
        let p = params(1_000_000.0, 2, ResetFrequency::SemiAnnual, false);
        let mut inputs = default_period_inputs(&p, 200.0, 350.0);
        inputs[2].prepayment = -1.0;

        match compute_schedule(&p, &inputs).unwrap_err() {
            LoanError::InvalidInput { field, period, .. } => {
                assert_eq!(field, "prepayment");
                assert_eq!(period, Some(3));
            }
            other => panic!("unexpected error: {other}"),
        }

        let mut inputs = default_period_inputs(&p, 200.0, 350.0);
        inputs[0].fixed_rate_bp = -5.0;
        assert!(compute_schedule(&p, &inputs).is_err());

        let mut inputs = default_period_inputs(&p, 200.0, 350.0);
        inputs[3].floating_rate_bp = f64::NAN;
        assert!(compute_schedule(&p, &inputs).is_err());
    }

    #[test]
    fn test_rejects_unvalidated_parameters() {
        let mut p = params(1_000_000.0, 1, ResetFrequency::Annual, false);
        let inputs = default_period_inputs(&p, 200.0, 350.0);
        p.principal = -10.0;

        assert!(AmortizationEngine::new(p.clone()).is_err());
        assert!(compute_schedule(&p, &inputs).is_err());
    }
}
