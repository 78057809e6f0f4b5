//! Running state carried across periods during a schedule computation

use crate::loan::PeriodInput;

/// Basis points per unit rate
pub const BASIS_POINTS: f64 = 10_000.0;

/// Rates accrued since the last year-end, as decimals
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct YearAccrual {
    /// Sum of fixed + floating rates
    pub blended: f64,
    /// Sum of floating rates
    pub floating: f64,
    /// Sum of fixed rates
    pub fixed: f64,
}

impl YearAccrual {
    /// Add one period's rates to the running sums
    pub fn accrue(&mut self, input: &PeriodInput) {
        self.blended += input.total_rate_bp() / BASIS_POINTS;
        self.floating += input.floating_rate_bp / BASIS_POINTS;
        self.fixed += input.fixed_rate_bp / BASIS_POINTS;
    }

    /// Clear the sums at a year boundary
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Interest amounts posted at a year-end
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearEndInterest {
    pub blended: f64,
    pub floating: f64,
    pub fixed: f64,
}

impl YearEndInterest {
    /// Apply the accrued rates, averaged over the year's periods, to `principal`.
    /// Rates within a year are averaged, not compounded.
    pub fn on_principal(principal: f64, accrual: &YearAccrual, periods_per_year: u32) -> Self {
        let periods = periods_per_year as f64;
        Self {
            blended: principal * (accrual.blended / periods),
            floating: principal * (accrual.floating / periods),
            fixed: principal * (accrual.fixed / periods),
        }
    }
}

/// Schedule state at a period boundary
#[derive(Debug, Clone)]
pub struct ScheduleState {
    /// Principal balance at the start of the current period
    pub principal: f64,

    /// Rates accrued so far this year
    pub accrual: YearAccrual,

    /// Interest capitalized in the previous period
    pub prior_capitalized: f64,

    /// Prepayment made at the end of the previous period
    pub prior_prepayment: f64,
}

impl ScheduleState {
    pub fn new(principal: f64) -> Self {
        Self {
            principal,
            accrual: YearAccrual::default(),
            prior_capitalized: 0.0,
            prior_prepayment: 0.0,
        }
    }

    /// Roll the principal forward from the previous period's postings
    pub fn advance_period(&mut self) {
        self.principal = self.principal + self.prior_capitalized - self.prior_prepayment;
        self.prior_capitalized = 0.0;
        self.prior_prepayment = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn input(floating: f64, fixed: f64) -> PeriodInput {
        PeriodInput {
            year: 1,
            period: 1,
            floating_rate_bp: floating,
            fixed_rate_bp: fixed,
            prepayment: 0.0,
        }
    }

    #[test]
    fn test_accrual_averages_over_year() {
        let mut accrual = YearAccrual::default();
        accrual.accrue(&input(300.0, 200.0));
        accrual.accrue(&input(500.0, 200.0));

        assert_relative_eq!(accrual.blended, 0.12, epsilon = 1e-12);

        let interest = YearEndInterest::on_principal(1_000_000.0, &accrual, 2);
        assert_relative_eq!(interest.blended, 60_000.0, epsilon = 1e-6);
        assert_relative_eq!(interest.floating, 40_000.0, epsilon = 1e-6);
        assert_relative_eq!(interest.fixed, 20_000.0, epsilon = 1e-6);

        accrual.reset();
        assert_eq!(accrual, YearAccrual::default());
    }

    #[test]
    fn test_advance_applies_prior_postings() {
        let mut state = ScheduleState::new(1000.0);
        state.prior_capitalized = 50.0;
        state.prior_prepayment = 200.0;
        state.advance_period();

        assert_eq!(state.principal, 850.0);
        assert_eq!(state.prior_capitalized, 0.0);
        assert_eq!(state.prior_prepayment, 0.0);
    }
}
