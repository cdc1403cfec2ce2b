//! Fixed-payment amortization.
//!
//! Given a principal, a nominal annual rate and a term in months, the engine
//! computes the constant monthly payment, the totals, and the month-by-month
//! split of each payment into principal and interest.
//!
//! # Formula
//!
//! | Symbol | Meaning |
//! |--------|---------|
//! | `P`    | principal |
//! | `r`    | monthly rate = annual percent / 100 / 12 |
//! | `n`    | number of monthly payments |
//!
//! ```text
//! payment = P · r · (1 + r)^n / ((1 + r)^n − 1)
//!         = P · r / (1 − (1 + r)^−n)
//! total   = payment · n
//! interest = total − P
//! ```
//!
//! The second form is evaluated through `ln_1p`/`exp_m1`, which stays finite
//! for rates too small to change `1 + r` and for terms long enough to
//! overflow `(1 + r)^n`.
//!
//! # Inputs that are not ready
//!
//! A principal, rate or term that is zero, negative or not a number is not an
//! error: the calculation is simply skipped and [`Computation::NotReady`]
//! names the first offending field. Callers keep whatever they displayed
//! before. A zero rate is therefore never amortized; interest-free loans are
//! outside what the engine computes.
//!
//! Terms longer than [`MAX_TERM_MONTHS`] are not ready either, and neither is
//! a loan so large that its totals do not fit in an `f64`.
//!
//! # Example
//!
//! ```
//! use loan_core::{AmortizationEngine, LoanTerms};
//!
//! let terms = LoanTerms::new(100_000.0, 10.0, 60);
//! let result = AmortizationEngine::new().compute(&terms).ready().unwrap();
//!
//! assert_eq!(result.number_of_payments, 60);
//! assert!((result.monthly_payment - 2124.70).abs() < 0.01);
//! ```

use tracing::{debug, warn};

use crate::models::{AmortizationResult, LoanTerms, PaymentRow};

/// Longest term the engine amortizes: 100 years.
pub const MAX_TERM_MONTHS: u32 = 1200;

/// The field that kept a calculation from running.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NotReady {
    /// Principal was zero, negative or not finite.
    Principal(f64),
    /// Annual rate was zero, negative or not finite.
    AnnualRate(f64),
    /// The term had no months.
    Term,
    /// The term, in months, exceeded [`MAX_TERM_MONTHS`].
    TermTooLong(u32),
    /// Payment or totals overflowed.
    Overflow,
}

/// Outcome of [`AmortizationEngine::compute`].
///
/// Distinguishes "never computed" from a computed result, so a caller can
/// leave its previous display untouched instead of showing zeros.
#[derive(Debug, Clone, PartialEq)]
pub enum Computation {
    Ready(AmortizationResult),
    NotReady(NotReady),
}

impl Computation {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The result, if the calculation ran.
    pub fn ready(self) -> Option<AmortizationResult> {
        match self {
            Self::Ready(result) => Some(result),
            Self::NotReady(_) => None,
        }
    }
}

/// Calculator for fixed-payment amortization.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmortizationEngine;

impl AmortizationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Computes the payment, totals and schedule for `terms`.
    ///
    /// Returns [`Computation::NotReady`] without computing anything when the
    /// principal or rate is not strictly positive, or the term is empty or
    /// longer than [`MAX_TERM_MONTHS`].
    ///
    /// # Example: Not Ready
    ///
    /// ```
    /// use loan_core::{AmortizationEngine, Computation, LoanTerms, NotReady};
    ///
    /// let terms = LoanTerms::new(100_000.0, 0.0, 60);
    ///
    /// assert_eq!(
    ///     AmortizationEngine::new().compute(&terms),
    ///     Computation::NotReady(NotReady::AnnualRate(0.0))
    /// );
    /// ```
    pub fn compute(
        &self,
        terms: &LoanTerms,
    ) -> Computation {
        if let Err(reason) = Self::check_ready(terms) {
            warn!(
                principal = terms.principal,
                annual_rate_percent = terms.annual_rate_percent,
                term_months = terms.term_months(),
                ?reason,
                "loan terms incomplete; calculation skipped"
            );
            return Computation::NotReady(reason);
        }

        let principal = terms.principal;
        let n = terms.term_months();
        let rate = self.monthly_rate(terms.annual_rate_percent);

        let monthly_payment = self.monthly_payment(principal, rate, n);
        let total_amount = monthly_payment * f64::from(n);
        let total_interest = total_amount - principal;
        if ![monthly_payment, total_amount, total_interest]
            .iter()
            .all(|v| v.is_finite())
        {
            warn!(
                principal,
                annual_rate_percent = terms.annual_rate_percent,
                term_months = n,
                "loan totals overflow; calculation skipped"
            );
            return Computation::NotReady(NotReady::Overflow);
        }
        let schedule = self.schedule(principal, rate, monthly_payment, n);

        debug!(
            principal,
            term_months = n,
            monthly_payment,
            total_interest,
            "amortization computed"
        );

        Computation::Ready(AmortizationResult {
            monthly_payment,
            total_interest,
            total_amount,
            number_of_payments: n,
            schedule,
        })
    }

    fn check_ready(terms: &LoanTerms) -> Result<(), NotReady> {
        if !is_positive(terms.principal) {
            return Err(NotReady::Principal(terms.principal));
        }
        if !is_positive(terms.annual_rate_percent) {
            return Err(NotReady::AnnualRate(terms.annual_rate_percent));
        }
        match terms.term_months() {
            0 => Err(NotReady::Term),
            n if n > MAX_TERM_MONTHS => Err(NotReady::TermTooLong(n)),
            _ => Ok(()),
        }
    }

    /// Converts a percent-per-annum rate into a monthly decimal fraction.
    fn monthly_rate(
        &self,
        annual_rate_percent: f64,
    ) -> f64 {
        annual_rate_percent / 100.0 / 12.0
    }

    /// Constant payment that retires `principal` in `n` months at `rate`.
    ///
    /// `rate` must be positive; the readiness check guarantees it.
    fn monthly_payment(
        &self,
        principal: f64,
        rate: f64,
        n: u32,
    ) -> f64 {
        // 1 − (1 + r)^−n
        let discount = -(-f64::from(n) * rate.ln_1p()).exp_m1();
        principal * rate / discount
    }

    /// Splits each payment into interest on the running balance and the
    /// remaining principal reduction.
    fn schedule(
        &self,
        principal: f64,
        rate: f64,
        payment: f64,
        n: u32,
    ) -> Vec<PaymentRow> {
        let mut balance = principal;
        (1..=n)
            .map(|month| {
                let interest = balance * rate;
                let principal_part = payment - interest;
                balance -= principal_part;
                PaymentRow {
                    month,
                    payment,
                    principal: principal_part,
                    interest,
                    // floating-point drift can leave a tiny negative balance
                    balance: balance.max(0.0),
                }
            })
            .collect()
    }
}

/// Convenience wrapper around [`AmortizationEngine::compute`] taking the
/// term as a number of months.
pub fn compute(
    principal: f64,
    annual_rate_percent: f64,
    term_months: u32,
) -> Computation {
    AmortizationEngine::new().compute(&LoanTerms::new(principal, annual_rate_percent, term_months))
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
