//! Currency rounding and formatting shared by the calculator and the reports.
//!
//! Calculations run on `f64`; amounts are converted to [`Decimal`] only when
//! they are rounded for display so that midpoints round the way a reader
//! expects rather than the way binary floating point happens to land.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds an amount to `dp` decimal places using half-up rounding
/// (midpoints away from zero).
///
/// Returns `None` for NaN or infinite input.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use loan_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(2124.7044, 2), Some(dec!(2124.70)));
/// assert_eq!(round_half_up(0.125, 2), Some(dec!(0.13)));
/// assert_eq!(round_half_up(-2.5, 0), Some(dec!(-3)));
/// assert_eq!(round_half_up(f64::NAN, 2), None);
/// ```
pub fn round_half_up(
    value: f64,
    dp: u32,
) -> Option<Decimal> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
}

/// Formats an amount as whole rupees with Indian digit grouping.
///
/// The last three digits form one group and every two digits before that
/// form another, e.g. `₹1,23,45,678`. Non-finite amounts render as `"—"`.
///
/// # Examples
///
/// ```
/// use loan_core::calculations::common::format_inr;
///
/// assert_eq!(format_inr(127482.27), "₹1,27,482");
/// assert_eq!(format_inr(999.5), "₹1,000");
/// ```
pub fn format_inr(amount: f64) -> String {
    let Some(rounded) = round_half_up(amount, 0) else {
        return "—".to_string();
    };

    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().trunc().to_string();
    let grouped = group_indian(&digits);

    if negative {
        format!("-₹{grouped}")
    } else {
        format!("₹{grouped}")
    }
}

/// Inserts Indian-style thousands separators into a string of ASCII digits.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}
