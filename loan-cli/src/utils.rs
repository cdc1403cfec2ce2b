use std::num::ParseIntError;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

use loan_core::calculations::common::round_half_up;

/// Error returned when typed input cannot be read as a number.
#[derive(Debug, Error)]
pub enum ParseInputError {
    #[error("invalid amount '{input}': {source}")]
    Amount {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("amount '{input}' is out of range")]
    OutOfRange { input: String },

    #[error("invalid whole number '{input}': {source}")]
    Count {
        input: String,
        #[source]
        source: ParseIntError,
    },
}

/// Trims whitespace and drops thousands separators and the rupee sign.
fn normalize_amount_input(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '₹') && !c.is_whitespace())
        .collect()
}

/// Parses an amount or rate as typed on a form.
///
/// Accepts `"1,00,000"`, `"₹ 5,000.50"` and plain numbers. Empty input is 0,
/// the same as an untouched form field.
pub fn parse_amount(s: &str) -> Result<f64, ParseInputError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Ok(0.0);
    }
    let value: Decimal = normalized.parse().map_err(|e| {
        tracing::warn!(input = %s, "invalid amount: {}", e);
        ParseInputError::Amount {
            input: s.to_string(),
            source: e,
        }
    })?;
    value.to_f64().ok_or_else(|| ParseInputError::OutOfRange {
        input: s.to_string(),
    })
}

/// Parses a whole number of years, months, points or ids. Empty input is 0.
pub fn parse_count(s: &str) -> Result<u32, ParseInputError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed.parse().map_err(|e| ParseInputError::Count {
        input: s.to_string(),
        source: e,
    })
}

/// Two-decimal display for rates and schedule cells, e.g. `"2124.70"`.
pub fn two_dp(value: f64) -> String {
    round_half_up(value, 2)
        .map(|d| format!("{d:.2}"))
        .unwrap_or_else(|| "—".to_string())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_amount_accepts_indian_and_western_grouping() {
        assert_eq!(parse_amount("1,00,000").unwrap(), 100_000.0);
        assert_eq!(parse_amount("1,234,567.89").unwrap(), 1_234_567.89);
    }

    #[test]
    fn parse_amount_strips_rupee_sign_and_spaces() {
        assert_eq!(parse_amount(" ₹ 5,000.50 ").unwrap(), 5_000.5);
    }

    #[test]
    fn parse_amount_empty_is_zero() {
        assert_eq!(parse_amount("").unwrap(), 0.0);
        assert_eq!(parse_amount("   ").unwrap(), 0.0);
    }

    #[test]
    fn parse_amount_rejects_text() {
        let err = parse_amount("ten lakh").unwrap_err();

        assert!(matches!(err, ParseInputError::Amount { .. }));
        assert!(err.to_string().contains("ten lakh"));
    }

    #[test]
    fn parse_count_reads_whole_numbers() {
        assert_eq!(parse_count(" 5 ").unwrap(), 5);
        assert_eq!(parse_count("").unwrap(), 0);
        assert!(parse_count("2.5").is_err());
        assert!(parse_count("-1").is_err());
    }

    #[test]
    fn two_dp_rounds_half_away_from_zero() {
        assert_eq!(two_dp(2124.7044), "2124.70");
        assert_eq!(two_dp(0.125), "0.13");
        assert_eq!(two_dp(10.0), "10.00");
    }
}
