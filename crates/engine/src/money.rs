//! Amount parsing and display helpers.
//!
//! Ledger amounts are plain `f64` values in the display currency: equal
//! splits divide by the participant count and the results are only rounded
//! when shown. User input, on the other hand, is parsed strictly.

use crate::EngineError;

/// Currency symbol used when none is configured.
pub const DEFAULT_SYMBOL: &str = "₹";

/// Parses a user-entered amount.
///
/// Accepts `.` or `,` as decimal separator and an optional leading `+`.
///
/// Validation rules:
/// - max 2 fractional digits (rejects `12.345`)
/// - rejects empty, invalid and negative strings
///
/// # Examples
///
/// ```rust
/// use engine::parse_amount;
///
/// assert_eq!(parse_amount("10").unwrap(), 10.0);
/// assert_eq!(parse_amount("10,5").unwrap(), 10.5);
/// assert!(parse_amount("12.345").is_err());
/// assert!(parse_amount("-3").is_err());
/// ```
pub fn parse_amount(input: &str) -> Result<f64, EngineError> {
    let invalid = |reason: &str| EngineError::InvalidAmount(reason.to_string());

    let trimmed = input.trim();
    if trimmed.starts_with('-') {
        return Err(invalid("amount must not be negative"));
    }
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed).trim();
    if digits.is_empty() {
        return Err(invalid("empty amount"));
    }

    let normalized = digits.replace(',', ".");
    let (units, frac) = normalized
        .split_once('.')
        .unwrap_or((normalized.as_str(), ""));
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if units.is_empty() || !all_digits(units) || !all_digits(frac) {
        return Err(invalid("invalid amount"));
    }
    if frac.len() > 2 {
        return Err(invalid("too many decimals"));
    }

    normalized
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| invalid("invalid amount"))
}

/// Formats an amount rounded to the nearest display unit, e.g. `₹1250`.
pub fn format_rounded(amount: f64, symbol: &str) -> String {
    let rounded = amount.abs().round();
    let sign = if amount.round() < 0.0 { "-" } else { "" };
    format!("{sign}{symbol}{rounded:.0}")
}
