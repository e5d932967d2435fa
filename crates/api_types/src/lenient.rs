//! Tolerant field readers for spreadsheet-shaped JSON.

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

/// Strings stay strings, numbers and booleans are stringified, anything
/// else is empty.
pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Numbers as-is, strings through a leading-number parse, else `0`.
pub(crate) fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::String(s) => leading_number(&s),
        _ => 0.0,
    })
}

/// Booleans, `"true"`/`"TRUE"`/`"1"` strings and non-zero numbers are set.
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => {
            let s = s.trim();
            s.eq_ignore_ascii_case("true") || s == "1"
        }
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        _ => false,
    })
}

/// Arrays of `T`; `null`, non-arrays and unreadable elements are dropped.
pub(crate) fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// An object of `T`, or `None` when absent, `null` or unreadable.
pub(crate) fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

/// Reads the longest leading decimal number (`"12.5kg"` is `12.5`), `0`
/// when there is none.
fn leading_number(input: &str) -> f64 {
    let trimmed = input.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (idx, ch) in trimmed.char_indices() {
        match ch {
            '+' | '-' if idx == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = idx + ch.len_utf8();
    }
    if !seen_digit {
        return 0.0;
    }
    trimmed[..end]
        .trim_end_matches('.')
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::leading_number;

    #[test]
    fn leading_number_is_lenient() {
        assert_eq!(leading_number("42"), 42.0);
        assert_eq!(leading_number(" 12.5kg"), 12.5);
        assert_eq!(leading_number("-3"), -3.0);
        assert_eq!(leading_number("7."), 7.0);
        assert_eq!(leading_number("1.2.3"), 1.2);
        assert_eq!(leading_number("abc"), 0.0);
        assert_eq!(leading_number(""), 0.0);
    }
}
