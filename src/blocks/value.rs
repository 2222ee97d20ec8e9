//! Raw parameter values and the lenient coercions applied to them.
//!
//! Parameter inputs arrive as whatever the editor produced: a number, a
//! numeric string, free text, or nothing at all. Coercion never fails; a value
//! that cannot be read as the expected type falls back to the caller's default.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A string-or-numeric parameter value as supplied by the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Numeric input.
    Number(f64),
    /// Free-form text input (may still hold a numeric string).
    Text(String),
}

impl ParamValue {
    /// Read the value as an integer, or `None` if it holds no leading integer.
    ///
    /// Text is scanned like a prefix integer parser: leading whitespace, an
    /// optional sign, then decimal digits. Anything after the digits is
    /// ignored, so `"12px"` reads as 12 and `"3.9"` as 3. Numbers truncate
    /// toward zero.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ParamValue::Number(num) if num.is_finite() => Some(num.trunc() as i64),
            ParamValue::Number(_) => None,
            ParamValue::Text(text) => parse_integer_prefix(text),
        }
    }

    /// Render the value as display text.
    pub fn as_text(&self) -> String {
        self.to_string()
    }

    /// Whether the value is an empty input (empty string).
    pub fn is_blank(&self) -> bool {
        matches!(self, ParamValue::Text(text) if text.is_empty())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(num) if num.fract() == 0.0 && num.abs() < 1e15 => {
                write!(f, "{}", *num as i64)
            }
            ParamValue::Number(num) => write!(f, "{}", num),
            ParamValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Number(value as f64)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Number(f64::from(value))
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

/// Coerce an optional raw value to an integer, substituting `default` when the
/// value is missing, blank, or not numeric.
pub fn integer_or(value: Option<&ParamValue>, default: i64) -> i64 {
    match value {
        Some(raw) if !raw.is_blank() => raw.as_integer().unwrap_or(default),
        _ => default,
    }
}

/// Coerce an optional raw value to text, substituting the empty string when
/// the value is missing.
pub fn text_or_empty(value: Option<&ParamValue>) -> String {
    value.map(ParamValue::as_text).unwrap_or_default()
}

fn parse_integer_prefix(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = rest
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_digit())
        .map(|(idx, _)| idx)
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    // Saturate rather than overflow, matching the float-to-int cast for numbers.
    let value = rest[..digits_end].bytes().fold(0i64, |acc, digit| {
        let digit = i64::from(digit - b'0');
        let shifted = acc.saturating_mul(10);
        if negative {
            shifted.saturating_sub(digit)
        } else {
            shifted.saturating_add(digit)
        }
    });
    Some(value)
}
