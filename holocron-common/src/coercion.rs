//! Value coercion and none-value normalization
//!
//! Every function in this module is total: when a value cannot be converted
//! it is handed back unchanged. Callers can therefore apply a conversion
//! speculatively without first branching on the value's type.
//!
//! The `parse_*` helpers expose the same parsing rules over `&str` for
//! callers that want a typed `Option` instead of a JSON value.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Default sentinel strings that mean "no data"
///
/// Matching is case-insensitive and ignores surrounding whitespace.
pub const NONE_VALUES: &[&str] = &["", "n/a", "none", "unknown"];

// ============================================================================
// Year/era encoding
// ============================================================================

/// Era tag of the epoch-relative calendar (Before/After the Battle of Yavin)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Era {
    #[serde(rename = "BBY")]
    Bby,
    #[serde(rename = "ABY")]
    Aby,
}

impl Era {
    pub fn as_str(&self) -> &'static str {
        match self {
            Era::Bby => "BBY",
            Era::Aby => "ABY",
        }
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A year in the era calendar, e.g. `19BBY`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearEra {
    pub year: u64,
    pub era: Era,
}

impl YearEra {
    /// JSON form: `{"year": <int>, "era": "BBY" | "ABY"}`
    pub fn to_value(&self) -> Value {
        let mut map = serde_json::Map::new();
        map.insert("year".to_string(), Value::from(self.year));
        map.insert("era".to_string(), Value::from(self.era.as_str()));
        Value::Object(map)
    }
}

// ============================================================================
// String parsers
// ============================================================================

/// Parse an integer, tolerating thousands separators and a fractional part
///
/// The fractional part is truncated, not rounded: `"506,000,000.9999"` → `506000000`.
pub fn parse_int(raw: &str) -> Option<i64> {
    let cleaned = strip_separators(raw);
    if let Ok(value) = cleaned.parse::<i64>() {
        return Some(value);
    }
    let float = parse_finite(&cleaned)?;
    float_to_int(float)
}

/// Parse a float, tolerating thousands separators
pub fn parse_float(raw: &str) -> Option<f64> {
    parse_finite(&strip_separators(raw))
}

/// Parse `"<digits><ERA>"` where ERA is `BBY` or `ABY`
pub fn parse_year_era(raw: &str) -> Option<YearEra> {
    let trimmed = raw.trim();
    let (digits, era) = if let Some(digits) = trimmed.strip_suffix("BBY") {
        (digits, Era::Bby)
    } else if let Some(digits) = trimmed.strip_suffix("ABY") {
        (digits, Era::Aby)
    } else {
        return None;
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year = digits.parse::<u64>().ok()?;
    Some(YearEra { year, era })
}

/// Parse a gravity reading such as `"1 standard"` or `"0.75"` into standard-g units
pub fn parse_gravity(raw: &str) -> Option<f64> {
    let lowered = raw.trim().to_ascii_lowercase();
    let numeric = lowered.strip_suffix("standard").unwrap_or(&lowered);
    parse_float(numeric)
}

fn strip_separators(raw: &str) -> String {
    raw.trim().replace(',', "")
}

fn parse_finite(cleaned: &str) -> Option<f64> {
    cleaned.parse::<f64>().ok().filter(|f| f.is_finite())
}

fn float_to_int(value: f64) -> Option<i64> {
    let truncated = value.trunc();
    // i64::MAX is not representable as f64; the bound is exclusive
    if truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        Some(truncated as i64)
    } else {
        None
    }
}

// ============================================================================
// Value coercions
// ============================================================================

/// Coerce to an integer; unparseable input is returned unchanged
pub fn coerce_int(raw: Value) -> Value {
    let parsed = match &raw {
        Value::String(s) => parse_int(s),
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(float_to_int)),
        _ => None,
    };
    parsed.map(Value::from).unwrap_or(raw)
}

/// Coerce to a float; unparseable input is returned unchanged
pub fn coerce_float(raw: Value) -> Value {
    let parsed = match &raw {
        Value::String(s) => parse_float(s),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.map(Value::from).unwrap_or(raw)
}

/// Split a string into trimmed tokens on `delimiter`, preserving order
///
/// Arrays (and every other non-string value) pass through unchanged, as does
/// any string when `delimiter` is empty.
pub fn coerce_list(raw: Value, delimiter: &str) -> Value {
    match raw {
        Value::String(s) if !delimiter.is_empty() => Value::Array(
            s.split(delimiter)
                .map(|token| Value::String(token.trim().to_string()))
                .collect(),
        ),
        other => other,
    }
}

/// Coerce `"19BBY"` into `{"year": 19, "era": "BBY"}`; unparseable input is returned unchanged
pub fn coerce_year_era(raw: Value) -> Value {
    let parsed = match &raw {
        Value::String(s) => parse_year_era(s),
        _ => None,
    };
    parsed.map(|ye| ye.to_value()).unwrap_or(raw)
}

/// Coerce a standard-gravity string into a float; unparseable input is returned unchanged
pub fn coerce_gravity(raw: Value) -> Value {
    let parsed = match &raw {
        Value::String(s) => parse_gravity(s),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.map(Value::from).unwrap_or(raw)
}

// ============================================================================
// None-value normalization
// ============================================================================

/// True if `raw`, trimmed and lower-cased, equals one of `sentinels`
pub fn is_none_value<S: AsRef<str>>(raw: &str, sentinels: &[S]) -> bool {
    let needle = raw.trim().to_lowercase();
    sentinels
        .iter()
        .any(|sentinel| sentinel.as_ref().trim().to_lowercase() == needle)
}

/// Replace sentinel strings with `null`
///
/// Only strings can match; arrays, numbers and objects are returned unchanged.
pub fn normalize_none<S: AsRef<str>>(raw: Value, sentinels: &[S]) -> Value {
    let matched = match &raw {
        Value::String(s) => is_none_value(s, sentinels),
        _ => false,
    };
    if matched {
        Value::Null
    } else {
        raw
    }
}
