//! Lenient type coercion from raw JSON cells.
//!
//! Nothing here fails: a value that cannot be read as the requested type
//! becomes `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Smallest integer read as epoch milliseconds (1973-03-03). Smaller
/// integers, such as `20240115`, are not timestamps.
const MIN_EPOCH_MILLIS: i64 = 100_000_000_000;

/// Nullable string. Numbers and booleans are stringified.
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Nullable timestamp.
///
/// Strings accept RFC 3339 (converted to UTC), ISO-like date-times and
/// plain dates. Integers of at least [`MIN_EPOCH_MILLIS`] are read as Unix
/// epoch milliseconds; smaller ones are null.
pub fn coerce_timestamp(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n.as_i64().and_then(from_epoch_millis),
        _ => None,
    }
}

fn from_epoch_millis(ms: i64) -> Option<NaiveDateTime> {
    if ms < MIN_EPOCH_MILLIS {
        return None;
    }
    DateTime::from_timestamp_millis(ms).map(|dt| dt.naive_utc())
}

/// Parses a timestamp string with the accepted formats.
///
/// All-digit strings follow the integer rule of [`coerce_timestamp`].
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    if s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse::<i64>().ok().and_then(from_epoch_millis);
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

/// Parses a calendar date string with the accepted date formats.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Nullable finite float. Numeric strings are accepted.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}
