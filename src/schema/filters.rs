//! Filters: actions that may replace the value they receive.
//!
//! All filters pass absence (`null`) through untouched.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use super::actions::Action;
use super::errors::{SchemaError, SchemaErrorKind, SchemaResult};
use super::path::FieldPath;

/// Strips leading and trailing whitespace from strings.
pub fn trim() -> Action {
    Action::filter("Trim", |value, _| {
        Ok(match value {
            Value::String(s) => Value::String(s.trim().to_string()),
            other => other,
        })
    })
}

/// Parses a date and returns epoch milliseconds.
///
/// Accepted inputs: RFC 3339 strings, naive `YYYY-MM-DDTHH:MM:SS[.f]`
/// strings (read as UTC), `YYYY-MM-DD` (UTC midnight), and integral
/// numbers, which are taken to be epoch milliseconds already.
pub fn to_timestamp() -> Action {
    Action::filter("ToTimestamp", |value, path| {
        if value.is_null() {
            return Ok(value);
        }
        epoch_millis(&value)
            .map(Value::from)
            .ok_or_else(|| SchemaError::new(SchemaErrorKind::InvalidValue, path))
    })
}

/// Renders primitives as strings; composites become their JSON text.
pub fn to_string() -> Action {
    Action::filter("ToString", |value, _| {
        Ok(match value {
            Value::Null => Value::Null,
            Value::String(s) => Value::String(s),
            Value::Bool(b) => Value::String(b.to_string()),
            Value::Number(n) => Value::String(n.to_string()),
            composite => Value::String(composite.to_string()),
        })
    })
}

/// Runs the date parsing used by [`to_timestamp`] outside a pipeline.
pub fn timestamp_of(value: &Value, path: &FieldPath) -> SchemaResult<Option<i64>> {
    if value.is_null() {
        return Ok(None);
    }
    epoch_millis(value)
        .map(Some)
        .ok_or_else(|| SchemaError::new(SchemaErrorKind::InvalidValue, path))
}

fn epoch_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => parse_date(s.trim()),
        _ => None,
    }
}

fn parse_date(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc().timestamp_millis());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}
