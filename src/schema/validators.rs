//! Validators: actions that check a value and either pass it through
//! unchanged or raise.
//!
//! Every validator except `not_null` and `not_empty` accepts absence.
//! Length bounds count Unicode scalar values for strings and elements for
//! arrays. All numeric and length bounds are inclusive unless named
//! `exclusive_*`.

use regex::Regex;
use serde_json::Value;

use super::actions::Action;
use super::errors::{SchemaError, SchemaErrorKind, SchemaResult};
use super::path::FieldPath;

/// Rejects absence.
pub fn not_null() -> Action {
    Action::validator("NotNull", |value, path| {
        if value.is_null() {
            return Err(SchemaError::new(SchemaErrorKind::ValueCannotBeNull, path));
        }
        Ok(())
    })
}

/// Rejects absence, empty strings, and empty arrays.
pub fn not_empty() -> Action {
    Action::validator("NotEmpty", |value, path| {
        let empty = match value {
            Value::Null => {
                return Err(SchemaError::new(SchemaErrorKind::ValueCannotBeNull, path));
            }
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        };
        if empty {
            return Err(SchemaError::new(SchemaErrorKind::ValueCannotBeEmpty, path));
        }
        Ok(())
    })
}

pub fn max_length(max: usize) -> Action {
    Action::validator("MaxLength", move |value, path| {
        check_length(value, path, None, Some(max))
    })
}

pub fn min_length(min: usize) -> Action {
    Action::validator("MinLength", move |value, path| {
        check_length(value, path, Some(min), None)
    })
}

pub fn length_range(min: usize, max: usize) -> Action {
    Action::validator("LengthRange", move |value, path| {
        check_length(value, path, Some(min), Some(max))
    })
}

/// Accepts only values equal to one of `options`.
///
/// Numbers compare by numeric value, so `1` and `1.0` are the same option.
pub fn only(options: Vec<Value>) -> Action {
    Action::validator("Only", move |value, path| {
        if value.is_null() || options.iter().any(|option| same_value(option, value)) {
            return Ok(());
        }
        Err(SchemaError::new(SchemaErrorKind::InvalidValue, path))
    })
}

fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => match (x.as_u64(), y.as_u64()) {
                (Some(x), Some(y)) => x == y,
                _ => x.as_f64() == y.as_f64(),
            },
        },
        _ => a == b,
    }
}

pub fn range(min: f64, max: f64) -> Action {
    Action::validator("Range", move |value, path| {
        check_number(value, path, |n| {
            if n < min {
                Some(SchemaErrorKind::ValueTooSmall)
            } else if n > max {
                Some(SchemaErrorKind::ValueTooLarge)
            } else {
                None
            }
        })
    })
}

pub fn minimum(min: f64) -> Action {
    Action::validator("Minimum", move |value, path| {
        check_number(value, path, |n| (n < min).then_some(SchemaErrorKind::ValueTooSmall))
    })
}

pub fn exclusive_minimum(min: f64) -> Action {
    Action::validator("ExclusiveMinimum", move |value, path| {
        check_number(value, path, |n| (n <= min).then_some(SchemaErrorKind::ValueTooSmall))
    })
}

pub fn maximum(max: f64) -> Action {
    Action::validator("Maximum", move |value, path| {
        check_number(value, path, |n| (n > max).then_some(SchemaErrorKind::ValueTooLarge))
    })
}

pub fn exclusive_maximum(max: f64) -> Action {
    Action::validator("ExclusiveMaximum", move |value, path| {
        check_number(value, path, |n| (n >= max).then_some(SchemaErrorKind::ValueTooLarge))
    })
}

/// Compiles `expression` once; the whole string value must match it.
pub fn pattern(expression: &str) -> Result<Action, regex::Error> {
    let anchored = Regex::new(&format!(r"\A(?:{})\z", expression))?;
    Ok(matching(anchored))
}

/// Uses an already compiled expression as-is (no anchoring added).
pub fn pattern_regex(regex: Regex) -> Action {
    matching(regex)
}

fn matching(regex: Regex) -> Action {
    Action::validator("Pattern", move |value, path| match value {
        Value::Null => Ok(()),
        Value::String(s) if regex.is_match(s) => Ok(()),
        Value::String(_) => Err(SchemaError::new(SchemaErrorKind::PatternMismatch, path)),
        _ => Err(SchemaError::type_mismatch("a string", path)),
    })
}

fn check_length(
    value: &Value,
    path: &FieldPath,
    min: Option<usize>,
    max: Option<usize>,
) -> SchemaResult<()> {
    let len = match value {
        Value::Null => return Ok(()),
        Value::String(s) => s.chars().count(),
        Value::Array(items) => items.len(),
        _ => return Err(SchemaError::type_mismatch("a string", path)),
    };
    if min.is_some_and(|min| len < min) {
        return Err(SchemaError::new(SchemaErrorKind::ValueTooShort, path));
    }
    if max.is_some_and(|max| len > max) {
        return Err(SchemaError::new(SchemaErrorKind::ValueTooLong, path));
    }
    Ok(())
}

fn check_number<F>(value: &Value, path: &FieldPath, violation: F) -> SchemaResult<()>
where
    F: Fn(f64) -> Option<SchemaErrorKind>,
{
    if value.is_null() {
        return Ok(());
    }
    let n = value
        .as_f64()
        .ok_or_else(|| SchemaError::type_mismatch("a number", path))?;
    match violation(n) {
        Some(kind) => Err(SchemaError::new(kind, path)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node() -> FieldPath {
        FieldPath::from(["node"])
    }

    fn check(action: &Action, value: Value) -> Result<Value, String> {
        action.run(value, &node()).map_err(|e| e.to_string())
    }

    #[test]
    fn test_not_null() {
        assert_eq!(check(&not_null(), json!(null)).unwrap_err(), "node: Cannot be null");
        assert_eq!(check(&not_null(), json!(0)).unwrap(), json!(0));
    }

    #[test]
    fn test_not_empty() {
        let v = not_empty();
        assert_eq!(check(&v, json!(null)).unwrap_err(), "node: Cannot be null");
        assert_eq!(check(&v, json!("")).unwrap_err(), "node: Cannot be empty");
        assert_eq!(check(&v, json!([])).unwrap_err(), "node: Cannot be empty");
        assert!(check(&v, json!("a")).is_ok());
    }

    #[test]
    fn test_length_counts_characters() {
        let v = max_length(4);
        assert!(check(&v, json!("太空旅客")).is_ok());
        assert_eq!(check(&v, json!("血战钢锯岭")).unwrap_err(), "node: String is too long");
        assert_eq!(check(&min_length(2), json!("a")).unwrap_err(), "node: String is too short");
        assert!(check(&min_length(2), json!(null)).is_ok());
    }

    #[test]
    fn test_length_range_bounds_inclusive() {
        let v = length_range(2, 3);
        assert!(check(&v, json!("ab")).is_ok());
        assert!(check(&v, json!("abc")).is_ok());
        assert_eq!(check(&v, json!("a")).unwrap_err(), "node: String is too short");
        assert_eq!(check(&v, json!("abcd")).unwrap_err(), "node: String is too long");
        assert_eq!(check(&v, json!(12)).unwrap_err(), "node: Should be a string");
    }

    #[test]
    fn test_only() {
        let v = only(vec![json!("red"), json!("green")]);
        assert!(check(&v, json!("red")).is_ok());
        assert!(check(&v, json!(null)).is_ok());
        assert_eq!(check(&v, json!("blue")).unwrap_err(), "node: Invalid value");
    }

    #[test]
    fn test_only_compares_numbers_by_value() {
        let v = only(vec![json!(1), json!(2.5)]);
        assert!(check(&v, json!(1.0)).is_ok());
        assert!(check(&v, json!(1)).is_ok());
        assert!(check(&v, json!(2.5)).is_ok());
        assert_eq!(check(&v, json!(1.5)).unwrap_err(), "node: Invalid value");
        assert_eq!(check(&v, json!("1")).unwrap_err(), "node: Invalid value");

        let large = only(vec![json!(u64::MAX)]);
        assert!(check(&large, json!(u64::MAX)).is_ok());
        assert!(check(&large, json!(u64::MAX - 1)).is_err());
    }

    #[test]
    fn test_range_and_bounds() {
        let v = range(1.0, 10.0);
        assert!(check(&v, json!(1)).is_ok());
        assert!(check(&v, json!(10)).is_ok());
        assert_eq!(check(&v, json!(0)).unwrap_err(), "node: Value is too small");
        assert_eq!(check(&v, json!(10.5)).unwrap_err(), "node: Value is too large");

        assert!(check(&minimum(3.0), json!(3)).is_ok());
        assert!(check(&exclusive_minimum(3.0), json!(3)).is_err());
        assert!(check(&maximum(3.0), json!(3)).is_ok());
        assert_eq!(
            check(&exclusive_maximum(3.0), json!(3)).unwrap_err(),
            "node: Value is too large"
        );
        assert_eq!(check(&minimum(0.0), json!("5")).unwrap_err(), "node: Should be a number");
    }

    #[test]
    fn test_pattern_matches_whole_value() {
        let v = pattern("[a-z]+").unwrap();
        assert!(check(&v, json!("abc")).is_ok());
        assert!(check(&v, json!(null)).is_ok());
        assert_eq!(check(&v, json!("abc1")).unwrap_err(), "node: Pattern not match");
        assert!(pattern("(").is_err());
    }

    #[test]
    fn test_pattern_regex_is_used_verbatim() {
        let v = pattern_regex(Regex::new("^ab").unwrap());
        assert!(check(&v, json!("abc")).is_ok());
        assert!(check(&v, json!("cab")).is_err());
    }
}
