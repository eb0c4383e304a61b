//! Primitive type predicates over `serde_json::Value`

use serde_json::Value;

pub fn is_string(value: &Value) -> bool {
    value.is_string()
}

/// Integral numbers, including floats with no fractional part (`5.0`).
pub fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                return true;
            }
            n.as_f64().map_or(false, |f| f.is_finite() && f.fract() == 0.0)
        }
        _ => false,
    }
}

pub fn is_number(value: &Value) -> bool {
    value.is_number()
}

pub fn is_boolean(value: &Value) -> bool {
    value.is_boolean()
}

pub fn is_array(value: &Value) -> bool {
    value.is_array()
}

/// Key-value mapping that is not an array.
pub fn is_map(value: &Value) -> bool {
    value.is_object()
}

/// Absence marker. `Value::Null` is the only one.
pub fn is_absent(value: &Value) -> bool {
    value.is_null()
}
