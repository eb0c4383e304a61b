//! Conversion engine
//!
//! One recursive dispatcher, two directions:
//! - Incoming (external -> internal): rejects unrecognized object keys,
//!   converts a member's type first and then runs its actions.
//! - Outgoing (internal -> external): ignores extra object keys, runs a
//!   member's actions first and then converts the filtered result.
//!
//! Absence (`null`) short-circuits every node kind. Objects always come
//! out with exactly their declared fields as keys; arrays come out with
//! the same length. The first error aborts the whole call.

use serde_json::{Map, Value};

use super::actions::{run_pipeline, Action};
use super::errors::{SchemaError, SchemaErrorKind, SchemaResult};
use super::path::FieldPath;
use super::predicates;
use super::types::{ArraySchema, ObjectSchema, SchemaNode};

/// Conversion direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// External input to vetted internal form
    Incoming,
    /// Internal value to external projection
    Outgoing,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Incoming => "incoming",
            Direction::Outgoing => "outgoing",
        }
    }
}

/// Stateless converter for one direction.
///
/// Holds no data between calls; one instance can serve any number of
/// schemas and values.
#[derive(Debug, Clone, Copy)]
pub struct Converter {
    direction: Direction,
}

impl Converter {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }

    pub fn incoming() -> Self {
        Self::new(Direction::Incoming)
    }

    pub fn outgoing() -> Self {
        Self::new(Direction::Outgoing)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Converts `value` located at `path` against `schema`.
    pub fn convert(&self, schema: &SchemaNode, value: Value, path: &FieldPath) -> SchemaResult<Value> {
        if predicates::is_absent(&value) {
            return Ok(value);
        }

        match schema {
            SchemaNode::Any => Ok(value),
            SchemaNode::String => expect(value, path, predicates::is_string, "a string"),
            SchemaNode::Integer => expect(value, path, predicates::is_integer, "an integer"),
            SchemaNode::Number => expect(value, path, predicates::is_number, "a number"),
            SchemaNode::Boolean => expect(value, path, predicates::is_boolean, "a boolean"),
            SchemaNode::StringMap => self.convert_string_map(value, path),
            SchemaNode::Object(object) => self.convert_object(object, value, path),
            SchemaNode::Array(array) => self.convert_array(array, value, path),
            SchemaNode::Either(alternatives) => self.convert_either(alternatives, value, path),
        }
    }

    fn convert_string_map(&self, value: Value, path: &FieldPath) -> SchemaResult<Value> {
        let map = value
            .as_object()
            .ok_or_else(|| SchemaError::type_mismatch("an object", path))?;

        for (key, entry) in map {
            if !predicates::is_string(entry) {
                return Err(SchemaError::type_mismatch("a string", &path.child(key.as_str())));
            }
        }

        Ok(value)
    }

    fn convert_object(&self, object: &ObjectSchema, value: Value, path: &FieldPath) -> SchemaResult<Value> {
        let mut input = match value {
            Value::Object(map) => map,
            _ => return Err(SchemaError::type_mismatch("an object", path)),
        };

        if self.direction == Direction::Incoming {
            check_redundancy(object, &input, path)?;
        }

        let mut output = Map::with_capacity(object.fields().len());
        for field in object.fields() {
            let field_path = path.child(field.name.as_str());
            let raw = input.remove(&field.name).unwrap_or(Value::Null);
            let converted = self.convert_member(&field.field_type, &field.actions, raw, &field_path)?;
            output.insert(field.name.clone(), converted);
        }

        Ok(Value::Object(output))
    }

    fn convert_array(&self, array: &ArraySchema, value: Value, path: &FieldPath) -> SchemaResult<Value> {
        let items = match value {
            Value::Array(items) => items,
            _ => return Err(SchemaError::type_mismatch("an array", path)),
        };

        let output = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                let item_path = path.child(i.to_string());
                self.convert_member(array.element_type(), array.actions(), item, &item_path)
            })
            .collect::<SchemaResult<Vec<Value>>>()?;

        Ok(Value::Array(output))
    }

    fn convert_either(&self, alternatives: &[SchemaNode], value: Value, path: &FieldPath) -> SchemaResult<Value> {
        for (i, alternative) in alternatives.iter().enumerate() {
            match self.convert(alternative, value.clone(), path) {
                Ok(converted) => return Ok(converted),
                Err(err) => {
                    tracing::trace!(
                        path = %path,
                        alternative = i,
                        kind = alternative.kind_name(),
                        error = %err,
                        "either alternative rejected"
                    );
                }
            }
        }

        Err(SchemaError::new(SchemaErrorKind::InvalidValue, path))
    }

    /// Applies the direction-specific ordering of type conversion and
    /// actions for one object field or array element.
    fn convert_member(
        &self,
        member_type: &SchemaNode,
        actions: &[Action],
        value: Value,
        path: &FieldPath,
    ) -> SchemaResult<Value> {
        match self.direction {
            Direction::Incoming => {
                let typed = self.convert(member_type, value, path)?;
                run_pipeline(actions, typed, path)
            }
            Direction::Outgoing => {
                let filtered = run_pipeline(actions, value, path)?;
                self.convert(member_type, filtered, path)
            }
        }
    }
}

/// Converts external input at the root path.
pub fn convert_incoming(schema: &SchemaNode, value: Value) -> SchemaResult<Value> {
    Converter::incoming().convert(schema, value, &FieldPath::root())
}

/// Converts external input located at `path`.
pub fn convert_incoming_at(schema: &SchemaNode, value: Value, path: &FieldPath) -> SchemaResult<Value> {
    Converter::incoming().convert(schema, value, path)
}

/// Projects an internal value at the root path.
pub fn convert_outgoing(schema: &SchemaNode, value: Value) -> SchemaResult<Value> {
    Converter::outgoing().convert(schema, value, &FieldPath::root())
}

/// Projects an internal value located at `path`.
pub fn convert_outgoing_at(schema: &SchemaNode, value: Value, path: &FieldPath) -> SchemaResult<Value> {
    Converter::outgoing().convert(schema, value, path)
}

fn expect(value: Value, path: &FieldPath, check: fn(&Value) -> bool, expected: &'static str) -> SchemaResult<Value> {
    if check(&value) {
        Ok(value)
    } else {
        Err(SchemaError::type_mismatch(expected, path))
    }
}

/// Collects every undeclared key, in input order, into one error.
fn check_redundancy(object: &ObjectSchema, input: &Map<String, Value>, path: &FieldPath) -> SchemaResult<()> {
    let unknown: Vec<String> = input
        .keys()
        .filter(|key| !object.has_field(key))
        .cloned()
        .collect();

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::new(SchemaErrorKind::unrecognized(unknown), path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::Field;
    use crate::schema::{filters, validators};
    use serde_json::json;

    fn schema1() -> SchemaNode {
        SchemaNode::object(vec![
            Field::new("node", SchemaNode::String),
            Field::new("user", SchemaNode::array(SchemaNode::String)),
            Field::new(
                "tag",
                SchemaNode::object(vec![
                    Field::new("name", SchemaNode::String),
                    Field::new("level", SchemaNode::Integer),
                ]),
            ),
            Field::new(
                "event",
                SchemaNode::array(SchemaNode::object(vec![
                    Field::new("name", SchemaNode::String),
                    Field::new("alarm", SchemaNode::Boolean),
                ])),
            ),
        ])
    }

    fn incoming_err(schema: &SchemaNode, value: Value) -> String {
        convert_incoming(schema, value).unwrap_err().to_string()
    }

    fn outgoing_err(schema: &SchemaNode, value: Value) -> String {
        convert_outgoing(schema, value).unwrap_err().to_string()
    }

    // =========================================================================
    // Incoming
    // =========================================================================

    #[test]
    fn test_incoming_fills_missing_fields_with_null() {
        let out = convert_incoming(&schema1(), json!({"node": "5"})).unwrap();
        assert_eq!(out, json!({"node": "5", "user": null, "tag": null, "event": null}));
    }

    #[test]
    fn test_incoming_output_keys_follow_declaration_order() {
        let out = convert_incoming(&schema1(), json!({"tag": {"level": 1}, "node": "a"})).unwrap();
        let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["node", "user", "tag", "event"]);
    }

    #[test]
    fn test_incoming_type_errors_carry_path() {
        let schema = schema1();
        assert_eq!(incoming_err(&schema, json!({"node": 5})), "node: Should be a string");
        assert_eq!(incoming_err(&schema, json!({"user": ["a", 5]})), "user.1: Should be a string");
        assert_eq!(incoming_err(&schema, json!({"tag": "x"})), "tag: Should be an object");
        assert_eq!(incoming_err(&schema, json!({"user": {"a": 1}})), "user: Should be an array");
        assert_eq!(
            incoming_err(&schema, json!({"tag": {"level": 1.5}})),
            "tag.level: Should be an integer"
        );
        assert_eq!(
            incoming_err(&schema, json!({"event": [{"alarm": "no"}]})),
            "event.0.alarm: Should be a boolean"
        );
    }

    #[test]
    fn test_incoming_rejects_non_object_root() {
        assert_eq!(incoming_err(&schema1(), json!([1])), "Should be an object");
    }

    #[test]
    fn test_incoming_redundant_fields_aggregate() {
        let schema = SchemaNode::object(vec![Field::new("a", SchemaNode::Integer)]);
        assert_eq!(
            incoming_err(&schema, json!({"a": 1, "x": 2, "y": 3})),
            "Unrecognized fields: x, y"
        );
        assert_eq!(incoming_err(&schema, json!({"x": 2})), "Unrecognized field: x");
    }

    #[test]
    fn test_incoming_nested_redundancy_reports_nested_path() {
        assert_eq!(
            incoming_err(&schema1(), json!({"tag": {"name": "a", "color": "red"}})),
            "tag: Unrecognized field: color"
        );
    }

    #[test]
    fn test_incoming_runs_actions_after_type_check() {
        let schema = SchemaNode::object(vec![Field::new("name", SchemaNode::String)
            .with_action(filters::trim())
            .with_action(validators::max_length(3))]);
        assert_eq!(convert_incoming(&schema, json!({"name": " abc "})).unwrap(), json!({"name": "abc"}));
        assert_eq!(incoming_err(&schema, json!({"name": "abcd"})), "name: String is too long");
        // The type check runs before the filter could coerce anything.
        let coerce = SchemaNode::object(vec![
            Field::new("id", SchemaNode::String).with_action(filters::to_string())
        ]);
        assert_eq!(incoming_err(&coerce, json!({"id": 5})), "id: Should be a string");
    }

    #[test]
    fn test_incoming_not_null_rejects_missing_field() {
        let schema = SchemaNode::object(vec![
            Field::new("name", SchemaNode::String).with_action(validators::not_null())
        ]);
        assert_eq!(incoming_err(&schema, json!({})), "name: Cannot be null");
    }

    #[test]
    fn test_incoming_array_element_actions() {
        let schema = SchemaNode::array_with(SchemaNode::Integer, vec![validators::range(0.0, 10.0)]);
        assert_eq!(convert_incoming(&schema, json!([1, null, 3])).unwrap(), json!([1, null, 3]));
        assert_eq!(incoming_err(&schema, json!([1, 11])), "1: Value is too large");
    }

    #[test]
    fn test_string_map() {
        let schema = SchemaNode::object(vec![
            Field::new("name", SchemaNode::Number),
            Field::new("spec", SchemaNode::StringMap),
        ]);
        assert_eq!(incoming_err(&schema, json!({"spec": "def"})), "spec: Should be an object");
        assert_eq!(
            incoming_err(&schema, json!({"spec": {"def": 1, "size": "xyz"}})),
            "spec.def: Should be a string"
        );
        let data = json!({"name": 1.99, "spec": {"def": "1", "size": "xyz"}});
        assert_eq!(convert_incoming(&schema, data.clone()).unwrap(), data);
    }

    #[test]
    fn test_either_backtracks() {
        let schema = SchemaNode::either(vec![SchemaNode::String, SchemaNode::Number]);
        assert_eq!(convert_incoming(&schema, json!("1.11")).unwrap(), json!("1.11"));
        assert_eq!(convert_incoming(&schema, json!(1.11)).unwrap(), json!(1.11));
        assert_eq!(incoming_err(&schema, json!(true)), "Invalid value");
    }

    #[test]
    fn test_either_error_at_either_path() {
        let schema = SchemaNode::object(vec![Field::new(
            "value",
            SchemaNode::either(vec![
                SchemaNode::object(vec![Field::new("a", SchemaNode::String)]),
                SchemaNode::array(SchemaNode::Integer),
            ]),
        )]);
        assert_eq!(
            convert_incoming(&schema, json!({"value": [1, 2]})).unwrap(),
            json!({"value": [1, 2]})
        );
        assert_eq!(
            convert_incoming(&schema, json!({"value": {"a": "x"}})).unwrap(),
            json!({"value": {"a": "x"}})
        );
        assert_eq!(incoming_err(&schema, json!({"value": {"b": 1}})), "value: Invalid value");
    }

    #[test]
    fn test_either_takes_first_success_with_its_actions() {
        let schema = SchemaNode::either(vec![
            SchemaNode::array_with(SchemaNode::String, vec![filters::trim()]),
            SchemaNode::array(SchemaNode::Any),
        ]);
        assert_eq!(convert_incoming(&schema, json!([" a "])).unwrap(), json!(["a"]));
        assert_eq!(convert_incoming(&schema, json!([1])).unwrap(), json!([1]));
    }

    #[test]
    fn test_any_passes_through() {
        let schema = SchemaNode::object(vec![Field::new("f", SchemaNode::Any)]);
        let data = json!({"f": {"a": [1, "2"]}});
        assert_eq!(convert_incoming(&schema, data.clone()).unwrap(), data);
    }

    // =========================================================================
    // Outgoing
    // =========================================================================

    #[test]
    fn test_outgoing_ignores_extra_fields() {
        let schema = SchemaNode::object(vec![Field::new("node", SchemaNode::String)]);
        assert_eq!(
            convert_outgoing(&schema, json!({"node": "abcd", "xxx": 6})).unwrap(),
            json!({"node": "abcd"})
        );
    }

    #[test]
    fn test_outgoing_runs_actions_before_type_check() {
        let schema = SchemaNode::object(vec![
            Field::new("object_id", SchemaNode::String).with_action(filters::to_string()),
            Field::new(
                "user_ids",
                SchemaNode::array_with(SchemaNode::String, vec![filters::to_string()]),
            ),
        ]);
        assert_eq!(
            convert_outgoing(&schema, json!({"object_id": 56, "user_ids": [3, 7]})).unwrap(),
            json!({"object_id": "56", "user_ids": ["3", "7"]})
        );
    }

    #[test]
    fn test_outgoing_keeps_nulls_inside() {
        let schema = schema1();
        let out = convert_outgoing(&schema, json!({"node": "abc", "user": ["def", null, "f"], "tag": {"name": null, "level": 2}}))
            .unwrap();
        assert_eq!(
            out,
            json!({"node": "abc", "user": ["def", null, "f"], "tag": {"name": null, "level": 2}, "event": null})
        );
    }

    #[test]
    fn test_outgoing_type_errors() {
        let schema = schema1();
        assert_eq!(outgoing_err(&schema, json!({"node": 5})), "node: Should be a string");
        assert_eq!(outgoing_err(&schema, json!({"user": ["abc", 5]})), "user.1: Should be a string");
    }

    #[test]
    fn test_outgoing_root_array() {
        let schema = SchemaNode::array(SchemaNode::object(vec![Field::new("user", SchemaNode::String)]));
        assert_eq!(
            convert_outgoing(&schema, json!([{"user": "xyz"}])).unwrap(),
            json!([{"user": "xyz"}])
        );
    }

    #[test]
    fn test_base_path_prefixes_errors() {
        let base = FieldPath::from(["body"]);
        let err = convert_incoming_at(&SchemaNode::String, json!(1), &base).unwrap_err();
        assert_eq!(err.to_string(), "body: Should be a string");
        let err = convert_outgoing_at(&SchemaNode::Boolean, json!(1), &base).unwrap_err();
        assert_eq!(err.to_string(), "body: Should be a boolean");
    }

    #[test]
    fn test_absence_short_circuits_every_kind() {
        let kinds = vec![
            SchemaNode::Any,
            SchemaNode::String,
            SchemaNode::Integer,
            SchemaNode::Number,
            SchemaNode::Boolean,
            SchemaNode::StringMap,
            schema1(),
            SchemaNode::array(SchemaNode::String),
            SchemaNode::either(vec![SchemaNode::String]),
        ];
        for kind in &kinds {
            assert_eq!(convert_incoming(kind, Value::Null).unwrap(), Value::Null);
            assert_eq!(convert_outgoing(kind, Value::Null).unwrap(), Value::Null);
        }
    }
}
