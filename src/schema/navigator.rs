//! Schema-directed path navigation
//!
//! The schema node reached so far decides how the next segment is read:
//! - object: segment must name a declared field
//! - array: segment must be a non-negative integer index
//! - string_map: segment is any key; the value behind it is a string leaf
//! - any other node: no further segment is allowed
//!
//! `get` yields absence as soon as a declared object field is missing.
//! `set` creates missing containers on the way down and writes the value
//! verbatim at the last segment, without conversion.

use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaErrorKind, SchemaResult};
use super::path::FieldPath;
use super::types::SchemaNode;

/// Largest index `set` pads an array out to. Existing elements past it
/// can still be overwritten.
pub const MAX_PADDED_INDEX: usize = 1 << 20;

static ABSENT: Value = Value::Null;
static STRING_LEAF: SchemaNode = SchemaNode::String;

/// Reads the value at `path` inside `data`.
///
/// Never raises for data that is merely missing; only a path the schema
/// cannot interpret is an error.
pub fn get<'d>(schema: &SchemaNode, path: &FieldPath, data: &'d Value) -> SchemaResult<&'d Value> {
    let mut node = schema;
    let mut current = data;
    let mut walked = FieldPath::root();

    for segment in path.segments() {
        match node {
            SchemaNode::Object(object) => {
                let field = object.field(segment).ok_or_else(|| unrecognized(segment, &walked))?;
                match current.get(segment.as_str()) {
                    None | Some(Value::Null) => return Ok(&ABSENT),
                    Some(value) => {
                        node = &field.field_type;
                        current = value;
                    }
                }
            }
            SchemaNode::Array(array) => {
                let index = parse_index(segment, &walked)?;
                node = array.element_type();
                current = current.get(index).unwrap_or(&ABSENT);
            }
            SchemaNode::StringMap => {
                node = &STRING_LEAF;
                current = current.get(segment.as_str()).unwrap_or(&ABSENT);
            }
            SchemaNode::Any
            | SchemaNode::String
            | SchemaNode::Integer
            | SchemaNode::Number
            | SchemaNode::Boolean
            | SchemaNode::Either(_) => {
                return Err(SchemaError::new(SchemaErrorKind::PathTooLong, &walked));
            }
        }
        walked = walked.child(segment.as_str());
    }

    Ok(current)
}

/// Writes `value` at `path` inside `data`, creating missing containers.
///
/// `path` must not be empty. Containers created on the way are written
/// into their parent immediately, so they remain even if a later segment
/// is rejected.
pub fn set(schema: &SchemaNode, path: &FieldPath, data: &mut Value, value: Value) -> SchemaResult<()> {
    let (last, parents) = path
        .segments()
        .split_last()
        .ok_or_else(|| SchemaError::new(SchemaErrorKind::CannotSetRoot, &FieldPath::root()))?;

    let mut node = schema;
    let mut current = data;
    let mut walked = FieldPath::root();

    for segment in parents {
        let (next, slot) = descend(node, current, segment, &walked)?;
        node = next;
        current = slot;
        walked = walked.child(segment.as_str());
    }

    write(node, current, last, &walked, value)
}

/// Steps one segment down for `set`, returning the child schema and a
/// mutable slot that already holds a container of the right kind.
fn descend<'s, 'd>(
    node: &'s SchemaNode,
    current: &'d mut Value,
    segment: &str,
    walked: &FieldPath,
) -> SchemaResult<(&'s SchemaNode, &'d mut Value)> {
    match node {
        SchemaNode::Object(object) => {
            let field = object.field(segment).ok_or_else(|| unrecognized(segment, walked))?;
            let next = &field.field_type;
            require_container(next, segment, walked)?;
            let map = map_mut(current, walked)?;
            let slot = map.entry(segment).or_insert(Value::Null);
            vivify(next, slot, walked, segment);
            Ok((next, slot))
        }
        SchemaNode::Array(array) => {
            let index = parse_index(segment, walked)?;
            let next = array.element_type();
            require_container(next, segment, walked)?;
            let items = array_mut(current, walked)?;
            grow_to(items, index, walked)?;
            let slot = &mut items[index];
            vivify(next, slot, walked, segment);
            Ok((next, slot))
        }
        // Values of a string map are string leaves.
        SchemaNode::StringMap => Err(SchemaError::new(SchemaErrorKind::PathTooLong, &walked.child(segment))),
        SchemaNode::Any
        | SchemaNode::String
        | SchemaNode::Integer
        | SchemaNode::Number
        | SchemaNode::Boolean
        | SchemaNode::Either(_) => Err(SchemaError::new(SchemaErrorKind::PathTooLong, walked)),
    }
}

/// Performs the final write for `set`.
fn write(node: &SchemaNode, current: &mut Value, segment: &str, walked: &FieldPath, value: Value) -> SchemaResult<()> {
    match node {
        SchemaNode::Object(object) => {
            if !object.has_field(segment) {
                return Err(unrecognized(segment, walked));
            }
            map_mut(current, walked)?.insert(segment.to_string(), value);
        }
        SchemaNode::Array(_) => {
            let index = parse_index(segment, walked)?;
            let items = array_mut(current, walked)?;
            grow_to(items, index, walked)?;
            items[index] = value;
        }
        SchemaNode::StringMap => {
            map_mut(current, walked)?.insert(segment.to_string(), value);
        }
        SchemaNode::Any
        | SchemaNode::String
        | SchemaNode::Integer
        | SchemaNode::Number
        | SchemaNode::Boolean
        | SchemaNode::Either(_) => {
            return Err(SchemaError::new(SchemaErrorKind::PathTooLong, walked));
        }
    }
    Ok(())
}

/// Replaces an absent slot with an empty container matching `next`.
fn vivify(next: &SchemaNode, slot: &mut Value, walked: &FieldPath, segment: &str) {
    if !slot.is_null() {
        return;
    }
    *slot = match next {
        SchemaNode::Array(_) => Value::Array(Vec::new()),
        _ => Value::Object(Map::new()),
    };
    tracing::trace!(
        path = %walked.child(segment),
        kind = next.kind_name(),
        "auto-vivified container"
    );
}

fn require_container(next: &SchemaNode, segment: &str, walked: &FieldPath) -> SchemaResult<()> {
    if next.is_container() {
        Ok(())
    } else {
        Err(SchemaError::new(SchemaErrorKind::PathTooLong, &walked.child(segment)))
    }
}

fn map_mut<'d>(current: &'d mut Value, walked: &FieldPath) -> SchemaResult<&'d mut Map<String, Value>> {
    if current.is_null() {
        *current = Value::Object(Map::new());
    }
    current
        .as_object_mut()
        .ok_or_else(|| SchemaError::type_mismatch("an object", walked))
}

fn array_mut<'d>(current: &'d mut Value, walked: &FieldPath) -> SchemaResult<&'d mut Vec<Value>> {
    if current.is_null() {
        *current = Value::Array(Vec::new());
    }
    current
        .as_array_mut()
        .ok_or_else(|| SchemaError::type_mismatch("an array", walked))
}

/// Pads `items` with absence so that `index` is in bounds.
fn grow_to(items: &mut Vec<Value>, index: usize, walked: &FieldPath) -> SchemaResult<()> {
    if index < items.len() {
        return Ok(());
    }
    let invalid = || SchemaError::new(SchemaErrorKind::InvalidIndex, walked);
    if index > MAX_PADDED_INDEX {
        return Err(invalid());
    }
    let len = index.checked_add(1).ok_or_else(invalid)?;
    items.try_reserve(len - items.len()).map_err(|_| invalid())?;
    items.resize(len, Value::Null);
    Ok(())
}

/// Index segments are non-empty runs of ASCII digits.
fn parse_index(segment: &str, walked: &FieldPath) -> SchemaResult<usize> {
    let invalid = || SchemaError::new(SchemaErrorKind::InvalidIndex, walked);
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    segment.parse::<usize>().map_err(|_| invalid())
}

fn unrecognized(segment: &str, walked: &FieldPath) -> SchemaError {
    SchemaError::new(SchemaErrorKind::UnrecognizedField(segment.to_string()), walked)
}
