//! Serializable schema descriptors
//!
//! A descriptor is the JSON form of a schema, mirroring the construction
//! API one-to-one:
//!
//! ```json
//! {"type": "object", "fields": [
//!     {"name": "node", "type": {"type": "string"},
//!      "actions": [{"name": "trim"}, {"name": "max_length", "length": 4}]},
//!     {"name": "ids", "type": {"type": "array", "element": {"type": "integer"}}}
//! ]}
//! ```
//!
//! Compiling a descriptor checks what the builders do not: field names
//! are unique within each object and every pattern compiles.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::actions::Action;
use super::loader::{LoaderError, LoaderResult};
use super::path::FieldPath;
use super::types::{Field, SchemaNode};
use super::{filters, validators};

/// JSON form of a schema node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeDescriptor {
    Any,
    String,
    Integer,
    Number,
    Boolean,
    StringMap,
    Object {
        fields: Vec<FieldDescriptor>,
    },
    Array {
        element: Box<NodeDescriptor>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        actions: Vec<ActionDescriptor>,
    },
    Either {
        types: Vec<NodeDescriptor>,
    },
}

/// JSON form of an object field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: NodeDescriptor,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ActionDescriptor>,
}

/// JSON form of a built-in action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ActionDescriptor {
    Trim,
    ToTimestamp,
    ToString,
    NotNull,
    NotEmpty,
    MaxLength { length: usize },
    MinLength { length: usize },
    LengthRange { min: usize, max: usize },
    Only { options: Vec<Value> },
    Range { min: f64, max: f64 },
    Minimum { value: f64 },
    Maximum { value: f64 },
    ExclusiveMinimum { value: f64 },
    ExclusiveMaximum { value: f64 },
    Pattern { regex: String },
}

impl NodeDescriptor {
    /// Parses a descriptor from JSON text
    pub fn from_json(text: &str) -> LoaderResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Builds the schema this descriptor describes.
    pub fn compile(&self) -> LoaderResult<SchemaNode> {
        self.compile_at(&FieldPath::root())
    }

    fn compile_at(&self, path: &FieldPath) -> LoaderResult<SchemaNode> {
        Ok(match self {
            NodeDescriptor::Any => SchemaNode::Any,
            NodeDescriptor::String => SchemaNode::String,
            NodeDescriptor::Integer => SchemaNode::Integer,
            NodeDescriptor::Number => SchemaNode::Number,
            NodeDescriptor::Boolean => SchemaNode::Boolean,
            NodeDescriptor::StringMap => SchemaNode::StringMap,
            NodeDescriptor::Object { fields } => {
                let mut seen = HashSet::with_capacity(fields.len());
                let mut compiled = Vec::with_capacity(fields.len());
                for field in fields {
                    if !seen.insert(field.name.as_str()) {
                        return Err(LoaderError::DuplicateField {
                            path: path.to_string(),
                            name: field.name.clone(),
                        });
                    }
                    let field_path = path.child(field.name.as_str());
                    compiled.push(Field::with_actions(
                        field.name.clone(),
                        field.field_type.compile_at(&field_path)?,
                        compile_actions(&field.actions)?,
                    ));
                }
                SchemaNode::object(compiled)
            }
            NodeDescriptor::Array { element, actions } => SchemaNode::array_with(
                element.compile_at(&path.child("*"))?,
                compile_actions(actions)?,
            ),
            NodeDescriptor::Either { types } => SchemaNode::either(
                types
                    .iter()
                    .map(|alternative| alternative.compile_at(path))
                    .collect::<LoaderResult<Vec<_>>>()?,
            ),
        })
    }
}

impl ActionDescriptor {
    /// Builds the action this descriptor names.
    pub fn compile(&self) -> LoaderResult<Action> {
        Ok(match self {
            ActionDescriptor::Trim => filters::trim(),
            ActionDescriptor::ToTimestamp => filters::to_timestamp(),
            ActionDescriptor::ToString => filters::to_string(),
            ActionDescriptor::NotNull => validators::not_null(),
            ActionDescriptor::NotEmpty => validators::not_empty(),
            ActionDescriptor::MaxLength { length } => validators::max_length(*length),
            ActionDescriptor::MinLength { length } => validators::min_length(*length),
            ActionDescriptor::LengthRange { min, max } => validators::length_range(*min, *max),
            ActionDescriptor::Only { options } => validators::only(options.clone()),
            ActionDescriptor::Range { min, max } => validators::range(*min, *max),
            ActionDescriptor::Minimum { value } => validators::minimum(*value),
            ActionDescriptor::Maximum { value } => validators::maximum(*value),
            ActionDescriptor::ExclusiveMinimum { value } => validators::exclusive_minimum(*value),
            ActionDescriptor::ExclusiveMaximum { value } => validators::exclusive_maximum(*value),
            ActionDescriptor::Pattern { regex } => {
                validators::pattern(regex).map_err(|source| LoaderError::InvalidPattern {
                    pattern: regex.clone(),
                    source,
                })?
            }
        })
    }
}

fn compile_actions(actions: &[ActionDescriptor]) -> LoaderResult<Vec<Action>> {
    actions.iter().map(ActionDescriptor::compile).collect()
}

/// Parses and compiles a descriptor in one step.
pub fn compile_json(text: &str) -> LoaderResult<SchemaNode> {
    NodeDescriptor::from_json(text)?.compile()
}
