//! Schema model
//!
//! Supported node kinds:
//! - any: accepted as-is
//! - string, integer, number, boolean: primitive leaves
//! - string_map: map with arbitrary keys and string values
//! - object: ordered, named fields each with a type and action pipeline
//! - array: homogeneous sequence with element type and action pipeline
//! - either: first alternative that converts successfully
//!
//! Nodes are immutable once built and may be shared across any number of
//! conversions or navigations.

use std::collections::HashMap;

use super::actions::Action;

/// One node of the declarative type tree.
#[derive(Debug, Clone)]
pub enum SchemaNode {
    Any,
    String,
    Integer,
    Number,
    Boolean,
    StringMap,
    Object(ObjectSchema),
    Array(ArraySchema),
    /// Alternatives, tried in declared order
    Either(Vec<SchemaNode>),
}

impl SchemaNode {
    /// Object node with `fields` in declaration order
    pub fn object(fields: Vec<Field>) -> Self {
        SchemaNode::Object(ObjectSchema::new(fields))
    }

    /// Array node with no element actions
    pub fn array(element_type: SchemaNode) -> Self {
        SchemaNode::Array(ArraySchema::new(element_type, Vec::new()))
    }

    /// Array node whose elements pass through `actions`
    pub fn array_with(element_type: SchemaNode, actions: Vec<Action>) -> Self {
        SchemaNode::Array(ArraySchema::new(element_type, actions))
    }

    pub fn either(alternatives: Vec<SchemaNode>) -> Self {
        SchemaNode::Either(alternatives)
    }

    /// Returns the kind name used in descriptors and diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            SchemaNode::Any => "any",
            SchemaNode::String => "string",
            SchemaNode::Integer => "integer",
            SchemaNode::Number => "number",
            SchemaNode::Boolean => "boolean",
            SchemaNode::StringMap => "string_map",
            SchemaNode::Object(_) => "object",
            SchemaNode::Array(_) => "array",
            SchemaNode::Either(_) => "either",
        }
    }

    /// True for nodes a path can descend into
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            SchemaNode::Object(_) | SchemaNode::Array(_) | SchemaNode::StringMap
        )
    }
}

/// Field list of an object node, with a precomputed name index.
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    fields: Vec<Field>,
    index: HashMap<String, usize>,
}

impl ObjectSchema {
    /// Builds the object. Field names must be unique; the descriptor
    /// loader checks this, hand-built schemas are checked in debug builds.
    pub fn new(fields: Vec<Field>) -> Self {
        let index: HashMap<String, usize> = fields
            .iter()
            .enumerate()
            .map(|(i, field)| (field.name.clone(), i))
            .collect();
        debug_assert_eq!(index.len(), fields.len(), "duplicate field name in object schema");
        Self { fields, index }
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks up a declared field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

/// Element type and per-element pipeline of an array node.
#[derive(Debug, Clone)]
pub struct ArraySchema {
    element_type: Box<SchemaNode>,
    actions: Vec<Action>,
}

impl ArraySchema {
    pub fn new(element_type: SchemaNode, actions: Vec<Action>) -> Self {
        Self {
            element_type: Box::new(element_type),
            actions,
        }
    }

    pub fn element_type(&self) -> &SchemaNode {
        &self.element_type
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }
}

/// Named, typed member of an object node.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub field_type: SchemaNode,
    pub actions: Vec<Action>,
}

impl Field {
    /// Field with an empty pipeline
    pub fn new(name: impl Into<String>, field_type: SchemaNode) -> Self {
        Self {
            name: name.into(),
            field_type,
            actions: Vec::new(),
        }
    }

    /// Field with the given pipeline
    pub fn with_actions(name: impl Into<String>, field_type: SchemaNode, actions: Vec<Action>) -> Self {
        Self {
            name: name.into(),
            field_type,
            actions,
        }
    }

    /// Appends one action to the pipeline
    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }
}
