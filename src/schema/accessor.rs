//! Chainable accessor over the path navigator
//!
//! An `Accessor` binds a schema to a path built one step at a time. Each
//! step returns a new accessor and leaves the receiver untouched, so the
//! same chain always yields an equal accessor. Nothing about the data is
//! needed while chaining: whether a segment is a field name, an index, or
//! a map key is decided by the schema when `read` or `write` runs.
//!
//! ```ignore
//! let level = Accessor::new(&schema).field("tag").field("level");
//! level.write(&mut data, json!(7))?;
//! assert_eq!(level.read(&data)?, &json!(7));
//! ```

use serde_json::Value;

use super::errors::SchemaResult;
use super::navigator;
use super::path::FieldPath;
use super::types::SchemaNode;

#[derive(Debug, Clone)]
pub struct Accessor<'s> {
    schema: &'s SchemaNode,
    path: FieldPath,
}

impl<'s> Accessor<'s> {
    /// Accessor for the schema root
    pub fn new(schema: &'s SchemaNode) -> Self {
        Self::at(schema, FieldPath::root())
    }

    /// Accessor starting from an existing path
    pub fn at(schema: &'s SchemaNode, path: FieldPath) -> Self {
        Self { schema, path }
    }

    /// Named child (object field or map key)
    pub fn field(&self, name: &str) -> Self {
        self.segment(name)
    }

    /// Indexed child (array element)
    pub fn index(&self, index: usize) -> Self {
        self.segment(&index.to_string())
    }

    /// Child for a raw segment, interpreted at the terminal call
    pub fn segment(&self, segment: &str) -> Self {
        Self {
            schema: self.schema,
            path: self.path.child(segment),
        }
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn schema(&self) -> &'s SchemaNode {
        self.schema
    }

    /// Terminal read; see [`navigator::get`].
    pub fn read<'d>(&self, data: &'d Value) -> SchemaResult<&'d Value> {
        navigator::get(self.schema, &self.path, data)
    }

    /// Terminal write; see [`navigator::set`].
    pub fn write(&self, data: &mut Value, value: Value) -> SchemaResult<()> {
        navigator::set(self.schema, &self.path, data, value)
    }
}

impl PartialEq for Accessor<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.schema, other.schema) && self.path == other.path
    }
}

impl Eq for Accessor<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::Field;
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
            Field::new("spec", SchemaNode::StringMap),
        ])
    }

    #[test]
    fn test_repeated_access_is_stable() {
        let schema = schema1();
        let root = Accessor::new(&schema);
        let first = root.field("tag").field("level");
        let second = root.field("tag").field("level");
        assert_eq!(first, second);
        assert!(root.path().is_root());
    }

    #[test]
    fn test_chaining_does_not_touch_data() {
        let schema = schema1();
        // Bogus names are accepted while chaining and rejected on use.
        let bogus = Accessor::new(&schema).field("nod").field("x");
        assert_eq!(bogus.path().to_string(), "nod.x");
        let err = bogus.read(&json!({})).unwrap_err();
        assert_eq!(err.to_string(), "Unrecognized field: nod");
    }

    #[test]
    fn test_read() {
        let schema = schema1();
        let data = json!({"node": "5", "tag": {"name": "abc", "level": 10}});
        let root = Accessor::new(&schema);
        assert_eq!(root.field("node").read(&data).unwrap(), &json!("5"));
        assert_eq!(
            root.field("tag").read(&data).unwrap(),
            &json!({"name": "abc", "level": 10})
        );
        assert!(root.field("event").index(3).field("name").read(&data).unwrap().is_null());
        assert_eq!(root.read(&data).unwrap(), &data);
    }

    #[test]
    fn test_write() {
        let schema = schema1();
        let mut data = json!({});
        let root = Accessor::new(&schema);
        root.field("event").index(1).field("name").write(&mut data, json!("def")).unwrap();
        root.field("spec").field("size").write(&mut data, json!("xl")).unwrap();
        assert_eq!(data, json!({"event": [null, {"name": "def"}], "spec": {"size": "xl"}}));
    }

    #[test]
    fn test_write_root_rejected() {
        let schema = schema1();
        let err = Accessor::new(&schema).write(&mut json!({}), json!(1)).unwrap_err();
        assert_eq!(err.to_string(), "Cannot set itself");
    }

    #[test]
    fn test_index_on_object_field_is_deferred() {
        let schema = schema1();
        let accessor = Accessor::new(&schema).field("user").segment("x");
        let err = accessor.read(&json!({"user": []})).unwrap_err();
        assert_eq!(err.to_string(), "user: Index should be integer");
    }
}
