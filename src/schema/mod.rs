//! Schema engine for treeshape
//!
//! A schema is declared once and then drives two independent walks over
//! concrete data trees:
//!
//! - conversion: incoming validation and coercion, or outgoing filtering
//!   and projection (`convert`)
//! - navigation: schema-directed get and set at a dynamic path
//!   (`navigator`, `accessor`)
//!
//! # Design Principles
//!
//! - Schemas are immutable and shareable; calls hold no state
//! - `null` is the single absence marker and passes through every node
//! - Fail fast: the first error aborts the call, tagged with its path
//! - Object output always carries every declared field

mod accessor;
mod actions;
mod convert;
mod descriptor;
mod errors;
pub mod filters;
mod loader;
mod navigator;
mod path;
pub mod predicates;
mod types;
pub mod validators;

pub use accessor::Accessor;
pub use actions::{run_pipeline, Action, ActionKind};
pub use convert::{
    convert_incoming, convert_incoming_at, convert_outgoing, convert_outgoing_at, Converter, Direction,
};
pub use descriptor::{compile_json, ActionDescriptor, FieldDescriptor, NodeDescriptor};
pub use errors::{SchemaError, SchemaErrorKind, SchemaResult, PATH_SEPARATOR};
pub use loader::{LoaderError, LoaderResult, SchemaLoader};
pub use navigator::{get, set, MAX_PADDED_INDEX};
pub use path::FieldPath;
pub use types::{ArraySchema, Field, ObjectSchema, SchemaNode};
