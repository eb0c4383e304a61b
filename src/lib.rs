//! treeshape - schema-driven conversion and navigation of JSON-like trees
//!
//! Declare a shape once as a [`schema::SchemaNode`], then:
//! - vet untrusted input with [`schema::convert_incoming`] or project an
//!   internal value with [`schema::convert_outgoing`]
//! - read or write at a dynamic location with [`schema::get`],
//!   [`schema::set`], or the chainable [`schema::Accessor`]

pub mod cli;
pub mod schema;
