//! Schema engine error types
//!
//! Every failure raised by conversion, actions, or navigation is a
//! `SchemaError`: one `SchemaErrorKind` plus the path it was raised at.
//!
//! Wire format:
//! - empty path: `<message>`
//! - otherwise:  `<segments joined by ".">: <message>`

use std::fmt;

use thiserror::Error;

use super::path::FieldPath;

/// Separator between the rendered path and the message.
pub const PATH_SEPARATOR: &str = ": ";

/// Kinds of failure, each rendering its fixed message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaErrorKind {
    /// Value is not of the expected primitive or container kind
    #[error("Should be {expected}")]
    TypeMismatch {
        /// Article plus kind, e.g. "a string"
        expected: &'static str,
    },

    /// One unknown key (navigation, or a single redundant input key)
    #[error("Unrecognized field: {0}")]
    UnrecognizedField(String),

    /// Several redundant input keys, in input order
    #[error("Unrecognized fields: {}", .0.join(", "))]
    UnrecognizedFields(Vec<String>),

    #[error("Cannot be null")]
    ValueCannotBeNull,

    #[error("Cannot be empty")]
    ValueCannotBeEmpty,

    #[error("String is too short")]
    ValueTooShort,

    #[error("String is too long")]
    ValueTooLong,

    #[error("Value is too small")]
    ValueTooSmall,

    #[error("Value is too large")]
    ValueTooLarge,

    #[error("Pattern not match")]
    PatternMismatch,

    /// Either exhausted, unparseable date, or set-membership miss
    #[error("Invalid value")]
    InvalidValue,

    #[error("Index should be integer")]
    InvalidIndex,

    #[error("Path is too long")]
    PathTooLong,

    #[error("Cannot set itself")]
    CannotSetRoot,
}

impl SchemaErrorKind {
    /// Builds the redundancy error for a list of offending keys.
    ///
    /// One key renders singular, more than one renders plural.
    pub fn unrecognized(mut keys: Vec<String>) -> Self {
        if keys.len() == 1 {
            SchemaErrorKind::UnrecognizedField(keys.remove(0))
        } else {
            SchemaErrorKind::UnrecognizedFields(keys)
        }
    }

    /// Returns the stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorKind::TypeMismatch { .. } => "SCHEMA_TYPE_MISMATCH",
            SchemaErrorKind::UnrecognizedField(_) | SchemaErrorKind::UnrecognizedFields(_) => {
                "SCHEMA_UNRECOGNIZED_FIELD"
            }
            SchemaErrorKind::ValueCannotBeNull => "SCHEMA_VALUE_CANNOT_BE_NULL",
            SchemaErrorKind::ValueCannotBeEmpty => "SCHEMA_VALUE_CANNOT_BE_EMPTY",
            SchemaErrorKind::ValueTooShort => "SCHEMA_VALUE_TOO_SHORT",
            SchemaErrorKind::ValueTooLong => "SCHEMA_VALUE_TOO_LONG",
            SchemaErrorKind::ValueTooSmall => "SCHEMA_VALUE_TOO_SMALL",
            SchemaErrorKind::ValueTooLarge => "SCHEMA_VALUE_TOO_LARGE",
            SchemaErrorKind::PatternMismatch => "SCHEMA_PATTERN_MISMATCH",
            SchemaErrorKind::InvalidValue => "SCHEMA_INVALID_VALUE",
            SchemaErrorKind::InvalidIndex => "SCHEMA_INVALID_INDEX",
            SchemaErrorKind::PathTooLong => "SCHEMA_PATH_TOO_LONG",
            SchemaErrorKind::CannotSetRoot => "SCHEMA_CANNOT_SET_ROOT",
        }
    }
}

/// A failure at a specific location in the data tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    kind: SchemaErrorKind,
    path: FieldPath,
}

impl SchemaError {
    /// Create an error of `kind` raised at `path`
    pub fn new(kind: SchemaErrorKind, path: &FieldPath) -> Self {
        Self {
            kind,
            path: path.clone(),
        }
    }

    /// Type mismatch naming the expected kind ("a string", "an object", ...)
    pub fn type_mismatch(expected: &'static str, path: &FieldPath) -> Self {
        Self::new(SchemaErrorKind::TypeMismatch { expected }, path)
    }

    /// Returns the error kind
    pub fn kind(&self) -> &SchemaErrorKind {
        &self.kind
    }

    /// Returns the path the error was raised at
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Returns the message without the path prefix
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}{}{}", self.path, PATH_SEPARATOR, self.kind)
        }
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
