//! Schema loader for descriptor files on disk
//!
//! - One descriptor per `*.json` file; the schema name is the file stem
//! - A missing schema directory loads nothing
//! - Registered schemas are immutable: a name can be registered once

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use super::descriptor::NodeDescriptor;
use super::types::SchemaNode;

/// Failures while reading or compiling descriptors
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid schema descriptor: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate field '{name}' in object at '{path}'")]
    DuplicateField { path: String, name: String },

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Schema '{0}' is already registered")]
    SchemaExists(String),

    #[error("Schema '{0}' not found")]
    UnknownSchema(String),
}

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Registry of named schemas, optionally backed by a directory.
pub struct SchemaLoader {
    /// Directory containing descriptor files
    schema_dir: PathBuf,
    /// Compiled schemas by name
    schemas: BTreeMap<String, Arc<SchemaNode>>,
}

impl SchemaLoader {
    /// Creates an empty loader reading from `schema_dir`.
    pub fn new(schema_dir: impl Into<PathBuf>) -> Self {
        Self {
            schema_dir: schema_dir.into(),
            schemas: BTreeMap::new(),
        }
    }

    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every descriptor file in the schema directory.
    ///
    /// Returns the number of schemas loaded.
    pub fn load_all(&mut self) -> LoaderResult<usize> {
        if !self.schema_dir.exists() {
            tracing::debug!(dir = %self.schema_dir.display(), "schema directory missing, nothing to load");
            return Ok(0);
        }

        let dir = self.schema_dir.clone();
        let entries = fs::read_dir(&dir).map_err(|source| io_error(&dir, source))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|source| io_error(&dir, source))?.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                paths.push(path);
            }
        }
        // Directory order is platform dependent
        paths.sort();

        for path in &paths {
            self.load_file(path)?;
        }

        Ok(paths.len())
    }

    /// Loads one descriptor file, registering it under its file stem.
    pub fn load_file(&mut self, path: &Path) -> LoaderResult<Arc<SchemaNode>> {
        let content = fs::read_to_string(path).map_err(|source| io_error(path, source))?;
        let schema = NodeDescriptor::from_json(&content)?.compile()?;

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        tracing::debug!(schema = %name, file = %path.display(), kind = schema.kind_name(), "loaded schema");
        self.register(name, schema)
    }

    /// Registers a schema under `name`.
    pub fn register(&mut self, name: impl Into<String>, schema: SchemaNode) -> LoaderResult<Arc<SchemaNode>> {
        let name = name.into();
        if self.schemas.contains_key(&name) {
            return Err(LoaderError::SchemaExists(name));
        }
        let schema = Arc::new(schema);
        self.schemas.insert(name, Arc::clone(&schema));
        Ok(schema)
    }

    /// Looks up a schema by name.
    pub fn get(&self, name: &str) -> Option<Arc<SchemaNode>> {
        self.schemas.get(name).cloned()
    }

    /// Like [`get`](Self::get) but failing on unknown names.
    pub fn require(&self, name: &str) -> LoaderResult<Arc<SchemaNode>> {
        self.get(name)
            .ok_or_else(|| LoaderError::UnknownSchema(name.to_string()))
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

fn io_error(path: &Path, source: std::io::Error) -> LoaderError {
    LoaderError::Io {
        path: path.display().to_string(),
        source,
    }
}
