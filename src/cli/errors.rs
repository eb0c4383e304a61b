//! # CLI Errors
//!
//! Failures that end the process with a non-zero status. Engine failures
//! are not among them; they become error envelopes on stdout.

use std::io;

use thiserror::Error;

use crate::schema::LoaderError;

/// Result type for CLI commands
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Config error: {0}")]
    Config(String),

    /// stdin or stdout failed, or stdin was blank
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error(transparent)]
    Schema(#[from] LoaderError),
}

impl CliError {
    /// Stable code for scripts driving the CLI
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "CLI_CONFIG_ERROR",
            CliError::Io(_) => "CLI_IO_ERROR",
            CliError::InvalidJson(_) => "CLI_INVALID_JSON",
            CliError::Schema(_) => "CLI_SCHEMA_LOAD_FAILED",
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::InvalidJson(e.to_string())
    }
}
