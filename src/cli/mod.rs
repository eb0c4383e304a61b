//! CLI module for treeshape
//!
//! Provides command-line interface for:
//! - convert: Run a document through a schema in either direction
//! - get: Read the value at a dotted path
//! - set: Write a value at a dotted path, creating containers on the way
//! - schemas: List loaded schema names

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, DirectionArg, LogFormat};
pub use commands::{run, run_command, Config};
pub use errors::{CliError, CliResult};
pub use io::{error_response, ok_response, parse_document, read_document, write_response};
