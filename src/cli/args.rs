//! CLI argument definitions using clap
//!
//! Commands:
//! - treeshape convert --schema <name> [--direction incoming|outgoing]
//! - treeshape get --schema <name> --path <a.b.c>
//! - treeshape set --schema <name> --path <a.b.c> --value <json>
//! - treeshape schemas

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::schema::Direction;

/// treeshape - schema-driven conversion and navigation of JSON documents
#[derive(Parser, Debug)]
#[command(name = "treeshape")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "./treeshape.json")]
    pub config: PathBuf,

    /// Log output format (filter with RUST_LOG)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert the JSON document on stdin
    Convert {
        /// Schema name (descriptor file stem)
        #[arg(long)]
        schema: String,

        /// Conversion direction; defaults to the configured direction
        #[arg(long, value_enum)]
        direction: Option<DirectionArg>,
    },

    /// Read the value at a path of the JSON document on stdin
    Get {
        /// Schema name (descriptor file stem)
        #[arg(long)]
        schema: String,

        /// Dotted path, e.g. event.1.name
        #[arg(long, default_value = "")]
        path: String,
    },

    /// Write a value at a path of the JSON document on stdin
    Set {
        /// Schema name (descriptor file stem)
        #[arg(long)]
        schema: String,

        /// Dotted path, e.g. event.1.name
        #[arg(long)]
        path: String,

        /// JSON text of the value to write
        #[arg(long)]
        value: String,
    },

    /// List the schemas found in the schema directory
    Schemas,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionArg {
    Incoming,
    Outgoing,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Incoming => Direction::Incoming,
            DirectionArg::Outgoing => Direction::Outgoing,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
