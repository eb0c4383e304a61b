//! CLI command implementations
//!
//! Every command loads the configuration and the schema directory first.
//! Engine failures become error envelopes on stdout; configuration, I/O and
//! loader failures abort the command.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::schema::{self, Converter, Direction, FieldPath, SchemaError, SchemaLoader};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{error_response, ok_response, read_document, write_response};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `<name>.json` schema descriptors (required)
    pub schema_dir: String,

    /// Direction used by `convert` when `--direction` is omitted
    #[serde(default = "default_direction")]
    pub default_direction: String,
}

fn default_direction() -> String {
    "incoming".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::Config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.schema_dir.trim().is_empty() {
            return Err(CliError::Config("schema_dir must not be empty".into()));
        }
        self.direction()?;
        Ok(())
    }

    /// Get schema directory as Path
    pub fn schema_path(&self) -> &Path {
        Path::new(&self.schema_dir)
    }

    /// Parsed `default_direction`
    pub fn direction(&self) -> CliResult<Direction> {
        match self.default_direction.as_str() {
            "incoming" => Ok(Direction::Incoming),
            "outgoing" => Ok(Direction::Outgoing),
            other => Err(CliError::Config(format!(
                "Invalid default_direction: '{}'. Must be 'incoming' or 'outgoing'.",
                other
            ))),
        }
    }
}

/// Run the parsed command line
pub fn run(cli: Cli) -> CliResult<()> {
    let config = Config::load(&cli.config)?;

    let mut loader = SchemaLoader::new(config.schema_path());
    let count = loader.load_all()?;
    debug!(count, dir = %config.schema_dir, "schemas loaded");

    let response = match cli.command {
        Command::Schemas => schemas(&loader),
        command => {
            let document = read_document()?;
            run_command(&config, &loader, command, document)?
        }
    };

    write_response(&response)
}

/// Execute one document command and build its response envelope
pub fn run_command(
    config: &Config,
    loader: &SchemaLoader,
    command: Command,
    document: Value,
) -> CliResult<Value> {
    let outcome = match command {
        Command::Convert { schema, direction } => {
            let direction = match direction {
                Some(d) => d.into(),
                None => config.direction()?,
            };
            let node = loader.require(&schema)?;
            convert(&node, direction, document)
        }
        Command::Get { schema, path } => {
            let node = loader.require(&schema)?;
            schema::get(&node, &FieldPath::parse(&path), &document).cloned()
        }
        Command::Set { schema, path, value } => {
            let node = loader.require(&schema)?;
            let value: Value = serde_json::from_str(&value)
                .map_err(|e| CliError::InvalidJson(format!("Invalid --value: {}", e)))?;
            let mut document = document;
            schema::set(&node, &FieldPath::parse(&path), &mut document, value).map(|()| document)
        }
        Command::Schemas => return Ok(schemas(loader)),
    };

    Ok(envelope(outcome))
}

fn convert(node: &schema::SchemaNode, direction: Direction, document: Value) -> Result<Value, SchemaError> {
    Converter::new(direction).convert(node, document, &FieldPath::root())
}

fn schemas(loader: &SchemaLoader) -> Value {
    ok_response(Value::from(loader.names()))
}

fn envelope(outcome: Result<Value, SchemaError>) -> Value {
    match outcome {
        Ok(data) => ok_response(data),
        Err(e) => error_response(e.code(), &e.to_string()),
    }
}
