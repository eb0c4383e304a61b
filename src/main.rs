//! treeshape CLI entry point
//!
//! Parses arguments, installs the log subscriber, and delegates to the CLI
//! module. Logs go to stderr; stdout carries only response envelopes.

use tracing_subscriber::EnvFilter;
use treeshape::cli::{self, Cli, LogFormat};

fn main() {
    let args = Cli::parse_args();
    init_tracing(args.log_format);

    if let Err(e) = cli::run(args) {
        eprintln!("{}: {}", e.code(), e);
        std::process::exit(1);
    }
}

fn init_tracing(format: LogFormat) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
