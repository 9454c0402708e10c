//! skiwetter entry point.
//!
//! Parses the command line, loads configuration, initializes tracing and
//! hands over to the selected subcommand.

use std::process::ExitCode;

use clap::Parser;

use skiwetter::cli::Cli;
use skiwetter::config::AppConfig;
use skiwetter::logging::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::from_env()?;

    // Initialize tracing; the guard flushes the log file on exit
    let _log_guard = init_tracing(&config.log_config())?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting skiwetter");

    cli.run(config).await
}
