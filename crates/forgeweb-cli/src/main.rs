//! Forgeweb CLI
//!
//! Command-line interface for forgeweb applications.

use clap::Parser;
use std::io::Write;

mod cli;
mod commands;
mod output;

use cli::Cli;
use commands::CommandStatus;

/// Exit code for errors returned by a command.
const USAGE_ERROR_EXIT_CODE: i32 = 2;

#[tokio::main]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose, cli.json);

    let usage = cli.usage();

    // Execute command
    let code = match cli.execute().await {
        Ok(CommandStatus::Done) => 0,
        Ok(CommandStatus::Terminate { code, message }) => {
            output::fatal(&message);
            code
        }
        Err(err) => {
            output::error(&format!("{err:#}"));
            output::usage(&usage);
            USAGE_ERROR_EXIT_CODE
        }
    };

    let _ = std::io::stdout().flush();
    std::process::exit(code);
}

/// Initialize tracing/logging based on verbosity and format.
///
/// Logs go to stderr; stdout carries command output only.
fn init_tracing(verbose: u8, json: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(verbose > 1)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
