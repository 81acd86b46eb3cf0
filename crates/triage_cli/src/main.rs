//! triage CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Normalization failure

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use triage_core::CoreError;
use triage_events::EventError;

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const NORMALIZATION_FAILURE: u8 = 3;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let directives = if cli.verbose {
        "triage=debug,info"
    } else if cli.quiet {
        "warn"
    } else {
        "triage=info,warn"
    };

    // Logs go to stderr so JSON output on stdout stays clean.
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives)))
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let result = match cli.command {
        Commands::Route(args) => commands::route::execute(args).await,
        Commands::Roles(args) => commands::roles::execute(args).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    let event_error = e
        .downcast_ref::<EventError>()
        .or_else(|| match e.downcast_ref::<CoreError>() {
            Some(CoreError::Event(inner)) => Some(inner),
            _ => None,
        });
    if event_error.is_some_and(EventError::is_client_error) {
        return ExitCodes::NORMALIZATION_FAILURE;
    }

    if matches!(e.downcast_ref::<CoreError>(), Some(CoreError::Config(_) | CoreError::Toml(_))) {
        return ExitCodes::INVALID_ARGS;
    }

    let msg = e.to_string().to_lowercase();
    if msg.contains("argument") || msg.contains("not found") {
        ExitCodes::INVALID_ARGS
    } else {
        ExitCodes::GENERAL_ERROR
    }
}
