// PII Anonymizer - Reversible PII anonymization for documents
// Copyright (c) 2025 PII Anonymizer Contributors
// Licensed under the MIT License

use clap::Parser;
use pii_anonymizer::cli::Cli;
use pii_anonymizer::config::load_config_or_default;
use pii_anonymizer::logging::init_logging;
use std::process;

fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Commands report configuration errors themselves; logging falls back to
    // defaults until then
    let config = load_config_or_default(&cli.config).unwrap_or_default();
    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.application.log_level.clone());

    let guard = match init_logging(&log_level, &config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "PII Anonymizer");

    let exit_code = match cli.execute() {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e:#}");
            5 // Fatal error exit code
        }
    };

    // Flush the file log before exiting
    drop(guard);
    process::exit(exit_code);
}
