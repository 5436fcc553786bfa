//! CLI interface and argument parsing
//!
//! This module provides the command-line interface using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// PII Anonymizer - reversible PII anonymization for documents
#[derive(Parser, Debug)]
#[command(name = "pii-anonymizer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = crate::config::DEFAULT_CONFIG_FILE,
        env = "PII_ANONYMIZER_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PII_ANONYMIZER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize documents and write the mapping
    Anonymize(commands::anonymize::AnonymizeArgs),

    /// Restore anonymized documents from a mapping
    Restore(commands::restore::RestoreArgs),

    /// Report detected PII without changing anything
    Detect(commands::detect::DetectArgs),

    /// Summarize a mapping file by type
    Stats(commands::stats::StatsArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),
}

impl Cli {
    /// Run the selected command, returning the exit code
    pub fn execute(&self) -> anyhow::Result<i32> {
        match &self.command {
            Commands::Anonymize(args) => args.execute(&self.config),
            Commands::Restore(args) => args.execute(&self.config),
            Commands::Detect(args) => args.execute(&self.config),
            Commands::Stats(args) => args.execute(&self.config),
            Commands::ValidateConfig(args) => args.execute(&self.config),
        }
    }
}
