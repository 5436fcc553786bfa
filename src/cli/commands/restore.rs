//! Restore command implementation

use super::{
    build_engine, ensure_parent_dir, load_settings, mapping_path, EXIT_CONFIG_ERROR,
    EXIT_PARTIAL_FAILURE, EXIT_SUCCESS,
};
use crate::documents::{BatchAction, DocumentProcessor};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the restore command
#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Anonymized file, or directory with --batch
    #[arg(short, long)]
    pub input: PathBuf,

    /// Restored file, or directory with --batch
    #[arg(short, long)]
    pub output: PathBuf,

    /// Mapping file written by anonymize
    #[arg(short, long)]
    pub mapping: Option<PathBuf>,

    /// Process every file in the input directory
    #[arg(short, long)]
    pub batch: bool,
}

impl RestoreArgs {
    /// Execute the restore command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input.display(), batch = self.batch, "Starting restore command");

        let Some(config) = load_settings(config_path) else {
            return Ok(EXIT_CONFIG_ERROR);
        };

        let mapping = mapping_path(&self.mapping, &config);
        if !mapping.exists() {
            println!("❌ Mapping file not found: {}", mapping.display());
            return Ok(EXIT_CONFIG_ERROR);
        }

        let Some(engine) = build_engine(&config) else {
            return Ok(EXIT_CONFIG_ERROR);
        };
        let mut processor = DocumentProcessor::with_default_handlers(engine);

        if self.batch {
            let summary =
                processor.process_batch(&self.input, &self.output, &mapping, BatchAction::Restore)?;

            println!(
                "✅ Restored {} of {} file(s)",
                summary.successful.len(),
                summary.total()
            );
            for failed in &summary.failed {
                println!("   ❌ {failed}");
            }

            return Ok(if summary.is_successful() {
                EXIT_SUCCESS
            } else {
                EXIT_PARTIAL_FAILURE
            });
        }

        if let Err(e) = processor.engine_mut().load_mapping(&mapping) {
            println!("❌ Failed to load mapping {}", mapping.display());
            println!("   Error: {e}");
            return Ok(EXIT_CONFIG_ERROR);
        }

        ensure_parent_dir(&self.output)?;
        match processor.restore_document(&self.input, &self.output) {
            Ok(()) => {
                println!(
                    "✅ Restored {} -> {}",
                    self.input.display(),
                    self.output.display()
                );
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to restore {}", self.input.display());
                println!("   Error: {e}");
                Ok(EXIT_PARTIAL_FAILURE)
            }
        }
    }
}
