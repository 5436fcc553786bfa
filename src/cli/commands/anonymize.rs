//! Anonymize command implementation
//!
//! Anonymizes one document, or every document of a directory with
//! `--batch`, and saves the mapping needed to restore them.

use super::{
    build_engine, ensure_parent_dir, load_settings, mapping_path, EXIT_CONFIG_ERROR,
    EXIT_PARTIAL_FAILURE, EXIT_SUCCESS,
};
use crate::documents::{BatchAction, DocumentProcessor};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the anonymize command
#[derive(Args, Debug)]
pub struct AnonymizeArgs {
    /// Input file, or directory with --batch
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file, or directory with --batch
    #[arg(short, long)]
    pub output: PathBuf,

    /// Mapping file to write (defaults to mapping.path from the configuration)
    #[arg(short, long)]
    pub mapping: Option<PathBuf>,

    /// Process every file in the input directory
    #[arg(short, long)]
    pub batch: bool,

    /// JSON or TOML file of TYPE = regex pairs merged into the pattern catalog
    #[arg(short = 'p', long, value_name = "FILE")]
    pub custom_patterns: Option<PathBuf>,

    /// Disable entity detection (names, organizations, products, places)
    #[arg(long)]
    pub no_ner: bool,

    /// Use opaque tokens for every type
    #[arg(long)]
    pub opaque: bool,
}

impl AnonymizeArgs {
    /// Execute the anonymize command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input.display(), batch = self.batch, "Starting anonymize command");

        let Some(mut config) = load_settings(config_path) else {
            return Ok(EXIT_CONFIG_ERROR);
        };

        if let Some(ref path) = self.custom_patterns {
            tracing::info!(path = %path.display(), "Using custom patterns from CLI");
            config.detection.custom_patterns_file = Some(path.clone());
        }
        if self.no_ner {
            config.detection.use_ner = false;
        }
        if self.opaque {
            config.aliases.semantic = false;
        }

        let mapping = mapping_path(&self.mapping, &config);
        let Some(engine) = build_engine(&config) else {
            return Ok(EXIT_CONFIG_ERROR);
        };
        let mut processor = DocumentProcessor::with_default_handlers(engine);

        if self.batch {
            if !self.input.is_dir() {
                println!("❌ Input is not a directory: {}", self.input.display());
                return Ok(EXIT_CONFIG_ERROR);
            }

            let summary =
                processor.process_batch(&self.input, &self.output, &mapping, BatchAction::Anonymize)?;

            println!(
                "✅ Anonymized {} of {} file(s)",
                summary.successful.len(),
                summary.total()
            );
            for failed in &summary.failed {
                println!("   ❌ {failed}");
            }
            println!("   Mapping: {}", mapping.display());

            return Ok(if summary.is_successful() {
                EXIT_SUCCESS
            } else {
                EXIT_PARTIAL_FAILURE
            });
        }

        ensure_parent_dir(&self.output)?;
        match processor.anonymize_document(&self.input, &self.output) {
            Ok(detections) => {
                processor.engine().save_mapping(&mapping)?;
                println!(
                    "✅ Anonymized {} -> {} ({detections} detection(s))",
                    self.input.display(),
                    self.output.display()
                );
                println!("   Mapping: {}", mapping.display());
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to anonymize {}", self.input.display());
                println!("   Error: {e}");
                Ok(EXIT_PARTIAL_FAILURE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn args(input: PathBuf, output: PathBuf, mapping: PathBuf) -> AnonymizeArgs {
        AnonymizeArgs {
            input,
            output,
            mapping: Some(mapping),
            batch: false,
            custom_patterns: None,
            no_ner: false,
            opaque: false,
        }
    }

    #[test]
    fn test_anonymize_single_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out").join("in.txt");
        let mapping = dir.path().join("mapping.json");
        fs::write(&input, "Mail ops@example.com").unwrap();

        let config = dir.path().join("absent.toml");
        let code = args(input, output.clone(), mapping.clone())
            .execute(config.to_str().unwrap())
            .unwrap();

        assert_eq!(code, EXIT_SUCCESS);
        assert!(mapping.exists());
        assert!(!fs::read_to_string(output).unwrap().contains("ops@example.com"));
    }

    #[test]
    fn test_batch_requires_directory() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.txt");
        fs::write(&input, "x").unwrap();

        let mut args = args(input, dir.path().join("out"), dir.path().join("m.json"));
        args.batch = true;
        let config = dir.path().join("absent.toml");
        assert_eq!(args.execute(config.to_str().unwrap()).unwrap(), EXIT_CONFIG_ERROR);
    }
}
