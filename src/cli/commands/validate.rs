//! Validate config command implementation
//!
//! Loads the configuration file, compiles the pattern catalog and reports
//! the effective settings.

use super::{EXIT_CONFIG_ERROR, EXIT_SUCCESS};
use crate::anonymization::AnonymizationEngine;
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        match AnonymizationEngine::new(config.anonymization()) {
            Ok(engine) => {
                println!("✅ Configuration is valid");
                println!();
                println!("Configuration Summary:");
                println!("  Log Level: {}", config.application.log_level);
                println!("  Entity Detection: {}", engine.entities_enabled());
                println!(
                    "  Pattern Library: {}",
                    config
                        .detection
                        .pattern_library
                        .as_ref()
                        .map_or("embedded".to_string(), |p| p.display().to_string())
                );
                println!(
                    "  Custom Patterns: {}",
                    config.detection.custom_patterns.len()
                );
                println!("  Semantic Aliases: {}", config.aliases.semantic);
                println!("  Mapping File: {}", config.mapping.path.display());
                println!("  Audit Log: {}", config.audit.enabled);
                println!();
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(EXIT_CONFIG_ERROR)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_validate_missing_file() {
        let args = ValidateArgs {};
        assert_eq!(args.execute("/nonexistent/config.toml").unwrap(), EXIT_CONFIG_ERROR);
    }

    #[test]
    fn test_validate_valid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pii_anonymizer.toml");
        fs::write(&path, "[application]\nlog_level = \"warn\"\n").unwrap();

        let args = ValidateArgs {};
        assert_eq!(args.execute(path.to_str().unwrap()).unwrap(), EXIT_SUCCESS);
    }
}
