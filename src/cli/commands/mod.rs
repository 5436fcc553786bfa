//! CLI command implementations
//!
//! Handlers return process exit codes: 0 success, 1 partial failure,
//! 2 configuration or input error. Anything they propagate as an error is
//! fatal (5).

pub mod anonymize;
pub mod detect;
pub mod restore;
pub mod stats;
pub mod validate;

use crate::anonymization::AnonymizationEngine;
use crate::config::{load_config_or_default, AnonymizerConfig};
use std::path::{Path, PathBuf};

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code when some documents failed
pub const EXIT_PARTIAL_FAILURE: i32 = 1;

/// Exit code for configuration and input errors
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Load configuration, reporting problems on stdout
fn load_settings(config_path: &str) -> Option<AnonymizerConfig> {
    match load_config_or_default(config_path) {
        Ok(config) => Some(config),
        Err(e) => {
            println!("❌ Failed to load configuration file");
            println!("   Error: {e}");
            None
        }
    }
}

/// Build the engine, reporting problems on stdout
fn build_engine(config: &AnonymizerConfig) -> Option<AnonymizationEngine> {
    match AnonymizationEngine::new(config.anonymization()) {
        Ok(engine) => Some(engine),
        Err(e) => {
            println!("❌ Failed to initialize the anonymizer");
            println!("   Error: {e}");
            None
        }
    }
}

/// Mapping path from the command line, else from the configuration
fn mapping_path(cli_value: &Option<PathBuf>, config: &AnonymizerConfig) -> PathBuf {
    cli_value
        .clone()
        .unwrap_or_else(|| config.mapping.path.clone())
}

fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
