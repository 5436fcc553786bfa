//! Configuration management.
//!
//! TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! The configuration file supports:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for every setting, so an empty or missing file is valid
//! - `PII_ANONYMIZER_*` environment overrides
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pii_anonymizer::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("pii_anonymizer.toml")?;
//! println!("Entity detection: {}", config.detection.use_ner);
//! println!("Mapping file: {}", config.mapping.path.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`DetectionConfig`] - Pattern catalog, custom patterns, entity detection
//! - [`AliasConfig`] - Semantic aliases, seed, word pools
//! - [`MappingConfig`] - Default mapping file
//! - [`AuditConfig`] - Audit trail
//! - [`LoggingConfig`] - File logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [detection]
//! use_ner = true
//! gazetteer = "${PII_DATA_DIR}/entities.toml"
//!
//! [detection.custom_patterns]
//! EMPLOYEE_ID = '\bEMP-\d{5}\b'
//!
//! [aliases]
//! semantic = true
//! seed = 42
//!
//! [mapping]
//! path = "mapping.json"
//!
//! [audit]
//! enabled = true
//! log_path = "./audit/anonymization.log"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use crate::anonymization::config::{AliasConfig, AuditConfig, DetectionConfig};
pub use loader::{load_config, load_config_or_default, DEFAULT_CONFIG_FILE};
pub use schema::{AnonymizerConfig, ApplicationConfig, LoggingConfig, MappingConfig};
