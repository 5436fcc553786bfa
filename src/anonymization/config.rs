//! Anonymization engine configuration
//!
//! Each section maps onto a table of the configuration file: `[detection]`,
//! `[aliases]` and `[audit]`. Every section validates itself and accepts
//! `PII_ANONYMIZER_*` environment overrides.

use crate::anonymization::anonymizer::aliases::AliasPools;
use crate::anonymization::detector::patterns::PatternCatalog;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Detection settings
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Placeholder allocation settings
    #[serde(default)]
    pub aliases: AliasConfig,

    /// Audit logging configuration
    #[serde(default)]
    pub audit: AuditConfig,
}

impl AnonymizationConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.detection
            .validate()
            .context("Invalid detection configuration")?;
        self.aliases
            .validate()
            .context("Invalid alias configuration")?;
        self.audit
            .validate()
            .context("Invalid audit configuration")?;
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.detection.apply_env_overrides()?;
        self.aliases.apply_env_overrides()?;
        self.audit.apply_env_overrides()?;
        Ok(())
    }
}

/// `[detection]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Run the entity classifier next to the pattern catalog
    #[serde(default = "default_use_ner")]
    pub use_ner: bool,

    /// Pattern library TOML replacing the embedded catalog
    #[serde(default)]
    pub pattern_library: Option<PathBuf>,

    /// `TYPE = regex` pairs merged into the catalog
    #[serde(default)]
    pub custom_patterns: BTreeMap<String, String>,

    /// JSON or TOML file with more `TYPE = regex` pairs
    #[serde(default)]
    pub custom_patterns_file: Option<PathBuf>,

    /// Gazetteer TOML feeding the built-in recognizer
    #[serde(default)]
    pub gazetteer: Option<PathBuf>,
}

fn default_use_ner() -> bool {
    true
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            use_ner: default_use_ner(),
            pattern_library: None,
            custom_patterns: BTreeMap::new(),
            custom_patterns_file: None,
            gazetteer: None,
        }
    }
}

impl DetectionConfig {
    /// Validate detection settings
    pub fn validate(&self) -> Result<()> {
        if let Some(ref path) = self.pattern_library {
            if !path.exists() {
                anyhow::bail!("Pattern library file not found: {}", path.display());
            }
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                anyhow::bail!("Pattern library must be a TOML file: {}", path.display());
            }
        }

        if let Some(ref path) = self.custom_patterns_file {
            if !path.exists() {
                anyhow::bail!("Custom patterns file not found: {}", path.display());
            }
        }

        let mut scratch = PatternCatalog::default();
        scratch
            .merge_custom(&self.custom_patterns)
            .context("Invalid custom pattern")?;

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("PII_ANONYMIZER_USE_NER") {
            self.use_ner = val
                .parse()
                .context("Invalid PII_ANONYMIZER_USE_NER value")?;
        }

        if let Ok(val) = std::env::var("PII_ANONYMIZER_PATTERN_LIBRARY") {
            self.pattern_library = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("PII_ANONYMIZER_CUSTOM_PATTERNS_FILE") {
            self.custom_patterns_file = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("PII_ANONYMIZER_GAZETTEER") {
            self.gazetteer = Some(PathBuf::from(val));
        }

        Ok(())
    }
}

/// `[aliases]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasConfig {
    /// Human-readable aliases for names, organizations, products and places
    #[serde(default = "default_semantic")]
    pub semantic: bool,

    /// Seed for reproducible alias draws
    #[serde(default)]
    pub seed: Option<u64>,

    /// Word pools for semantic aliases
    #[serde(default)]
    pub pools: AliasPools,
}

fn default_semantic() -> bool {
    true
}

impl Default for AliasConfig {
    fn default() -> Self {
        Self {
            semantic: default_semantic(),
            seed: None,
            pools: AliasPools::default(),
        }
    }
}

impl AliasConfig {
    /// Validate alias settings
    pub fn validate(&self) -> Result<()> {
        self.pools.validate()?;
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("PII_ANONYMIZER_SEMANTIC_ALIASES") {
            self.semantic = val
                .parse()
                .context("Invalid PII_ANONYMIZER_SEMANTIC_ALIASES value")?;
        }

        if let Ok(val) = std::env::var("PII_ANONYMIZER_ALIAS_SEED") {
            self.seed = Some(
                val.parse()
                    .context("Invalid PII_ANONYMIZER_ALIAS_SEED value")?,
            );
        }

        Ok(())
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON format for audit logs
    #[serde(default = "default_audit_json_format")]
    pub json_format: bool,
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/anonymization.log")
}

fn default_audit_json_format() -> bool {
    true
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: default_audit_json_format(),
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> Result<()> {
        if self.enabled {
            if let Some(parent) = self.log_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!(
                            "Failed to create audit log directory: {}",
                            parent.display()
                        )
                    })?;
                }
            }
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("PII_ANONYMIZER_AUDIT_ENABLED") {
            self.enabled = val
                .parse()
                .context("Invalid PII_ANONYMIZER_AUDIT_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("PII_ANONYMIZER_AUDIT_LOG_PATH") {
            self.log_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("PII_ANONYMIZER_AUDIT_JSON_FORMAT") {
            self.json_format = val
                .parse()
                .context("Invalid PII_ANONYMIZER_AUDIT_JSON_FORMAT value")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnonymizationConfig::default();
        assert!(config.detection.use_ner);
        assert!(config.detection.custom_patterns.is_empty());
        assert!(config.aliases.semantic);
        assert!(config.aliases.seed.is_none());
        assert!(!config.audit.enabled);
        assert!(config.audit.json_format);
    }

    #[test]
    fn test_config_validation() {
        let config = AnonymizationConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_custom_pattern_rejected() {
        let mut config = AnonymizationConfig::default();
        config
            .detection
            .custom_patterns
            .insert("BADGE".to_string(), "[unclosed".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_pattern_library_rejected() {
        let mut config = AnonymizationConfig::default();
        config.detection.pattern_library = Some(PathBuf::from("/nonexistent/patterns.toml"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_pool_rejected() {
        let mut config = AnonymizationConfig::default();
        config.aliases.pools.first_names.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_sections() {
        let toml = r#"
            [detection]
            use_ner = false

            [detection.custom_patterns]
            EMPLOYEE_ID = 'EMP-\d{5}'

            [aliases]
            seed = 7

            [aliases.pools]
            first_names = ["Ada"]
        "#;
        let config: AnonymizationConfig = toml::from_str(toml).unwrap();
        assert!(!config.detection.use_ner);
        assert_eq!(config.detection.custom_patterns.len(), 1);
        assert_eq!(config.aliases.seed, Some(7));
        assert_eq!(config.aliases.pools.first_names, vec!["Ada".to_string()]);
        assert!(!config.aliases.pools.last_names.is_empty());
    }
}
