//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::AnonymizerConfig;
use crate::domain::errors::AnonymizerError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "pii_anonymizer.toml";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into AnonymizerConfig
/// 4. Applies environment variable overrides (PII_ANONYMIZER_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use pii_anonymizer::config::loader::load_config;
///
/// let config = load_config("pii_anonymizer.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<AnonymizerConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AnonymizerError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        AnonymizerError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Loads `path` when it exists, otherwise starts from defaults
///
/// Environment overrides and validation apply in both cases.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<AnonymizerConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(path = %path.display(), "No configuration file, using defaults");
    let mut config = AnonymizerConfig::default();
    finish(&mut config)?;
    Ok(config)
}

/// Parse configuration from TOML text
pub fn parse_config(contents: &str) -> Result<AnonymizerConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: AnonymizerConfig = toml::from_str(&contents)
        .map_err(|e| AnonymizerError::Configuration(format!("Failed to parse TOML: {e}")))?;

    finish(&mut config)?;
    Ok(config)
}

fn finish(config: &mut AnonymizerConfig) -> Result<()> {
    apply_env_overrides(config)?;

    config.validate().map_err(|e| {
        AnonymizerError::Configuration(format!("Configuration validation failed: {e}"))
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| AnonymizerError::Configuration(format!("Invalid substitution rule: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(AnonymizerError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the PII_ANONYMIZER_* prefix
fn apply_env_overrides(config: &mut AnonymizerConfig) -> Result<()> {
    if let Ok(val) = std::env::var("PII_ANONYMIZER_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("PII_ANONYMIZER_MAPPING_PATH") {
        config.mapping.path = val.into();
    }

    if let Ok(val) = std::env::var("PII_ANONYMIZER_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("PII_ANONYMIZER_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    config
        .detection
        .apply_env_overrides()
        .and_then(|()| config.aliases.apply_env_overrides())
        .and_then(|()| config.audit.apply_env_overrides())
        .map_err(|e| AnonymizerError::Configuration(format!("{e:#}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("PII_TEST_GAZETTEER_DIR", "/srv/data");
        let input = "gazetteer = \"${PII_TEST_GAZETTEER_DIR}/entities.toml\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "gazetteer = \"/srv/data/entities.toml\"\n");
        std::env::remove_var("PII_TEST_GAZETTEER_DIR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("PII_TEST_MISSING_VAR");
        let result = substitute_env_vars("path = \"${PII_TEST_MISSING_VAR}\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_substitute_skips_comments() {
        std::env::remove_var("PII_TEST_COMMENTED");
        let result = substitute_env_vars("# path = \"${PII_TEST_COMMENTED}\"").unwrap();
        assert!(result.contains("${PII_TEST_COMMENTED}"));
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config("nonexistent.toml").is_err());
    }

    #[test]
    fn test_load_config_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_or_default(dir.path().join("absent.toml")).unwrap();
        assert!(config.detection.use_ner);
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[detection]
use_ner = false

[detection.custom_patterns]
EMPLOYEE_ID = '\bEMP-\d{5}\b'

[aliases]
semantic = false
seed = 42

[mapping]
path = "out/mapping.json"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert!(!config.detection.use_ner);
        assert_eq!(config.detection.custom_patterns.len(), 1);
        assert_eq!(config.aliases.seed, Some(42));
        assert_eq!(config.mapping.path, std::path::PathBuf::from("out/mapping.json"));
    }

    #[test]
    fn test_invalid_custom_pattern_rejected() {
        let result = parse_config("[detection.custom_patterns]\nBROKEN = '(unclosed'\n");
        assert!(matches!(result, Err(AnonymizerError::Configuration(_))));
    }
}
