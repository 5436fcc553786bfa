//! Pattern catalog for PII detection
//!
//! The catalog is ordered configuration data: a list of named expressions,
//! each producing detections of the type it is named after. The default set
//! is embedded from `patterns/pii_patterns.toml`; callers may replace it
//! with their own library file and merge custom `TYPE = regex` pairs on top.

use crate::anonymization::models::PiiType;
use crate::domain::{AnonymizerError, Result};
use fancy_regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Pattern definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Type name, e.g. `EMAIL` or `PASSPORT`
    pub name: String,
    /// Regular expression source
    pub regex: String,
    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
}

/// Compiled pattern with metadata
#[derive(Debug, Clone)]
pub struct NamedPattern {
    /// Normalized type name
    pub name: String,
    /// Detection type produced by this pattern
    pub pii_type: PiiType,
    /// Compiled expression
    pub regex: Regex,
    /// Human-readable description
    pub description: Option<String>,
}

/// Pattern library container
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    #[serde(default, rename = "pattern")]
    patterns: Vec<PatternDefinition>,
}

/// Ordered catalog of named structural detectors
#[derive(Debug, Clone, Default)]
pub struct PatternCatalog {
    patterns: Vec<NamedPattern>,
}

impl PatternCatalog {
    /// Create a new pattern catalog from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnonymizerError::Configuration(format!(
                "Failed to read pattern library {}: {e}",
                path.display()
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Create a pattern catalog from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibrary = toml::from_str(content).map_err(|e| {
            AnonymizerError::Configuration(format!("Failed to parse pattern library TOML: {e}"))
        })?;

        let mut catalog = Self::default();
        for def in library.patterns {
            catalog.upsert(&def.name, &def.regex, def.description)?;
        }

        tracing::debug!(patterns = catalog.len(), "Pattern catalog loaded");
        Ok(catalog)
    }

    /// Create the default catalog with built-in patterns
    pub fn default_catalog() -> Result<Self> {
        let default_toml = include_str!("../../../../patterns/pii_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// Merge caller-supplied `TYPE -> regex` pairs
    ///
    /// Existing names are overridden in place so their evaluation order is
    /// kept; unknown names are appended.
    pub fn merge_custom(&mut self, custom: &BTreeMap<String, String>) -> Result<()> {
        for (name, regex) in custom {
            self.upsert(name, regex, None)?;
        }
        Ok(())
    }

    /// Load a flat `TYPE -> regex` map from a JSON or TOML file and merge it
    pub fn merge_custom_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnonymizerError::Configuration(format!(
                "Failed to read custom patterns {}: {e}",
                path.display()
            ))
        })?;

        let custom: BTreeMap<String, String> =
            match path.extension().and_then(|ext| ext.to_str()) {
                Some("json") => serde_json::from_str(&content)?,
                _ => toml::from_str(&content)?,
            };

        tracing::info!(
            path = %path.display(),
            count = custom.len(),
            "Loaded custom patterns"
        );
        self.merge_custom(&custom)
    }

    /// Insert or replace a single named pattern
    pub fn upsert(&mut self, name: &str, regex: &str, description: Option<String>) -> Result<()> {
        let name = Self::normalize_name(name)?;
        let compiled = Regex::new(regex)
            .map_err(|e| AnonymizerError::Pattern(format!("Invalid regex in pattern '{name}': {e}")))?;

        let pattern = NamedPattern {
            pii_type: PiiType::normalize(&name),
            name,
            regex: compiled,
            description,
        };

        match self.patterns.iter_mut().find(|p| p.name == pattern.name) {
            Some(existing) => *existing = pattern,
            None => self.patterns.push(pattern),
        }
        Ok(())
    }

    /// Remove a pattern by name, returning whether it existed
    pub fn remove(&mut self, name: &str) -> bool {
        let upper = name.trim().to_uppercase();
        let before = self.patterns.len();
        self.patterns.retain(|p| p.name != upper);
        before != self.patterns.len()
    }

    /// Get all patterns in evaluation order
    pub fn all_patterns(&self) -> &[NamedPattern] {
        &self.patterns
    }

    /// Look up a pattern by name
    pub fn get(&self, name: &str) -> Option<&NamedPattern> {
        let upper = name.trim().to_uppercase();
        self.patterns.iter().find(|p| p.name == upper)
    }

    /// Number of patterns in the catalog
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Upper-case the name and require `[A-Z][A-Z0-9_]*` so placeholders
    /// built from it stay recognizable on restore
    fn normalize_name(name: &str) -> Result<String> {
        let upper = name.trim().to_uppercase();
        let mut chars = upper.chars();
        let valid = matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
            && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');

        if !valid {
            return Err(AnonymizerError::Pattern(format!(
                "Invalid pattern name '{name}': must match [A-Z][A-Z0-9_]*"
            )));
        }
        Ok(upper)
    }
}
