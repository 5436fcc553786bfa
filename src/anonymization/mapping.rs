//! Two-way mapping between original values and placeholders
//!
//! The on-disk form is a JSON document with two maps, `pii_to_placeholder`
//! and `placeholder_to_pii`, kept as exact inverses of each other.

use crate::domain::{AnonymizerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Forward and reverse placeholder maps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PiiMapping {
    #[serde(rename = "pii_to_placeholder")]
    forward: BTreeMap<String, String>,
    #[serde(rename = "placeholder_to_pii")]
    reverse: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RawMapping {
    #[serde(default)]
    pii_to_placeholder: BTreeMap<String, String>,
    #[serde(default)]
    placeholder_to_pii: BTreeMap<String, String>,
}

impl PiiMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new pair
    ///
    /// Fails if either side is already bound to something else, which would
    /// break the inverse relationship.
    pub fn insert(&mut self, original: &str, placeholder: &str) -> Result<()> {
        if let Some(existing) = self.forward.get(original) {
            if existing == placeholder {
                return Ok(());
            }
            return Err(AnonymizerError::Mapping(format!(
                "Value already mapped to {existing}"
            )));
        }
        if self.reverse.contains_key(placeholder) {
            return Err(AnonymizerError::Mapping(format!(
                "Placeholder {placeholder} already in use"
            )));
        }

        self.forward
            .insert(original.to_string(), placeholder.to_string());
        self.reverse
            .insert(placeholder.to_string(), original.to_string());
        Ok(())
    }

    /// Placeholder assigned to an original value
    pub fn placeholder_for(&self, original: &str) -> Option<&str> {
        self.forward.get(original).map(String::as_str)
    }

    /// Original value behind a placeholder
    pub fn original_for(&self, placeholder: &str) -> Option<&str> {
        self.reverse.get(placeholder).map(String::as_str)
    }

    pub fn contains_placeholder(&self, placeholder: &str) -> bool {
        self.reverse.contains_key(placeholder)
    }

    /// Number of unique original values
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn clear(&mut self) {
        self.forward.clear();
        self.reverse.clear();
    }

    /// Iterate `(original, placeholder)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.forward.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate placeholders
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.reverse.keys().map(String::as_str)
    }

    /// Parse a mapping document
    ///
    /// Missing maps default to empty. When only one side is present the other
    /// is rebuilt from it; two sides that disagree are rejected.
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: RawMapping = serde_json::from_str(content)?;

        match (
            raw.pii_to_placeholder.is_empty(),
            raw.placeholder_to_pii.is_empty(),
        ) {
            (true, true) => Ok(Self::default()),
            (false, true) => {
                tracing::warn!("Mapping file has no reverse map, rebuilding it");
                Self::from_pairs(raw.pii_to_placeholder)
            }
            (true, false) => {
                tracing::warn!("Mapping file has no forward map, rebuilding it");
                Self::from_pairs(raw.placeholder_to_pii.into_iter().map(|(p, o)| (o, p)))
            }
            (false, false) => {
                let mapping = Self {
                    forward: raw.pii_to_placeholder,
                    reverse: raw.placeholder_to_pii,
                };
                mapping.check_inverse()?;
                Ok(mapping)
            }
        }
    }

    fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Result<Self> {
        let mut mapping = Self::default();
        for (original, placeholder) in pairs {
            mapping.insert(&original, &placeholder)?;
        }
        Ok(mapping)
    }

    fn check_inverse(&self) -> Result<()> {
        let consistent = self.forward.len() == self.reverse.len()
            && self
                .forward
                .iter()
                .all(|(original, placeholder)| self.reverse.get(placeholder) == Some(original));

        if consistent {
            Ok(())
        } else {
            Err(AnonymizerError::Mapping(
                "pii_to_placeholder and placeholder_to_pii are not inverses".to_string(),
            ))
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a mapping file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnonymizerError::Mapping(format!(
                "Failed to read mapping file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&content)
    }

    /// Write the mapping file atomically
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        file.write_all(self.to_json()?.as_bytes())?;
        file.flush()?;
        file.persist(path).map_err(|e| {
            AnonymizerError::Mapping(format!(
                "Failed to write mapping file {}: {}",
                path.display(),
                e.error
            ))
        })?;
        Ok(())
    }
}
