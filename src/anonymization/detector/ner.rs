//! Named entity recognition seam
//!
//! The engine consumes NER output through [`EntityRecognizer`] and never
//! depends on a particular model. [`GazetteerRecognizer`] is the built-in
//! backend: a dictionary of known surface forms loaded from TOML, matched on
//! word boundaries.

use crate::domain::{AnonymizerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A span reported by a recognizer
///
/// `start` and `end` are byte offsets into the analysed text. `label` is the
/// backend's own vocabulary (`PERSON`, `ORG`, `GPE`, ...) and is normalized by
/// the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NerSpan {
    pub text: String,
    pub label: String,
    pub start: usize,
    pub end: usize,
}

/// Trait for pluggable named-entity recognizers
pub trait EntityRecognizer: Send + Sync {
    /// Backend identifier used in logs (e.g. "gazetteer")
    fn name(&self) -> &str;

    /// Recognize entity spans in a text
    fn recognize(&self, text: &str) -> Result<Vec<NerSpan>>;
}

/// One known surface form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GazetteerEntry {
    pub text: String,
    pub label: String,
}

#[derive(Debug, Deserialize)]
struct GazetteerFile {
    #[serde(default, rename = "entity")]
    entities: Vec<GazetteerEntry>,
}

/// Dictionary-backed recognizer
///
/// Entries are matched case-sensitively. Longer entries win when two
/// candidates overlap, so "Acme Corp Europe" beats "Acme Corp".
#[derive(Debug, Clone, Default)]
pub struct GazetteerRecognizer {
    entries: Vec<GazetteerEntry>,
}

impl GazetteerRecognizer {
    /// Build a recognizer from `(text, label)` pairs
    pub fn new<I, S, L>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, L)>,
        S: Into<String>,
        L: Into<String>,
    {
        let mut entries: Vec<GazetteerEntry> = entries
            .into_iter()
            .map(|(text, label)| GazetteerEntry {
                text: text.into(),
                label: label.into(),
            })
            .filter(|entry| !entry.text.trim().is_empty())
            .collect();
        entries.sort_by(|a, b| b.text.len().cmp(&a.text.len()).then(a.text.cmp(&b.text)));
        entries.dedup_by(|a, b| a.text == b.text);

        Self { entries }
    }

    /// Load entries from TOML content with `[[entity]]` tables
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: GazetteerFile = toml::from_str(content)
            .map_err(|e| AnonymizerError::Ner(format!("Failed to parse gazetteer: {e}")))?;

        Ok(Self::new(
            file.entities.into_iter().map(|entry| (entry.text, entry.label)),
        ))
    }

    /// Load entries from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnonymizerError::Ner(format!("Failed to read gazetteer {}: {e}", path.display()))
        })?;

        let recognizer = Self::from_toml(&content)?;
        tracing::info!(
            path = %path.display(),
            entries = recognizer.len(),
            "Loaded gazetteer"
        );
        Ok(recognizer)
    }

    /// Number of distinct entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the gazetteer has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EntityRecognizer for GazetteerRecognizer {
    fn name(&self) -> &str {
        "gazetteer"
    }

    fn recognize(&self, text: &str) -> Result<Vec<NerSpan>> {
        let mut spans: Vec<NerSpan> = Vec::new();

        for entry in &self.entries {
            for (start, matched) in text.match_indices(entry.text.as_str()) {
                let end = start + matched.len();
                if !on_word_boundary(text, start, end) {
                    continue;
                }
                if spans.iter().any(|s| s.start < end && start < s.end) {
                    continue;
                }
                spans.push(NerSpan {
                    text: matched.to_string(),
                    label: entry.label.clone(),
                    start,
                    end,
                });
            }
        }

        spans.sort_by_key(|span| span.start);
        Ok(spans)
    }
}

fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}
