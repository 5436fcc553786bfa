//! Main anonymization engine
//!
//! This module provides the [`AnonymizationEngine`], the session object that
//! owns the placeholder mapping and runs detect, tokenize and restore over
//! free-form text.
//!
//! # Architecture
//!
//! The engine coordinates five components:
//! - **Pattern detector**: structural PII from the pattern catalog
//! - **Entity classifier**: names, organizations, products and places
//! - **Placeholder allocator**: one stable placeholder per unique value
//! - **Rewriter**: global substitution and right-to-left restoration
//! - **Audit logger**: records anonymize calls with hashed values
//!
//! # Examples
//!
//! ```no_run
//! use pii_anonymizer::anonymization::{AnonymizationConfig, AnonymizationEngine};
//!
//! # fn example() -> pii_anonymizer::domain::Result<()> {
//! let mut engine = AnonymizationEngine::new(AnonymizationConfig::default())?;
//!
//! let text = "Write to jane.doe@example.com before 01/15/2025.";
//! let anonymized = engine.anonymize_text(text)?;
//! assert!(!anonymized.contains("jane.doe@example.com"));
//!
//! assert_eq!(engine.restore_text(&anonymized), text);
//! # Ok(())
//! # }
//! ```

use crate::anonymization::{
    anonymizer::PlaceholderAllocator,
    audit::AuditLogger,
    config::AnonymizationConfig,
    detector::{
        EntityClassifier, EntityRecognizer, GazetteerRecognizer, PatternCatalog, PatternDetector,
        PiiDetector,
    },
    mapping::PiiMapping,
    models::{AllocatedDetection, AnonymizedText, Detection, DetectionMethod},
    rewriter::{self, Restorer},
};
use crate::domain::{AnonymizerError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Key of the overall count in [`AnonymizationEngine::statistics`]
pub const TOTAL_KEY: &str = "TOTAL";

/// Type reported for placeholders whose shape is not recognized
pub const UNKNOWN_TYPE: &str = "UNKNOWN";

/// Document id used when the caller does not name one
const INLINE_DOCUMENT: &str = "inline";

/// Anonymization session
///
/// Owns the forward and reverse placeholder maps and the alias allocator
/// state. The same value always receives the same placeholder for the
/// lifetime of the engine, and across a save/load of its mapping.
///
/// # Concurrency
///
/// Not designed for concurrent mutation. Give each worker or session its own
/// engine instead of sharing one; alias uniqueness is only defined relative
/// to a single engine's state.
pub struct AnonymizationEngine {
    config: AnonymizationConfig,
    patterns: PatternDetector,
    entities: Option<EntityClassifier>,
    allocator: PlaceholderAllocator,
    mapping: PiiMapping,
    restorer: Restorer,
    audit_logger: Option<AuditLogger>,
}

impl AnonymizationEngine {
    /// Create a new anonymization engine
    ///
    /// Builds the pattern catalog (embedded default or `pattern_library`,
    /// then custom patterns merged on top), the entity classifier when
    /// `use_ner` is set, and the audit logger when enabled.
    ///
    /// An unreadable gazetteer only disables the recognizer stage and logs a
    /// warning; the heuristic entity stages and the pattern catalog still run.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration validation fails
    /// - The pattern library or a custom pattern cannot be loaded or compiled
    /// - The audit log cannot be created
    pub fn new(config: AnonymizationConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| AnonymizerError::Configuration(format!("{e:#}")))?;

        let detection = &config.detection;
        let mut catalog = match detection.pattern_library {
            Some(ref path) => PatternCatalog::from_file(path)?,
            None => PatternCatalog::default_catalog()?,
        };
        if let Some(ref path) = detection.custom_patterns_file {
            catalog.merge_custom_file(path)?;
        }
        catalog.merge_custom(&detection.custom_patterns)?;

        let entities = if detection.use_ner {
            let classifier = EntityClassifier::new()?;
            Some(match detection.gazetteer {
                Some(ref path) => match GazetteerRecognizer::from_file(path) {
                    Ok(recognizer) => classifier.with_recognizer(Arc::new(recognizer)),
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            "Gazetteer unavailable, entity recognizer disabled"
                        );
                        classifier
                    }
                },
                None => classifier,
            })
        } else {
            None
        };

        let audit_logger = if config.audit.enabled {
            let logger = AuditLogger::new(
                config.audit.log_path.clone(),
                config.audit.json_format,
                true,
            )
            .map_err(|e| AnonymizerError::Io(format!("{e:#}")))?;
            Some(logger)
        } else {
            None
        };

        tracing::debug!(
            patterns = catalog.len(),
            entities = entities.is_some(),
            semantic_aliases = config.aliases.semantic,
            "Anonymization engine initialized"
        );

        Ok(Self {
            allocator: PlaceholderAllocator::new(&config.aliases),
            patterns: PatternDetector::with_catalog(catalog),
            entities,
            mapping: PiiMapping::new(),
            restorer: Restorer::new()?,
            audit_logger,
            config,
        })
    }

    /// Attach an external named-entity recognizer
    ///
    /// The recognizer runs as the first entity stage. Has no effect when
    /// entity detection is disabled in the configuration.
    pub fn with_recognizer(mut self, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        match self.entities.take() {
            Some(classifier) => self.entities = Some(classifier.with_recognizer(recognizer)),
            None => tracing::debug!(
                recognizer = recognizer.name(),
                "Entity detection disabled, recognizer ignored"
            ),
        }
        self
    }

    /// Detect PII without allocating placeholders
    ///
    /// Pattern detections come first, in catalog order, followed by entity
    /// detections. Entity values shorter than two characters after trimming
    /// are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`AnonymizerError::Ner`] if the recognizer fails and
    /// [`AnonymizerError::Pattern`] if a pattern fails while matching.
    pub fn detect(&self, text: &str) -> Result<Vec<Detection>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut detections = self.patterns.detect(text)?;

        if let Some(ref classifier) = self.entities {
            detections.extend(
                classifier
                    .classify(text)?
                    .into_iter()
                    .filter(|d| d.value.trim().chars().count() >= 2),
            );
        }

        Ok(detections)
    }

    /// Detect PII and allocate a placeholder for every detected value
    pub fn detect_and_allocate(&mut self, text: &str) -> Result<Vec<AllocatedDetection>> {
        let detections = self.detect(text)?;
        let mut allocated = Vec::with_capacity(detections.len());

        for detection in detections {
            let placeholder = self.allocator.allocate(
                &detection.value,
                &detection.pii_type,
                text,
                &mut self.mapping,
            )?;
            allocated.push(AllocatedDetection {
                detection,
                placeholder,
            });
        }

        Ok(allocated)
    }

    /// Anonymize a text
    ///
    /// Every literal occurrence of each detected value is replaced with its
    /// placeholder. See [`rewriter::substitute`] for ordering rules.
    pub fn anonymize_text(&mut self, text: &str) -> Result<String> {
        Ok(self.anonymize_with_details(INLINE_DOCUMENT, text)?.anonymized)
    }

    /// Anonymize a text and report what was replaced
    ///
    /// Writes one audit record when audit logging is enabled.
    pub fn anonymize_with_details(
        &mut self,
        document_id: &str,
        text: &str,
    ) -> Result<AnonymizedText> {
        let start = Instant::now();

        let allocated = self.detect_and_allocate(text)?;
        let replacements: Vec<(String, String)> = allocated
            .iter()
            .map(|a| (a.detection.value.clone(), a.placeholder.clone()))
            .collect();
        let anonymized = rewriter::substitute(text, &replacements);

        let result = AnonymizedText::new(
            document_id.to_string(),
            anonymized,
            allocated,
            start.elapsed().as_millis() as u64,
        );

        if let Some(ref logger) = self.audit_logger {
            logger
                .log_anonymization(&result)
                .map_err(|e| AnonymizerError::Io(format!("{e:#}")))?;
        }

        tracing::debug!(
            document_id,
            detections = result.total_detections(),
            processing_time_ms = result.processing_time_ms,
            "Text anonymized"
        );

        Ok(result)
    }

    /// Restore original values in an anonymized text
    ///
    /// Placeholder-shaped tokens missing from the mapping are left as they
    /// are.
    pub fn restore_text(&self, text: &str) -> String {
        self.restorer.restore(text, &self.mapping)
    }

    /// Anonymize every string inside a JSON value
    ///
    /// Numbers, booleans and null pass through unchanged, as do object keys.
    pub fn anonymize_value(&mut self, value: &Value) -> Result<Value> {
        Ok(match value {
            Value::String(s) => Value::String(self.anonymize_text(s)?),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.anonymize_value(item))
                    .collect::<Result<_>>()?,
            ),
            Value::Object(map) => {
                let mut out = serde_json::Map::with_capacity(map.len());
                for (key, val) in map {
                    out.insert(key.clone(), self.anonymize_value(val)?);
                }
                Value::Object(out)
            }
            other => other.clone(),
        })
    }

    /// Restore every string inside a JSON value
    pub fn restore_value(&self, value: &Value) -> Value {
        match value {
            Value::String(s) => Value::String(self.restore_text(s)),
            Value::Array(items) => {
                Value::Array(items.iter().map(|item| self.restore_value(item)).collect())
            }
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, val)| (key.clone(), self.restore_value(val)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Current mapping
    pub fn mapping(&self) -> &PiiMapping {
        &self.mapping
    }

    /// Persist the mapping
    pub fn save_mapping<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.mapping.save(path)?;
        tracing::info!(
            path = %path.display(),
            entries = self.mapping.len(),
            "Mapping saved"
        );
        Ok(())
    }

    /// Replace the in-memory mapping with a persisted one
    ///
    /// Alias counters are not restored; new aliases are still checked
    /// against every placeholder in the loaded mapping.
    pub fn load_mapping<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.mapping = PiiMapping::load(path)?;
        tracing::info!(
            path = %path.display(),
            entries = self.mapping.len(),
            "Mapping loaded"
        );
        Ok(())
    }

    /// Count of mapped values per type, plus [`TOTAL_KEY`]
    ///
    /// Types come from the placeholder shapes; the per-type counts always
    /// sum to the total.
    pub fn statistics(&self) -> BTreeMap<String, usize> {
        let mut stats = BTreeMap::new();
        for placeholder in self.mapping.placeholders() {
            let pii_type = self
                .allocator
                .placeholder_type(placeholder)
                .unwrap_or_else(|| UNKNOWN_TYPE.to_string());
            *stats.entry(pii_type).or_insert(0) += 1;
        }
        stats.insert(TOTAL_KEY.to_string(), self.mapping.len());
        stats
    }

    /// Drop the mapping and the allocator state
    pub fn clear(&mut self) {
        self.mapping.clear();
        self.allocator.reset();
    }

    /// Whether the entity classifier runs
    pub fn entities_enabled(&self) -> bool {
        self.entities.is_some()
    }

    /// Number of detections found by a given method in a text
    pub fn count_by_method(&self, text: &str, method: DetectionMethod) -> Result<usize> {
        Ok(self
            .detect(text)?
            .iter()
            .filter(|d| d.method == method)
            .count())
    }

    /// Engine configuration
    pub fn config(&self) -> &AnonymizationConfig {
        &self.config
    }
}
