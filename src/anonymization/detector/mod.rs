//! PII detection module
//!
//! Structural PII comes from the pattern catalog ([`PatternDetector`]);
//! named entities come from the staged [`EntityClassifier`], optionally fed by
//! an external [`EntityRecognizer`].

pub mod entities;
pub mod ner;
pub mod patterns;
pub mod regex;

pub use entities::{ClaimedSpans, EntityClassifier};
pub use ner::{EntityRecognizer, GazetteerRecognizer, NerSpan};
pub use patterns::{NamedPattern, PatternCatalog};
pub use regex::PatternDetector;

use crate::anonymization::models::Detection;
use crate::domain::Result;

/// Trait for PII detection implementations
pub trait PiiDetector: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Detect PII in a text, returning byte-offset spans
    fn detect(&self, text: &str) -> Result<Vec<Detection>>;
}
