//! Reversible PII anonymization
//!
//! This module detects personal and business-sensitive values in free-form
//! text, replaces each unique value with a stable placeholder and restores
//! the originals later from the recorded mapping.
//!
//! # Architecture
//!
//! The pipeline consists of:
//! - **Detection**: the pattern catalog plus the staged entity classifier
//! - **Allocation**: opaque `<TYPE_xxxxxxxx>` tokens or semantic aliases
//! - **Rewriting**: global substitution and right-to-left restoration
//! - **Audit**: structured logging with hashed PII values
//!
//! # Usage
//!
//! ```rust,ignore
//! use pii_anonymizer::anonymization::{AnonymizationConfig, AnonymizationEngine};
//!
//! let mut engine = AnonymizationEngine::new(AnonymizationConfig::default())?;
//! let anonymized = engine.anonymize_text("Contact Maria Garcia at maria@acme.io")?;
//! let restored = engine.restore_text(&anonymized);
//! ```

pub mod anonymizer;
pub mod audit;
pub mod config;
pub mod detector;
pub mod engine;
pub mod mapping;
pub mod models;
pub mod report;
pub mod rewriter;

// Re-export main types
pub use config::AnonymizationConfig;
pub use engine::AnonymizationEngine;
pub use mapping::PiiMapping;
pub use models::{AllocatedDetection, AnonymizedText, Detection, DetectionMethod, PiiType};
pub use report::DetectionReport;
