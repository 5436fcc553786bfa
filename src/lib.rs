// PII Anonymizer - Reversible PII anonymization for documents
// Copyright (c) 2025 PII Anonymizer Contributors
// Licensed under the MIT License

//! # PII Anonymizer
//!
//! Detects personally identifiable information in free-form text, replaces
//! each unique value with a consistent placeholder and restores the
//! originals later from a persisted mapping.
//!
//! ## Overview
//!
//! This library provides:
//! - **Detection** of structured identifiers (email, phone, SSN, card
//!   numbers, IP addresses, dates, addresses, URLs, amounts) from a pattern
//!   catalog, plus names, organizations, products and places from a staged
//!   entity classifier
//! - **Placeholders**: opaque `<EMAIL_1a2b3c4d>` tokens or readable aliases
//!   such as `NEXUS_GROUP` and `JANE_LEE`
//! - **Round trips**: `restore(anonymize(text)) == text` for one session or
//!   across a saved mapping
//!
//! ## Architecture
//!
//! - [`anonymization`] - The detect, tokenize and restore engine
//! - [`documents`] - Document handlers and batch processing
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration management
//! - [`domain`] - Error types
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pii_anonymizer::anonymization::{AnonymizationConfig, AnonymizationEngine};
//!
//! # fn main() -> pii_anonymizer::domain::Result<()> {
//! let mut engine = AnonymizationEngine::new(AnonymizationConfig::default())?;
//!
//! let text = "Contact John Smith at john.smith@example.com or (555) 123-4567.";
//! let anonymized = engine.anonymize_text(text)?;
//! engine.save_mapping("mapping.json")?;
//!
//! assert_eq!(engine.restore_text(&anonymized), text);
//! # Ok(())
//! # }
//! ```
//!
//! ## Documents
//!
//! ```rust,no_run
//! use pii_anonymizer::anonymization::{AnonymizationConfig, AnonymizationEngine};
//! use pii_anonymizer::documents::{BatchAction, DocumentProcessor};
//! use std::path::Path;
//!
//! # fn main() -> pii_anonymizer::domain::Result<()> {
//! let engine = AnonymizationEngine::new(AnonymizationConfig::default())?;
//! let mut processor = DocumentProcessor::with_default_handlers(engine);
//!
//! let summary = processor.process_batch(
//!     Path::new("docs"),
//!     Path::new("anonymized"),
//!     Path::new("mapping.json"),
//!     BatchAction::Anonymize,
//! )?;
//! println!("Processed: {}, Failed: {}", summary.successful.len(), summary.failed.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Library operations return [`domain::Result`] with [`domain::AnonymizerError`].
//! Substitution and restoration never fail; errors come from configuration,
//! the entity recognizer, the mapping store and document I/O.

pub mod anonymization;
pub mod cli;
pub mod config;
pub mod documents;
pub mod domain;
pub mod logging;
