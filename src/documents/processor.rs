//! Document processing
//!
//! Routes files to the first handler that accepts them and runs the engine
//! on their text, one file or one directory at a time.

use super::{DocumentHandler, TextDocumentHandler};
use crate::anonymization::AnonymizationEngine;
use crate::domain::{AnonymizerError, Result};
use std::path::Path;
use std::time::{Duration, Instant};

/// What a batch does to each file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchAction {
    Anonymize,
    Restore,
}

impl std::fmt::Display for BatchAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchAction::Anonymize => write!(f, "anonymize"),
            BatchAction::Restore => write!(f, "restore"),
        }
    }
}

/// Outcome of a batch
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// File names processed successfully
    pub successful: Vec<String>,

    /// File names that failed or had no handler
    pub failed: Vec<String>,

    /// Duration of the batch
    pub duration: Duration,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total files attempted
    pub fn total(&self) -> usize {
        self.successful.len() + self.failed.len()
    }

    /// Check if every file succeeded
    pub fn is_successful(&self) -> bool {
        self.failed.is_empty()
    }

    /// Log the summary
    pub fn log_summary(&self, action: BatchAction) {
        tracing::info!(
            action = %action,
            total = self.total(),
            successful = self.successful.len(),
            failed = self.failed.len(),
            duration_ms = self.duration.as_millis() as u64,
            "Batch completed"
        );

        if !self.failed.is_empty() {
            tracing::warn!(failed = ?self.failed, "Batch completed with failures");
        }
    }
}

/// Runs the engine over documents through registered handlers
pub struct DocumentProcessor {
    engine: AnonymizationEngine,
    handlers: Vec<Box<dyn DocumentHandler>>,
}

impl DocumentProcessor {
    /// Create a processor with no handlers
    pub fn new(engine: AnonymizationEngine) -> Self {
        Self {
            engine,
            handlers: Vec::new(),
        }
    }

    /// Create a processor with the built-in handlers
    pub fn with_default_handlers(engine: AnonymizationEngine) -> Self {
        let mut processor = Self::new(engine);
        processor.register_handler(Box::new(TextDocumentHandler::new()));
        processor
    }

    /// Register a handler; earlier registrations win
    pub fn register_handler(&mut self, handler: Box<dyn DocumentHandler>) {
        tracing::debug!(handler = handler.name(), "Registered document handler");
        self.handlers.push(handler);
    }

    /// First handler accepting `path`
    pub fn handler_for(&self, path: &Path) -> Option<&dyn DocumentHandler> {
        let handler = self
            .handlers
            .iter()
            .find(|h| h.can_handle(path))
            .map(|h| h.as_ref());
        if handler.is_none() {
            tracing::warn!(path = %path.display(), "No handler found");
        }
        handler
    }

    /// Anonymize one document into `output_path`
    ///
    /// Returns the number of detections.
    pub fn anonymize_document(&mut self, input_path: &Path, output_path: &Path) -> Result<usize> {
        let handler = self.require_handler(input_path)?;
        let text = handler.extract_text(input_path)?;

        let document_id = input_path.display().to_string();
        let result = self.engine.anonymize_with_details(&document_id, &text)?;

        let handler = self.require_handler(input_path)?;
        handler.write_text(output_path, &result.anonymized)?;

        crate::log_document_processed!(
            input_path.display(),
            "anonymize",
            result.total_detections()
        );
        Ok(result.total_detections())
    }

    /// Restore one anonymized document into `output_path`
    pub fn restore_document(&self, anonymized_path: &Path, output_path: &Path) -> Result<()> {
        let handler = self.require_handler(anonymized_path)?;
        let text = handler.extract_text(anonymized_path)?;
        handler.write_text(output_path, &self.engine.restore_text(&text))?;

        crate::log_document_processed!(anonymized_path.display(), "restore", 0);
        Ok(())
    }

    /// Process every regular file directly inside `input_dir`
    ///
    /// Output files keep their names. A restore batch loads the mapping
    /// first when the file exists; an anonymize batch saves it at the end.
    /// Failures of single files are collected, not raised.
    pub fn process_batch(
        &mut self,
        input_dir: &Path,
        output_dir: &Path,
        mapping_path: &Path,
        action: BatchAction,
    ) -> Result<BatchSummary> {
        let start = Instant::now();
        std::fs::create_dir_all(output_dir)?;

        if action == BatchAction::Restore && mapping_path.exists() {
            self.engine.load_mapping(mapping_path)?;
        }

        let mut entries: Vec<_> = std::fs::read_dir(input_dir)
            .map_err(|e| {
                AnonymizerError::Document(format!(
                    "Failed to read directory {}: {e}",
                    input_dir.display()
                ))
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .collect();
        entries.sort();

        let total = entries.len();
        let mut summary = BatchSummary::new();
        for (index, input_path) in entries.iter().enumerate() {
            crate::log_batch_progress!(index + 1, total);

            let Some(file_name) = input_path.file_name() else {
                continue;
            };
            let output_path = output_dir.join(file_name);
            let name = file_name.to_string_lossy().to_string();

            let outcome = match action {
                BatchAction::Anonymize => self.anonymize_document(input_path, &output_path).map(|_| ()),
                BatchAction::Restore => self.restore_document(input_path, &output_path),
            };

            match outcome {
                Ok(()) => summary.successful.push(name),
                Err(e) => {
                    crate::log_error_with_context!(&e, "Document processing failed");
                    summary.failed.push(name);
                }
            }
        }

        if action == BatchAction::Anonymize {
            self.engine.save_mapping(mapping_path)?;
        }

        summary.duration = start.elapsed();
        summary.log_summary(action);
        Ok(summary)
    }

    fn require_handler(&self, path: &Path) -> Result<&dyn DocumentHandler> {
        self.handler_for(path).ok_or_else(|| {
            AnonymizerError::Document(format!("Unsupported document type: {}", path.display()))
        })
    }

    pub fn engine(&self) -> &AnonymizationEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut AnonymizationEngine {
        &mut self.engine
    }

    /// Give the engine back, with its mapping
    pub fn into_engine(self) -> AnonymizationEngine {
        self.engine
    }
}
