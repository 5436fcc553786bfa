//! Logging and observability
//!
//! Structured logging with:
//! - Configurable log levels, overridable through `RUST_LOG`
//! - Console output on stderr
//! - Optional JSON file logging with rotation
//!
//! Original PII values are never passed to these macros; log counts, types
//! and hashes instead.
//!
//! # Example
//!
//! ```no_run
//! use pii_anonymizer::config::LoggingConfig;
//! use pii_anonymizer::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the outcome of one processed document
///
/// # Example
///
/// ```no_run
/// use pii_anonymizer::log_document_processed;
///
/// log_document_processed!("notes.txt", "anonymize", 4);
/// ```
#[macro_export]
macro_rules! log_document_processed {
    ($path:expr, $action:expr, $detections:expr) => {
        tracing::info!(
            path = %$path,
            action = $action,
            detections = $detections,
            "Document processed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use pii_anonymizer::log_error_with_context;
/// use pii_anonymizer::domain::AnonymizerError;
///
/// let error = AnonymizerError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log batch progress
///
/// # Example
///
/// ```no_run
/// use pii_anonymizer::log_batch_progress;
///
/// log_batch_progress!(10, 40);
/// ```
#[macro_export]
macro_rules! log_batch_progress {
    ($current:expr, $total:expr) => {
        tracing::debug!(
            current = $current,
            total = $total,
            progress_pct = ($current as f64 / $total as f64 * 100.0),
            "Processing batch"
        );
    };
}
