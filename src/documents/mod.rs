//! Document adapters
//!
//! A [`DocumentHandler`] turns a file of some native format into a string
//! and back. The anonymization engine never sees file formats; the
//! [`DocumentProcessor`] picks a handler per file and runs the engine on the
//! extracted text.

pub mod processor;
pub mod text;

pub use processor::{BatchAction, BatchSummary, DocumentProcessor};
pub use text::TextDocumentHandler;

use crate::domain::Result;
use std::path::Path;

/// Format adapter for one family of documents
pub trait DocumentHandler: Send + Sync {
    /// Handler name used in logs
    fn name(&self) -> &str;

    /// Whether this handler understands the file, judged from its path
    fn can_handle(&self, path: &Path) -> bool;

    /// Read the document as plain text
    fn extract_text(&self, path: &Path) -> Result<String>;

    /// Write plain text back in this handler's format
    fn write_text(&self, path: &Path, text: &str) -> Result<()>;
}
