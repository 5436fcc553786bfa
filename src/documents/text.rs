//! Plain text documents

use super::DocumentHandler;
use crate::domain::{AnonymizerError, Result};
use std::fs;
use std::path::Path;

const EXTENSIONS: &[&str] = &["txt", "text", "md", "csv", "tsv"];

/// Handler for plain text, markdown and delimited text files
///
/// Files are read as UTF-8 and fall back to Latin-1 when that fails. Output
/// is always UTF-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextDocumentHandler;

impl TextDocumentHandler {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentHandler for TextDocumentHandler {
    fn name(&self) -> &str {
        "text"
    }

    fn can_handle(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
    }

    fn extract_text(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).map_err(|e| {
            AnonymizerError::Document(format!("Failed to read {}: {e}", path.display()))
        })?;

        match String::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(e) => {
                tracing::debug!(path = %path.display(), "Not valid UTF-8, decoding as Latin-1");
                Ok(decode_latin1(e.as_bytes()))
            }
        }
    }

    fn write_text(&self, path: &Path, text: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, text).map_err(|e| {
            AnonymizerError::Document(format!("Failed to write {}: {e}", path.display()))
        })
    }
}

/// Every byte maps to the code point of the same value
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use test_case::test_case;

    #[test_case("notes.txt", true ; "txt")]
    #[test_case("README.MD", true ; "uppercase markdown")]
    #[test_case("export.csv", true ; "csv")]
    #[test_case("table.tsv", true ; "tsv")]
    #[test_case("report.pdf", false ; "pdf")]
    #[test_case("Makefile", false ; "no extension")]
    fn test_can_handle(name: &str, expected: bool) {
        assert_eq!(TextDocumentHandler::new().can_handle(Path::new(name)), expected);
    }

    #[test]
    fn test_round_trip_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("a.txt");
        let handler = TextDocumentHandler::new();

        handler.write_text(&path, "Zoë in Zürich").unwrap();
        assert_eq!(handler.extract_text(&path).unwrap(), "Zoë in Zürich");
    }

    #[test]
    fn test_latin1_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("legacy.txt");
        fs::write(&path, [b'Z', b'o', 0xEB]).unwrap();

        let text = TextDocumentHandler::new().extract_text(&path).unwrap();
        assert_eq!(text, "Zoë");
    }

    #[test]
    fn test_missing_file_is_document_error() {
        let err = TextDocumentHandler::new()
            .extract_text(Path::new("/nonexistent/file.txt"))
            .unwrap_err();
        assert!(matches!(err, AnonymizerError::Document(_)));
    }
}
