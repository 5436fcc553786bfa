//! Integration tests for document handlers and batch processing

use pii_anonymizer::anonymization::{AnonymizationConfig, AnonymizationEngine};
use pii_anonymizer::documents::{BatchAction, DocumentHandler, DocumentProcessor};
use pii_anonymizer::domain::{AnonymizerError, Result};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const NOTE_HEADER: &str = "-- note --\n";

/// `.note` files: plain text behind a fixed header line
struct NoteHandler;

impl DocumentHandler for NoteHandler {
    fn name(&self) -> &str {
        "note"
    }

    fn can_handle(&self, path: &Path) -> bool {
        path.extension().and_then(|e| e.to_str()) == Some("note")
    }

    fn extract_text(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path)?;
        content
            .strip_prefix(NOTE_HEADER)
            .map(str::to_string)
            .ok_or_else(|| AnonymizerError::Document(format!("Missing header: {}", path.display())))
    }

    fn write_text(&self, path: &Path, text: &str) -> Result<()> {
        fs::write(path, format!("{NOTE_HEADER}{text}"))?;
        Ok(())
    }
}

fn create_processor() -> DocumentProcessor {
    let mut config = AnonymizationConfig::default();
    config.aliases.seed = Some(5);
    let engine = AnonymizationEngine::new(config).expect("Failed to create engine");
    let mut processor = DocumentProcessor::with_default_handlers(engine);
    processor.register_handler(Box::new(NoteHandler));
    processor
}

#[test]
fn test_batch_round_trip_across_processors() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input");
    let anonymized = dir.path().join("anonymized");
    let restored = dir.path().join("restored");
    let mapping = dir.path().join("mapping.json");
    fs::create_dir_all(&input).unwrap();

    let letter = "Dear team,\nGlobex Industries will call (555) 234-5678 on 03/14/2024.\n";
    let memo = format!("{NOTE_HEADER}Forward invoices to billing@globex.io.\n");
    fs::write(input.join("letter.txt"), letter).unwrap();
    fs::write(input.join("memo.note"), &memo).unwrap();

    let mut processor = create_processor();
    let summary = processor
        .process_batch(&input, &anonymized, &mapping, BatchAction::Anonymize)
        .unwrap();
    assert!(summary.is_successful());
    assert_eq!(summary.successful, vec!["letter.txt", "memo.note"]);
    assert!(mapping.exists());

    let anonymized_letter = fs::read_to_string(anonymized.join("letter.txt")).unwrap();
    assert!(!anonymized_letter.contains("(555) 234-5678"));
    let anonymized_memo = fs::read_to_string(anonymized.join("memo.note")).unwrap();
    assert!(anonymized_memo.starts_with(NOTE_HEADER));
    assert!(!anonymized_memo.contains("billing@globex.io"));
    let saved_entries = processor.into_engine().mapping().len();
    assert!(saved_entries >= 3);

    // A fresh processor only knows the mapping file
    let mut restorer = create_processor();
    let summary = restorer
        .process_batch(&anonymized, &restored, &mapping, BatchAction::Restore)
        .unwrap();
    assert_eq!(summary.total(), 2);
    assert_eq!(fs::read_to_string(restored.join("letter.txt")).unwrap(), letter);
    assert_eq!(fs::read_to_string(restored.join("memo.note")).unwrap(), memo);
}

#[test]
fn test_batch_collects_failures() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input");
    let output = dir.path().join("output");
    fs::create_dir_all(&input).unwrap();

    fs::write(input.join("ok.txt"), "Mail ada@example.com").unwrap();
    fs::write(input.join("image.png"), [0u8, 159, 146, 150]).unwrap();
    fs::write(input.join("broken.note"), "no header here").unwrap();

    let mut processor = create_processor();
    let summary = processor
        .process_batch(&input, &output, &dir.path().join("mapping.json"), BatchAction::Anonymize)
        .unwrap();

    assert!(!summary.is_successful());
    assert_eq!(summary.successful, vec!["ok.txt"]);
    assert_eq!(summary.failed, vec!["broken.note", "image.png"]);
    assert!(!output.join("image.png").exists());
}

#[test]
fn test_missing_input_directory_is_document_error() {
    let dir = tempdir().unwrap();
    let mut processor = create_processor();

    let result = processor.process_batch(
        &dir.path().join("absent"),
        &dir.path().join("out"),
        &dir.path().join("mapping.json"),
        BatchAction::Anonymize,
    );
    assert!(matches!(result, Err(AnonymizerError::Document(_))));
}

#[test]
fn test_single_document_round_trip() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("report.md");
    let anonymized = dir.path().join("report.anon.md");
    let restored = dir.path().join("report.restored.md");
    let text = "# Report\n\nMaria Garcia visited 192.168.1.20 at 200 Main Street.\n";
    fs::write(&original, text).unwrap();

    let mut processor = create_processor();
    let detections = processor.anonymize_document(&original, &anonymized).unwrap();
    assert!(detections > 0);
    assert!(!fs::read_to_string(&anonymized)
        .unwrap()
        .contains("192.168.1.20"));

    processor.restore_document(&anonymized, &restored).unwrap();
    assert_eq!(fs::read_to_string(&restored).unwrap(), text);
}

#[test]
fn test_handler_lookup() {
    let processor = create_processor();

    assert_eq!(
        processor.handler_for(Path::new("a.TXT")).map(|h| h.name()),
        Some("text")
    );
    assert_eq!(
        processor.handler_for(Path::new("a.note")).map(|h| h.name()),
        Some("note")
    );
    assert!(processor.handler_for(Path::new("a.docx")).is_none());
}
