//! Detection reporting
//!
//! A report aggregates what would be anonymized across documents without
//! rewriting anything: counts per type, masked samples and warnings.

use crate::anonymization::models::Detection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const MAX_SAMPLES: usize = 20;
const SAMPLES_PER_DOCUMENT: usize = 3;

/// Detection report across one or more documents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionReport {
    /// Total documents analyzed
    pub total_documents: usize,

    /// Total detections
    pub total_detections: usize,

    /// Detections by type label
    pub detections_by_type: BTreeMap<String, usize>,

    /// Masked examples
    pub samples: Vec<DetectionSample>,

    /// Problems met while scanning
    pub warnings: Vec<String>,

    /// Processing statistics
    pub stats: ProcessingStats,
}

/// Masked example of one detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionSample {
    pub document: String,
    pub pii_type: String,
    /// First and last character only
    pub masked_value: String,
    pub start: usize,
    pub end: usize,
}

/// Processing statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub avg_processing_time_ms: u64,
    pub total_processing_time_ms: u64,
    pub documents_with_pii: usize,
    pub documents_without_pii: usize,
}

impl DetectionReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the detections of one document
    pub fn add_document(&mut self, document: &str, detections: &[Detection], processing_time_ms: u64) {
        self.total_documents += 1;
        self.stats.total_processing_time_ms += processing_time_ms;

        if detections.is_empty() {
            self.stats.documents_without_pii += 1;
        } else {
            self.stats.documents_with_pii += 1;
            self.total_detections += detections.len();

            for detection in detections {
                *self
                    .detections_by_type
                    .entry(detection.pii_type.to_string())
                    .or_insert(0) += 1;
            }

            for detection in detections.iter().take(SAMPLES_PER_DOCUMENT) {
                if self.samples.len() >= MAX_SAMPLES {
                    break;
                }
                self.samples.push(DetectionSample {
                    document: document.to_string(),
                    pii_type: detection.pii_type.to_string(),
                    masked_value: mask_value(&detection.value),
                    start: detection.start,
                    end: detection.end,
                });
            }
        }

        self.stats.avg_processing_time_ms =
            self.stats.total_processing_time_ms / self.total_documents as u64;
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Format report for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                    PII DETECTION REPORT                       \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n\n");

        output.push_str("SUMMARY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!(
            "  Documents Analyzed:     {}\n",
            self.total_documents
        ));
        output.push_str(&format!(
            "  Documents with PII:     {}\n",
            self.stats.documents_with_pii
        ));
        output.push_str(&format!(
            "  Documents without PII:  {}\n",
            self.stats.documents_without_pii
        ));
        output.push_str(&format!(
            "  Total Detections:       {}\n",
            self.total_detections
        ));
        output.push_str(&format!(
            "  Avg Processing Time:    {} ms\n\n",
            self.stats.avg_processing_time_ms
        ));

        if !self.detections_by_type.is_empty() {
            output.push_str("DETECTIONS BY TYPE\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");

            let mut types: Vec<_> = self.detections_by_type.iter().collect();
            types.sort_by(|a, b| b.1.cmp(a.1));

            for (pii_type, count) in types {
                output.push_str(&format!("  {pii_type:30} {count:>5}\n"));
            }
            output.push('\n');
        }

        if !self.samples.is_empty() {
            output.push_str("SAMPLES\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for sample in self.samples.iter().take(10) {
                output.push_str(&format!(
                    "  {:14} {:24} [{}..{}] {}\n",
                    sample.pii_type, sample.masked_value, sample.start, sample.end, sample.document
                ));
            }
            output.push('\n');
        }

        if !self.warnings.is_empty() {
            output.push_str("WARNINGS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for warning in &self.warnings {
                output.push_str(&format!("  • {warning}\n"));
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output
    }

    /// Format report as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write report to file
    pub fn write_to_file(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = self.format_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

/// Keep the first and last character, star the rest
fn mask_value(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    match chars.len() {
        0 => String::new(),
        1 | 2 => "*".repeat(chars.len()),
        n => {
            let mut masked = String::with_capacity(value.len());
            masked.push(chars[0]);
            masked.push_str(&"*".repeat(n - 2));
            masked.push(chars[n - 1]);
            masked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::{DetectionMethod, PiiType};

    fn email(value: &str) -> Detection {
        Detection::new(value, PiiType::Email, 0, value.len(), DetectionMethod::Pattern)
    }

    #[test]
    fn test_add_document_without_pii() {
        let mut report = DetectionReport::new();
        report.add_document("a.txt", &[], 10);

        assert_eq!(report.total_documents, 1);
        assert_eq!(report.total_detections, 0);
        assert_eq!(report.stats.documents_without_pii, 1);
        assert_eq!(report.stats.avg_processing_time_ms, 10);
    }

    #[test]
    fn test_add_document_with_pii() {
        let mut report = DetectionReport::new();
        report.add_document("a.txt", &[email("john@example.com")], 15);
        report.add_document("b.txt", &[email("jane@example.com")], 5);

        assert_eq!(report.total_detections, 2);
        assert_eq!(report.detections_by_type.get("EMAIL"), Some(&2));
        assert_eq!(report.stats.avg_processing_time_ms, 10);
        assert_eq!(report.samples[0].masked_value, "j**************m");
    }

    #[test]
    fn test_samples_are_capped() {
        let mut report = DetectionReport::new();
        let detections: Vec<Detection> = (0..5).map(|i| email(&format!("u{i}@x.io"))).collect();
        for doc in 0..10 {
            report.add_document(&format!("{doc}.txt"), &detections, 1);
        }
        assert_eq!(report.samples.len(), MAX_SAMPLES);
        assert_eq!(report.total_detections, 50);
    }

    #[test]
    fn test_format_console() {
        let mut report = DetectionReport::new();
        report.add_document("a.txt", &[email("john@example.com")], 3);
        report.add_warning("b.txt: unreadable".to_string());

        let output = report.format_console();
        assert!(output.contains("PII DETECTION REPORT"));
        assert!(output.contains("Documents Analyzed:     1"));
        assert!(output.contains("EMAIL"));
        assert!(output.contains("b.txt: unreadable"));
        assert!(!output.contains("john@example.com"));
    }

    #[test]
    fn test_mask_value() {
        assert_eq!(mask_value("ab"), "**");
        assert_eq!(mask_value("Lisbon"), "L****n");
        assert_eq!(mask_value(""), "");
    }
}
