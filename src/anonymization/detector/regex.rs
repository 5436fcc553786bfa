//! Pattern-based PII detector

use super::{patterns::PatternCatalog, PiiDetector};
use crate::anonymization::models::{Detection, DetectionMethod};
use crate::domain::{AnonymizerError, Result};
use std::sync::Arc;

/// Runs every catalog pattern over a text
///
/// Patterns are evaluated in catalog order and each contributes all of its
/// non-overlapping matches. Matches from different patterns may overlap; the
/// rewriter decides what survives.
#[derive(Debug, Clone)]
pub struct PatternDetector {
    catalog: Arc<PatternCatalog>,
}

impl PatternDetector {
    /// Create a new detector with the built-in catalog
    pub fn new() -> Result<Self> {
        let catalog = PatternCatalog::default_catalog()?;
        Ok(Self::with_catalog(catalog))
    }

    /// Create a new detector over a custom catalog
    pub fn with_catalog(catalog: PatternCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    /// The catalog in use
    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }
}

impl PiiDetector for PatternDetector {
    fn name(&self) -> &str {
        "pattern"
    }

    fn detect(&self, text: &str) -> Result<Vec<Detection>> {
        let mut detections = Vec::new();

        for pattern in self.catalog.all_patterns() {
            for found in pattern.regex.find_iter(text) {
                let found = found.map_err(|e| {
                    AnonymizerError::Pattern(format!(
                        "Pattern '{}' failed while matching: {e}",
                        pattern.name
                    ))
                })?;

                if found.as_str().is_empty() {
                    continue;
                }

                detections.push(Detection::new(
                    found.as_str(),
                    pattern.pii_type.clone(),
                    found.start(),
                    found.end(),
                    DetectionMethod::Pattern,
                ));
            }
        }

        tracing::trace!(count = detections.len(), "Pattern detection complete");
        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::PiiType;
    use test_case::test_case;

    fn detect(text: &str) -> Vec<Detection> {
        PatternDetector::new().unwrap().detect(text).unwrap()
    }

    fn values_of(detections: &[Detection], pii_type: PiiType) -> Vec<&str> {
        detections
            .iter()
            .filter(|d| d.pii_type == pii_type)
            .map(|d| d.value.as_str())
            .collect()
    }

    #[test_case("Reach me at jane.doe@example.org today", PiiType::Email, "jane.doe@example.org"; "email")]
    #[test_case("SSN 123-45-6789 on file", PiiType::Ssn, "123-45-6789"; "ssn")]
    #[test_case("Card 4111 1111 1111 1111 expired", PiiType::CreditCard, "4111 1111 1111 1111"; "credit card")]
    #[test_case("Server at 192.168.1.10 is down", PiiType::IpAddress, "192.168.1.10"; "ip address")]
    #[test_case("Visit https://www.example.com/path?x=1 now", PiiType::Url, "https://www.example.com/path?x=1"; "url")]
    #[test_case("Met on March 15, 2023 downtown", PiiType::Date, "March 15, 2023"; "written date")]
    #[test_case("Ship to 123 Main Street please", PiiType::Address, "123 Main Street"; "street address")]
    fn test_detects_structural_pii(text: &str, pii_type: PiiType, expected: &str) {
        let detections = detect(text);
        assert!(
            values_of(&detections, pii_type.clone()).contains(&expected),
            "expected {pii_type} '{expected}' in {detections:?}"
        );
    }

    #[test]
    fn test_spans_are_byte_offsets() {
        let text = "Café contact: ana@example.com";
        let detections = detect(text);
        let email = detections
            .iter()
            .find(|d| d.pii_type == PiiType::Email)
            .unwrap();
        assert_eq!(&text[email.start..email.end], "ana@example.com");
        assert_eq!(email.method, DetectionMethod::Pattern);
    }

    #[test]
    fn test_plain_text_has_no_detections() {
        assert!(detect("nothing sensitive here at all").is_empty());
    }

    #[test]
    fn test_custom_catalog() {
        let mut catalog = PatternCatalog::default();
        catalog
            .upsert("EMPLOYEE_ID", r"\bEMP-\d{5}\b", None)
            .unwrap();
        let detector = PatternDetector::with_catalog(catalog);

        let detections = detector.detect("Badge EMP-00421 and EMP-77777").unwrap();
        assert_eq!(detections.len(), 2);
        assert_eq!(
            detections[0].pii_type,
            PiiType::Custom("EMPLOYEE_ID".to_string())
        );
    }
}
