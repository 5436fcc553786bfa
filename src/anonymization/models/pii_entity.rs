//! PII entity data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// PII type tag
///
/// The canonical vocabulary is closed; callers extend it through named
/// custom patterns, which surface as [`PiiType::Custom`]. Labels coming from
/// outside (NER backends, pattern libraries) go through [`PiiType::normalize`]
/// so that `PERSON`, `PER` and `NAME` all land on the same tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum PiiType {
    /// Email addresses
    Email,
    /// Telephone numbers
    Phone,
    /// Social Security Numbers and look-alike identifiers
    Ssn,
    /// Payment card numbers
    CreditCard,
    /// IPv4 addresses
    IpAddress,
    /// Calendar dates, months and years
    Date,
    /// Street addresses
    Address,
    /// Web URLs
    Url,
    /// Currency amounts
    Currency,
    /// Person names
    Name,
    /// Companies, institutions, tickers
    Organization,
    /// Product names
    Product,
    /// Places
    Location,
    /// Caller-defined type from a custom pattern
    Custom(String),
}

/// Synonym table applied before falling back to a custom type.
const LABEL_SYNONYMS: &[(&str, PiiType)] = &[
    ("PERSON", PiiType::Name),
    ("PER", PiiType::Name),
    ("PERSON_NAME", PiiType::Name),
    ("ORG", PiiType::Organization),
    ("COMPANY", PiiType::Organization),
    ("GPE", PiiType::Location),
    ("LOC", PiiType::Location),
    ("PLACE", PiiType::Location),
    ("PHONE_NUMBER", PiiType::Phone),
];

impl PiiType {
    /// Canonical upper-case label used in placeholders and statistics
    pub fn as_str(&self) -> &str {
        match self {
            Self::Email => "EMAIL",
            Self::Phone => "PHONE",
            Self::Ssn => "SSN",
            Self::CreditCard => "CREDIT_CARD",
            Self::IpAddress => "IP_ADDRESS",
            Self::Date => "DATE",
            Self::Address => "ADDRESS",
            Self::Url => "URL",
            Self::Currency => "CURRENCY",
            Self::Name => "NAME",
            Self::Organization => "ORGANIZATION",
            Self::Product => "PRODUCT",
            Self::Location => "LOCATION",
            Self::Custom(name) => name.as_str(),
        }
    }

    /// Map any label (canonical, synonym, or lowercase NER label) onto the
    /// canonical vocabulary
    pub fn normalize(label: &str) -> Self {
        let upper = label.trim().to_uppercase();

        if let Some((_, pii_type)) = LABEL_SYNONYMS.iter().find(|(alias, _)| *alias == upper) {
            return pii_type.clone();
        }

        match upper.as_str() {
            "EMAIL" => Self::Email,
            "PHONE" => Self::Phone,
            "SSN" => Self::Ssn,
            "CREDIT_CARD" => Self::CreditCard,
            "IP_ADDRESS" => Self::IpAddress,
            "DATE" => Self::Date,
            "ADDRESS" => Self::Address,
            "URL" => Self::Url,
            "CURRENCY" => Self::Currency,
            "NAME" => Self::Name,
            "ORGANIZATION" => Self::Organization,
            "PRODUCT" => Self::Product,
            "LOCATION" => Self::Location,
            _ => Self::Custom(upper),
        }
    }

    /// Types that receive semantic aliases instead of opaque tokens
    pub fn is_semantic(&self) -> bool {
        matches!(
            self,
            Self::Name | Self::Organization | Self::Product | Self::Location
        )
    }
}

impl fmt::Display for PiiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for PiiType {
    fn from(value: String) -> Self {
        Self::normalize(&value)
    }
}

impl From<PiiType> for String {
    fn from(value: PiiType) -> Self {
        value.as_str().to_string()
    }
}

/// Detection method used to identify PII
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// Pattern catalog match
    Pattern,
    /// External named-entity recognizer
    Ner,
    /// Heuristic entity stage (proper nouns, abbreviations, tickers)
    Heuristic,
}

/// A single identified PII occurrence
///
/// Spans are byte offsets into the source text, `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    /// Literal matched text
    pub value: String,
    /// Classified type
    pub pii_type: PiiType,
    /// Start byte offset
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Detection method used
    pub method: DetectionMethod,
}

impl Detection {
    /// Create a new detection
    pub fn new(
        value: impl Into<String>,
        pii_type: PiiType,
        start: usize,
        end: usize,
        method: DetectionMethod,
    ) -> Self {
        Self {
            value: value.into(),
            pii_type,
            start,
            end,
            method,
        }
    }

    /// Whether this detection's span intersects `[start, end)`
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }
}

/// Detection paired with the placeholder allocated for its value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocatedDetection {
    /// The detection
    #[serde(flatten)]
    pub detection: Detection,
    /// Placeholder assigned to `detection.value`
    pub placeholder: String,
}

/// Anonymized text result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizedText {
    /// Caller-supplied document identifier
    pub document_id: String,
    /// Text with every detected value substituted
    pub anonymized: String,
    /// Detections with their placeholders
    pub detections: Vec<AllocatedDetection>,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Timestamp of anonymization
    pub timestamp: DateTime<Utc>,
    /// Detection counts by type
    pub stats_by_type: BTreeMap<String, usize>,
}

impl AnonymizedText {
    /// Create a new anonymized text result
    pub fn new(
        document_id: String,
        anonymized: String,
        detections: Vec<AllocatedDetection>,
        processing_time_ms: u64,
    ) -> Self {
        let mut stats_by_type = BTreeMap::new();
        for allocated in &detections {
            *stats_by_type
                .entry(allocated.detection.pii_type.to_string())
                .or_insert(0) += 1;
        }

        Self {
            document_id,
            anonymized,
            detections,
            processing_time_ms,
            timestamp: Utc::now(),
            stats_by_type,
        }
    }

    /// Get total number of detections
    pub fn total_detections(&self) -> usize {
        self.detections.len()
    }

    /// Check if any PII was detected
    pub fn has_detections(&self) -> bool {
        !self.detections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_synonyms() {
        assert_eq!(PiiType::normalize("PERSON"), PiiType::Name);
        assert_eq!(PiiType::normalize("per"), PiiType::Name);
        assert_eq!(PiiType::normalize("ORG"), PiiType::Organization);
        assert_eq!(PiiType::normalize("organization"), PiiType::Organization);
        assert_eq!(PiiType::normalize("GPE"), PiiType::Location);
        assert_eq!(PiiType::normalize("place"), PiiType::Location);
        assert_eq!(PiiType::normalize("PHONE_NUMBER"), PiiType::Phone);
    }

    #[test]
    fn test_normalize_custom() {
        let custom = PiiType::normalize("passport");
        assert_eq!(custom, PiiType::Custom("PASSPORT".to_string()));
        assert_eq!(custom.as_str(), "PASSPORT");
        assert!(!custom.is_semantic());
    }

    #[test]
    fn test_serde_as_label() {
        let json = serde_json::to_string(&PiiType::IpAddress).unwrap();
        assert_eq!(json, "\"IP_ADDRESS\"");

        let parsed: PiiType = serde_json::from_str("\"GPE\"").unwrap();
        assert_eq!(parsed, PiiType::Location);
    }

    #[test]
    fn test_detection_overlap() {
        let detection = Detection::new("John", PiiType::Name, 5, 9, DetectionMethod::Ner);
        assert!(detection.overlaps(0, 6));
        assert!(detection.overlaps(8, 20));
        assert!(!detection.overlaps(9, 12));
        assert!(!detection.overlaps(0, 5));
    }

    #[test]
    fn test_anonymized_text_stats() {
        let detections = vec![
            AllocatedDetection {
                detection: Detection::new("a@b.io", PiiType::Email, 0, 6, DetectionMethod::Pattern),
                placeholder: "<EMAIL_0badf00d>".to_string(),
            },
            AllocatedDetection {
                detection: Detection::new("c@d.io", PiiType::Email, 10, 16, DetectionMethod::Pattern),
                placeholder: "<EMAIL_deadbeef>".to_string(),
            },
        ];
        let result = AnonymizedText::new("doc".to_string(), String::new(), detections, 3);

        assert_eq!(result.total_detections(), 2);
        assert!(result.has_detections());
        assert_eq!(result.stats_by_type.get("EMAIL"), Some(&2));
    }
}
