//! Entity classification pipeline
//!
//! Named entities are found by an ordered list of stages. Each stage is a
//! pure function over the text and the spans claimed by earlier stages, and
//! only reports spans nobody has claimed yet:
//!
//! 1. the external recognizer, when one is configured
//! 2. proper-noun runs ("Acme Cloud Platform", "Bank of America")
//! 3. all-caps abbreviations, with context checks for ambiguous tokens
//! 4. alphanumeric codes ("3M", "401K")
//! 5. exchange-prefixed tickers ("NASDAQ: NEON")

use super::ner::{EntityRecognizer, NerSpan};
use crate::anonymization::models::{Detection, DetectionMethod, PiiType};
use crate::domain::{AnonymizerError, Result};
use regex::Regex;
use std::sync::Arc;

const STOPWORDS: &[&str] = &[
    "The", "A", "An", "And", "Or", "But", "For", "To", "Of", "In", "On", "At", "By", "With",
    "From", "As", "Is", "Was", "Are", "Were", "Be", "Been", "He", "She", "It", "They", "We", "I",
    "You", "This", "That", "These", "Those", "Have", "Has", "Had", "Do", "Does", "Did", "Will",
    "Would", "Could", "Should", "Can", "May", "Might", "Must", "Shall",
];

const CONNECTIVES: &[&str] = &["of", "and", "the", "de", "la", "le", "du"];

const PRODUCT_KEYWORDS: &[&str] = &[
    "Suite", "Platform", "System", "Tool", "App", "Service", "Solution", "Engine", "Framework",
    "Hub", "Portal", "Cloud", "Pro", "Ultra", "Premium", "Plus", "Advanced", "Elite", "Mega",
    "Super", "Max", "Turbo", "Power", "Smart",
];

const ORG_SUFFIXES: &[&str] = &[
    "Inc", "LLC", "Corp", "Corporation", "Ltd", "Limited", "Group", "Industries", "Solutions",
    "Systems", "Technologies", "Enterprises", "Partners", "Ventures", "Company", "Associates",
];

const LOCATION_KEYWORDS: &[&str] = &[
    "America", "Europe", "Asia", "Africa", "North", "South", "East", "West", "City", "Town",
    "Island", "Mountain", "River", "Lake", "Valley",
];

const ABBREVIATION_STOPWORDS: &[&str] = &["OK", "AM", "PM", "OR", "IF", "IS", "AS", "AT", "WE", "NO"];

/// Tokens that are only organizations when the surrounding text agrees
const AMBIGUOUS_ABBREVIATIONS: &[&str] = &["US", "IT", "AI"];

const ORG_CONTEXT_INDICATORS: &[&str] = &[
    "Inc", "LLC", "Corp", "Ltd", "Limited", "Group", "Industries", "Solutions", "Systems",
    "Technologies", "Enterprises", "Company",
];

/// Characters inspected on each side of an ambiguous abbreviation
const CONTEXT_WINDOW_CHARS: usize = 30;

/// Spans already taken by an earlier stage
#[derive(Debug, Clone, Default)]
pub struct ClaimedSpans {
    spans: Vec<(usize, usize)>,
}

impl ClaimedSpans {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `[start, end)` intersects any claimed span
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.spans.iter().any(|&(s, e)| s < end && start < e)
    }

    /// Whether exactly `[start, end)` has been claimed
    pub fn contains_exact(&self, start: usize, end: usize) -> bool {
        self.spans.contains(&(start, end))
    }

    pub fn claim(&mut self, start: usize, end: usize) {
        self.spans.push((start, end));
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// Compiled expressions shared by the heuristic stages
#[derive(Debug, Clone)]
struct HeuristicRules {
    proper_noun_run: Regex,
    all_caps: Regex,
    capitalized_word: Regex,
    alphanumeric_code: Regex,
    exchange_ticker: Regex,
}

impl HeuristicRules {
    fn compile() -> Result<Self> {
        Ok(Self {
            proper_noun_run: compile(
                r"\b[A-Z][A-Za-zÀ-ÿ']*(?:[ \t]+(?:[A-Z][A-Za-zÀ-ÿ']*|of|and|the|de|la|le|du)|[ \t]+\d+)*\b",
            )?,
            all_caps: compile(r"\b[A-Z]{2,5}\b")?,
            capitalized_word: compile(r"\b[A-Z][a-z]+\b")?,
            alphanumeric_code: compile(r"\b(?:\d+[A-Z]+|[A-Z]+\d+)\b")?,
            exchange_ticker: compile(r"\b(?:NYSE|NASDAQ|FTSE|S&P|DOW)(?::\s*|\s+)(?:[A-Z]{1,5}|\d+)\b")?,
        })
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| AnonymizerError::Pattern(format!("Invalid entity heuristic: {e}")))
}

type Stage = fn(&HeuristicRules, &str, &ClaimedSpans) -> Vec<Detection>;

/// Heuristic stages in precedence order
const HEURISTIC_STAGES: &[(&str, Stage)] = &[
    ("proper_noun_run", proper_noun_runs),
    ("abbreviation", abbreviations),
    ("alphanumeric_code", alphanumeric_codes),
    ("exchange_ticker", exchange_tickers),
];

/// Detects names, organizations, products and places
#[derive(Clone)]
pub struct EntityClassifier {
    rules: HeuristicRules,
    recognizer: Option<Arc<dyn EntityRecognizer>>,
}

impl std::fmt::Debug for EntityClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityClassifier")
            .field("recognizer", &self.recognizer.as_ref().map(|r| r.name().to_string()))
            .finish()
    }
}

impl EntityClassifier {
    /// Create a classifier running only the heuristic stages
    pub fn new() -> Result<Self> {
        Ok(Self {
            rules: HeuristicRules::compile()?,
            recognizer: None,
        })
    }

    /// Attach an external recognizer as the first stage
    pub fn with_recognizer(mut self, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn has_recognizer(&self) -> bool {
        self.recognizer.is_some()
    }

    /// Run every stage over `text`
    ///
    /// Recognizer failures propagate; a partial classification could leave
    /// entities undetected.
    pub fn classify(&self, text: &str) -> Result<Vec<Detection>> {
        let mut claimed = ClaimedSpans::new();
        let mut detections = Vec::new();

        if let Some(recognizer) = &self.recognizer {
            let spans = recognizer.recognize(text).map_err(|e| match e {
                AnonymizerError::Ner(msg) => AnonymizerError::Ner(msg),
                other => AnonymizerError::Ner(format!("{} failed: {other}", recognizer.name())),
            })?;
            let found = recognized_entities(text, spans);
            for detection in &found {
                claimed.claim(detection.start, detection.end);
            }
            tracing::trace!(stage = recognizer.name(), count = found.len(), "Entity stage complete");
            detections.extend(found);
        }

        for (stage_name, stage) in HEURISTIC_STAGES {
            let found = stage(&self.rules, text, &claimed);
            for detection in &found {
                claimed.claim(detection.start, detection.end);
            }
            tracing::trace!(stage = stage_name, count = found.len(), "Entity stage complete");
            detections.extend(found);
        }

        Ok(detections)
    }
}

/// Stage 1: keep recognizer spans for the four entity kinds
fn recognized_entities(text: &str, spans: Vec<NerSpan>) -> Vec<Detection> {
    spans
        .into_iter()
        .filter(|span| !span.text.contains(|c: char| c == '\n' || c == '\r'))
        .filter_map(|span| {
            let pii_type = PiiType::normalize(&span.label);
            if !pii_type.is_semantic() {
                return None;
            }
            let (start, end) = locate_span(text, &span)?;
            Some(Detection::new(span.text, pii_type, start, end, DetectionMethod::Ner))
        })
        .collect()
}

/// Trust the reported offsets when they point at the span text, otherwise
/// fall back to the first occurrence
fn locate_span(text: &str, span: &NerSpan) -> Option<(usize, usize)> {
    if text.get(span.start..span.end) == Some(span.text.as_str()) {
        return Some((span.start, span.end));
    }
    let start = text.find(span.text.as_str())?;
    Some((start, start + span.text.len()))
}

/// Stage 2: capitalized word sequences
fn proper_noun_runs(rules: &HeuristicRules, text: &str, claimed: &ClaimedSpans) -> Vec<Detection> {
    rules
        .proper_noun_run
        .find_iter(text)
        .map(|m| {
            let run = trim_trailing_connectives(m.as_str());
            (run, m.start(), m.start() + run.len())
        })
        .filter(|&(_, start, end)| !claimed.overlaps(start, end))
        .filter(|(run, _, _)| !is_rejected_single_word(run))
        .map(|(run, start, end)| {
            Detection::new(run, classify_run(run), start, end, DetectionMethod::Heuristic)
        })
        .collect()
}

/// "BXC and" reads as "BXC"; connectives only join capitalized words
fn trim_trailing_connectives(run: &str) -> &str {
    let mut run = run;
    while let Some((head, last)) = run.rsplit_once(|c: char| c == ' ' || c == '\t') {
        if !CONNECTIVES.contains(&last) {
            break;
        }
        run = head.trim_end();
    }
    run
}

fn is_rejected_single_word(run: &str) -> bool {
    if run.split_whitespace().count() != 1 {
        return false;
    }
    STOPWORDS.contains(&run)
        || (run.chars().count() <= 2 && run.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Assign a type to a proper-noun run
///
/// Product and organization keywords match anywhere in the run, so "Apple
/// Store" is a product through "App". Location keywords must be whole words.
fn classify_run(run: &str) -> PiiType {
    let words: Vec<&str> = run.split_whitespace().collect();
    let mentions_any = |keywords: &[&str]| keywords.iter().any(|k| run.contains(k));

    if mentions_any(PRODUCT_KEYWORDS) {
        PiiType::Product
    } else if mentions_any(ORG_SUFFIXES) {
        PiiType::Organization
    } else if words.len() == 2 && words.iter().all(|w| is_simple_capitalized(w)) {
        PiiType::Name
    } else if words.iter().any(|w| LOCATION_KEYWORDS.contains(w)) {
        PiiType::Location
    } else if words.len() == 1 && run.chars().count() == 2 && run.chars().all(char::is_uppercase) {
        PiiType::Location
    } else {
        PiiType::Organization
    }
}

/// Upper-case initial followed by lower-case letters only
fn is_simple_capitalized(word: &str) -> bool {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let tail: Vec<char> = chars.collect();
    first.is_uppercase()
        && !tail.is_empty()
        && tail.iter().all(|c| c.is_alphabetic() && c.is_lowercase())
}

/// Stage 3: all-caps abbreviations
fn abbreviations(rules: &HeuristicRules, text: &str, claimed: &ClaimedSpans) -> Vec<Detection> {
    rules
        .all_caps
        .find_iter(text)
        .filter(|m| !claimed.overlaps(m.start(), m.end()))
        .filter(|m| !ABBREVIATION_STOPWORDS.contains(&m.as_str()))
        .filter(|m| {
            !AMBIGUOUS_ABBREVIATIONS.contains(&m.as_str())
                || has_org_context(rules, text, m.start(), m.end())
        })
        .map(|m| {
            Detection::new(
                m.as_str(),
                PiiType::Organization,
                m.start(),
                m.end(),
                DetectionMethod::Heuristic,
            )
        })
        .collect()
}

/// Whether an organization suffix or a capitalized word sits near the match
fn has_org_context(rules: &HeuristicRules, text: &str, start: usize, end: usize) -> bool {
    let before_start = text[..start]
        .char_indices()
        .rev()
        .nth(CONTEXT_WINDOW_CHARS - 1)
        .map_or(0, |(idx, _)| idx);
    let after_end = text[end..]
        .char_indices()
        .nth(CONTEXT_WINDOW_CHARS)
        .map_or(text.len(), |(idx, _)| end + idx);

    [&text[before_start..start], &text[end..after_end]]
        .iter()
        .any(|context| {
            ORG_CONTEXT_INDICATORS.iter().any(|ind| context.contains(*ind))
                || rules.capitalized_word.is_match(context)
        })
}

/// Stage 4: letter/digit codes
fn alphanumeric_codes(rules: &HeuristicRules, text: &str, claimed: &ClaimedSpans) -> Vec<Detection> {
    rules
        .alphanumeric_code
        .find_iter(text)
        .filter(|m| !claimed.overlaps(m.start(), m.end()))
        .map(|m| {
            Detection::new(
                m.as_str(),
                PiiType::Organization,
                m.start(),
                m.end(),
                DetectionMethod::Heuristic,
            )
        })
        .collect()
}

/// Stage 5: exchange-prefixed tickers
///
/// The whole "EXCHANGE: CODE" span is reported even when its parts were
/// claimed separately; only the identical span is skipped.
fn exchange_tickers(rules: &HeuristicRules, text: &str, claimed: &ClaimedSpans) -> Vec<Detection> {
    rules
        .exchange_ticker
        .find_iter(text)
        .filter(|m| !claimed.contains_exact(m.start(), m.end()))
        .map(|m| {
            Detection::new(
                m.as_str(),
                PiiType::Organization,
                m.start(),
                m.end(),
                DetectionMethod::Heuristic,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::detector::ner::GazetteerRecognizer;
    use test_case::test_case;

    fn classify(text: &str) -> Vec<Detection> {
        EntityClassifier::new().unwrap().classify(text).unwrap()
    }

    fn typed(detections: &[Detection]) -> Vec<(&str, PiiType)> {
        detections
            .iter()
            .map(|d| (d.value.as_str(), d.pii_type.clone()))
            .collect()
    }

    #[test_case("Acme Cloud Platform", PiiType::Product; "product keyword")]
    #[test_case("Globex Industries", PiiType::Organization; "org suffix")]
    #[test_case("Maria Garcia", PiiType::Name; "two capitalized words")]
    #[test_case("North Ridge Valley", PiiType::Location; "location keyword")]
    #[test_case("Lake", PiiType::Location; "single location keyword")]
    #[test_case("Bank of America Merrill", PiiType::Location; "connectives with location")]
    #[test_case("Initech", PiiType::Organization; "default")]
    #[test_case("McDonald Smith", PiiType::Organization; "mixed case word is not a simple name")]
    #[test_case("ÉU", PiiType::Location; "two letter code")]
    fn test_classify_run(run: &str, expected: PiiType) {
        assert_eq!(classify_run(run), expected);
    }

    #[test_case("Prosper Labs", PiiType::Product; "product keyword inside a word")]
    #[test_case("Apple Store", PiiType::Product; "app prefix")]
    #[test_case("Apex Systems", PiiType::Product; "system keyword wins over org suffix")]
    #[test_case("Apex Ventures", PiiType::Organization; "org suffix")]
    #[test_case("Hooli Incubator", PiiType::Organization; "org suffix inside a word")]
    #[test_case("Lakeside Manor Estates", PiiType::Organization; "location keyword must be a whole word")]
    fn test_keyword_containment(run: &str, expected: PiiType) {
        assert_eq!(classify_run(run), expected);
    }

    #[test]
    fn test_trailing_connectives_trimmed() {
        assert_eq!(trim_trailing_connectives("BXC and"), "BXC");
        assert_eq!(trim_trailing_connectives("Bank of the"), "Bank");
        assert_eq!(trim_trailing_connectives("Bank of America"), "Bank of America");
    }

    #[test]
    fn test_stopwords_and_short_words_rejected() {
        assert!(classify("I am OK with that.").is_empty());
        assert!(classify("The end").is_empty());
    }

    #[test]
    fn test_abbreviations() {
        let detections = classify("We partnered with BXC and 3M last year.");
        assert_eq!(
            typed(&detections),
            vec![
                ("BXC", PiiType::Organization),
                ("3M", PiiType::Organization),
            ]
        );
    }

    #[test]
    fn test_alphanumeric_codes() {
        let detections = classify("fund the 401K before the B2B call");
        assert_eq!(typed(&detections), vec![("401K", PiiType::Organization)]);
    }

    #[test]
    fn test_abbreviation_stopwords_skipped() {
        let detections = classify("call at 9 pm or PM if needed");
        assert!(detections.iter().all(|d| d.value != "PM"));
    }

    #[test_case("our US division", false; "no context")]
    #[test_case("merger with US partner Globex", true; "capitalized word after")]
    #[test_case("growth at the US branch of Hooli Corp", true; "org indicator")]
    fn test_ambiguous_abbreviation_context(text: &str, detected: bool) {
        let detections = classify(text);
        assert_eq!(detections.iter().any(|d| d.value == "US"), detected);
    }

    #[test]
    fn test_context_window_respects_char_boundaries() {
        let text = "ééééééééééééééééééééééééééééééééé US ééééééééééééééééééééééééééééééééé";
        assert!(classify(text).iter().all(|d| d.value != "US"));
    }

    #[test]
    fn test_org_suffix_phrases() {
        let detections = classify("US Steel Corporation reported. IT Partners Inc merged.");
        assert_eq!(
            typed(&detections),
            vec![
                ("US Steel Corporation", PiiType::Organization),
                ("IT Partners Inc", PiiType::Organization),
            ]
        );
    }

    #[test]
    fn test_exchange_ticker_captured_whole() {
        let detections = classify("Shares of NASDAQ: NEON rose.");
        assert!(detections
            .iter()
            .any(|d| d.value == "NASDAQ: NEON" && d.pii_type == PiiType::Organization));
        assert!(classify("listed on FTSE 100").iter().any(|d| d.value == "FTSE 100"));
    }

    #[test]
    fn test_recognizer_spans_take_precedence() {
        let recognizer = GazetteerRecognizer::new([("John Smith", "person")]);
        let classifier = EntityClassifier::new()
            .unwrap()
            .with_recognizer(Arc::new(recognizer));
        assert!(classifier.has_recognizer());

        let detections = classifier
            .classify("Contact John Smith at the office.")
            .unwrap();
        assert_eq!(typed(&detections), vec![("John Smith", PiiType::Name)]);
        assert_eq!(detections[0].method, DetectionMethod::Ner);
    }

    #[test]
    fn test_recognizer_spans_filtered() {
        let spans = vec![
            NerSpan {
                text: "Acme\nCorp".to_string(),
                label: "ORG".to_string(),
                start: 0,
                end: 9,
            },
            NerSpan {
                text: "Tuesday".to_string(),
                label: "DATE".to_string(),
                start: 10,
                end: 17,
            },
            NerSpan {
                text: "Lisbon".to_string(),
                label: "GPE".to_string(),
                start: 99,
                end: 105,
            },
        ];
        let detections = recognized_entities("Acme\nCorp Tuesday Lisbon", spans);
        assert_eq!(typed(&detections), vec![("Lisbon", PiiType::Location)]);
        assert_eq!((detections[0].start, detections[0].end), (18, 24));
    }

    struct FailingRecognizer;

    impl EntityRecognizer for FailingRecognizer {
        fn name(&self) -> &str {
            "failing"
        }

        fn recognize(&self, _text: &str) -> Result<Vec<NerSpan>> {
            Err(AnonymizerError::Io("socket closed".to_string()))
        }
    }

    #[test]
    fn test_recognizer_failure_propagates() {
        let classifier = EntityClassifier::new()
            .unwrap()
            .with_recognizer(Arc::new(FailingRecognizer));
        let err = classifier.classify("Anything").unwrap_err();
        assert!(matches!(err, AnonymizerError::Ner(_)));
    }

    #[test]
    fn test_claimed_spans() {
        let mut claimed = ClaimedSpans::new();
        claimed.claim(5, 10);
        assert!(claimed.overlaps(9, 12));
        assert!(!claimed.overlaps(10, 12));
        assert!(claimed.contains_exact(5, 10));
        assert!(!claimed.contains_exact(5, 9));
        assert_eq!(claimed.len(), 1);
    }
}
