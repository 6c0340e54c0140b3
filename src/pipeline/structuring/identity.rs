use std::sync::LazyLock;

use regex::Regex;

use super::label::{LabelSet, Separator};
use super::recognizer::EntityRecognizer;
use crate::pipeline::extraction::NormalizedDocument;

const NAME_LABELS: &[&str] = &["Full Name", "Patient Name", "Patient", "Name"];

const PATIENT_ID_LABELS: &[&str] = &[
    "Patient ID",
    "PatientID",
    "MRN",
    "ID",
    "PID",
    "Hospital No",
    "HNo",
    "Record No",
];

/// Word-count window for a plausible person name.
const NAME_MIN_WORDS: usize = 2;
const NAME_MAX_WORDS: usize = 6;

/// Length window for a compacted, unprefixed identifier.
const BARE_ID_MIN_LEN: usize = 4;
const BARE_ID_MAX_LEN: usize = 20;

static NAME_LABEL: LazyLock<LabelSet> =
    LazyLock::new(|| LabelSet::new(NAME_LABELS, Separator::Required));

static PATIENT_ID_LABEL: LazyLock<LabelSet> =
    LazyLock::new(|| LabelSet::new(PATIENT_ID_LABELS, Separator::Optional));

/// `PID-123`, `MRN 0042`, `ID:A7` and `PID12345` style identifiers.
static PREFIXED_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[^A-Za-z0-9]*(PID|MRN|ID)(?:[\s:#\-]+([A-Za-z0-9]+)|(\d[A-Za-z0-9]*))")
        .expect("valid regex")
});

/// Unlabeled identifiers anywhere in the document.
static ID_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(PID[-\s]?\d{3,}|MRN[-\s]?\d{3,}|[A-Z0-9]{6,12})\b").expect("valid regex")
});

/// Patient name, by decreasing reliability:
/// 1. a labeled value (`Name: ...`),
/// 2. the recognizer's first person span of 2-6 words,
/// 3. when no recognizer is available, the first non-empty line.
pub fn extract_patient_name(
    doc: &NormalizedDocument,
    recognizer: &dyn EntityRecognizer,
) -> Option<String> {
    if let Some(name) = NAME_LABEL
        .find_value(&doc.lines)
        .filter(|candidate| is_plausible_labeled_name(candidate))
    {
        return Some(name);
    }

    if recognizer.is_available() {
        return recognizer
            .person_spans(&doc.text)
            .into_iter()
            .find(|span| (NAME_MIN_WORDS..=NAME_MAX_WORDS).contains(&span.split_whitespace().count()));
    }

    let first_line = doc.lines.first().cloned();
    if first_line.is_some() {
        tracing::debug!("No labeled name and no recognizer, using first line as patient name");
    }
    first_line
}

fn is_plausible_labeled_name(candidate: &str) -> bool {
    candidate.chars().count() > 1 && candidate.split_whitespace().count() <= NAME_MAX_WORDS
}

/// Patient identifier: labeled value first, then the first identifier-looking
/// token in document order.
pub fn extract_patient_id(lines: &[String]) -> Option<String> {
    if let Some(id) = PATIENT_ID_LABEL
        .find_value(lines)
        .and_then(|value| normalize_patient_id(&value))
    {
        return Some(id);
    }

    lines.iter().find_map(|line| {
        ID_TOKEN
            .captures_iter(line)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|token| is_identifier_token(token))
            .find_map(normalize_patient_id)
    })
}

/// Any 6-12 character all-caps alphanumeric token qualifies, digit-only record
/// numbers included, except letter-only words: those are headings ("HOSPITAL",
/// "REPORT") far more often than identifiers.
fn is_identifier_token(token: &str) -> bool {
    token.chars().any(|c| c.is_ascii_digit())
}

/// Canonical identifier form: `PREFIX-SUFFIX` for PID/MRN/ID prefixed values,
/// otherwise the value stripped to uppercase alphanumerics (4-20 chars).
pub fn normalize_patient_id(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(caps) = PREFIXED_ID.captures(raw) {
        let prefix = caps.get(1).map(|m| m.as_str())?;
        let suffix = caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str())?;
        return Some(format!(
            "{}-{}",
            prefix.to_ascii_uppercase(),
            suffix.to_ascii_uppercase()
        ));
    }

    let compact: String = raw.chars().filter(char::is_ascii_alphanumeric).collect();
    (BARE_ID_MIN_LEN..=BARE_ID_MAX_LEN)
        .contains(&compact.len())
        .then(|| compact.to_ascii_uppercase())
}
