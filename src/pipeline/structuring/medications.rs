use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::label::{LabelSet, Separator};
use super::recognizer::EntityRecognizer;

const MEDICATION_LABELS: &[&str] = &[
    "Medications",
    "Medication",
    "Rx",
    "Prescription",
    "Treatment Plan",
];

/// Items longer than this are truncated (OCR often runs instructions on).
const MAX_ITEM_WORDS: usize = 6;

const BULLETS: &[char] = &['•', '‣', '․', '◦', '▪', '●', '·'];

static MEDICATION_LABEL: LazyLock<LabelSet> =
    LazyLock::new(|| LabelSet::new(MEDICATION_LABELS, Separator::Optional));

/// Capitalized drug name (optionally two words) followed by a dose.
static DRUG_DOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][a-zA-Z\-]{2,}(?:\s+[A-Z][a-zA-Z\-]*)?\s+\d+\s*(?i:mg|g|ml|mcg|iu)\b")
        .expect("valid regex")
});

static MEDICATION_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:tablets?|capsules?|doses?|daily|medicines?|take|tabs?)\b")
        .expect("valid regex")
});

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Medications as one `"; "`-joined string of deduplicated items.
///
/// A labeled block (`Medications:`, `Rx`, ...) wins. Without one, sentences
/// are scanned for drug+dose mentions, then for medication keywords.
pub fn extract_medications(text: &str, recognizer: &dyn EntityRecognizer) -> Option<String> {
    let items = match MEDICATION_LABEL.find_block(text) {
        Some(block) => block_items(&block),
        None => sentence_items(&recognizer.sentences(text)),
    };
    join_items(items)
}

/// Split a labeled block on lines, `;`, bullets and `", Capital"` boundaries.
fn block_items(block: &[String]) -> Vec<String> {
    block
        .iter()
        .flat_map(|line| line.split(|c: char| c == ';' || BULLETS.contains(&c)))
        .flat_map(split_on_capital_commas)
        .collect()
}

/// `"Amoxicillin 500mg, Ibuprofen 200mg"` splits in two; `"500mg, twice daily"`
/// stays whole because the text after the comma is not capitalized.
fn split_on_capital_commas(segment: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for piece in segment.split(',') {
        let starts_capital = piece
            .trim_start()
            .chars()
            .next()
            .is_some_and(char::is_uppercase);
        match items.last_mut() {
            Some(last) if !starts_capital => {
                last.push(',');
                last.push_str(piece);
            }
            _ => items.push(piece.to_string()),
        }
    }
    items
}

fn sentence_items(sentences: &[String]) -> Vec<String> {
    let mut items = Vec::new();
    for sentence in sentences {
        let doses: Vec<String> = DRUG_DOSE
            .find_iter(sentence)
            .map(|m| m.as_str().to_string())
            .collect();
        if !doses.is_empty() {
            items.extend(doses);
        } else if MEDICATION_KEYWORDS.is_match(sentence) {
            items.extend(sentence.split(',').map(str::to_string));
        }
    }
    items
}

/// Strip bullet and whitespace noise and collapse runs of whitespace.
pub fn clean_medication_item(raw: &str) -> Option<String> {
    let trimmed = raw
        .trim_matches(|c: char| c.is_whitespace() || c == '-' || c == '*' || BULLETS.contains(&c))
        .trim_end_matches(['.', ',', ';', ':'])
        .trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(WHITESPACE_RUN.replace_all(trimmed, " ").into_owned())
}

fn truncate_words(item: &str) -> String {
    item.split(' ')
        .take(MAX_ITEM_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Clean, deduplicate case-insensitively (first occurrence wins), truncate
/// each survivor to six words and join.
///
/// Deduplication sees the whole item, so two instructions that only differ
/// past the sixth word are both kept.
pub fn join_items<I, S>(items: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let kept: Vec<String> = items
        .into_iter()
        .filter_map(|item| clean_medication_item(item.as_ref()))
        .filter(|item| seen.insert(item.to_lowercase()))
        .map(|item| truncate_words(&item))
        .collect();
    (!kept.is_empty()).then(|| kept.join("; "))
}
