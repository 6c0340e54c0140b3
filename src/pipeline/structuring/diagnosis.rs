use std::sync::LazyLock;

use regex::Regex;

use super::label::{LabelSet, Separator};
use super::recognizer::EntityRecognizer;
use crate::pipeline::extraction::NormalizedDocument;

const DIAGNOSIS_LABELS: &[&str] = &["Diagnosis", "Impression", "Assessment", "Dx"];

static DIAGNOSIS_LABEL: LazyLock<LabelSet> =
    LazyLock::new(|| LabelSet::new(DIAGNOSIS_LABELS, Separator::Optional));

/// Condition words that mark a line as diagnostic. Prefix match, so
/// "infections" and "painful" count.
static CONDITION_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:fever|infection|pain|fracture|hypertension|diabetes|cough|pneumonia|asthma)",
    )
    .expect("valid regex")
});

static DIAGNOSTIC_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)diagnosis|assessment").expect("valid regex"));

/// Diagnosis text:
/// 1. the value after a `Diagnosis`/`Impression`/`Assessment`/`Dx` label,
/// 2. the first line naming a common condition,
/// 3. with a recognizer, the first sentence mentioning a diagnosis or assessment.
pub fn extract_diagnosis(
    doc: &NormalizedDocument,
    recognizer: &dyn EntityRecognizer,
) -> Option<String> {
    if let Some(value) = DIAGNOSIS_LABEL.find_value(&doc.lines) {
        return Some(value);
    }

    if let Some(line) = doc.lines.iter().find(|l| CONDITION_KEYWORDS.is_match(l)) {
        tracing::debug!("Diagnosis taken from condition keyword line");
        return Some(line.clone());
    }

    if !recognizer.is_available() {
        return None;
    }
    recognizer
        .sentences(&doc.text)
        .into_iter()
        .find(|s| DIAGNOSTIC_MENTION.is_match(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extraction::normalize_document;
    use crate::pipeline::structuring::recognizer::tests::MockRecognizer;
    use crate::pipeline::structuring::recognizer::NoopRecognizer;

    fn dx(text: &str, recognizer: &dyn EntityRecognizer) -> Option<String> {
        extract_diagnosis(&normalize_document(text), recognizer)
    }

    #[test]
    fn labeled_diagnosis_first_line_only() {
        assert_eq!(
            dx("Diagnosis: Mild infection\nRx: Amoxicillin", &NoopRecognizer).as_deref(),
            Some("Mild infection")
        );
        assert_eq!(
            dx("IMPRESSION - Community acquired pneumonia", &NoopRecognizer).as_deref(),
            Some("Community acquired pneumonia")
        );
        assert_eq!(
            dx("Dx: Type 2 diabetes", &NoopRecognizer).as_deref(),
            Some("Type 2 diabetes")
        );
    }

    #[test]
    fn label_beats_earlier_keyword_line() {
        assert_eq!(
            dx("Complains of cough\nAssessment: Acute bronchitis", &NoopRecognizer).as_deref(),
            Some("Acute bronchitis")
        );
    }

    #[test]
    fn keyword_line_without_label() {
        assert_eq!(
            dx("Jane Doe\nHigh fever since Monday\nAge 30", &NoopRecognizer).as_deref(),
            Some("High fever since Monday")
        );
        assert_eq!(
            dx("Recurrent Infections noted", &NoopRecognizer).as_deref(),
            Some("Recurrent Infections noted")
        );
    }

    #[test]
    fn recognizer_sentence_fallback_needs_available_recognizer() {
        let text = "Reviewed labs. Discussed the diagnosis.";
        assert_eq!(dx(text, &NoopRecognizer), None);
        assert_eq!(
            dx(text, &MockRecognizer::persons(&[])).as_deref(),
            Some("Discussed the diagnosis.")
        );
    }

    #[test]
    fn nothing_diagnostic_is_none() {
        assert_eq!(dx("Jane Doe\nAge 30", &NoopRecognizer), None);
        assert_eq!(dx("", &NoopRecognizer), None);
    }
}
