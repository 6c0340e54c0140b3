use super::diagnosis::extract_diagnosis;
use super::identity::{extract_patient_id, extract_patient_name};
use super::medications::extract_medications;
use super::recognizer::{noop_recognizer, RecognizerHandle};
use super::types::FieldSet;
use super::vitals::extract_vitals;
use crate::pipeline::extraction::NormalizedDocument;

/// One way of turning a document into fields. Strategies are tried in order
/// and later ones only fill what earlier ones left empty.
pub trait FieldStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Extract every field this strategy knows about. `raw_text` is the
    /// untouched input, `doc` its normalized form.
    fn extract(&self, raw_text: &str, doc: &NormalizedDocument) -> FieldSet;
}

/// Label, regex and (when available) recognizer-assisted extraction over
/// normalized text.
pub struct EnhancedStrategy {
    recognizer: RecognizerHandle,
}

impl EnhancedStrategy {
    pub fn new(recognizer: RecognizerHandle) -> Self {
        Self { recognizer }
    }

    pub fn without_recognizer() -> Self {
        Self::new(noop_recognizer())
    }
}

impl Default for EnhancedStrategy {
    fn default() -> Self {
        Self::without_recognizer()
    }
}

impl FieldStrategy for EnhancedStrategy {
    fn name(&self) -> &'static str {
        "enhanced"
    }

    fn extract(&self, raw_text: &str, doc: &NormalizedDocument) -> FieldSet {
        if doc.is_empty() {
            return FieldSet::empty(raw_text);
        }

        let recognizer = self.recognizer.as_ref();
        let vitals = extract_vitals(&doc.text);

        FieldSet {
            patient_name: extract_patient_name(doc, recognizer),
            patient_id: extract_patient_id(&doc.lines),
            age: vitals.age,
            sex: vitals.sex,
            diagnosis: extract_diagnosis(doc, recognizer),
            medications: extract_medications(&doc.text, recognizer),
            blood_pressure: vitals.blood_pressure,
            weight: vitals.weight,
            height: vitals.height,
            temperature: vitals.temperature,
            raw_text: raw_text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::enums::Sex;
    use crate::pipeline::extraction::normalize_document;
    use crate::pipeline::structuring::recognizer::tests::MockRecognizer;

    fn run(strategy: &EnhancedStrategy, text: &str) -> FieldSet {
        strategy.extract(text, &normalize_document(text))
    }

    #[test]
    fn extracts_labeled_record() {
        let text = "Name: John Smith\nSex: M\nAge: 52\nMRN: 00451\nBP 140/90\nTemp: 101 F\nDx: Pneumonia";
        let fields = run(&EnhancedStrategy::without_recognizer(), text);

        assert_eq!(fields.patient_name.as_deref(), Some("John Smith"));
        assert_eq!(fields.sex, Some(Sex::Male));
        assert_eq!(fields.age, Some(52));
        assert_eq!(fields.patient_id.as_deref(), Some("00451"));
        assert_eq!(fields.blood_pressure.as_deref(), Some("140/90"));
        assert_eq!(fields.temperature.as_deref(), Some("38.3 C"));
        assert_eq!(fields.diagnosis.as_deref(), Some("Pneumonia"));
        assert_eq!(fields.raw_text, text);
    }

    #[test]
    fn recognizer_supplies_unlabeled_name() {
        let strategy = EnhancedStrategy::new(Arc::new(MockRecognizer::persons(&["Jane Doe"])));
        let fields = run(&strategy, "CITY CLINIC\nSeen: Jane Doe, 30 yrs");
        assert_eq!(fields.patient_name.as_deref(), Some("Jane Doe"));
        assert_eq!(fields.age, Some(30));
    }

    #[test]
    fn blank_input_yields_empty_set() {
        let fields = run(&EnhancedStrategy::default(), "  \n\t\n");
        assert_eq!(fields.present_count(), 0);
        assert_eq!(fields.raw_text, "  \n\t\n");
    }
}
