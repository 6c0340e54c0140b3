use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::models::enums::{RecordField, Sex};

/// Structured fields pulled out of one OCR'd medical record.
///
/// Every field is independently optional. Measurements always carry their
/// canonical unit: weight in kg, height in cm, temperature in Celsius.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSet {
    pub patient_name: Option<String>,
    pub patient_id: Option<String>,
    pub age: Option<u32>,
    pub sex: Option<Sex>,
    pub diagnosis: Option<String>,
    /// Deduplicated items joined with `"; "`.
    pub medications: Option<String>,
    /// `"systolic/diastolic"`.
    pub blood_pressure: Option<String>,
    /// `"<value> kg"`.
    pub weight: Option<String>,
    /// `"<value> cm"`.
    pub height: Option<String>,
    /// `"<value> C"`.
    pub temperature: Option<String>,
    /// Input text, passed through untouched.
    pub raw_text: String,
}

impl FieldSet {
    /// A field set with nothing extracted.
    pub fn empty(raw_text: &str) -> Self {
        Self {
            raw_text: raw_text.to_string(),
            ..Self::default()
        }
    }

    /// Fill every missing field from `fallback`. Fields already present win;
    /// `raw_text` is kept from `self`.
    pub fn merge_missing(self, fallback: FieldSet) -> FieldSet {
        FieldSet {
            patient_name: self.patient_name.or(fallback.patient_name),
            patient_id: self.patient_id.or(fallback.patient_id),
            age: self.age.or(fallback.age),
            sex: self.sex.or(fallback.sex),
            diagnosis: self.diagnosis.or(fallback.diagnosis),
            medications: self.medications.or(fallback.medications),
            blood_pressure: self.blood_pressure.or(fallback.blood_pressure),
            weight: self.weight.or(fallback.weight),
            height: self.height.or(fallback.height),
            temperature: self.temperature.or(fallback.temperature),
            raw_text: self.raw_text,
        }
    }

    /// String view of a field, as used for token matching.
    pub fn value_of(&self, field: RecordField) -> Option<Cow<'_, str>> {
        match field {
            RecordField::PatientName => borrowed(&self.patient_name),
            RecordField::PatientId => borrowed(&self.patient_id),
            RecordField::Age => self.age.map(|a| Cow::Owned(a.to_string())),
            RecordField::Sex => self.sex.map(|s| Cow::Borrowed(s.as_str())),
            RecordField::Diagnosis => borrowed(&self.diagnosis),
            RecordField::Medications => borrowed(&self.medications),
            RecordField::BloodPressure => borrowed(&self.blood_pressure),
            RecordField::Weight => borrowed(&self.weight),
            RecordField::Height => borrowed(&self.height),
            RecordField::Temperature => borrowed(&self.temperature),
        }
    }

    /// Number of scored fields that were extracted.
    pub fn present_count(&self) -> usize {
        RecordField::ALL
            .iter()
            .filter(|f| self.value_of(**f).is_some())
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.present_count() == RecordField::ALL.len()
    }
}

fn borrowed(value: &Option<String>) -> Option<Cow<'_, str>> {
    value.as_deref().map(Cow::Borrowed)
}

/// Per-field reliability scores (0-100) plus the document-wide OCR score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceMap {
    pub overall: u8,
    pub patient_name: u8,
    pub patient_id: u8,
    pub age: u8,
    pub sex: u8,
    pub diagnosis: u8,
    pub medications: u8,
    pub blood_pressure: u8,
    pub weight: u8,
    pub height: u8,
    pub temperature: u8,
}

impl ConfidenceMap {
    /// Build a map by scoring each field with `score`.
    pub fn from_fn(overall: u8, mut score: impl FnMut(RecordField) -> u8) -> Self {
        Self {
            overall,
            patient_name: score(RecordField::PatientName),
            patient_id: score(RecordField::PatientId),
            age: score(RecordField::Age),
            sex: score(RecordField::Sex),
            diagnosis: score(RecordField::Diagnosis),
            medications: score(RecordField::Medications),
            blood_pressure: score(RecordField::BloodPressure),
            weight: score(RecordField::Weight),
            height: score(RecordField::Height),
            temperature: score(RecordField::Temperature),
        }
    }

    pub fn get(&self, field: RecordField) -> u8 {
        match field {
            RecordField::PatientName => self.patient_name,
            RecordField::PatientId => self.patient_id,
            RecordField::Age => self.age,
            RecordField::Sex => self.sex,
            RecordField::Diagnosis => self.diagnosis,
            RecordField::Medications => self.medications,
            RecordField::BloodPressure => self.blood_pressure,
            RecordField::Weight => self.weight,
            RecordField::Height => self.height,
            RecordField::Temperature => self.temperature,
        }
    }
}

/// Complete output of one parse call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub fields: FieldSet,
    pub confidence: ConfidenceMap,
    pub notes: Vec<String>,
}
