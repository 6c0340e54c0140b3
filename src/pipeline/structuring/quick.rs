//! Quick regex-only pass over the raw text.
//!
//! Runs after the enhanced strategy and only fills fields it left empty. It
//! knows a narrower set of fields (no identifier, height or temperature) but
//! its patterns are looser and catch layouts the label-driven pass misses.

use std::sync::LazyLock;

use regex::Captures;

use super::medications::join_items;
use super::patterns::{first_match, group, pattern, FieldPattern};
use super::strategy::FieldStrategy;
use super::types::FieldSet;
use super::vitals::{
    extract_sex, format_kg, parse_age, plausible_systolic_diastolic, pounds_to_kg,
    systolic_diastolic,
};
use crate::pipeline::extraction::NormalizedDocument;

/// A weight with no unit below this is kilograms, at or above it pounds.
/// Heuristic: misreads very heavy patients recorded in kg.
pub const UNITLESS_WEIGHT_KG_LIMIT: f64 = 200.0;

static NAME_PATTERNS: LazyLock<Vec<FieldPattern<String>>> = LazyLock::new(|| {
    vec![pattern(
        r"\bName[:\s]+([A-Z][A-Za-z ,.'\-]{1,80})",
        capitalized_name,
        "name after 'Name'",
    )]
});

static AGE_PATTERNS: LazyLock<Vec<FieldPattern<u32>>> = LazyLock::new(|| {
    vec![
        pattern(r"(?i)\bAge[:\s]*(\d{1,3})\b", parse_age, "labeled age"),
        pattern(
            r"(?i)\b(\d{1,3})\s*(?:years old|years|yrs|y/o|yo)\b",
            parse_age,
            "age in years",
        ),
        pattern(r"(?i)\b(\d{1,3})[- ]?y\b", parse_age, "compact age"),
    ]
});

static BLOOD_PRESSURE_PATTERNS: LazyLock<Vec<FieldPattern<String>>> = LazyLock::new(|| {
    vec![
        pattern(
            r"(?i)\b(?:BP|B\.P\.?|Blood[\s\-]Pressure)[:\s\-]*(\d{2,3})\s*(?:/|over)\s*(\d{2,3})\b",
            systolic_diastolic,
            "labeled blood pressure",
        ),
        pattern(
            r"(?i)\b(\d{2,3})\s*over\s*(\d{2,3})\b",
            systolic_diastolic,
            "'over' blood pressure",
        ),
        pattern(
            r"(?i)\b(\d{2,3})\s*/\s*(\d{2,3})\s*mm\s*Hg\b",
            systolic_diastolic,
            "mmHg blood pressure",
        ),
        pattern(
            r"\b(\d{2,3})\s*/\s*(\d{2,3})\b",
            plausible_systolic_diastolic,
            "bare blood pressure",
        ),
    ]
});

static WEIGHT_PATTERNS: LazyLock<Vec<FieldPattern<String>>> = LazyLock::new(|| {
    vec![
        pattern(
            r"(?i)\b(?:Weight|Wt)\.?[:\s\-]*(\d{1,3}(?:\.\d+)?)\s*(kgs?|kilograms?|lbs?|pounds?)?\b",
            weight_with_unit_guess,
            "labeled weight",
        ),
        pattern(
            r"(?i)\b(\d{1,3}(?:\.\d+)?)\s*(kgs?|kilograms?|lbs?|pounds?)\b",
            weight_with_unit_guess,
            "bare weight",
        ),
    ]
});

static DIAGNOSIS_PATTERNS: LazyLock<Vec<FieldPattern<String>>> = LazyLock::new(|| {
    vec![pattern(
        r"(?i)\b(?:Diagnosis|Dx|Impression)[:\s]*([^\n]+)",
        rest_of_line,
        "diagnosis line",
    )]
});

static PRESCRIPTION_PATTERNS: LazyLock<Vec<FieldPattern<String>>> = LazyLock::new(|| {
    vec![pattern(
        r"(?i)\b(?:Rx|Prescription)[:\s]*([^\n]+)",
        prescription_line,
        "prescription line",
    )]
});

fn capitalized_name(_: &str, caps: &Captures<'_>) -> Option<String> {
    let name = group(caps, 1)?.trim_end_matches([',', '.', ' ']);
    (name.chars().count() > 1).then(|| name.to_string())
}

fn weight_with_unit_guess(_: &str, caps: &Captures<'_>) -> Option<String> {
    let value: f64 = group(caps, 1)?.parse().ok()?;
    let is_pounds = match group(caps, 2).map(str::to_ascii_lowercase) {
        Some(unit) => unit.starts_with("lb") || unit.starts_with("pound"),
        None => value >= UNITLESS_WEIGHT_KG_LIMIT,
    };
    if is_pounds {
        Some(format_kg(pounds_to_kg(value)))
    } else {
        Some(format_kg(value))
    }
}

fn rest_of_line(_: &str, caps: &Captures<'_>) -> Option<String> {
    let value = group(caps, 1)?;
    value
        .chars()
        .any(char::is_alphanumeric)
        .then(|| value.to_string())
}

fn prescription_line(_: &str, caps: &Captures<'_>) -> Option<String> {
    join_items([group(caps, 1)?])
}

/// Regex-only fallback strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuickStrategy;

impl FieldStrategy for QuickStrategy {
    fn name(&self) -> &'static str {
        "quick"
    }

    fn extract(&self, raw_text: &str, _doc: &NormalizedDocument) -> FieldSet {
        let text = raw_text.replace("\r\n", "\n").replace('\r', "\n");

        FieldSet {
            patient_name: first_match(&NAME_PATTERNS, &text),
            age: first_match(&AGE_PATTERNS, &text),
            sex: extract_sex(&text),
            diagnosis: first_match(&DIAGNOSIS_PATTERNS, &text),
            medications: first_match(&PRESCRIPTION_PATTERNS, &text),
            blood_pressure: first_match(&BLOOD_PRESSURE_PATTERNS, &text),
            weight: first_match(&WEIGHT_PATTERNS, &text),
            ..FieldSet::empty(raw_text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::Sex;
    use crate::pipeline::extraction::normalize_document;

    fn quick(text: &str) -> FieldSet {
        QuickStrategy.extract(text, &normalize_document(text))
    }

    #[test]
    fn reads_core_fields() {
        let fields = quick("Name: Jane Doe\r\nAge 30\r\nSex: F\r\nBP 120/80\r\nWt 68\r\nDx: Viral fever\r\nRx: Paracetamol 500 mg");
        assert_eq!(fields.patient_name.as_deref(), Some("Jane Doe"));
        assert_eq!(fields.age, Some(30));
        assert_eq!(fields.sex, Some(Sex::Female));
        assert_eq!(fields.blood_pressure.as_deref(), Some("120/80"));
        assert_eq!(fields.weight.as_deref(), Some("68.0 kg"));
        assert_eq!(fields.diagnosis.as_deref(), Some("Viral fever"));
        assert_eq!(fields.medications.as_deref(), Some("Paracetamol 500 mg"));
    }

    #[test]
    fn never_fills_identifier_height_or_temperature() {
        let fields = quick("PID: PID-12345\nHeight: 170 cm\nTemp: 37 C");
        assert_eq!(fields.patient_id, None);
        assert_eq!(fields.height, None);
        assert_eq!(fields.temperature, None);
    }

    #[test]
    fn compact_age_form() {
        assert_eq!(quick("M 45y, walk-in").age, Some(45));
        assert_eq!(quick("F, 8-y old").age, Some(8));
    }

    #[test]
    fn unitless_weight_uses_limit() {
        assert_eq!(quick("Weight: 199").weight.as_deref(), Some("199.0 kg"));
        assert_eq!(quick("Weight: 200").weight.as_deref(), Some("90.72 kg"));
        assert_eq!(quick("Weight: 150 lbs").weight.as_deref(), Some("68.04 kg"));
        assert_eq!(quick("about 70 kgs").weight.as_deref(), Some("70.0 kg"));
    }

    #[test]
    fn mmhg_blood_pressure() {
        assert_eq!(quick("sitting 130 / 85 mm Hg").blood_pressure.as_deref(), Some("130/85"));
        assert_eq!(quick("BP over: none").blood_pressure, None);
    }

    #[test]
    fn name_requires_capital_initial() {
        assert_eq!(quick("name: jane doe").patient_name, None);
        assert_eq!(quick("Name: Jane Doe, ").patient_name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn empty_text_is_empty_set() {
        let fields = quick("");
        assert_eq!(fields.present_count(), 0);
    }
}
