//! Demographics and vital signs: age, sex, blood pressure, weight, height and
//! temperature.
//!
//! Every measurement is emitted in one canonical unit (kg, cm, Celsius) with
//! the unit carried in the string.

use std::sync::LazyLock;

use regex::Captures;

use super::patterns::{first_match, group, pattern, FieldPattern};
use crate::models::enums::Sex;

/// Pounds to kilograms.
pub const LB_TO_KG: f64 = 0.45359237;

/// Inches to centimeters.
pub const CM_PER_INCH: f64 = 2.54;

/// A unitless temperature above this is taken as Fahrenheit. Heuristic: it
/// misreads deliberately recorded hot Celsius values (e.g. 65 C equipment).
pub const FAHRENHEIT_THRESHOLD: f64 = 60.0;

const INCHES_PER_FOOT: f64 = 12.0;

/// Plausible range for an unlabeled `S/D` reading.
const SYSTOLIC_RANGE: std::ops::RangeInclusive<u32> = 50..=300;
const DIASTOLIC_RANGE: std::ops::RangeInclusive<u32> = 20..=200;

/// Vital signs found in one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vitals {
    pub age: Option<u32>,
    pub sex: Option<Sex>,
    pub blood_pressure: Option<String>,
    pub weight: Option<String>,
    pub height: Option<String>,
    pub temperature: Option<String>,
}

/// Run every vitals extractor over normalized text.
pub fn extract_vitals(text: &str) -> Vitals {
    Vitals {
        age: extract_age(text),
        sex: extract_sex(text),
        blood_pressure: extract_blood_pressure(text),
        weight: extract_weight(text),
        height: extract_height(text),
        temperature: extract_temperature(text),
    }
}

pub fn pounds_to_kg(lb: f64) -> f64 {
    round_to(lb * LB_TO_KG, 2)
}

pub fn fahrenheit_to_celsius(f: f64) -> f64 {
    round_to((f - 32.0) * 5.0 / 9.0, 1)
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// `68.0 kg`, `68.04 kg`.
pub fn format_kg(kg: f64) -> String {
    format!("{:?} kg", round_to(kg, 2))
}

/// `170 cm`, `170.5 cm`.
pub fn format_cm(cm: f64) -> String {
    format!("{} cm", round_to(cm, 1))
}

/// `37.0 C`, `38.3 C`.
pub fn format_celsius(c: f64) -> String {
    format!("{:?} C", round_to(c, 1))
}

// ═══════════════════════════════════════════
// Age
// ═══════════════════════════════════════════

static AGE_PATTERNS: LazyLock<Vec<FieldPattern<u32>>> = LazyLock::new(|| {
    vec![
        pattern(r"(?i)\bAge[:\s\-]*(\d{1,3})\b", parse_age, "labeled age"),
        pattern(
            r"(?i)\b(\d{1,3})\s*(?:years|yrs|y/o|yo)\b",
            parse_age,
            "age in years",
        ),
    ]
});

pub(crate) fn parse_age(_: &str, caps: &Captures<'_>) -> Option<u32> {
    group(caps, 1)?.parse().ok()
}

pub fn extract_age(text: &str) -> Option<u32> {
    first_match(&AGE_PATTERNS, text)
}

// ═══════════════════════════════════════════
// Sex
// ═══════════════════════════════════════════

static SEX_PATTERNS: LazyLock<Vec<FieldPattern<Sex>>> = LazyLock::new(|| {
    vec![
        pattern(
            r"(?i)\b(?:sex|gender)\s*[:\-]?\s*(male|female|unknown|m|f|u)\b",
            labeled_sex,
            "labeled sex",
        ),
        // Words match in any case, single letters only in upper case.
        pattern(r"\b((?i:male|female)|M|F)\b", bare_sex, "bare sex marker"),
    ]
});

fn labeled_sex(_: &str, caps: &Captures<'_>) -> Option<Sex> {
    Sex::from_marker(group(caps, 1)?)
}

fn bare_sex(text: &str, caps: &Captures<'_>) -> Option<Sex> {
    let m = caps.get(1)?;
    if m.as_str().len() == 1 && follows_measurement(text, m.start()) {
        // "101 F", "37°C": a unit, not a sex marker
        return None;
    }
    match Sex::from_marker(m.as_str())? {
        Sex::Unknown => None,
        sex => Some(sex),
    }
}

fn follows_measurement(text: &str, start: usize) -> bool {
    text[..start]
        .trim_end_matches([' ', '\t'])
        .chars()
        .next_back()
        .is_some_and(|c| c.is_ascii_digit() || c == '°')
}

pub fn extract_sex(text: &str) -> Option<Sex> {
    first_match(&SEX_PATTERNS, text)
}

// ═══════════════════════════════════════════
// Blood pressure
// ═══════════════════════════════════════════

static BLOOD_PRESSURE_PATTERNS: LazyLock<Vec<FieldPattern<String>>> = LazyLock::new(|| {
    vec![
        pattern(
            r"(?i)\b(?:BP|B\.P\.?|Blood[\s\-]Pressure)[:\s\-]*(\d{2,3})\s*/\s*(\d{2,3})\b",
            systolic_diastolic,
            "labeled blood pressure",
        ),
        pattern(
            r"(?i)\b(\d{2,3})\s*over\s*(\d{2,3})\b",
            systolic_diastolic,
            "'over' blood pressure",
        ),
        pattern(
            r"\b(\d{2,3})\s*[/:]\s*(\d{2,3})\b",
            plausible_systolic_diastolic,
            "bare blood pressure",
        ),
    ]
});

pub(crate) fn systolic_diastolic(_: &str, caps: &Captures<'_>) -> Option<String> {
    let systolic: u32 = group(caps, 1)?.parse().ok()?;
    let diastolic: u32 = group(caps, 2)?.parse().ok()?;
    Some(format!("{systolic}/{diastolic}"))
}

/// Unlabeled `NN/NN` also matches dates and times, so the pair must look like
/// a reading.
pub(crate) fn plausible_systolic_diastolic(text: &str, caps: &Captures<'_>) -> Option<String> {
    let systolic: u32 = group(caps, 1)?.parse().ok()?;
    let diastolic: u32 = group(caps, 2)?.parse().ok()?;
    if !SYSTOLIC_RANGE.contains(&systolic)
        || !DIASTOLIC_RANGE.contains(&diastolic)
        || systolic <= diastolic
    {
        return None;
    }
    systolic_diastolic(text, caps)
}

pub fn extract_blood_pressure(text: &str) -> Option<String> {
    first_match(&BLOOD_PRESSURE_PATTERNS, text)
}

// ═══════════════════════════════════════════
// Weight
// ═══════════════════════════════════════════

static WEIGHT_PATTERNS: LazyLock<Vec<FieldPattern<String>>> = LazyLock::new(|| {
    vec![
        pattern(
            r"(?i)\b(?:Weight|Wt)\.?[:\s\-]*(\d{1,3}(?:\.\d+)?)\s*(kgs?|kilograms?|lbs?|pounds?)?\b",
            labeled_weight,
            "labeled weight",
        ),
        pattern(
            r"(?i)\b(\d{1,3}(?:\.\d+)?)\s*(?:kgs?|kilograms?)\b",
            kilograms,
            "bare kilograms",
        ),
        pattern(
            r"(?i)\b(\d{2,3}(?:\.\d+)?)\s*(?:lbs?|pounds?)\b",
            pounds,
            "bare pounds",
        ),
    ]
});

fn is_pound_unit(unit: &str) -> bool {
    let unit = unit.to_ascii_lowercase();
    unit.starts_with("lb") || unit.starts_with("pound")
}

/// Missing unit means kilograms.
fn labeled_weight(_: &str, caps: &Captures<'_>) -> Option<String> {
    let value: f64 = group(caps, 1)?.parse().ok()?;
    match group(caps, 2) {
        Some(unit) if is_pound_unit(unit) => Some(format_kg(pounds_to_kg(value))),
        _ => Some(format_kg(value)),
    }
}

fn kilograms(_: &str, caps: &Captures<'_>) -> Option<String> {
    let value: f64 = group(caps, 1)?.parse().ok()?;
    Some(format_kg(value))
}

fn pounds(_: &str, caps: &Captures<'_>) -> Option<String> {
    let value: f64 = group(caps, 1)?.parse().ok()?;
    Some(format_kg(pounds_to_kg(value)))
}

pub fn extract_weight(text: &str) -> Option<String> {
    first_match(&WEIGHT_PATTERNS, text)
}

// ═══════════════════════════════════════════
// Height
// ═══════════════════════════════════════════

static HEIGHT_PATTERNS: LazyLock<Vec<FieldPattern<String>>> = LazyLock::new(|| {
    vec![
        pattern(
            r"(?i)\b(?:Height|Ht)\.?[:\s\-]*(\d{2,3}(?:\.\d+)?)\s*(cm|centimeters?|inches|inch|in)?\b",
            labeled_height,
            "labeled height",
        ),
        pattern(
            r#"(?i)\b(\d)\s*(?:ft\.?|feet|foot|')[ ]*(?:(\d{1,2})[ ]*(?:inches\b|inch\b|in\b|")?)?"#,
            feet_and_inches,
            "feet and inches",
        ),
        pattern(
            r"(?i)\b(\d{2,3}(?:\.\d+)?)\s*(?:cm|centimeters?)\b",
            centimeters,
            "bare centimeters",
        ),
    ]
});

/// Missing unit means centimeters.
fn labeled_height(_: &str, caps: &Captures<'_>) -> Option<String> {
    let value: f64 = group(caps, 1)?.parse().ok()?;
    match group(caps, 2) {
        Some(unit) if unit.to_ascii_lowercase().starts_with("in") => {
            Some(format_cm((value * CM_PER_INCH).round()))
        }
        _ => Some(format_cm(value)),
    }
}

fn feet_and_inches(_: &str, caps: &Captures<'_>) -> Option<String> {
    let feet: f64 = group(caps, 1)?.parse().ok()?;
    let inches: f64 = match group(caps, 2) {
        Some(raw) => raw.parse().ok()?,
        None => 0.0,
    };
    if inches >= INCHES_PER_FOOT {
        return None;
    }
    Some(format_cm(((feet * INCHES_PER_FOOT + inches) * CM_PER_INCH).round()))
}

fn centimeters(_: &str, caps: &Captures<'_>) -> Option<String> {
    let value: f64 = group(caps, 1)?.parse().ok()?;
    Some(format_cm(value))
}

pub fn extract_height(text: &str) -> Option<String> {
    first_match(&HEIGHT_PATTERNS, text)
}

// ═══════════════════════════════════════════
// Temperature
// ═══════════════════════════════════════════

static TEMPERATURE_PATTERNS: LazyLock<Vec<FieldPattern<String>>> = LazyLock::new(|| {
    vec![
        pattern(
            r"(?i)\bTemp(?:erature)?\.?[:\s\-]*(\d{2,3}(?:\.\d+)?)\s*(?:°|deg(?:rees)?)?\s*([CF])?\b",
            temperature,
            "labeled temperature",
        ),
        pattern(
            r"(?i)\b(\d{2,3}(?:\.\d+)?)\s*(?:°|deg(?:rees)?)\s*([CF])\b",
            temperature,
            "degree temperature",
        ),
        pattern(
            r"\b(\d{2,3}(?:\.\d+)?)\s*([CF])\b",
            temperature,
            "bare temperature",
        ),
    ]
});

/// Fahrenheit when marked `F` or when the value is too high to be Celsius.
fn temperature(_: &str, caps: &Captures<'_>) -> Option<String> {
    let value: f64 = group(caps, 1)?.parse().ok()?;
    let marked_fahrenheit = group(caps, 2).is_some_and(|u| u.eq_ignore_ascii_case("f"));
    if marked_fahrenheit || value > FAHRENHEIT_THRESHOLD {
        Some(format_celsius(fahrenheit_to_celsius(value)))
    } else {
        Some(format_celsius(value))
    }
}

pub fn extract_temperature(text: &str) -> Option<String> {
    first_match(&TEMPERATURE_PATTERNS, text)
}
