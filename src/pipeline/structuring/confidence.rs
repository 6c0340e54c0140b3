use super::types::{ConfidenceMap, FieldSet};
use crate::pipeline::extraction::{mean_confidence, overall_token_confidence, TokenConfidence};

/// Per-field score shaping (0-100 scale).
pub mod field_scores {
    /// Score of a field that was not extracted.
    pub const ABSENT: u8 = 20;

    /// Bounds for an extracted field.
    pub const MIN_PRESENT: u8 = 30;
    pub const MAX_PRESENT: u8 = 95;

    /// score = token_mean * TOKEN_WEIGHT + PRESENCE_BONUS
    pub const TOKEN_WEIGHT: f64 = 0.8;
    pub const PRESENCE_BONUS: f64 = 18.0;
}

/// Score one field from the OCR tokens that occur inside its value.
///
/// Tokens match case-insensitively as substrings of the value. With no
/// matching token the unrounded document-wide mean stands in.
pub fn score_field(value: Option<&str>, tokens: &[TokenConfidence], document_mean: f64) -> u8 {
    let Some(value) = value else {
        return field_scores::ABSENT;
    };

    let haystack = value.to_lowercase();
    let matched = mean_confidence(tokens.iter().filter(|t| {
        let needle = t.text.trim();
        !needle.is_empty() && haystack.contains(&needle.to_lowercase())
    }));
    let average = matched.unwrap_or(document_mean);

    (average * field_scores::TOKEN_WEIGHT + field_scores::PRESENCE_BONUS)
        .round()
        .clamp(
            f64::from(field_scores::MIN_PRESENT),
            f64::from(field_scores::MAX_PRESENT),
        ) as u8
}

/// Confidence for every field of a merged field set.
pub fn estimate_confidence(fields: &FieldSet, tokens: &[TokenConfidence]) -> ConfidenceMap {
    let document_mean = mean_confidence(tokens.iter()).unwrap_or(0.0);
    ConfidenceMap::from_fn(overall_token_confidence(tokens), |field| {
        score_field(fields.value_of(field).as_deref(), tokens, document_mean)
    })
}
