use super::types::TokenConfidence;

/// Document-level OCR confidence thresholds (0-100 scale, as reported by the OCR engine).
pub mod thresholds {
    /// Below this: the scan is unreliable. Recommend recapturing the image.
    pub const LOW_OCR_CONFIDENCE: u8 = 50;
}

/// Advisory attached to results whose overall OCR confidence is low.
pub const LOW_CONFIDENCE_NOTE: &str =
    "Low overall OCR confidence; consider retaking image with better lighting/contrast";

/// Mean of all token confidences, rounded. 0 when the OCR engine reported none.
pub fn overall_token_confidence(tokens: &[TokenConfidence]) -> u8 {
    mean_confidence(tokens.iter()).unwrap_or(0.0).round() as u8
}

/// Mean confidence of the given tokens, each capped at 100. `None` when empty.
pub fn mean_confidence<'a>(tokens: impl Iterator<Item = &'a TokenConfidence>) -> Option<f64> {
    let (sum, count) = tokens.fold((0u64, 0u64), |(sum, count), t| {
        (sum + u64::from(t.confidence.min(100)), count + 1)
    });
    if count == 0 {
        return None;
    }
    Some(sum as f64 / count as f64)
}

/// Notes for the caller. The only advisory is the low-confidence recapture hint.
pub fn advisory_notes(overall: u8, low_threshold: u8) -> Vec<String> {
    let mut notes = Vec::new();
    if overall < low_threshold {
        notes.push(LOW_CONFIDENCE_NOTE.to_string());
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(confs: &[(&str, u8)]) -> Vec<TokenConfidence> {
        confs.iter().map(|(t, c)| TokenConfidence::new(t, *c)).collect()
    }

    #[test]
    fn no_tokens_returns_zero() {
        assert_eq!(overall_token_confidence(&[]), 0);
    }

    #[test]
    fn overall_is_rounded_mean() {
        let toks = tokens(&[("a", 90), ("b", 81), ("c", 70)]);
        // (90 + 81 + 70) / 3 = 80.33
        assert_eq!(overall_token_confidence(&toks), 80);

        let toks = tokens(&[("a", 90), ("b", 81)]);
        // 85.5 rounds away from zero
        assert_eq!(overall_token_confidence(&toks), 86);
    }

    #[test]
    fn overall_stays_within_bounds() {
        let toks = vec![
            TokenConfidence {
                text: "x".into(),
                confidence: 200,
            },
            TokenConfidence {
                text: "y".into(),
                confidence: 100,
            },
        ];
        assert_eq!(overall_token_confidence(&toks), 100);
    }

    #[test]
    fn mean_of_empty_iterator_is_none() {
        assert!(mean_confidence(std::iter::empty()).is_none());
    }

    #[test]
    fn low_confidence_produces_note() {
        let notes = advisory_notes(42, thresholds::LOW_OCR_CONFIDENCE);
        assert_eq!(notes, vec![LOW_CONFIDENCE_NOTE.to_string()]);
    }

    #[test]
    fn threshold_boundary_produces_no_note() {
        assert!(advisory_notes(50, thresholds::LOW_OCR_CONFIDENCE).is_empty());
        assert!(advisory_notes(93, thresholds::LOW_OCR_CONFIDENCE).is_empty());
    }
}
