use super::confidence::estimate_confidence;
use super::quick::QuickStrategy;
use super::recognizer::{noop_recognizer, RecognizerHandle};
use super::strategy::{EnhancedStrategy, FieldStrategy};
use super::types::{ExtractionResult, FieldSet};
use crate::config::ParserConfig;
use crate::pipeline::extraction::{advisory_notes, normalize_document, RawDocument};

/// Orchestrates one parse call:
/// normalize → strategies in order (first non-null wins) → confidence → notes
///
/// Holds no per-call state, so one parser can serve many threads.
pub struct RecordParser {
    strategies: Vec<Box<dyn FieldStrategy>>,
    low_confidence_threshold: u8,
}

impl RecordParser {
    /// Enhanced strategy with `recognizer`, then the quick fallback.
    pub fn new(recognizer: RecognizerHandle) -> Self {
        Self::from_config(&ParserConfig::default(), recognizer)
    }

    pub fn from_config(config: &ParserConfig, recognizer: RecognizerHandle) -> Self {
        let mut strategies: Vec<Box<dyn FieldStrategy>> =
            vec![Box::new(EnhancedStrategy::new(recognizer))];
        if config.quick_fallback {
            strategies.push(Box::new(QuickStrategy));
        }
        Self {
            strategies,
            low_confidence_threshold: config.low_confidence_threshold,
        }
    }

    /// Parser for deployments without an entity recognizer.
    pub fn regex_only() -> Self {
        Self::new(noop_recognizer())
    }

    pub fn with_strategies(
        strategies: Vec<Box<dyn FieldStrategy>>,
        low_confidence_threshold: u8,
    ) -> Self {
        Self {
            strategies,
            low_confidence_threshold,
        }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn parse(&self, document: &RawDocument) -> ExtractionResult {
        let _span =
            tracing::debug_span!("parse_record", chars = document.text.len()).entered();

        // Step 1: Normalize OCR noise
        let normalized = normalize_document(&document.text);

        // Step 2: Run strategies, earlier results win field by field
        let mut fields = FieldSet::empty(&document.text);
        for strategy in &self.strategies {
            if fields.is_complete() {
                break;
            }
            let before = fields.present_count();
            fields = fields.merge_missing(strategy.extract(&document.text, &normalized));
            tracing::debug!(
                strategy = strategy.name(),
                filled = fields.present_count() - before,
                "Strategy applied"
            );
        }

        // Step 3: Score the merged fields against OCR token confidences
        let confidence = estimate_confidence(&fields, document.tokens());

        // Step 4: Advisory notes
        let notes = advisory_notes(confidence.overall, self.low_confidence_threshold);

        tracing::debug!(
            fields_found = fields.present_count(),
            overall_confidence = confidence.overall,
            notes = notes.len(),
            "Record parsed"
        );

        ExtractionResult {
            fields,
            confidence,
            notes,
        }
    }

    /// Parse text that came without token confidences.
    pub fn parse_text(&self, text: &str) -> ExtractionResult {
        self.parse(&RawDocument::new(text))
    }
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::regex_only()
    }
}
