//! Named-entity recognition capability.
//!
//! The pipeline does not ship an NER model. It consumes whatever implements
//! [`EntityRecognizer`] and only looks at person-name spans (plus sentence
//! segmentation for the diagnosis fallback). [`NoopRecognizer`] stands in when
//! no model is available, so call sites never special-case absence.

use std::sync::{Arc, LazyLock, OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Entity categories a recognizer may report. Only `Person` is consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityLabel {
    Person,
    Organization,
    Location,
    Date,
    Other(String),
}

/// One span returned by the recognizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizedEntity {
    pub text: String,
    pub label: EntityLabel,
}

impl RecognizedEntity {
    pub fn new(text: &str, label: EntityLabel) -> Self {
        Self {
            text: text.to_string(),
            label,
        }
    }
}

#[derive(Error, Debug)]
pub enum RecognizerLoadError {
    #[error("Recognizer model not found: {0}")]
    ModelNotFound(String),

    #[error("Recognizer initialization failed: {0}")]
    Init(String),
}

/// Given text, return entities. Implementations must be shareable across
/// worker threads and treat their model as read-only after load.
pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Vec<RecognizedEntity>;

    /// Sentence segmentation. Defaults to punctuation/line splitting.
    fn sentences(&self, text: &str) -> Vec<String> {
        split_sentences(text)
    }

    /// `false` only for the stand-in used when no model could be loaded.
    fn is_available(&self) -> bool {
        true
    }

    /// Person-name spans in document order.
    fn person_spans(&self, text: &str) -> Vec<String> {
        self.recognize(text)
            .into_iter()
            .filter(|e| e.label == EntityLabel::Person)
            .map(|e| e.text.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

pub type RecognizerHandle = Arc<dyn EntityRecognizer>;

/// Recognizer used when no NER model is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecognizer;

impl EntityRecognizer for NoopRecognizer {
    fn recognize(&self, _text: &str) -> Vec<RecognizedEntity> {
        Vec::new()
    }

    fn is_available(&self) -> bool {
        false
    }
}

pub fn noop_recognizer() -> RecognizerHandle {
    Arc::new(NoopRecognizer)
}

/// Turn a load attempt into a usable handle. A failure is logged and replaced
/// by [`NoopRecognizer`]; callers then run label/regex strategies only.
pub fn resolve_recognizer(
    loaded: Result<RecognizerHandle, RecognizerLoadError>,
) -> RecognizerHandle {
    match loaded {
        Ok(recognizer) => {
            tracing::info!("Entity recognizer loaded");
            recognizer
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Entity recognizer unavailable, falling back to label and regex extraction"
            );
            noop_recognizer()
        }
    }
}

static SHARED_RECOGNIZER: OnceLock<RecognizerHandle> = OnceLock::new();

/// Process-wide recognizer. `loader` runs at most once per process; later
/// calls return the same handle (including the no-op stand-in after a failed
/// load, so a broken model is never retried).
pub fn shared_recognizer<F>(loader: F) -> RecognizerHandle
where
    F: FnOnce() -> Result<RecognizerHandle, RecognizerLoadError>,
{
    SHARED_RECOGNIZER
        .get_or_init(|| resolve_recognizer(loader()))
        .clone()
}

/// Sentence terminator followed by whitespace.
static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+\s+").expect("valid regex"));

/// Split text into sentences: every line is at least one sentence, and lines
/// are further split after `.`, `!` or `?` followed by whitespace.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    for line in text.lines() {
        let mut start = 0;
        for m in SENTENCE_BREAK.find_iter(line) {
            push_sentence(&mut sentences, &line[start..m.end()]);
            start = m.end();
        }
        push_sentence(&mut sentences, &line[start..]);
    }
    sentences
}

fn push_sentence(sentences: &mut Vec<String>, candidate: &str) {
    let trimmed = candidate.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}
