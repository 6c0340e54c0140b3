use serde::{Deserialize, Serialize};

/// Per-word reliability reported by the OCR engine (0-100).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfidence {
    pub text: String,
    pub confidence: u8,
}

impl TokenConfidence {
    pub fn new(text: &str, confidence: u8) -> Self {
        Self {
            text: text.to_string(),
            confidence: confidence.min(100),
        }
    }
}

/// Text handed over by the OCR collaborator for a single scanned document.
/// Consumed once per parse call and never retained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub text: String,
    #[serde(default)]
    pub token_confidences: Option<Vec<TokenConfidence>>,
}

impl RawDocument {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            token_confidences: None,
        }
    }

    pub fn with_tokens(mut self, tokens: Vec<TokenConfidence>) -> Self {
        self.token_confidences = Some(tokens);
        self
    }

    /// Token confidences, or an empty slice when the OCR engine supplied none.
    pub fn tokens(&self) -> &[TokenConfidence] {
        self.token_confidences.as_deref().unwrap_or(&[])
    }
}

/// OCR text after noise cleanup.
///
/// `text` keeps the line structure (including single blank lines between
/// blocks); `lines` is the same content with blank lines dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedDocument {
    pub text: String,
    pub lines: Vec<String>,
}

impl NormalizedDocument {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
