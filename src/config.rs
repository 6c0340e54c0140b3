use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::pipeline::extraction::thresholds::LOW_OCR_CONFIDENCE;
use crate::pipeline::structuring::StructuringError;

/// Application-level constants
pub const APP_NAME: &str = "medscan";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "medscan_lib=info,medscan=info"
}

/// Tunables for [`RecordParser`](crate::pipeline::structuring::RecordParser).
/// Every field has a default, so a config file only lists what it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Run the quick regex-only pass after the enhanced one.
    pub quick_fallback: bool,
    /// Overall OCR confidence (0-100) under which the recapture note is added.
    pub low_confidence_threshold: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            quick_fallback: true,
            low_confidence_threshold: LOW_OCR_CONFIDENCE,
        }
    }
}

impl ParserConfig {
    /// Load a JSON config file.
    pub fn load(path: &Path) -> Result<Self, StructuringError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, StructuringError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| StructuringError::JsonParsing(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), StructuringError> {
        if self.low_confidence_threshold > 100 {
            return Err(StructuringError::Config(format!(
                "low_confidence_threshold must be 0-100, got {}",
                self.low_confidence_threshold
            )));
        }
        Ok(())
    }
}
