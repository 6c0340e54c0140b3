pub mod config;
pub mod models;
pub mod pipeline;

pub use config::ParserConfig;
pub use models::enums::Sex;
pub use pipeline::extraction::{RawDocument, TokenConfidence};
pub use pipeline::structuring::{
    noop_recognizer, shared_recognizer, ConfidenceMap, EntityRecognizer, ExtractionResult,
    FieldSet, RecordParser, StructuringError,
};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Logs go to stderr so stdout can
/// carry the JSON result.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();
}
