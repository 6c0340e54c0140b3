pub mod types;
pub mod patterns;
pub mod label;
pub mod identity;
pub mod vitals;
pub mod medications;
pub mod diagnosis;
pub mod recognizer;
pub mod confidence;
pub mod strategy;
pub mod quick;
pub mod orchestrator;


pub use types::*;
pub use label::*;
pub use identity::*;
pub use vitals::*;
pub use medications::*;
pub use diagnosis::*;
pub use recognizer::*;
pub use confidence::*;
pub use strategy::*;
pub use quick::*;
pub use orchestrator::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StructuringError {
    #[error("Invalid parser configuration: {0}")]
    Config(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
