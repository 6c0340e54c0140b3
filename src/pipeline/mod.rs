pub mod extraction; // Raw OCR input, normalization, document-level confidence
pub mod structuring; // Field extraction strategies and orchestration
