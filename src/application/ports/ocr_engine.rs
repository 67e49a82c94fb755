use async_trait::async_trait;

use crate::domain::Language;

#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognizes the text of one encoded image (PNG, JPEG, TIFF, ...).
    async fn recognize(&self, image: &[u8], language: &Language)
    -> Result<String, OcrEngineError>;
}

#[derive(Debug, thiserror::Error)]
pub enum OcrEngineError {
    #[error("engine could not be started: {0}")]
    SpawnFailed(String),
    #[error("recognition failed: {0}")]
    RecognitionFailed(String),
    #[error("engine produced invalid output: {0}")]
    InvalidOutput(String),
}
