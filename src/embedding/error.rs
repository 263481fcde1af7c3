use std::path::PathBuf;
use thiserror::Error;

/// Failures from the sentence embedder and the model plumbing it shares with the reranker.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("model directory not found: {path}")]
    ModelNotFound { path: PathBuf },

    #[error("failed to load sentence embedder: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("embedding forward pass failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    #[error("invalid embedder configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl From<candle_core::Error> for EmbeddingError {
    fn from(err: candle_core::Error) -> Self {
        EmbeddingError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for EmbeddingError {
    fn from(err: std::io::Error) -> Self {
        EmbeddingError::ModelLoadFailed {
            reason: err.to_string(),
        }
    }
}
