use thiserror::Error;

use crate::embedding::{EmbeddingError, RerankerError};

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("reranker error: {0}")]
    Reranker(#[from] RerankerError),

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("scoring computation failed: {reason}")]
    ComputationFailed { reason: String },
}
