use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::index::IndexError;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("question embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("index search failed: {0}")]
    Index(#[from] IndexError),

    #[error("top_k must be greater than 0")]
    InvalidTopK,
}
