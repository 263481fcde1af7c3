use thiserror::Error;

use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
/// Errors returned while building or querying an [`EmbeddingIndex`](super::EmbeddingIndex).
pub enum IndexError {
    /// The embedder failed on a chunk or query.
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Vector dimension mismatch.
    #[error("invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// Two chunks share an id.
    #[error("duplicate chunk id: {id}")]
    DuplicateChunk {
        /// Offending chunk id.
        id: u64,
    },

    /// The embedder reported a zero-width output.
    #[error("embedder reports zero dimensions")]
    ZeroDimension,

    #[error("unknown distance metric: {value}")]
    UnknownMetric { value: String },
}
