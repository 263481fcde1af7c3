use thiserror::Error;

use crate::corpus::CorpusError;
use crate::embedding::{EmbeddingError, RerankerError};
use crate::generation::GenerationError;
use crate::index::IndexError;
use crate::retrieval::RetrievalError;

/// Failure to construct a pipeline or load a corpus into it.
///
/// A failed load leaves the previously installed index in place.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("corpus error: {0}")]
    Corpus(#[from] CorpusError),

    #[error("index build failed: {0}")]
    Index(#[from] IndexError),

    #[error("embedder unavailable: {0}")]
    Embedder(#[from] EmbeddingError),

    #[error("reranker unavailable: {0}")]
    Reranker(#[from] RerankerError),

    #[error("generator unavailable: {0}")]
    Generator(#[from] GenerationError),

    #[error("invalid pipeline configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// A collaborator call that failed or ran out of time during a query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollaboratorFailure {
    #[error("embedding failed: {reason}")]
    Embedding { reason: String },

    #[error("index search failed: {reason}")]
    Search { reason: String },

    #[error("reranking failed: {reason}")]
    Reranking { reason: String },

    #[error("generation failed: {reason}")]
    Generation { reason: String },

    #[error("{stage} timed out after {after_ms} ms")]
    Timeout { stage: &'static str, after_ms: u64 },

    #[error("{stage} task aborted: {reason}")]
    Aborted { stage: &'static str, reason: String },
}

impl From<RetrievalError> for CollaboratorFailure {
    fn from(err: RetrievalError) -> Self {
        let reason = err.to_string();
        match err {
            RetrievalError::Embedding(_) => Self::Embedding { reason },
            RetrievalError::Index(_) => Self::Search { reason },
            RetrievalError::InvalidTopK => Self::Aborted {
                stage: "retrieval",
                reason,
            },
        }
    }
}
