//! Text encoders and model plumbing.
//!
//! - [`sentence`] turns text into fixed-width vectors for coarse retrieval.
//! - [`reranker`] scores (question, passage) pairs with a cross-encoder.

/// BERT bi-encoder and cross-encoder wrappers.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
/// Cross-encoder relevance model.
pub mod reranker;
/// Sentence embedder used for the coarse index.
pub mod sentence;
/// Tokenizer/model loading helpers.
pub mod utils;

pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
pub use reranker::{Reranker, RerankerConfig, RerankerError};
pub use sentence::{SentenceEmbedder, SentenceEmbedderConfig};

/// Maps text to a fixed-width vector.
///
/// Implementations must be deterministic: the same text always yields the
/// same vector, and every vector has [`TextEmbedder::embedding_dim`] entries.
pub trait TextEmbedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    fn embedding_dim(&self) -> usize;
}
