use std::sync::Arc;

use crate::embedding::TextEmbedder;
use crate::embedding::utils::cosine_similarity;

use super::error::ScoringError;

/// Independent text-to-text similarity, used only to annotate answers.
pub trait SimilarityComparator: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> Result<f32, ScoringError>;
}

/// Cosine similarity of two embeddings, in `[-1, 1]`.
pub struct EmbeddingComparator {
    embedder: Arc<dyn TextEmbedder>,
}

impl EmbeddingComparator {
    pub fn new(embedder: Arc<dyn TextEmbedder>) -> Self {
        Self { embedder }
    }
}

impl SimilarityComparator for EmbeddingComparator {
    fn similarity(&self, a: &str, b: &str) -> Result<f32, ScoringError> {
        let a = self.embedder.embed(a)?;
        let b = self.embedder.embed(b)?;
        Ok(cosine_similarity(&a, &b))
    }
}
