use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::{EmbeddingError, TextEmbedder};

/// Embedder returning preset vectors, for tests.
///
/// Unknown texts embed to the zero vector.
#[derive(Debug, Default)]
pub struct MockEmbedder {
    dim: usize,
    vectors: HashMap<String, Vec<f32>>,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl MockEmbedder {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            ..Default::default()
        }
    }

    pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.into(), vector);
        self
    }

    /// Makes every subsequent call fail.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextEmbedder for MockEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail.load(Ordering::SeqCst) {
            return Err(EmbeddingError::InferenceFailed {
                reason: "mock embedder failure".to_string(),
            });
        }

        Ok(self
            .vectors
            .get(text)
            .cloned()
            .unwrap_or_else(|| vec![0.0; self.dim]))
    }

    fn embedding_dim(&self) -> usize {
        self.dim
    }
}
