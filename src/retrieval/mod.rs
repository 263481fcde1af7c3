//! Coarse retrieval: embed the question, search the installed index.

pub mod error;


pub use error::RetrievalError;

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::corpus::Chunk;
use crate::embedding::TextEmbedder;
use crate::index::IndexHandle;

/// A chunk surfaced by the coarse pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalCandidate {
    pub chunk: Chunk,
    /// Raw index distance (smaller is closer).
    pub distance: f32,
    /// Distance mapped back through the index metric.
    pub similarity: f32,
}

pub struct CoarseRetriever {
    embedder: Arc<dyn TextEmbedder>,
    index: IndexHandle,
}

impl std::fmt::Debug for CoarseRetriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoarseRetriever")
            .field("embedding_dim", &self.embedder.embedding_dim())
            .field("index_ready", &self.index.is_ready())
            .finish()
    }
}

impl CoarseRetriever {
    /// `embedder` must be the one the index was built with.
    pub fn new(embedder: Arc<dyn TextEmbedder>, index: IndexHandle) -> Self {
        Self { embedder, index }
    }

    pub fn index(&self) -> &IndexHandle {
        &self.index
    }

    /// Top `k` chunks for `question`, nearest first.
    ///
    /// No installed index, or an empty one, yields no candidates.
    #[instrument(skip(self, question), fields(question_len = question.len()))]
    pub fn retrieve(
        &self,
        question: &str,
        k: usize,
    ) -> Result<Vec<RetrievalCandidate>, RetrievalError> {
        if k == 0 {
            return Err(RetrievalError::InvalidTopK);
        }

        let Some(index) = self.index.snapshot() else {
            debug!("Index not ready, returning no candidates");
            return Ok(Vec::new());
        };

        if index.is_empty() {
            debug!("Index is empty, returning no candidates");
            return Ok(Vec::new());
        }

        let query = self.embedder.embed(question)?;
        let metric = index.metric();

        let candidates: Vec<RetrievalCandidate> = index
            .nearest(&query, k)?
            .into_iter()
            .map(|neighbor| RetrievalCandidate {
                similarity: metric.similarity(neighbor.distance),
                distance: neighbor.distance,
                chunk: neighbor.chunk,
            })
            .collect();

        debug!(
            hits = candidates.len(),
            top_similarity = candidates.first().map(|c| c.similarity),
            "Coarse retrieval complete"
        );

        Ok(candidates)
    }
}
