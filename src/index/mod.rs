//! Flat in-memory embedding index.
//!
//! Built once per corpus load from normalized [`Chunk`]s and immutable
//! afterwards; [`IndexHandle`] provides the swap-on-complete slot queries
//! read from.

pub mod error;
pub mod handle;
pub mod metric;


pub use error::IndexError;
pub use handle::IndexHandle;
pub use metric::DistanceMetric;

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info};

use crate::corpus::Chunk;
use crate::embedding::TextEmbedder;

/// Build-time facts about an index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStats {
    pub chunks: usize,
    pub dimension: usize,
    pub metric: DistanceMetric,
    /// blake3 over chunk ids and texts in build order.
    pub fingerprint: String,
    /// Unix seconds.
    pub built_at: i64,
}

/// One nearest-neighbour hit.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub chunk: Chunk,
    pub distance: f32,
}

#[derive(Debug)]
pub struct EmbeddingIndex {
    chunks: Vec<Chunk>,
    vectors: Vec<Vec<f32>>,
    metric: DistanceMetric,
    stats: IndexStats,
}

impl EmbeddingIndex {
    /// Embeds every chunk and returns a fully built index.
    ///
    /// An empty chunk list yields an empty index that answers every query
    /// with no neighbours.
    pub fn build(
        chunks: Vec<Chunk>,
        embedder: &dyn TextEmbedder,
        metric: DistanceMetric,
    ) -> Result<Self, IndexError> {
        let dimension = embedder.embedding_dim();
        if dimension == 0 {
            return Err(IndexError::ZeroDimension);
        }

        let mut seen = HashSet::with_capacity(chunks.len());
        if let Some(dup) = chunks.iter().find(|c| !seen.insert(c.id)) {
            return Err(IndexError::DuplicateChunk { id: dup.id });
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let raw = embedder.embed_batch(&texts)?;

        let mut vectors = Vec::with_capacity(raw.len());
        for vector in raw {
            if vector.len() != dimension {
                return Err(IndexError::InvalidDimension {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            vectors.push(metric.prepare(vector));
        }

        if vectors.len() != chunks.len() {
            return Err(IndexError::InvalidDimension {
                expected: chunks.len(),
                actual: vectors.len(),
            });
        }

        let stats = IndexStats {
            chunks: chunks.len(),
            dimension,
            metric,
            fingerprint: fingerprint(&chunks),
            built_at: chrono::Utc::now().timestamp(),
        };

        info!(
            chunks = stats.chunks,
            dimension,
            metric = %metric,
            fingerprint = %stats.fingerprint,
            "Embedding index built"
        );

        Ok(Self {
            chunks,
            vectors,
            metric,
            stats,
        })
    }

    /// Up to `k` closest chunks, nearest first; equal distances order by chunk id.
    pub fn nearest(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, IndexError> {
        if self.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        if query.len() != self.stats.dimension {
            return Err(IndexError::InvalidDimension {
                expected: self.stats.dimension,
                actual: query.len(),
            });
        }

        let query = self.metric.prepare(query.to_vec());

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(pos, vector)| (pos, self.metric.distance(&query, vector)))
            .collect();

        scored.sort_by(|(a_pos, a_dist), (b_pos, b_dist)| {
            a_dist
                .total_cmp(b_dist)
                .then_with(|| self.chunks[*a_pos].id.cmp(&self.chunks[*b_pos].id))
        });

        let mut seen = HashSet::with_capacity(k);
        let neighbors: Vec<Neighbor> = scored
            .into_iter()
            .filter(|(pos, _)| seen.insert(self.chunks[*pos].id))
            .take(k)
            .map(|(pos, distance)| Neighbor {
                chunk: self.chunks[pos].clone(),
                distance,
            })
            .collect();

        debug!(k, hits = neighbors.len(), "Nearest-neighbour search");
        Ok(neighbors)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }
}

fn fingerprint(chunks: &[Chunk]) -> String {
    let mut hasher = blake3::Hasher::new();
    for chunk in chunks {
        hasher.update(&chunk.id.to_le_bytes());
        hasher.update(chunk.text.as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize().to_hex().to_string()
}
