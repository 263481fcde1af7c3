use tracing::debug;

use crate::constants::{CONTEXT_SEPARATOR, MAX_CONFIDENCE};

use super::error::ScoringError;
use super::types::{RerankedCandidate, RetrievalResult};

/// Accepts the best reranked candidate when its confidence reaches the threshold.
///
/// The comparison is inclusive: `confidence >= threshold` accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceGate {
    threshold: f32,
    max_context_chunks: usize,
}

impl ConfidenceGate {
    /// `threshold` is on the 0–100 scale; `max_context_chunks` caps how many
    /// qualifying candidates are joined into the context.
    pub fn new(threshold: f32, max_context_chunks: usize) -> Result<Self, ScoringError> {
        if !(0.0..=MAX_CONFIDENCE).contains(&threshold) {
            return Err(ScoringError::InvalidConfig {
                reason: format!("threshold must be between 0 and 100, got {}", threshold),
            });
        }

        if max_context_chunks == 0 {
            return Err(ScoringError::InvalidConfig {
                reason: "max_context_chunks must be greater than 0".to_string(),
            });
        }

        Ok(Self {
            threshold,
            max_context_chunks,
        })
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn max_context_chunks(&self) -> usize {
        self.max_context_chunks
    }

    /// `reranked` must already be sorted best first.
    pub fn gate(&self, reranked: &[RerankedCandidate]) -> RetrievalResult {
        let Some(best) = reranked.first() else {
            debug!("No candidates reached the gate");
            return RetrievalResult::Rejected { confidence: 0.0 };
        };

        if best.confidence < self.threshold {
            debug!(
                confidence = best.confidence,
                threshold = self.threshold,
                "Best candidate below threshold"
            );
            return RetrievalResult::Rejected {
                confidence: best.confidence,
            };
        }

        let chunks: Vec<_> = reranked
            .iter()
            .take(self.max_context_chunks)
            .take_while(|c| c.confidence >= self.threshold)
            .map(|c| c.chunk.clone())
            .collect();

        let context = chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR);

        debug!(
            confidence = best.confidence,
            threshold = self.threshold,
            admitted = chunks.len(),
            "Retrieval accepted"
        );

        RetrievalResult::Accepted {
            context,
            confidence: best.confidence,
            chunks,
        }
    }
}

impl Default for ConfidenceGate {
    fn default() -> Self {
        Self {
            threshold: crate::constants::DEFAULT_CONFIDENCE_THRESHOLD,
            max_context_chunks: 1,
        }
    }
}
