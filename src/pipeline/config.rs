use std::time::Duration;

use crate::constants::{
    DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_GENERATION_TIMEOUT_MS, DEFAULT_RETRIEVAL_TIMEOUT_MS,
    DEFAULT_TOP_K,
};
use crate::corpus::ChunkingConfig;
use crate::index::DistanceMetric;
use crate::scoring::ConfidenceGate;

use super::error::LoadError;

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Coarse retrieval fan-out.
    pub top_k: usize,
    /// Gate threshold on the 0–100 confidence scale (inclusive).
    pub confidence_threshold: f32,
    /// Max accepted chunks joined into the generator context.
    pub context_chunks: usize,
    pub metric: DistanceMetric,
    pub chunking: ChunkingConfig,
    /// Narrow each accepted chunk to its best sentence.
    pub extract_sentence: bool,
    /// Annotate answers with question/answer similarity.
    pub similarity_check: bool,
    pub retrieval_timeout: Duration,
    pub generation_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            context_chunks: 1,
            metric: DistanceMetric::default(),
            chunking: ChunkingConfig::default(),
            extract_sentence: true,
            similarity_check: true,
            retrieval_timeout: Duration::from_millis(DEFAULT_RETRIEVAL_TIMEOUT_MS),
            generation_timeout: Duration::from_millis(DEFAULT_GENERATION_TIMEOUT_MS),
        }
    }
}

impl PipelineConfig {
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn with_context_chunks(mut self, context_chunks: usize) -> Self {
        self.context_chunks = context_chunks;
        self
    }

    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_chunking(mut self, chunking: ChunkingConfig) -> Self {
        self.chunking = chunking;
        self
    }

    pub fn with_extract_sentence(mut self, enabled: bool) -> Self {
        self.extract_sentence = enabled;
        self
    }

    pub fn with_similarity_check(mut self, enabled: bool) -> Self {
        self.similarity_check = enabled;
        self
    }

    pub fn with_retrieval_timeout(mut self, timeout: Duration) -> Self {
        self.retrieval_timeout = timeout;
        self
    }

    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), LoadError> {
        if self.top_k == 0 {
            return Err(LoadError::InvalidConfig {
                reason: "top_k must be greater than 0".to_string(),
            });
        }

        if self.retrieval_timeout.is_zero() || self.generation_timeout.is_zero() {
            return Err(LoadError::InvalidConfig {
                reason: "timeouts must be greater than 0".to_string(),
            });
        }

        self.chunking.validate()?;
        self.gate()?;

        Ok(())
    }

    pub(crate) fn gate(&self) -> Result<ConfidenceGate, LoadError> {
        ConfidenceGate::new(self.confidence_threshold, self.context_chunks).map_err(|e| {
            LoadError::InvalidConfig {
                reason: e.to_string(),
            }
        })
    }
}
