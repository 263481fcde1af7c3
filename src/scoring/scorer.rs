use std::sync::Arc;

use crate::embedding::Reranker;
use crate::lexical::word_set;

use super::error::ScoringError;

/// Scores how relevant `text` is to `query`; higher is more relevant.
///
/// The scale is implementation specific.
pub trait RelevanceScorer: Send + Sync {
    fn name(&self) -> &'static str;

    fn score(&self, query: &str, text: &str) -> Result<f32, ScoringError>;

    fn score_batch(&self, query: &str, texts: &[&str]) -> Result<Vec<f32>, ScoringError> {
        texts.iter().map(|text| self.score(query, text)).collect()
    }
}

/// Counts distinct lowercased `\w+` tokens shared by query and text.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalOverlapScorer;

impl LexicalOverlapScorer {
    pub fn overlap(query: &str, text: &str) -> usize {
        let query_words = word_set(query);
        word_set(text)
            .iter()
            .filter(|w| query_words.contains(*w))
            .count()
    }
}

impl RelevanceScorer for LexicalOverlapScorer {
    fn name(&self) -> &'static str {
        "lexical_overlap"
    }

    fn score(&self, query: &str, text: &str) -> Result<f32, ScoringError> {
        Ok(Self::overlap(query, text) as f32)
    }
}

/// Cross-encoder logits from a [`Reranker`].
#[derive(Debug, Clone)]
pub struct LearnedPairwiseScorer {
    reranker: Arc<Reranker>,
}

impl LearnedPairwiseScorer {
    pub fn new(reranker: Arc<Reranker>) -> Self {
        Self { reranker }
    }

    pub fn stub() -> Result<Self, ScoringError> {
        Ok(Self::new(Arc::new(Reranker::stub()?)))
    }

    pub fn reranker(&self) -> &Reranker {
        &self.reranker
    }
}

impl RelevanceScorer for LearnedPairwiseScorer {
    fn name(&self) -> &'static str {
        "learned_pairwise"
    }

    fn score(&self, query: &str, text: &str) -> Result<f32, ScoringError> {
        Ok(self.reranker.score(query, text)?)
    }

    fn score_batch(&self, query: &str, texts: &[&str]) -> Result<Vec<f32>, ScoringError> {
        Ok(self.reranker.score_batch(query, texts)?)
    }
}
