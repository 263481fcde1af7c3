use std::sync::Arc;

use tracing::{debug, instrument};

use crate::retrieval::RetrievalCandidate;

use super::error::ScoringError;
use super::scorer::RelevanceScorer;
use super::types::RerankedCandidate;

/// Reorders coarse candidates by a finer pairwise score.
#[derive(Clone)]
pub struct CandidateReranker {
    scorer: Arc<dyn RelevanceScorer>,
}

impl std::fmt::Debug for CandidateReranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CandidateReranker")
            .field("scorer", &self.scorer.name())
            .finish()
    }
}

impl CandidateReranker {
    pub fn new(scorer: Arc<dyn RelevanceScorer>) -> Self {
        Self { scorer }
    }

    pub fn scorer_name(&self) -> &'static str {
        self.scorer.name()
    }

    /// Scores every candidate and sorts by fine score, highest first.
    ///
    /// The sort is stable, so equal scores keep their retrieval order.
    #[instrument(skip_all, fields(num_candidates = candidates.len()))]
    pub fn rerank(
        &self,
        question: &str,
        candidates: Vec<RetrievalCandidate>,
    ) -> Result<Vec<RerankedCandidate>, ScoringError> {
        if candidates.is_empty() {
            debug!("No candidates to rerank");
            return Ok(Vec::new());
        }

        let texts: Vec<&str> = candidates.iter().map(|c| c.chunk.text.as_str()).collect();
        let scores = self.scorer.score_batch(question, &texts)?;

        if scores.len() != candidates.len() {
            return Err(ScoringError::ComputationFailed {
                reason: format!(
                    "{} returned {} scores for {} candidates",
                    self.scorer.name(),
                    scores.len(),
                    candidates.len()
                ),
            });
        }

        if let Some(pos) = scores.iter().position(|s| s.is_nan()) {
            return Err(ScoringError::ComputationFailed {
                reason: format!("{} produced NaN for candidate {}", self.scorer.name(), pos),
            });
        }

        let mut reranked: Vec<RerankedCandidate> = candidates
            .into_iter()
            .zip(scores)
            .map(|(candidate, score)| RerankedCandidate::new(candidate, score))
            .collect();

        reranked.sort_by(|a, b| b.fine_score.total_cmp(&a.fine_score));

        debug!(
            scorer = self.scorer.name(),
            top_score = reranked.first().map(|c| c.fine_score),
            top_confidence = reranked.first().map(|c| c.confidence),
            "Reranking complete"
        );

        Ok(reranked)
    }
}
