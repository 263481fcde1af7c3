use serde::Serialize;

use crate::corpus::Chunk;
use crate::retrieval::RetrievalCandidate;

/// A retrieval candidate after the fine scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RerankedCandidate {
    pub chunk: Chunk,
    /// Coarse similarity carried over from retrieval.
    pub similarity: f32,
    /// Raw score from the pairwise scorer.
    pub fine_score: f32,
    /// `fine_score` squashed onto 0–100.
    pub confidence: f32,
}

impl RerankedCandidate {
    pub fn new(candidate: RetrievalCandidate, fine_score: f32) -> Self {
        Self {
            chunk: candidate.chunk,
            similarity: candidate.similarity,
            fine_score,
            confidence: confidence_from_logit(fine_score),
        }
    }
}

/// `100 / (1 + e^-x)`.
pub fn confidence_from_logit(raw: f32) -> f32 {
    let confidence = crate::constants::MAX_CONFIDENCE / (1.0 + (-raw).exp());
    confidence.clamp(0.0, crate::constants::MAX_CONFIDENCE)
}

/// Outcome of the confidence gate.
///
/// Rejection is an ordinary result, not an error; it still reports the best
/// confidence seen (0 when there were no candidates).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RetrievalResult {
    Accepted {
        /// Admitted chunk texts joined with the context separator.
        context: String,
        confidence: f32,
        /// Admitted chunks, best first.
        chunks: Vec<Chunk>,
    },
    Rejected {
        confidence: f32,
    },
}

impl RetrievalResult {
    pub fn confidence(&self) -> f32 {
        match self {
            RetrievalResult::Accepted { confidence, .. }
            | RetrievalResult::Rejected { confidence } => *confidence,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, RetrievalResult::Accepted { .. })
    }

    pub fn context(&self) -> Option<&str> {
        match self {
            RetrievalResult::Accepted { context, .. } => Some(context),
            RetrievalResult::Rejected { .. } => None,
        }
    }
}

impl std::fmt::Display for RetrievalResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetrievalResult::Accepted {
                confidence, chunks, ..
            } => write!(
                f,
                "ACCEPTED (confidence: {:.2}, chunks: {})",
                confidence,
                chunks.len()
            ),
            RetrievalResult::Rejected { confidence } => {
                write!(f, "REJECTED (confidence: {:.2})", confidence)
            }
        }
    }
}
