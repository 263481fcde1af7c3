//! Fine relevance scoring and the confidence gate.
//!
//! Relevance is one capability, [`RelevanceScorer`], used at two
//! granularities: [`LearnedPairwiseScorer`] reranks whole chunks through the
//! cross-encoder, [`LexicalOverlapScorer`] picks sentences inside an accepted
//! chunk. [`CandidateReranker`] turns fine scores into 0–100 confidences and
//! [`ConfidenceGate`] decides whether to answer at all.

pub mod error;
pub mod extract;
pub mod gate;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod rerank;
pub mod scorer;
pub mod similarity;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ScoringError;
pub use extract::{SentenceExtractor, split_sentences};
pub use gate::ConfidenceGate;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockComparator, MockScorer};
pub use rerank::CandidateReranker;
pub use scorer::{LearnedPairwiseScorer, LexicalOverlapScorer, RelevanceScorer};
pub use similarity::{EmbeddingComparator, SimilarityComparator};
pub use types::{RerankedCandidate, RetrievalResult, confidence_from_logit};
