//! Sieve library crate (used by the `sieve` binary and integration tests).
//!
//! Answers questions from a private corpus, but only after a relevance gate
//! decides the corpus actually contains the answer.
//!
//! # Public API Surface
//!
//! ## Pipeline
//! - [`Pipeline`], [`PipelineConfig`] - load a corpus, answer questions
//! - [`Answer`], [`AnswerOutcome`] - what a query returns
//! - [`Config`], [`ConfigError`] - `SIEVE_*` environment configuration
//!
//! ## Stages
//! - [`CorpusNormalizer`], [`Chunk`], [`RawCorpus`] - corpus to chunks
//! - [`EmbeddingIndex`], [`IndexHandle`] - nearest-neighbour index with atomic swap
//! - [`CoarseRetriever`] - top-k candidates with similarity
//! - [`CandidateReranker`], [`ConfidenceGate`], [`SentenceExtractor`] - fine scoring and gating
//! - [`Generator`], [`GenaiGenerator`] - answer generation
//!
//! ## Models
//! - [`SentenceEmbedder`], [`Reranker`] - candle-backed BERT models with
//!   deterministic stub modes for running without weights
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod corpus;
pub mod embedding;
pub mod generation;
pub mod index;
pub mod lexical;
pub mod pipeline;
pub mod retrieval;
pub mod scoring;

pub use config::{Config, ConfigError};
pub use corpus::{Chunk, ChunkKind, ChunkingConfig, CorpusError, CorpusNormalizer, RawCorpus};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
pub use embedding::{
    EmbeddingError, Reranker, RerankerConfig, RerankerError, SentenceEmbedder,
    SentenceEmbedderConfig, TextEmbedder,
};
#[cfg(any(test, feature = "mock"))]
pub use generation::MockGenerator;
pub use generation::{GenaiGenerator, GenerationConfig, GenerationError, Generator, PromptTemplate};
pub use index::{DistanceMetric, EmbeddingIndex, IndexError, IndexHandle, IndexStats};
pub use pipeline::{
    Answer, AnswerOutcome, CollaboratorFailure, LoadError, Pipeline, PipelineConfig,
};
pub use retrieval::{CoarseRetriever, RetrievalCandidate, RetrievalError};
#[cfg(any(test, feature = "mock"))]
pub use scoring::{MockComparator, MockScorer};
pub use scoring::{
    CandidateReranker, ConfidenceGate, EmbeddingComparator, LearnedPairwiseScorer,
    LexicalOverlapScorer, RelevanceScorer, RetrievalResult, ScoringError, SentenceExtractor,
    SimilarityComparator,
};
