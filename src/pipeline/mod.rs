//! Question answering over a loaded corpus.
//!
//! A query runs coarse retrieval, reranking and the confidence gate on a
//! blocking worker, then (only if the gate accepts) narrows the context and
//! awaits the generator. Collaborator failures and timeouts become an
//! [`AnswerOutcome::Unavailable`] answer instead of an error.
//!
//! Corpus loads build a fresh index off to the side and swap it in once
//! complete; queries in flight keep using the index they started with.

pub mod config;
pub mod error;

#[cfg(test)]
mod tests;

pub use config::PipelineConfig;
pub use error::{CollaboratorFailure, LoadError};

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::constants::{CONTEXT_SEPARATOR, NO_RELEVANT_CONTEXT, SERVICE_UNAVAILABLE};
use crate::corpus::{Chunk, ChunkKind, CorpusNormalizer, RawCorpus, tidy_passage};
use crate::embedding::{Reranker, SentenceEmbedder, TextEmbedder};
use crate::generation::{GenaiGenerator, Generator};
use crate::index::{EmbeddingIndex, IndexHandle, IndexStats};
use crate::retrieval::CoarseRetriever;
use crate::scoring::{
    CandidateReranker, ConfidenceGate, EmbeddingComparator, LearnedPairwiseScorer,
    RelevanceScorer, RetrievalResult, SentenceExtractor, SimilarityComparator,
};

/// How an answer was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
    Generated,
    NoRelevantContext,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub text: String,
    /// Gate confidence on the 0–100 scale.
    pub retrieval_confidence: f32,
    /// Question/answer similarity; annotation only, never gates.
    pub generation_similarity: Option<f32>,
    pub outcome: AnswerOutcome,
    /// Context handed to the generator.
    pub context: Option<String>,
}

impl Answer {
    fn no_relevant_context(confidence: f32) -> Self {
        Self {
            text: NO_RELEVANT_CONTEXT.to_string(),
            retrieval_confidence: confidence,
            generation_similarity: None,
            outcome: AnswerOutcome::NoRelevantContext,
            context: None,
        }
    }

    fn unavailable() -> Self {
        Self {
            text: SERVICE_UNAVAILABLE.to_string(),
            retrieval_confidence: 0.0,
            generation_similarity: None,
            outcome: AnswerOutcome::Unavailable,
            context: None,
        }
    }
}

/// Retrieve, rerank and gate; owned behind an `Arc` so it can run on a blocking worker.
struct RetrievalStage {
    retriever: CoarseRetriever,
    reranker: CandidateReranker,
    gate: ConfidenceGate,
    top_k: usize,
}

impl RetrievalStage {
    fn run(&self, question: &str) -> Result<RetrievalResult, CollaboratorFailure> {
        let candidates = self.retriever.retrieve(question, self.top_k)?;

        let reranked = self.reranker.rerank(question, candidates).map_err(|e| {
            CollaboratorFailure::Reranking {
                reason: e.to_string(),
            }
        })?;

        Ok(self.gate.gate(&reranked))
    }
}

pub struct Pipeline {
    normalizer: CorpusNormalizer,
    embedder: Arc<dyn TextEmbedder>,
    stage: Arc<RetrievalStage>,
    extractor: SentenceExtractor,
    generator: Arc<dyn Generator>,
    comparator: Option<Arc<dyn SimilarityComparator>>,
    config: PipelineConfig,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("reranker", &self.stage.reranker)
            .field("index_ready", &self.index().is_ready())
            .finish()
    }
}

impl Pipeline {
    /// Wires the collaborators together. No corpus is loaded yet.
    ///
    /// With `similarity_check` on, answers are annotated through an
    /// [`EmbeddingComparator`] over `embedder` unless
    /// [`with_comparator`](Self::with_comparator) supplies another.
    pub fn new(
        config: PipelineConfig,
        embedder: Arc<dyn TextEmbedder>,
        scorer: Arc<dyn RelevanceScorer>,
        generator: Arc<dyn Generator>,
    ) -> Result<Self, LoadError> {
        config.validate()?;

        let normalizer = CorpusNormalizer::new(config.chunking.clone())?;
        let stage = RetrievalStage {
            retriever: CoarseRetriever::new(Arc::clone(&embedder), IndexHandle::new()),
            reranker: CandidateReranker::new(scorer),
            gate: config.gate()?,
            top_k: config.top_k,
        };

        let comparator: Option<Arc<dyn SimilarityComparator>> = config
            .similarity_check
            .then(|| {
                Arc::new(EmbeddingComparator::new(Arc::clone(&embedder)))
                    as Arc<dyn SimilarityComparator>
            });

        Ok(Self {
            normalizer,
            embedder,
            stage: Arc::new(stage),
            extractor: SentenceExtractor::lexical(),
            generator,
            comparator,
            config,
        })
    }

    /// Loads the embedder, reranker and generator named by `config`.
    pub fn from_config(config: &Config) -> Result<Self, LoadError> {
        let embedder = Arc::new(SentenceEmbedder::load(config.embedder_config())?);
        let reranker = Arc::new(Reranker::load(config.reranker_config())?);
        let generator = Arc::new(GenaiGenerator::new(config.generation_config())?);

        info!(
            embedder_model = embedder.is_model_loaded(),
            reranker_model = reranker.is_model_loaded(),
            generator = %config.generator_model,
            "Pipeline collaborators ready"
        );

        Self::new(
            config.pipeline_config(),
            embedder,
            Arc::new(LearnedPairwiseScorer::new(reranker)),
            generator,
        )
    }

    /// Replaces the similarity annotator; only consulted when `similarity_check` is on.
    pub fn with_comparator(mut self, comparator: Arc<dyn SimilarityComparator>) -> Self {
        if self.config.similarity_check {
            self.comparator = Some(comparator);
        }
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn index(&self) -> &IndexHandle {
        self.stage.retriever.index()
    }

    pub fn index_stats(&self) -> Option<IndexStats> {
        self.index().snapshot().map(|index| index.stats().clone())
    }

    /// Builds an index over `chunks` and swaps it in.
    pub fn load_chunks(&self, chunks: Vec<Chunk>) -> Result<IndexStats, LoadError> {
        let index = self.index().rebuild(|| {
            EmbeddingIndex::build(chunks, self.embedder.as_ref(), self.config.metric)
        })?;
        Ok(index.stats().clone())
    }

    pub fn load_corpus(&self, corpus: &RawCorpus) -> Result<IndexStats, LoadError> {
        let chunks = self.normalizer.normalize(corpus)?;
        self.load_chunks(chunks)
    }

    /// Reads, normalizes and indexes a corpus file.
    pub fn load_path(&self, path: &Path) -> Result<IndexStats, LoadError> {
        let (corpus, encoding) = RawCorpus::from_path(path)?;
        let stats = self.load_corpus(&corpus)?;

        info!(
            path = %path.display(),
            encoding = encoding.label(),
            chunks = stats.chunks,
            fingerprint = %stats.fingerprint,
            "Corpus loaded"
        );

        Ok(stats)
    }

    /// Retrieve, rerank and gate on the calling thread.
    pub fn retrieve(&self, question: &str) -> Result<RetrievalResult, CollaboratorFailure> {
        self.stage.run(question)
    }

    /// Answers `question`; collaborator failures become an unavailable answer.
    pub async fn answer(&self, question: &str) -> Answer {
        match self.try_answer(question).await {
            Ok(answer) => answer,
            Err(failure) => {
                warn!(error = %failure, "Collaborator failure, answering as unavailable");
                Answer::unavailable()
            }
        }
    }

    /// Like [`answer`](Self::answer) but surfaces the collaborator failure.
    #[instrument(skip(self, question), fields(question_len = question.len()))]
    pub async fn try_answer(&self, question: &str) -> Result<Answer, CollaboratorFailure> {
        let result = self.retrieve_blocking(question).await?;

        let (confidence, chunks) = match result {
            RetrievalResult::Rejected { confidence } => {
                info!(confidence, "No relevant context, skipping generation");
                return Ok(Answer::no_relevant_context(confidence));
            }
            RetrievalResult::Accepted {
                confidence, chunks, ..
            } => (confidence, chunks),
        };

        let context = self.prepare_context(question, &chunks);
        debug!(context_len = context.len(), confidence, "Context prepared");

        let text = with_timeout(
            "generation",
            self.config.generation_timeout,
            self.generator.generate(question, &context),
        )
        .await?
        .map_err(|e| CollaboratorFailure::Generation {
            reason: e.to_string(),
        })?;

        let generation_similarity = self.annotate(question, &text).await;

        info!(
            confidence,
            similarity = generation_similarity,
            "Answer generated"
        );

        Ok(Answer {
            text,
            retrieval_confidence: confidence,
            generation_similarity,
            outcome: AnswerOutcome::Generated,
            context: Some(context),
        })
    }

    async fn retrieve_blocking(
        &self,
        question: &str,
    ) -> Result<RetrievalResult, CollaboratorFailure> {
        let stage = Arc::clone(&self.stage);
        let question = question.to_string();
        let task = tokio::task::spawn_blocking(move || stage.run(&question));

        with_timeout("retrieval", self.config.retrieval_timeout, task)
            .await?
            .map_err(|e| CollaboratorFailure::Aborted {
                stage: "retrieval",
                reason: e.to_string(),
            })?
    }

    /// Tidies passages, narrows each chunk to its best sentence when enabled,
    /// and joins the result.
    fn prepare_context(&self, question: &str, chunks: &[Chunk]) -> String {
        chunks
            .iter()
            .map(|chunk| {
                let text = match chunk.kind {
                    ChunkKind::Passage => tidy_passage(&chunk.text),
                    ChunkKind::Row => chunk.text.clone(),
                };

                if !self.config.extract_sentence {
                    return text;
                }

                match self.extractor.extract(question, &text) {
                    Ok(sentence) => sentence,
                    Err(e) => {
                        warn!(
                            error = %e,
                            chunk_id = chunk.id,
                            "Sentence extraction failed, keeping chunk"
                        );
                        text
                    }
                }
            })
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR)
    }

    async fn annotate(&self, question: &str, answer: &str) -> Option<f32> {
        let comparator = Arc::clone(self.comparator.as_ref()?);
        let question = question.to_string();
        let answer = answer.to_string();

        let task = tokio::task::spawn_blocking(move || comparator.similarity(&question, &answer));

        match with_timeout("similarity", self.config.retrieval_timeout, task).await {
            Ok(Ok(Ok(similarity))) => Some(similarity),
            Ok(Ok(Err(e))) => {
                warn!(error = %e, "Similarity check failed");
                None
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Similarity task aborted");
                None
            }
            Err(e) => {
                warn!(error = %e, "Similarity check skipped");
                None
            }
        }
    }
}

async fn with_timeout<F: Future>(
    stage: &'static str,
    limit: Duration,
    future: F,
) -> Result<F::Output, CollaboratorFailure> {
    tokio::time::timeout(limit, future)
        .await
        .map_err(|_| CollaboratorFailure::Timeout {
            stage,
            after_ms: limit.as_millis() as u64,
        })
}
