//! End-to-end tests: corpus file to gated answer, on stub models.

mod common;

use std::sync::Arc;

use common::fixtures::{
    CITIES_CSV, FRANCE_QUESTION, PARIS_ROW, RIYADH_ROW, city_chunks, stub_pipeline, write_corpus,
};
use encoding_rs::WINDOWS_1256;
use sieve::corpus::{CorpusError, TextEncoding};
use sieve::generation::MockGenerator;
use sieve::index::{DistanceMetric, EmbeddingIndex, IndexHandle};
use sieve::pipeline::{AnswerOutcome, LoadError, PipelineConfig};
use sieve::retrieval::CoarseRetriever;
use sieve::scoring::{CandidateReranker, LearnedPairwiseScorer, RetrievalResult};
use sieve::{RawCorpus, SentenceEmbedder, TextEmbedder};

#[tokio::test]
async fn test_csv_corpus_answers_from_matching_row() {
    let (_dir, path) = write_corpus("cities.csv", CITIES_CSV.as_bytes());
    let generator = Arc::new(MockGenerator::replying("Paris"));
    let pipeline = stub_pipeline(PipelineConfig::default(), generator.clone());

    let stats = pipeline.load_path(&path).unwrap();
    let answer = pipeline.answer(FRANCE_QUESTION).await;

    assert_eq!(stats.chunks, 2);
    assert_eq!(answer.outcome, AnswerOutcome::Generated);
    assert_eq!(answer.text, "Paris");
    assert!(answer.retrieval_confidence >= 30.0);
    assert_eq!(generator.last_context().as_deref(), Some(PARIS_ROW));
}

#[test]
fn test_only_matching_row_clears_threshold() {
    let embedder: Arc<dyn TextEmbedder> = Arc::new(SentenceEmbedder::stub().unwrap());
    let index =
        EmbeddingIndex::build(city_chunks(), embedder.as_ref(), DistanceMetric::Cosine).unwrap();
    let handle = IndexHandle::new();
    handle.install(index);

    let retriever = CoarseRetriever::new(embedder, handle);
    let reranker = CandidateReranker::new(Arc::new(LearnedPairwiseScorer::stub().unwrap()));

    let candidates = retriever.retrieve(FRANCE_QUESTION, 5).unwrap();
    let reranked = reranker.rerank(FRANCE_QUESTION, candidates).unwrap();

    assert_eq!(reranked.len(), 2);
    assert_eq!(reranked[0].chunk.text, PARIS_ROW);
    assert!(reranked[0].confidence >= 30.0);
    assert_eq!(reranked[1].chunk.text, RIYADH_ROW);
    assert!(reranked[1].confidence < 30.0);
}

#[tokio::test]
async fn test_unreachable_threshold_never_calls_generator() {
    let generator = Arc::new(MockGenerator::echo());
    let config = PipelineConfig::default().with_confidence_threshold(99.5);
    let pipeline = stub_pipeline(config, generator.clone());
    pipeline.load_chunks(city_chunks()).unwrap();

    let result = pipeline.retrieve(FRANCE_QUESTION).unwrap();
    let answer = pipeline.answer(FRANCE_QUESTION).await;

    assert!(matches!(result, RetrievalResult::Rejected { .. }));
    assert!(result.confidence() > 0.0);
    assert_eq!(answer.outcome, AnswerOutcome::NoRelevantContext);
    assert_eq!(answer.retrieval_confidence, result.confidence());
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_no_corpus_rejects_with_zero_confidence() {
    let generator = Arc::new(MockGenerator::echo());
    let pipeline = stub_pipeline(PipelineConfig::default(), generator.clone());

    let result = pipeline.retrieve(FRANCE_QUESTION).unwrap();

    assert_eq!(result, RetrievalResult::Rejected { confidence: 0.0 });
    assert_eq!(pipeline.answer(FRANCE_QUESTION).await.retrieval_confidence, 0.0);
    assert_eq!(generator.calls(), 0);
}

#[test]
fn test_empty_corpus_file_fails_to_load() {
    let (_dir, path) = write_corpus("empty.txt", b"  \n\n ");
    let pipeline = stub_pipeline(PipelineConfig::default(), Arc::new(MockGenerator::echo()));

    let result = pipeline.load_path(&path);

    assert!(matches!(result, Err(LoadError::Corpus(_))));
    assert!(pipeline.index_stats().is_none());
}

#[test]
fn test_header_only_csv_fails_to_load() {
    let (_dir, path) = write_corpus("cities.csv", b"city,country\n");
    let pipeline = stub_pipeline(PipelineConfig::default(), Arc::new(MockGenerator::echo()));

    let result = pipeline.load_path(&path);

    assert!(matches!(result, Err(LoadError::Corpus(CorpusError::Empty))));
    assert!(pipeline.index_stats().is_none());
}

#[test]
fn test_binary_corpus_file_fails_to_decode() {
    let (_dir, path) = write_corpus("notes.txt", &[0xFF, 0xFE, 0x00, 0x00, 0x01]);
    let pipeline = stub_pipeline(PipelineConfig::default(), Arc::new(MockGenerator::echo()));

    let result = pipeline.load_path(&path);

    assert!(matches!(
        result,
        Err(LoadError::Corpus(CorpusError::DecodeFailure { .. }))
    ));
    assert!(pipeline.index_stats().is_none());
}

#[test]
fn test_missing_corpus_file_fails_to_load() {
    let pipeline = stub_pipeline(PipelineConfig::default(), Arc::new(MockGenerator::echo()));

    let result = pipeline.load_path(std::path::Path::new("/nonexistent/cities.csv"));

    assert!(matches!(result, Err(LoadError::Corpus(_))));
}

#[test]
fn test_identical_runs_are_deterministic() {
    let first = stub_pipeline(PipelineConfig::default(), Arc::new(MockGenerator::echo()));
    let second = stub_pipeline(PipelineConfig::default(), Arc::new(MockGenerator::echo()));

    let first_stats = first.load_chunks(city_chunks()).unwrap();
    let second_stats = second.load_chunks(city_chunks()).unwrap();

    assert_eq!(first_stats.fingerprint, second_stats.fingerprint);
    assert_eq!(
        first.retrieve(FRANCE_QUESTION).unwrap(),
        second.retrieve(FRANCE_QUESTION).unwrap()
    );
}

#[test]
fn test_coarse_similarity_is_one_minus_distance() {
    let embedder: Arc<dyn TextEmbedder> = Arc::new(SentenceEmbedder::stub().unwrap());
    let index =
        EmbeddingIndex::build(city_chunks(), embedder.as_ref(), DistanceMetric::Cosine).unwrap();
    let handle = IndexHandle::new();
    handle.install(index);
    let retriever = CoarseRetriever::new(embedder, handle);

    let candidates = retriever.retrieve(FRANCE_QUESTION, 5).unwrap();

    assert_eq!(candidates.len(), 2);
    for candidate in &candidates {
        assert_eq!(candidate.similarity, 1.0 - candidate.distance);
    }
    assert!(candidates[0].distance <= candidates[1].distance);
}

#[tokio::test]
async fn test_legacy_encoded_csv_loads_through_fallback() {
    let (bytes, _, had_errors) = WINDOWS_1256.encode("مدينة,بلد\nالرياض,السعودية\n");
    assert!(!had_errors);
    let (_dir, path) = write_corpus("cities.csv", &bytes);

    let (corpus, encoding) = RawCorpus::from_path(&path).unwrap();
    assert_eq!(encoding, TextEncoding::Windows1256);
    assert!(matches!(corpus, RawCorpus::Table(_)));

    let generator = Arc::new(MockGenerator::echo());
    let pipeline = stub_pipeline(PipelineConfig::default(), generator.clone());
    let stats = pipeline.load_path(&path).unwrap();
    let answer = pipeline.answer("الرياض").await;

    assert_eq!(stats.chunks, 1);
    assert_eq!(answer.outcome, AnswerOutcome::Generated);
    assert_eq!(
        generator.last_context().as_deref(),
        Some("مدينة: الرياض - بلد: السعودية")
    );
}
