use super::*;
use crate::embedding::MockEmbedder;
use crate::generation::MockGenerator;
use crate::index::DistanceMetric;
use crate::scoring::{MockComparator, MockScorer};

const CITIES: [&str; 2] = [
    "city: Riyadh - country: Saudi Arabia",
    "city: Paris - country: France",
];

fn city_chunks() -> Vec<Chunk> {
    CITIES
        .iter()
        .enumerate()
        .map(|(id, text)| Chunk::row(id as u64, *text))
        .collect()
}

fn stub_pipeline(config: PipelineConfig, generator: Arc<MockGenerator>) -> Pipeline {
    Pipeline::new(
        config,
        Arc::new(SentenceEmbedder::stub().unwrap()),
        Arc::new(LearnedPairwiseScorer::stub().unwrap()),
        generator,
    )
    .unwrap()
}

fn accepting_pipeline(config: PipelineConfig, generator: Arc<MockGenerator>) -> Pipeline {
    Pipeline::new(
        config,
        Arc::new(SentenceEmbedder::stub().unwrap()),
        Arc::new(MockScorer::new(5.0)),
        generator,
    )
    .unwrap()
}

#[test]
fn test_config_validation() {
    assert!(PipelineConfig::default().validate().is_ok());
    assert!(PipelineConfig::default().with_top_k(0).validate().is_err());
    assert!(
        PipelineConfig::default()
            .with_confidence_threshold(140.0)
            .validate()
            .is_err()
    );
    assert!(
        PipelineConfig::default()
            .with_context_chunks(0)
            .validate()
            .is_err()
    );
    assert!(
        PipelineConfig::default()
            .with_generation_timeout(Duration::ZERO)
            .validate()
            .is_err()
    );
}

#[test]
fn test_load_chunks_reports_stats() {
    let pipeline = stub_pipeline(PipelineConfig::default(), Arc::new(MockGenerator::echo()));

    let stats = pipeline.load_chunks(city_chunks()).unwrap();

    assert_eq!(stats.chunks, 2);
    assert_eq!(pipeline.index_stats(), Some(stats));
}

#[test]
fn test_failed_load_keeps_previous_index() {
    let pipeline = stub_pipeline(PipelineConfig::default(), Arc::new(MockGenerator::echo()));
    let before = pipeline.load_chunks(city_chunks()).unwrap();

    let result = pipeline.load_corpus(&RawCorpus::Document("   ".into()));

    assert!(matches!(result, Err(LoadError::Corpus(_))));
    assert_eq!(pipeline.index_stats(), Some(before));
}

#[test]
fn test_failed_build_keeps_previous_index() {
    let embedder = Arc::new(MockEmbedder::new(2).with_vector("north", vec![0.0, 1.0]));
    let pipeline = Pipeline::new(
        PipelineConfig::default(),
        embedder.clone(),
        Arc::new(MockScorer::new(5.0)),
        Arc::new(MockGenerator::echo()),
    )
    .unwrap();
    pipeline.load_chunks(vec![Chunk::row(0, "north")]).unwrap();

    embedder.set_failing(true);
    let result = pipeline.load_chunks(vec![Chunk::row(0, "south")]);

    assert!(matches!(result, Err(LoadError::Index(_))));
    assert_eq!(pipeline.index_stats().unwrap().chunks, 1);
}

#[test]
fn test_retrieve_accepts_matching_row() {
    let pipeline = stub_pipeline(PipelineConfig::default(), Arc::new(MockGenerator::echo()));
    pipeline.load_chunks(city_chunks()).unwrap();

    let result = pipeline.retrieve("what city is in France").unwrap();

    assert_eq!(result.context(), Some(CITIES[1]));
    assert!(result.confidence() > 30.0);
}

#[tokio::test]
async fn test_answer_before_load_skips_generation() {
    let generator = Arc::new(MockGenerator::echo());
    let pipeline = stub_pipeline(PipelineConfig::default(), generator.clone());

    let answer = pipeline.answer("what city is in France").await;

    assert_eq!(answer.outcome, AnswerOutcome::NoRelevantContext);
    assert_eq!(answer.text, NO_RELEVANT_CONTEXT);
    assert_eq!(answer.retrieval_confidence, 0.0);
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_answer_generates_from_accepted_row() {
    let generator = Arc::new(MockGenerator::replying("Paris"));
    let pipeline = stub_pipeline(PipelineConfig::default(), generator.clone());
    pipeline.load_chunks(city_chunks()).unwrap();

    let answer = pipeline.answer("what city is in France").await;

    assert_eq!(answer.outcome, AnswerOutcome::Generated);
    assert_eq!(answer.text, "Paris");
    assert_eq!(answer.context.as_deref(), Some(CITIES[1]));
    assert!(answer.generation_similarity.is_some());
    assert_eq!(generator.last_context().as_deref(), Some(CITIES[1]));
}

#[tokio::test]
async fn test_rejection_reports_computed_confidence() {
    let generator = Arc::new(MockGenerator::echo());
    let config = PipelineConfig::default().with_confidence_threshold(99.0);
    let pipeline = stub_pipeline(config, generator.clone());
    pipeline.load_chunks(city_chunks()).unwrap();

    let answer = pipeline.answer("what city is in France").await;

    assert_eq!(answer.outcome, AnswerOutcome::NoRelevantContext);
    assert!(answer.retrieval_confidence > 0.0);
    assert!(answer.retrieval_confidence < 99.0);
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_generator_failure_is_unavailable() {
    let pipeline = stub_pipeline(PipelineConfig::default(), Arc::new(MockGenerator::failing()));
    pipeline.load_chunks(city_chunks()).unwrap();

    let failure = pipeline.try_answer("what city is in France").await.unwrap_err();
    let answer = pipeline.answer("what city is in France").await;

    assert!(matches!(failure, CollaboratorFailure::Generation { .. }));
    assert_eq!(answer.outcome, AnswerOutcome::Unavailable);
    assert_eq!(answer.text, SERVICE_UNAVAILABLE);
    assert_eq!(answer.retrieval_confidence, 0.0);
}

#[tokio::test]
async fn test_generator_timeout_is_unavailable() {
    let generator = Arc::new(MockGenerator::echo().with_delay(Duration::from_millis(500)));
    let config = PipelineConfig::default().with_generation_timeout(Duration::from_millis(20));
    let pipeline = stub_pipeline(config, generator);
    pipeline.load_chunks(city_chunks()).unwrap();

    let failure = pipeline.try_answer("what city is in France").await.unwrap_err();

    assert_eq!(
        failure,
        CollaboratorFailure::Timeout {
            stage: "generation",
            after_ms: 20
        }
    );
}

#[tokio::test]
async fn test_reranker_failure_is_unavailable() {
    let scorer = Arc::new(MockScorer::new(5.0));
    let generator = Arc::new(MockGenerator::echo());
    let pipeline = Pipeline::new(
        PipelineConfig::default(),
        Arc::new(SentenceEmbedder::stub().unwrap()),
        scorer.clone(),
        generator.clone(),
    )
    .unwrap();
    pipeline.load_chunks(city_chunks()).unwrap();
    scorer.set_failing(true);

    let failure = pipeline.try_answer("Paris").await.unwrap_err();
    let answer = pipeline.answer("Paris").await;

    assert!(matches!(failure, CollaboratorFailure::Reranking { .. }));
    assert_eq!(answer.outcome, AnswerOutcome::Unavailable);
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_embedder_failure_is_unavailable() {
    let embedder = Arc::new(MockEmbedder::new(2).with_vector("north", vec![0.0, 1.0]));
    let pipeline = Pipeline::new(
        PipelineConfig::default(),
        embedder.clone(),
        Arc::new(MockScorer::new(5.0)),
        Arc::new(MockGenerator::echo()),
    )
    .unwrap();
    pipeline.load_chunks(vec![Chunk::row(0, "north")]).unwrap();
    embedder.set_failing(true);

    let failure = pipeline.try_answer("north").await.unwrap_err();

    assert!(matches!(failure, CollaboratorFailure::Embedding { .. }));
}

#[tokio::test]
async fn test_index_search_failure_is_not_reported_as_embedding() {
    let pipeline = Pipeline::new(
        PipelineConfig::default(),
        Arc::new(MockEmbedder::new(2).with_vector("north", vec![0.0, 1.0])),
        Arc::new(MockScorer::new(5.0)),
        Arc::new(MockGenerator::echo()),
    )
    .unwrap();
    let wider = MockEmbedder::new(3).with_vector("north", vec![0.0, 1.0, 0.0]);
    let index =
        EmbeddingIndex::build(vec![Chunk::row(0, "north")], &wider, DistanceMetric::Cosine)
            .unwrap();
    pipeline.index().install(index);

    let failure = pipeline.try_answer("north").await.unwrap_err();
    let answer = pipeline.answer("north").await;

    assert!(matches!(failure, CollaboratorFailure::Search { .. }));
    assert_eq!(answer.outcome, AnswerOutcome::Unavailable);
}

#[test]
fn test_retrieval_errors_keep_their_stage() {
    let embedding = CollaboratorFailure::from(crate::retrieval::RetrievalError::Embedding(
        crate::embedding::EmbeddingError::InferenceFailed {
            reason: "offline".to_string(),
        },
    ));
    let search = CollaboratorFailure::from(crate::retrieval::RetrievalError::Index(
        crate::index::IndexError::InvalidDimension {
            expected: 3,
            actual: 2,
        },
    ));
    let top_k = CollaboratorFailure::from(crate::retrieval::RetrievalError::InvalidTopK);

    assert!(matches!(embedding, CollaboratorFailure::Embedding { .. }));
    assert!(matches!(search, CollaboratorFailure::Search { .. }));
    assert!(matches!(
        top_k,
        CollaboratorFailure::Aborted {
            stage: "retrieval",
            ..
        }
    ));
}

#[tokio::test]
async fn test_passage_context_is_tidied_and_narrowed() {
    let generator = Arc::new(MockGenerator::echo());
    let pipeline = accepting_pipeline(PipelineConfig::default(), generator);
    pipeline
        .load_corpus(&RawCorpus::Document(
            "Paris is the capital of France. Lyon has silk.\n\n• Riyadh is in Saudi Arabia."
                .into(),
        ))
        .unwrap();

    let answer = pipeline.answer("Where is Riyadh").await;

    assert_eq!(answer.context.as_deref(), Some("Riyadh is in Saudi Arabia."));
}

#[tokio::test]
async fn test_tidying_keeps_sentence_ending_numbers() {
    let generator = Arc::new(MockGenerator::echo());
    let pipeline = accepting_pipeline(PipelineConfig::default(), generator.clone());
    pipeline
        .load_corpus(&RawCorpus::Document(
            "The museum opened in 1889. Entry costs 10 - 15 euros.".into(),
        ))
        .unwrap();

    let answer = pipeline.answer("what year did the museum open").await;

    assert_eq!(answer.context.as_deref(), Some("The museum opened in 1889."));
    assert_eq!(
        generator.last_context().as_deref(),
        Some("The museum opened in 1889.")
    );
}

#[tokio::test]
async fn test_extraction_can_be_disabled() {
    let generator = Arc::new(MockGenerator::echo());
    let config = PipelineConfig::default().with_extract_sentence(false);
    let pipeline = accepting_pipeline(config, generator);
    pipeline
        .load_corpus(&RawCorpus::Document(
            "Paris is the capital of France. Lyon has silk.\n\n• Riyadh is in Saudi Arabia."
                .into(),
        ))
        .unwrap();

    let answer = pipeline.answer("Where is Riyadh").await;

    assert_eq!(
        answer.context.as_deref(),
        Some("Paris is the capital of France. Lyon has silk. Riyadh is in Saudi Arabia.")
    );
}

#[tokio::test]
async fn test_multiple_context_chunks_are_joined() {
    let generator = Arc::new(MockGenerator::echo());
    let config = PipelineConfig::default()
        .with_context_chunks(2)
        .with_extract_sentence(false);
    let pipeline = accepting_pipeline(config, generator);
    pipeline.load_chunks(city_chunks()).unwrap();

    let answer = pipeline.answer("what city is in France").await;
    let context = answer.context.unwrap();

    assert_eq!(context.split(CONTEXT_SEPARATOR).count(), 2);
    assert!(context.starts_with(CITIES[1]));
}

#[tokio::test]
async fn test_similarity_never_gates() {
    let generator = Arc::new(MockGenerator::replying("unrelated"));
    let pipeline = stub_pipeline(PipelineConfig::default(), generator)
        .with_comparator(Arc::new(MockComparator::new(0.0)));
    pipeline.load_chunks(city_chunks()).unwrap();

    let answer = pipeline.answer("what city is in France").await;

    assert_eq!(answer.outcome, AnswerOutcome::Generated);
    assert_eq!(answer.generation_similarity, Some(0.0));
}

#[tokio::test]
async fn test_similarity_failure_is_dropped() {
    let pipeline = stub_pipeline(PipelineConfig::default(), Arc::new(MockGenerator::echo()))
        .with_comparator(Arc::new(MockComparator::failing()));
    pipeline.load_chunks(city_chunks()).unwrap();

    let answer = pipeline.answer("what city is in France").await;

    assert_eq!(answer.outcome, AnswerOutcome::Generated);
    assert_eq!(answer.generation_similarity, None);
}

#[tokio::test]
async fn test_similarity_check_can_be_disabled() {
    let config = PipelineConfig::default().with_similarity_check(false);
    let pipeline = stub_pipeline(config, Arc::new(MockGenerator::echo()));
    pipeline.load_chunks(city_chunks()).unwrap();

    let answer = pipeline.answer("what city is in France").await;

    assert_eq!(answer.generation_similarity, None);
}
