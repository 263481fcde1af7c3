use super::*;
use crate::corpus::Chunk;
use crate::embedding::{MockEmbedder, SentenceEmbedder};
use crate::retrieval::RetrievalCandidate;
use std::sync::Arc;

fn candidate(id: u64, text: &str) -> RetrievalCandidate {
    RetrievalCandidate {
        chunk: Chunk::row(id, text),
        distance: 0.5,
        similarity: 0.5,
    }
}

fn reranked(id: u64, confidence: f32) -> RerankedCandidate {
    RerankedCandidate {
        chunk: Chunk::row(id, format!("chunk {id}")),
        similarity: 0.5,
        fine_score: 0.0,
        confidence,
    }
}

mod confidence_tests {
    use super::*;

    #[test]
    fn test_zero_logit_is_fifty() {
        assert!((confidence_from_logit(0.0) - 50.0).abs() < 1e-5);
    }

    #[test]
    fn test_confidence_is_monotonic_and_bounded() {
        let values: Vec<f32> = [-100.0, -2.0, 0.0, 2.0, 100.0]
            .iter()
            .map(|x| confidence_from_logit(*x))
            .collect();

        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert!(values.iter().all(|v| (0.0..=100.0).contains(v)));
    }

    #[test]
    fn test_extreme_logits_stay_finite() {
        assert_eq!(confidence_from_logit(f32::NEG_INFINITY), 0.0);
        assert_eq!(confidence_from_logit(f32::INFINITY), 100.0);
    }
}

mod rerank_tests {
    use super::*;

    #[test]
    fn test_rerank_sorts_descending() {
        let scorer = MockScorer::new(0.0)
            .with_score("low", -1.0)
            .with_score("high", 3.0)
            .with_score("mid", 1.0);
        let reranker = CandidateReranker::new(Arc::new(scorer));

        let out = reranker
            .rerank(
                "q",
                vec![candidate(0, "low"), candidate(1, "high"), candidate(2, "mid")],
            )
            .unwrap();

        let ids: Vec<u64> = out.iter().map(|c| c.chunk.id).collect();
        assert_eq!(ids, vec![1, 2, 0]);
        assert!(out[0].confidence > out[1].confidence);
    }

    #[test]
    fn test_rerank_ties_keep_input_order() {
        let reranker = CandidateReranker::new(Arc::new(MockScorer::new(1.0)));

        let out = reranker
            .rerank("q", vec![candidate(5, "a"), candidate(2, "b"), candidate(9, "c")])
            .unwrap();

        let ids: Vec<u64> = out.iter().map(|c| c.chunk.id).collect();
        assert_eq!(ids, vec![5, 2, 9]);
    }

    #[test]
    fn test_rerank_empty_input() {
        let scorer = Arc::new(MockScorer::new(1.0));
        let reranker = CandidateReranker::new(scorer.clone());

        assert!(reranker.rerank("q", Vec::new()).unwrap().is_empty());
        assert_eq!(scorer.calls(), 0);
    }

    #[test]
    fn test_rerank_carries_coarse_similarity() {
        let reranker = CandidateReranker::new(Arc::new(MockScorer::new(2.0)));

        let out = reranker.rerank("q", vec![candidate(0, "a")]).unwrap();

        assert_eq!(out[0].similarity, 0.5);
        assert_eq!(out[0].fine_score, 2.0);
        assert_eq!(out[0].confidence, confidence_from_logit(2.0));
    }

    #[test]
    fn test_rerank_rejects_nan_scores() {
        let scorer = MockScorer::new(0.0).with_score("bad", f32::NAN);
        let reranker = CandidateReranker::new(Arc::new(scorer));

        let result = reranker.rerank("q", vec![candidate(0, "ok"), candidate(1, "bad")]);

        assert!(matches!(result, Err(ScoringError::ComputationFailed { .. })));
    }

    #[test]
    fn test_rerank_propagates_scorer_failure() {
        let scorer = Arc::new(MockScorer::new(0.0));
        scorer.set_failing(true);
        let reranker = CandidateReranker::new(scorer);

        assert!(reranker.rerank("q", vec![candidate(0, "a")]).is_err());
    }

    #[test]
    fn test_learned_scorer_prefers_full_match() {
        let reranker = CandidateReranker::new(Arc::new(LearnedPairwiseScorer::stub().unwrap()));

        let out = reranker
            .rerank(
                "what city is in France",
                vec![
                    candidate(0, "city: Riyadh - country: Saudi Arabia"),
                    candidate(1, "city: Paris - country: France"),
                ],
            )
            .unwrap();

        assert_eq!(out[0].chunk.id, 1);
        assert!(out[0].confidence > 30.0);
        assert!(out[1].confidence < 30.0);
        assert_eq!(reranker.scorer_name(), "learned_pairwise");
    }
}

mod gate_tests {
    use super::*;

    #[test]
    fn test_gate_rejects_empty_with_zero() {
        let gate = ConfidenceGate::new(30.0, 1).unwrap();

        assert_eq!(gate.gate(&[]), RetrievalResult::Rejected { confidence: 0.0 });
    }

    #[test]
    fn test_gate_accepts_at_threshold() {
        let gate = ConfidenceGate::new(30.0, 1).unwrap();

        let result = gate.gate(&[reranked(4, 30.0)]);

        assert!(result.is_accepted());
        assert_eq!(result.confidence(), 30.0);
        assert_eq!(result.context(), Some("chunk 4"));
    }

    #[test]
    fn test_gate_rejects_one_unit_below() {
        let gate = ConfidenceGate::new(30.0, 1).unwrap();

        let result = gate.gate(&[reranked(4, 29.0)]);

        assert_eq!(result, RetrievalResult::Rejected { confidence: 29.0 });
    }

    #[test]
    fn test_gate_only_looks_at_best() {
        let gate = ConfidenceGate::new(50.0, 1).unwrap();

        let result = gate.gate(&[reranked(1, 90.0), reranked(2, 80.0)]);

        match result {
            RetrievalResult::Accepted { chunks, confidence, .. } => {
                assert_eq!(chunks.len(), 1);
                assert_eq!(chunks[0].id, 1);
                assert_eq!(confidence, 90.0);
            }
            other => panic!("expected acceptance, got {other}"),
        }
    }

    #[test]
    fn test_gate_joins_qualifying_chunks() {
        let gate = ConfidenceGate::new(50.0, 3).unwrap();

        let result = gate.gate(&[reranked(1, 90.0), reranked(2, 60.0), reranked(3, 40.0)]);

        assert_eq!(result.context(), Some("chunk 1\n---\nchunk 2"));
        assert_eq!(result.confidence(), 90.0);
    }

    #[test]
    fn test_gate_validates_configuration() {
        assert!(ConfidenceGate::new(-1.0, 1).is_err());
        assert!(ConfidenceGate::new(100.5, 1).is_err());
        assert!(ConfidenceGate::new(30.0, 0).is_err());
        assert!(ConfidenceGate::new(0.0, 1).is_ok());
        assert!(ConfidenceGate::new(100.0, 1).is_ok());
    }

    #[test]
    fn test_result_display() {
        let rejected = RetrievalResult::Rejected { confidence: 12.5 };

        assert_eq!(rejected.to_string(), "REJECTED (confidence: 12.50)");
    }
}

mod extract_tests {
    use super::*;

    #[test]
    fn test_split_keeps_punctuation() {
        let sentences = split_sentences("One two. Three four! Five six? Seven");

        assert_eq!(sentences, vec!["One two.", "Three four!", "Five six?", "Seven"]);
    }

    #[test]
    fn test_split_ignores_decimal_points() {
        assert_eq!(split_sentences("Rate is 3.5 today."), vec!["Rate is 3.5 today."]);
    }

    #[test]
    fn test_extract_picks_highest_overlap() {
        let extractor = SentenceExtractor::lexical();
        let text = "The Eiffel Tower is tall. Paris is the capital of France. Lyon is large.";

        let best = extractor.extract("what is the capital of France", text).unwrap();

        assert_eq!(best, "Paris is the capital of France.");
    }

    #[test]
    fn test_extract_ties_keep_first() {
        let extractor = SentenceExtractor::lexical();

        let best = extractor
            .extract("red blue", "Red car here. Blue car there.")
            .unwrap();

        assert_eq!(best, "Red car here.");
    }

    #[test]
    fn test_extract_single_sentence_is_idempotent() {
        let extractor = SentenceExtractor::lexical();
        let text = "Paris is the capital of France.";

        assert_eq!(extractor.extract("capital of France", text).unwrap(), text);
    }

    #[test]
    fn test_extract_without_overlap_returns_full_text() {
        let extractor = SentenceExtractor::lexical();
        let text = "Alpha beta. Gamma delta.";

        assert_eq!(extractor.extract("zeta", text).unwrap(), text);
    }

    #[test]
    fn test_extract_is_case_insensitive() {
        let extractor = SentenceExtractor::lexical();

        let best = extractor
            .extract("RIYADH", "Paris is in France. Riyadh is in Saudi Arabia.")
            .unwrap();

        assert_eq!(best, "Riyadh is in Saudi Arabia.");
    }

    #[test]
    fn test_default_extractor_is_lexical() {
        let extractor: SentenceExtractor = SentenceExtractor::default();

        assert_eq!(
            extractor.extract("capital", "Lyon has silk. Paris is the capital.").unwrap(),
            "Paris is the capital."
        );
    }

    #[test]
    fn test_extract_with_custom_scorer() {
        let scorer = MockScorer::new(0.0).with_score("Second.", 5.0);
        let extractor = SentenceExtractor::new(scorer);

        assert_eq!(extractor.extract("q", "First. Second.").unwrap(), "Second.");
    }

    #[test]
    fn test_lexical_overlap_counts_distinct_words() {
        assert_eq!(LexicalOverlapScorer::overlap("the the cat", "The cat sat"), 2);
        assert_eq!(
            LexicalOverlapScorer.score("cat", "dog").unwrap(),
            0.0
        );
    }
}

mod similarity_tests {
    use super::*;

    #[test]
    fn test_embedding_comparator_identical_text() {
        let comparator = EmbeddingComparator::new(Arc::new(SentenceEmbedder::stub().unwrap()));

        let sim = comparator.similarity("Paris France", "paris, france").unwrap();

        assert!((sim - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_embedding_comparator_propagates_failure() {
        let embedder = Arc::new(MockEmbedder::new(2));
        embedder.set_failing(true);
        let comparator = EmbeddingComparator::new(embedder);

        assert!(matches!(
            comparator.similarity("a", "b"),
            Err(ScoringError::Embedding(_))
        ));
    }
}
