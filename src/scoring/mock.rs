use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::error::ScoringError;
use super::scorer::RelevanceScorer;
use super::similarity::SimilarityComparator;

/// Scorer returning preset scores per text, for tests.
#[derive(Debug, Default)]
pub struct MockScorer {
    scores: HashMap<String, f32>,
    default_score: f32,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl MockScorer {
    pub fn new(default_score: f32) -> Self {
        Self {
            default_score,
            ..Default::default()
        }
    }

    pub fn with_score(mut self, text: impl Into<String>, score: f32) -> Self {
        self.scores.insert(text.into(), score);
        self
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RelevanceScorer for MockScorer {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn score(&self, _query: &str, text: &str) -> Result<f32, ScoringError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail.load(Ordering::SeqCst) {
            return Err(ScoringError::ComputationFailed {
                reason: "mock scorer failure".to_string(),
            });
        }

        Ok(self.scores.get(text).copied().unwrap_or(self.default_score))
    }
}

/// Comparator returning a fixed similarity.
#[derive(Debug, Default)]
pub struct MockComparator {
    value: f32,
    fail: bool,
}

impl MockComparator {
    pub fn new(value: f32) -> Self {
        Self { value, fail: false }
    }

    pub fn failing() -> Self {
        Self {
            value: 0.0,
            fail: true,
        }
    }
}

impl SimilarityComparator for MockComparator {
    fn similarity(&self, _a: &str, _b: &str) -> Result<f32, ScoringError> {
        if self.fail {
            return Err(ScoringError::ComputationFailed {
                reason: "mock comparator failure".to_string(),
            });
        }
        Ok(self.value)
    }
}
