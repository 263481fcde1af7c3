use regex::Regex;
use std::sync::LazyLock;

use super::error::ScoringError;
use super::scorer::{LexicalOverlapScorer, RelevanceScorer};

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("valid sentence regex"));

/// Splits after `.`, `!` or `?` followed by whitespace; the punctuation stays
/// with its sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_END.find_iter(text) {
        // the punctuation mark is one byte
        sentences.push(&text[start..boundary.start() + 1]);
        start = boundary.end();
    }
    sentences.push(&text[start..]);

    sentences.retain(|s| !s.trim().is_empty());
    sentences
}

/// Narrows an accepted context to its most relevant sentence.
#[derive(Debug, Clone, Default)]
pub struct SentenceExtractor<S = LexicalOverlapScorer> {
    scorer: S,
}

impl SentenceExtractor {
    /// Extractor scoring sentences by shared-word count with the question.
    pub fn lexical() -> Self {
        Self::new(LexicalOverlapScorer)
    }
}

impl<S: RelevanceScorer> SentenceExtractor<S> {
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    /// The sentence with the strictly highest score, first one on ties.
    ///
    /// Returns `text` unchanged when no sentence scores above zero.
    pub fn extract(&self, question: &str, text: &str) -> Result<String, ScoringError> {
        let mut best: Option<&str> = None;
        let mut best_score = 0.0f32;

        for sentence in split_sentences(text) {
            let score = self.scorer.score(question, sentence)?;
            if score > best_score {
                best_score = score;
                best = Some(sentence);
            }
        }

        Ok(best.unwrap_or(text).to_string())
    }
}
