//! Word-level tokenization shared by the lexical scorers and the stub models.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("valid word regex"));

/// English function words ignored by the content-word helpers.
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "may", "might", "must", "shall",
    "can", "to", "of", "in", "for", "on", "with", "at", "by", "from", "as", "into", "through",
    "during", "before", "after", "above", "below", "between", "under", "again", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "each", "few", "more", "most", "other",
    "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too", "very",
    "just", "and", "but", "if", "or", "because", "until", "while", "what", "which", "who", "whom",
    "this", "that", "these", "those", "am", "it", "its",
];

/// Lowercased `\w+` tokens in order of appearance.
pub fn tokens(text: &str) -> Vec<String> {
    WORD.find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Distinct lowercased `\w+` tokens.
pub fn word_set(text: &str) -> HashSet<String> {
    tokens(text).into_iter().collect()
}

/// Distinct lowercased tokens with [`STOP_WORDS`] removed.
pub fn content_words(text: &str) -> HashSet<String> {
    tokens(text)
        .into_iter()
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
        .collect()
}
