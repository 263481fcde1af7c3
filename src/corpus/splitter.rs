//! Overlapping window splitter for free text.
//!
//! Cuts on paragraph breaks first, then line breaks, then sentence ends. A
//! piece that is still larger than the window after the last separator is
//! emitted whole rather than cut mid-sentence.

use std::collections::VecDeque;

use super::config::ChunkingConfig;

/// Boundaries in priority order.
pub const SEPARATORS: [&str; 3] = ["\n\n", "\n", ". "];

#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    pub fn new(config: &ChunkingConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
        }
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &SEPARATORS)
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let found = separators.iter().position(|sep| text.contains(sep));

        let (pieces, finer) = match found {
            Some(idx) => (split_keeping(text, separators[idx]), &separators[idx + 1..]),
            None => (vec![text], &separators[..0]),
        };

        let mut out = Vec::new();
        let mut pending: Vec<&str> = Vec::new();

        for piece in pieces {
            if char_len(piece) < self.chunk_size {
                pending.push(piece);
                continue;
            }

            if !pending.is_empty() {
                out.extend(self.merge(&pending));
                pending.clear();
            }

            if finer.is_empty() {
                push_trimmed(&mut out, piece);
            } else {
                out.extend(self.split_recursive(piece, finer));
            }
        }

        if !pending.is_empty() {
            out.extend(self.merge(&pending));
        }

        out
    }

    /// Packs small pieces into windows, carrying up to `chunk_overlap`
    /// characters of tail into the next window.
    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let mut windows = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);

            if total + len > self.chunk_size && !current.is_empty() {
                push_trimmed(&mut windows, &current.iter().copied().collect::<String>());

                while total > self.chunk_overlap || (total + len > self.chunk_size && total > 0) {
                    let Some(front) = current.pop_front() else {
                        break;
                    };
                    total -= char_len(front);
                }
            }

            current.push_back(piece);
            total += len;
        }

        push_trimmed(&mut windows, &current.iter().copied().collect::<String>());
        windows
    }
}

/// Splits on `sep`, keeping each separator at the end of the piece it closes.
fn split_keeping<'a>(text: &'a str, sep: &str) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut start = 0;

    for (idx, matched) in text.match_indices(sep) {
        let end = idx + matched.len();
        pieces.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        pieces.push(&text[start..]);
    }

    pieces
}

fn push_trimmed(out: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
