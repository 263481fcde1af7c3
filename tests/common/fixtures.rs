//! Shared corpora and pipeline builders for integration tests.

use std::path::PathBuf;
use std::sync::Arc;

use sieve::generation::MockGenerator;
use sieve::pipeline::{Pipeline, PipelineConfig};
use sieve::scoring::LearnedPairwiseScorer;
use sieve::{Chunk, SentenceEmbedder};
use tempfile::TempDir;

pub const FRANCE_QUESTION: &str = "what city is in France";

pub const RIYADH_ROW: &str = "city: Riyadh - country: Saudi Arabia";
pub const PARIS_ROW: &str = "city: Paris - country: France";

pub const CITIES_CSV: &str = "city,country\nRiyadh,Saudi Arabia\nParis,France\n";

pub fn city_chunks() -> Vec<Chunk> {
    vec![Chunk::row(0, RIYADH_ROW), Chunk::row(1, PARIS_ROW)]
}

/// Pipeline on stub models with the given generator.
pub fn stub_pipeline(config: PipelineConfig, generator: Arc<MockGenerator>) -> Pipeline {
    Pipeline::new(
        config,
        Arc::new(SentenceEmbedder::stub().unwrap()),
        Arc::new(LearnedPairwiseScorer::stub().unwrap()),
        generator,
    )
    .unwrap()
}

/// Writes `bytes` to `name` inside a fresh temp dir.
pub fn write_corpus(name: &str, bytes: &[u8]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    (dir, path)
}
