use crate::constants::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};

use super::error::CorpusError;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Window sizes for splitting free-text documents (in characters).
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    pub fn validate(&self) -> Result<(), CorpusError> {
        if self.chunk_size == 0 {
            return Err(CorpusError::InvalidConfig {
                reason: "chunk_size must be greater than zero".to_string(),
            });
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(CorpusError::InvalidConfig {
                reason: format!(
                    "chunk_overlap ({}) must be smaller than chunk_size ({})",
                    self.chunk_overlap, self.chunk_size
                ),
            });
        }

        Ok(())
    }
}
