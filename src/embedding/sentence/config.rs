use std::path::PathBuf;

use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::missing_model_file;

#[derive(Debug, Clone)]
/// Configuration for [`SentenceEmbedder`](super::SentenceEmbedder).
pub struct SentenceEmbedderConfig {
    /// Model directory holding `config.json`, `model.safetensors` and `tokenizer.json`.
    pub model_dir: Option<PathBuf>,
    /// Max tokens to consider.
    pub max_seq_len: usize,
    /// Output dimension in stub mode; a loaded model reports its own hidden size.
    pub embedding_dim: usize,
}

impl Default for SentenceEmbedderConfig {
    fn default() -> Self {
        Self {
            model_dir: None,
            max_seq_len: crate::constants::DEFAULT_MAX_SEQ_LEN,
            embedding_dim: crate::constants::DEFAULT_EMBEDDING_DIM,
        }
    }
}

impl SentenceEmbedderConfig {
    /// Env var used to locate the model directory.
    pub const ENV_MODEL_PATH: &'static str = "SIEVE_EMBEDDER_PATH";

    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: Some(model_dir.into()),
            ..Default::default()
        }
    }

    /// No model files; produces deterministic hashed bag-of-words vectors.
    pub fn stub() -> Self {
        Self::default()
    }

    pub fn with_embedding_dim(mut self, embedding_dim: usize) -> Self {
        self.embedding_dim = embedding_dim;
        self
    }

    pub fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        self.max_seq_len = max_seq_len;
        self
    }

    /// Reads the model directory from the environment; unset or blank means stub mode.
    pub fn from_env() -> Self {
        let model_dir = std::env::var(Self::ENV_MODEL_PATH)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self {
            model_dir,
            ..Default::default()
        }
    }

    pub fn is_stub(&self) -> bool {
        self.model_dir.is_none()
    }

    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.embedding_dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedding_dim must be greater than 0".to_string(),
            });
        }

        if self.max_seq_len == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "max_seq_len must be greater than 0".to_string(),
            });
        }

        if let Some(dir) = &self.model_dir {
            if !dir.is_dir() {
                return Err(EmbeddingError::ModelNotFound { path: dir.clone() });
            }
            if let Some(missing) = missing_model_file(dir) {
                return Err(EmbeddingError::ModelNotFound { path: missing });
            }
        }

        Ok(())
    }
}
