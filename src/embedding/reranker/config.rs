use std::path::PathBuf;

/// Token budget for the concatenated (question, passage) pair.
pub const MAX_SEQ_LEN: usize = crate::constants::DEFAULT_MAX_SEQ_LEN;

#[derive(Debug, Clone, Default)]
pub struct RerankerConfig {
    /// Cross-encoder model directory; `None` selects the lexical stub.
    pub model_path: Option<PathBuf>,
}

impl RerankerConfig {
    /// Env var used to locate the cross-encoder directory.
    pub const ENV_MODEL_PATH: &'static str = "SIEVE_RERANKER_PATH";

    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: Some(model_path.into()),
        }
    }

    pub fn stub() -> Self {
        Self { model_path: None }
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref path) = self.model_path
            && path.as_os_str().is_empty()
        {
            return Err("model_path cannot be empty when provided".to_string());
        }

        Ok(())
    }

    pub fn from_env() -> Self {
        let model_path = std::env::var(Self::ENV_MODEL_PATH)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self { model_path }
    }
}
