//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `SIEVE_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_CONFIDENCE_THRESHOLD,
    DEFAULT_GENERATION_TIMEOUT_MS, DEFAULT_GENERATOR_MODEL, DEFAULT_MAX_NEW_TOKENS,
    DEFAULT_RETRIEVAL_TIMEOUT_MS, DEFAULT_TEMPERATURE, DEFAULT_TOP_K, DEFAULT_TOP_P,
};
use crate::corpus::ChunkingConfig;
use crate::embedding::{RerankerConfig, SentenceEmbedderConfig};
use crate::generation::{GenerationConfig, PromptTemplate};
use crate::index::DistanceMetric;
use crate::pipeline::PipelineConfig;

/// Application configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SIEVE_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Corpus file loaded at startup (CSV/TSV or text).
    pub corpus_path: Option<PathBuf>,

    /// Sentence-embedding model directory. Unset: hashed bag-of-words stub.
    pub embedder_path: Option<PathBuf>,

    /// Cross-encoder model directory. Unset: lexical stub.
    pub reranker_path: Option<PathBuf>,

    /// Generator model id. Default: `gemini-2.0-flash`.
    pub generator_model: String,

    pub prompt_template: PromptTemplate,

    /// Coarse retrieval fan-out. Default: `5`.
    pub top_k: usize,

    /// Gate threshold, 0–100. Default: `30`.
    pub confidence_threshold: f32,

    /// Max accepted chunks handed to the generator. Default: `1`.
    pub context_chunks: usize,

    pub distance_metric: DistanceMetric,

    /// Document window in characters. Default: `400`.
    pub chunk_size: usize,

    /// Characters shared by adjacent windows. Default: `50`.
    pub chunk_overlap: usize,

    pub temperature: f32,
    pub top_p: f32,
    pub generation_top_k: Option<u32>,
    pub max_new_tokens: u32,

    pub retrieval_timeout_ms: u64,
    pub generation_timeout_ms: u64,

    /// Narrow accepted chunks to their best sentence. Default: `true`.
    pub extract_sentence: bool,

    /// Annotate answers with question/answer similarity. Default: `true`.
    pub similarity_check: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_path: None,
            embedder_path: None,
            reranker_path: None,
            generator_model: DEFAULT_GENERATOR_MODEL.to_string(),
            prompt_template: PromptTemplate::default(),
            top_k: DEFAULT_TOP_K,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            context_chunks: 1,
            distance_metric: DistanceMetric::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            generation_top_k: None,
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            retrieval_timeout_ms: DEFAULT_RETRIEVAL_TIMEOUT_MS,
            generation_timeout_ms: DEFAULT_GENERATION_TIMEOUT_MS,
            extract_sentence: true,
            similarity_check: true,
        }
    }
}

impl Config {
    const ENV_CORPUS_PATH: &'static str = "SIEVE_CORPUS_PATH";
    const ENV_EMBEDDER_PATH: &'static str = SentenceEmbedderConfig::ENV_MODEL_PATH;
    const ENV_RERANKER_PATH: &'static str = RerankerConfig::ENV_MODEL_PATH;
    const ENV_GENERATOR_MODEL: &'static str = "SIEVE_GENERATOR_MODEL";
    const ENV_PROMPT_TEMPLATE: &'static str = "SIEVE_PROMPT_TEMPLATE";
    const ENV_TOP_K: &'static str = "SIEVE_TOP_K";
    const ENV_CONFIDENCE_THRESHOLD: &'static str = "SIEVE_CONFIDENCE_THRESHOLD";
    const ENV_CONTEXT_CHUNKS: &'static str = "SIEVE_CONTEXT_CHUNKS";
    const ENV_DISTANCE_METRIC: &'static str = "SIEVE_DISTANCE_METRIC";
    const ENV_CHUNK_SIZE: &'static str = "SIEVE_CHUNK_SIZE";
    const ENV_CHUNK_OVERLAP: &'static str = "SIEVE_CHUNK_OVERLAP";
    const ENV_TEMPERATURE: &'static str = "SIEVE_TEMPERATURE";
    const ENV_TOP_P: &'static str = "SIEVE_TOP_P";
    const ENV_GEN_TOP_K: &'static str = "SIEVE_GEN_TOP_K";
    const ENV_MAX_NEW_TOKENS: &'static str = "SIEVE_MAX_NEW_TOKENS";
    const ENV_RETRIEVAL_TIMEOUT_MS: &'static str = "SIEVE_RETRIEVAL_TIMEOUT_MS";
    const ENV_GENERATION_TIMEOUT_MS: &'static str = "SIEVE_GENERATION_TIMEOUT_MS";
    const ENV_EXTRACT_SENTENCE: &'static str = "SIEVE_EXTRACT_SENTENCE";
    const ENV_SIMILARITY_CHECK: &'static str = "SIEVE_SIMILARITY_CHECK";

    /// Every variable [`Config::from_env`] reads.
    pub const ENV_VARS: [&'static str; 19] = [
        Self::ENV_CORPUS_PATH,
        Self::ENV_EMBEDDER_PATH,
        Self::ENV_RERANKER_PATH,
        Self::ENV_GENERATOR_MODEL,
        Self::ENV_PROMPT_TEMPLATE,
        Self::ENV_TOP_K,
        Self::ENV_CONFIDENCE_THRESHOLD,
        Self::ENV_CONTEXT_CHUNKS,
        Self::ENV_DISTANCE_METRIC,
        Self::ENV_CHUNK_SIZE,
        Self::ENV_CHUNK_OVERLAP,
        Self::ENV_TEMPERATURE,
        Self::ENV_TOP_P,
        Self::ENV_GEN_TOP_K,
        Self::ENV_MAX_NEW_TOKENS,
        Self::ENV_RETRIEVAL_TIMEOUT_MS,
        Self::ENV_GENERATION_TIMEOUT_MS,
        Self::ENV_EXTRACT_SENTENCE,
        Self::ENV_SIMILARITY_CHECK,
    ];

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let d = Self::default();

        Ok(Self {
            corpus_path: Self::parse_optional_path_from_env(Self::ENV_CORPUS_PATH),
            embedder_path: Self::parse_optional_path_from_env(Self::ENV_EMBEDDER_PATH),
            reranker_path: Self::parse_optional_path_from_env(Self::ENV_RERANKER_PATH),
            generator_model: Self::parse_string_from_env(
                Self::ENV_GENERATOR_MODEL,
                d.generator_model,
            ),
            prompt_template: Self::parse_from_env(Self::ENV_PROMPT_TEMPLATE, d.prompt_template)?,
            top_k: Self::parse_from_env(Self::ENV_TOP_K, d.top_k)?,
            confidence_threshold: Self::parse_from_env(
                Self::ENV_CONFIDENCE_THRESHOLD,
                d.confidence_threshold,
            )?,
            context_chunks: Self::parse_from_env(Self::ENV_CONTEXT_CHUNKS, d.context_chunks)?,
            distance_metric: Self::parse_from_env(Self::ENV_DISTANCE_METRIC, d.distance_metric)?,
            chunk_size: Self::parse_from_env(Self::ENV_CHUNK_SIZE, d.chunk_size)?,
            chunk_overlap: Self::parse_from_env(Self::ENV_CHUNK_OVERLAP, d.chunk_overlap)?,
            temperature: Self::parse_from_env(Self::ENV_TEMPERATURE, d.temperature)?,
            top_p: Self::parse_from_env(Self::ENV_TOP_P, d.top_p)?,
            generation_top_k: Self::parse_optional_from_env(Self::ENV_GEN_TOP_K)?,
            max_new_tokens: Self::parse_from_env(Self::ENV_MAX_NEW_TOKENS, d.max_new_tokens)?,
            retrieval_timeout_ms: Self::parse_from_env(
                Self::ENV_RETRIEVAL_TIMEOUT_MS,
                d.retrieval_timeout_ms,
            )?,
            generation_timeout_ms: Self::parse_from_env(
                Self::ENV_GENERATION_TIMEOUT_MS,
                d.generation_timeout_ms,
            )?,
            extract_sentence: Self::parse_bool_from_env(
                Self::ENV_EXTRACT_SENTENCE,
                d.extract_sentence,
            )?,
            similarity_check: Self::parse_bool_from_env(
                Self::ENV_SIMILARITY_CHECK,
                d.similarity_check,
            )?,
        })
    }

    /// Validates paths and value ranges (does not load anything).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.corpus_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        for path in [&self.embedder_path, &self.reranker_path].into_iter().flatten() {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        self.pipeline_config()
            .validate()
            .map_err(|e| ConfigError::Invalid {
                reason: e.to_string(),
            })?;

        self.generation_config()
            .validate()
            .map_err(|e| ConfigError::Invalid {
                reason: e.to_string(),
            })?;

        Ok(())
    }

    pub fn embedder_config(&self) -> SentenceEmbedderConfig {
        match &self.embedder_path {
            Some(path) => SentenceEmbedderConfig::new(path.clone()),
            None => SentenceEmbedderConfig::stub(),
        }
    }

    pub fn reranker_config(&self) -> RerankerConfig {
        match &self.reranker_path {
            Some(path) => RerankerConfig::new(path.clone()),
            None => RerankerConfig::stub(),
        }
    }

    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig::new(self.generator_model.clone())
            .with_template(self.prompt_template)
            .with_temperature(self.temperature)
            .with_top_p(self.top_p)
            .with_top_k(self.generation_top_k)
            .with_max_new_tokens(self.max_new_tokens)
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::default()
            .with_top_k(self.top_k)
            .with_confidence_threshold(self.confidence_threshold)
            .with_context_chunks(self.context_chunks)
            .with_metric(self.distance_metric)
            .with_chunking(ChunkingConfig::new(self.chunk_size, self.chunk_overlap))
            .with_extract_sentence(self.extract_sentence)
            .with_similarity_check(self.similarity_check)
            .with_retrieval_timeout(Duration::from_millis(self.retrieval_timeout_ms))
            .with_generation_timeout(Duration::from_millis(self.generation_timeout_ms))
    }

    fn read_env(name: &'static str) -> Option<String> {
        env::var(name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_optional_path_from_env(name: &'static str) -> Option<PathBuf> {
        Self::read_env(name).map(PathBuf::from)
    }

    fn parse_string_from_env(name: &'static str, default: String) -> String {
        Self::read_env(name).unwrap_or(default)
    }

    fn parse_from_env<T>(name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        Ok(Self::parse_optional_from_env(name)?.unwrap_or(default))
    }

    fn parse_optional_from_env<T>(name: &'static str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let Some(value) = Self::read_env(name) else {
            return Ok(None);
        };

        match value.parse::<T>() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(e) => Err(ConfigError::InvalidValue {
                name,
                reason: e.to_string(),
                value,
            }),
        }
    }

    fn parse_bool_from_env(name: &'static str, default: bool) -> Result<bool, ConfigError> {
        let Some(value) = Self::read_env(name) else {
            return Ok(default);
        };

        match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                name,
                value,
                reason: "expected true or false".to_string(),
            }),
        }
    }
}
