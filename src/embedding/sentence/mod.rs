//! Sentence embedder backing the coarse index.
//!
//! With a model directory it runs a BERT-family sentence-transformer
//! (mean pooling, unit length). Without one it falls back to feature-hashed
//! bag-of-words vectors, which keep lexical overlap visible to cosine
//! similarity and need no model files.

pub mod config;


pub use config::SentenceEmbedderConfig;

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::TextEmbedder;
use crate::embedding::bert::BertEncoder;
use crate::embedding::device::select_device;
use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::{l2_normalize, load_tokenizer_with_truncation};
use crate::lexical::content_words;

enum EmbedderBackend {
    Model {
        encoder: BertEncoder,
        tokenizer: Tokenizer,
        device: Device,
    },
    Stub,
}

pub struct SentenceEmbedder {
    backend: EmbedderBackend,
    config: SentenceEmbedderConfig,
}

impl std::fmt::Debug for SentenceEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceEmbedder")
            .field(
                "backend",
                &match &self.backend {
                    EmbedderBackend::Model { device, .. } => format!("Model({:?})", device),
                    EmbedderBackend::Stub => "Stub".to_string(),
                },
            )
            .field("embedding_dim", &self.embedding_dim())
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl SentenceEmbedder {
    pub fn load(config: SentenceEmbedderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        let Some(model_dir) = config.model_dir.clone() else {
            warn!(
                embedding_dim = config.embedding_dim,
                "No embedder model configured, using hashed bag-of-words stub"
            );
            return Ok(Self {
                backend: EmbedderBackend::Stub,
                config,
            });
        };

        let device = select_device()?;
        debug!(?device, "Selected compute device for sentence embedder");

        let encoder =
            BertEncoder::load(&model_dir, &device).map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load BERT encoder: {}", e),
            })?;

        let tokenizer = load_tokenizer_with_truncation(&model_dir, config.max_seq_len)
            .map_err(|e| EmbeddingError::TokenizationFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            })?;

        info!(
            model_dir = %model_dir.display(),
            hidden_size = encoder.hidden_size(),
            max_seq_len = config.max_seq_len,
            "Sentence embedder loaded"
        );

        Ok(Self {
            backend: EmbedderBackend::Model {
                encoder,
                tokenizer,
                device,
            },
            config,
        })
    }

    pub fn stub() -> Result<Self, EmbeddingError> {
        Self::load(SentenceEmbedderConfig::stub())
    }

    pub fn is_model_loaded(&self) -> bool {
        matches!(self.backend, EmbedderBackend::Model { .. })
    }

    pub fn config(&self) -> &SentenceEmbedderConfig {
        &self.config
    }

    fn embed_with_model(
        &self,
        text: &str,
        encoder: &BertEncoder,
        tokenizer: &Tokenizer,
        device: &Device,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        if encoding.get_ids().is_empty() {
            return Ok(vec![0.0; encoder.hidden_size()]);
        }

        let input_ids = Tensor::new(encoding.get_ids(), device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(encoding.get_type_ids(), device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(encoding.get_attention_mask(), device)?.unsqueeze(0)?;

        let pooled = encoder.embed(&input_ids, &type_ids, &attention_mask)?;
        Ok(l2_normalize(pooled))
    }

    /// Each content word adds +/-1 to a bucket picked by its blake3 hash.
    fn embed_stub(&self, text: &str) -> Vec<f32> {
        let dim = self.config.embedding_dim;
        let mut vector = vec![0.0f32; dim];

        for word in content_words(text) {
            let hash = blake3::hash(word.as_bytes());
            let bytes = hash.as_bytes();

            let mut bucket_bytes = [0u8; 8];
            bucket_bytes.copy_from_slice(&bytes[..8]);
            let bucket = (u64::from_le_bytes(bucket_bytes) % dim as u64) as usize;
            let sign = if bytes[8] & 1 == 0 { 1.0 } else { -1.0 };

            vector[bucket] += sign;
        }

        l2_normalize(vector)
    }
}

impl TextEmbedder for SentenceEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match &self.backend {
            EmbedderBackend::Model {
                encoder,
                tokenizer,
                device,
            } => self.embed_with_model(text, encoder, tokenizer, device),
            EmbedderBackend::Stub => Ok(self.embed_stub(text)),
        }
    }

    fn embedding_dim(&self) -> usize {
        match &self.backend {
            EmbedderBackend::Model { encoder, .. } => encoder.hidden_size(),
            EmbedderBackend::Stub => self.config.embedding_dim,
        }
    }
}
