pub mod config;
pub mod error;


pub use config::{MAX_SEQ_LEN, RerankerConfig};
pub use error::RerankerError;

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::bert::BertClassifier;
use crate::embedding::device::select_device;
use crate::embedding::utils::{load_tokenizer_with_truncation, missing_model_file};
use crate::lexical::content_words;

/// Slope applied to the lexical base score so stub logits spread like a real cross-encoder's.
const STUB_LOGIT_SCALE: f32 = 8.0;

struct CrossEncoder {
    model: BertClassifier,
    tokenizer: Tokenizer,
    device: Device,
}

/// Joint (question, passage) relevance scorer.
///
/// Scores are raw logits: unbounded, higher is more relevant.
pub struct Reranker {
    config: RerankerConfig,
    encoder: Option<CrossEncoder>,
}

impl std::fmt::Debug for Reranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reranker")
            .field(
                "device",
                &self.encoder.as_ref().map(|e| format!("{:?}", e.device)),
            )
            .field("config", &self.config)
            .field("model_loaded", &self.is_model_loaded())
            .finish()
    }
}

impl Reranker {
    pub fn load(config: RerankerConfig) -> Result<Self, RerankerError> {
        if let Err(msg) = config.validate() {
            return Err(RerankerError::InvalidConfig { reason: msg });
        }

        let Some(model_path) = config.model_path.clone() else {
            warn!("No reranker model path configured, operating in stub mode");
            return Ok(Self {
                config,
                encoder: None,
            });
        };

        if !model_path.is_dir() {
            return Err(RerankerError::ModelNotFound { path: model_path });
        }
        if let Some(missing) = missing_model_file(&model_path) {
            return Err(RerankerError::ModelLoadFailed {
                reason: format!("Missing {}", missing.display()),
            });
        }

        let device = select_device()?;
        debug!(?device, "Selected compute device for reranker");
        info!(model_path = %model_path.display(), "Loading reranker model");

        let model =
            BertClassifier::load(&model_path, &device).map_err(|e| RerankerError::ModelLoadFailed {
                reason: format!("Failed to load BERT model: {}", e),
            })?;

        let tokenizer = load_tokenizer_with_truncation(&model_path, MAX_SEQ_LEN).map_err(|e| {
            RerankerError::ModelLoadFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            }
        })?;

        info!("Reranker model loaded successfully");

        Ok(Self {
            config,
            encoder: Some(CrossEncoder {
                model,
                tokenizer,
                device,
            }),
        })
    }

    pub fn stub() -> Result<Self, RerankerError> {
        Self::load(RerankerConfig::stub())
    }

    /// Raw relevance logit for one pair.
    pub fn score(&self, query: &str, candidate: &str) -> Result<f32, RerankerError> {
        let Some(encoder) = &self.encoder else {
            let score = lexical_logit(query, candidate);
            debug!(score, "Computed score (stub)");
            return Ok(score);
        };

        let tokens = encoder
            .tokenizer
            .encode((query, candidate), true)
            .map_err(|e| RerankerError::TokenizationFailed {
                reason: e.to_string(),
            })?;

        let device = &encoder.device;
        let token_ids = Tensor::new(tokens.get_ids(), device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(tokens.get_type_ids(), device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(tokens.get_attention_mask(), device)?.unsqueeze(0)?;

        let logits = encoder
            .model
            .forward(&token_ids, &type_ids, Some(&attention_mask))?;

        logits
            .flatten_all()?
            .to_vec1::<f32>()?
            .first()
            .copied()
            .ok_or_else(|| RerankerError::InferenceFailed {
                reason: "classifier returned no logits".to_string(),
            })
    }

    /// Scores every candidate against `query`, preserving input order.
    pub fn score_batch(&self, query: &str, candidates: &[&str]) -> Result<Vec<f32>, RerankerError> {
        debug!(
            query_len = query.len(),
            num_candidates = candidates.len(),
            model_loaded = self.is_model_loaded(),
            "Scoring candidates"
        );

        candidates
            .iter()
            .map(|candidate| self.score(query, candidate))
            .collect()
    }

    pub fn is_model_loaded(&self) -> bool {
        self.encoder.is_some()
    }

    pub fn config(&self) -> &RerankerConfig {
        &self.config
    }
}

/// Stub logit from content-word recall and Jaccard overlap.
///
/// `0.6 * recall + 0.4 * jaccard` lies in `[0, 1]`; it is centred on 0.5
/// and scaled so a half-matching pair sits at logit 0.
fn lexical_logit(query: &str, candidate: &str) -> f32 {
    let query_words = content_words(query);
    let candidate_words = content_words(candidate);

    let base = if query_words.is_empty() {
        let shorter = query.len().min(candidate.len()) as f32;
        let longer = query.len().max(candidate.len()).max(1) as f32;
        0.3 * shorter / longer
    } else {
        let matches = query_words.intersection(&candidate_words).count() as f32;
        let union = query_words.union(&candidate_words).count() as f32;

        let recall = matches / query_words.len() as f32;
        let jaccard = if union > 0.0 { matches / union } else { 0.0 };
        0.6 * recall + 0.4 * jaccard
    };

    STUB_LOGIT_SCALE * (base - 0.5)
}
