use crate::constants::{
    DEFAULT_GENERATOR_MODEL, DEFAULT_MAX_NEW_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P,
};

use super::error::GenerationError;
use super::prompt::PromptTemplate;

/// Sampling and prompt settings for [`GenaiGenerator`](super::GenaiGenerator).
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub model: String,
    pub template: PromptTemplate,
    pub temperature: f32,
    /// Nucleus sampling mass.
    pub top_p: f32,
    pub top_k: Option<u32>,
    pub max_new_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_GENERATOR_MODEL.to_string(),
            template: PromptTemplate::default(),
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            top_k: None,
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
        }
    }
}

impl GenerationConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    pub fn with_top_k(mut self, top_k: Option<u32>) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_max_new_tokens(mut self, max_new_tokens: u32) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.model.trim().is_empty() {
            return Err(GenerationError::InvalidConfig {
                reason: "model cannot be empty".to_string(),
            });
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(GenerationError::InvalidConfig {
                reason: format!("temperature must be in [0, 2], got {}", self.temperature),
            });
        }

        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(GenerationError::InvalidConfig {
                reason: format!("top_p must be in (0, 1], got {}", self.top_p),
            });
        }

        if self.top_k == Some(0) {
            return Err(GenerationError::InvalidConfig {
                reason: "top_k must be greater than 0 when set".to_string(),
            });
        }

        if self.max_new_tokens == 0 {
            return Err(GenerationError::InvalidConfig {
                reason: "max_new_tokens must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}
