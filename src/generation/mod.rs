//! Answer generation from a question and curated context.

pub mod config;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod prompt;


pub use config::GenerationConfig;
pub use error::GenerationError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockGenerator;
pub use prompt::{PromptTemplate, clean_generation};

use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use tracing::{debug, error, warn};

#[async_trait]
/// Produces answer text for a question, given the context retrieval admitted.
pub trait Generator: Send + Sync {
    async fn generate(&self, question: &str, context: &str) -> Result<String, GenerationError>;
}

/// Chat-model generator backed by the `genai` multi-provider client.
///
/// Provider credentials come from the provider's usual environment variable
/// (for example `GEMINI_API_KEY`).
pub struct GenaiGenerator {
    client: Client,
    config: GenerationConfig,
    options: ChatOptions,
}

impl std::fmt::Debug for GenaiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiGenerator")
            .field("config", &self.config)
            .finish()
    }
}

impl GenaiGenerator {
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        Self::with_client(Client::default(), config)
    }

    pub fn with_client(client: Client, config: GenerationConfig) -> Result<Self, GenerationError> {
        config.validate()?;

        if let Some(top_k) = config.top_k {
            warn!(top_k, "top_k is not supported by the chat client and will be ignored");
        }

        let options = ChatOptions::default()
            .with_temperature(config.temperature as f64)
            .with_top_p(config.top_p as f64)
            .with_max_tokens(config.max_new_tokens);

        Ok(Self {
            client,
            config,
            options,
        })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }
}

#[async_trait]
impl Generator for GenaiGenerator {
    async fn generate(&self, question: &str, context: &str) -> Result<String, GenerationError> {
        let prompt = self.config.template.render(question, context);
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)]);

        debug!(
            model = %self.config.model,
            context_len = context.len(),
            "Calling generator"
        );

        let response = self
            .client
            .exec_chat(&self.config.model, request, Some(&self.options))
            .await
            .map_err(|e| {
                error!("Provider error: {}", e);
                GenerationError::Provider {
                    reason: e.to_string(),
                }
            })?;

        let text = clean_generation(response.first_text().unwrap_or_default());
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        Ok(text)
    }
}
