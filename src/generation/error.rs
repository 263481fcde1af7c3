use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generator provider error: {reason}")]
    Provider { reason: String },

    #[error("generator returned no text")]
    EmptyResponse,

    #[error("invalid generation configuration: {reason}")]
    InvalidConfig { reason: String },
}
