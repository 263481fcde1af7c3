//! Cross-cutting, shared constants.
//!
//! # Confidence convention
//!
//! Every confidence and threshold in this crate is on the 0–100 scale. Coarse
//! retrieval similarity is reported on its own 0–1 scale and is never compared
//! against a confidence threshold.

/// Output dimension of the default sentence embedder (MiniLM family).
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Max tokens fed to the embedder and the cross-encoder.
pub const DEFAULT_MAX_SEQ_LEN: usize = 512;

/// Coarse retrieval fan-out.
pub const DEFAULT_TOP_K: usize = 5;

/// Minimum reranked confidence (0–100, inclusive) for a chunk to be answered from.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 30.0;

/// Upper bound of the confidence scale.
pub const MAX_CONFIDENCE: f32 = 100.0;

/// Document splitting window, in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 400;

/// Characters shared between adjacent document windows.
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;

/// Separator used when more than one accepted chunk is handed to the generator.
pub const CONTEXT_SEPARATOR: &str = "\n---\n";

/// Answer text returned when the gate rejects retrieval.
pub const NO_RELEVANT_CONTEXT: &str = "I couldn't find any relevant information.";

/// Answer text returned when a collaborator fails or times out.
pub const SERVICE_UNAVAILABLE: &str =
    "The answering service is temporarily unavailable. Please try again later.";

/// Default generator model id.
pub const DEFAULT_GENERATOR_MODEL: &str = "gemini-2.0-flash";

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TOP_P: f32 = 0.95;
pub const DEFAULT_MAX_NEW_TOKENS: u32 = 512;

pub const DEFAULT_RETRIEVAL_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_GENERATION_TIMEOUT_MS: u64 = 120_000;
