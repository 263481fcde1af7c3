use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised while turning a raw corpus into chunks.
///
/// Every variant is fatal to the load that raised it; the previously installed
/// index stays in place.
pub enum CorpusError {
    /// Corpus file does not exist.
    #[error("corpus not found at path: {path}")]
    NotFound {
        /// Requested path.
        path: PathBuf,
    },

    /// Neither the primary nor the fallback encoding could decode the bytes.
    #[error("failed to decode '{source_name}' as {tried}")]
    DecodeFailure {
        /// File path or other label for the input.
        source_name: String,
        /// Encodings attempted, in order.
        tried: &'static str,
    },

    /// A PDF could not be parsed or its text could not be extracted.
    #[error("failed to extract text from PDF '{path}': {reason}")]
    Pdf {
        /// Requested path.
        path: PathBuf,
        /// Error message.
        reason: String,
    },

    /// Normalization produced no usable text.
    #[error("corpus is empty after normalization")]
    Empty,

    /// Tabular input could not be parsed.
    #[error("malformed table at record {record}: {reason}")]
    Malformed {
        /// Zero-based record index (header excluded).
        record: usize,
        /// Error message.
        reason: String,
    },

    /// Invalid chunking configuration.
    #[error("invalid chunking configuration: {reason}")]
    InvalidConfig {
        /// Error message.
        reason: String,
    },

    /// Reading the corpus file failed for a reason other than absence.
    #[error("failed to read corpus '{path}': {source}")]
    Io {
        /// Requested path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
