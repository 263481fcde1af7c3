//! Corpus normalization: raw tables and documents in, ordered [`Chunk`]s out.
//!
//! - Tabular input yields one chunk per row, rendered as `"col: value - col: value"`.
//! - Free text is split into overlapping windows by [`TextSplitter`].
//!
//! Chunk ids follow production order, so normalizing the same input twice
//! yields identical chunks.

pub mod config;
pub mod decode;
pub mod error;
pub mod pdf;
pub mod splitter;
pub mod table;
pub mod tidy;


pub use config::ChunkingConfig;
pub use decode::{DecodedText, TextEncoding, decode_bytes, read_bytes, read_text};
pub use error::CorpusError;
pub use pdf::read_pdf_text;
pub use splitter::{SEPARATORS, TextSplitter};
pub use table::Table;
pub use tidy::{collapse_whitespace, tidy_passage};

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

/// Where a chunk came from; decides whether it may be tidied before generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    Row,
    Passage,
}

/// Immutable unit of retrievable text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// Position in normalization output.
    pub id: u64,
    /// Whitespace-collapsed text.
    pub text: String,
    pub kind: ChunkKind,
}

impl Chunk {
    pub fn new(id: u64, text: impl Into<String>, kind: ChunkKind) -> Self {
        Self {
            id,
            text: text.into(),
            kind,
        }
    }

    pub fn row(id: u64, text: impl Into<String>) -> Self {
        Self::new(id, text, ChunkKind::Row)
    }

    pub fn passage(id: u64, text: impl Into<String>) -> Self {
        Self::new(id, text, ChunkKind::Passage)
    }
}

/// Corpus before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawCorpus {
    Table(Table),
    Document(String),
}

impl RawCorpus {
    /// Reads a corpus file. `.csv` and `.tsv` are tabular, `.pdf` has its page
    /// text extracted, anything else is a decoded text document.
    pub fn from_path(path: &Path) -> Result<(Self, TextEncoding), CorpusError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        let decoded = match extension.as_deref() {
            Some("pdf") => read_pdf_text(path)?,
            _ => read_text(path)?,
        };

        let corpus = match extension.as_deref() {
            Some("csv") => RawCorpus::Table(Table::parse(&decoded.text, b',')?),
            Some("tsv") => RawCorpus::Table(Table::parse(&decoded.text, b'\t')?),
            _ => RawCorpus::Document(decoded.text),
        };

        debug!(
            path = %path.display(),
            encoding = decoded.encoding.label(),
            tabular = matches!(corpus, RawCorpus::Table(_)),
            "Corpus file read"
        );

        Ok((corpus, decoded.encoding))
    }
}

#[derive(Debug, Clone)]
pub struct CorpusNormalizer {
    splitter: TextSplitter,
    config: ChunkingConfig,
}

impl Default for CorpusNormalizer {
    fn default() -> Self {
        Self {
            splitter: TextSplitter::new(&ChunkingConfig::default()),
            config: ChunkingConfig::default(),
        }
    }
}

impl CorpusNormalizer {
    pub fn new(config: ChunkingConfig) -> Result<Self, CorpusError> {
        config.validate()?;
        Ok(Self {
            splitter: TextSplitter::new(&config),
            config,
        })
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    pub fn normalize(&self, corpus: &RawCorpus) -> Result<Vec<Chunk>, CorpusError> {
        let chunks: Vec<Chunk> = match corpus {
            RawCorpus::Table(table) => table
                .rows
                .iter()
                .enumerate()
                .map(|(idx, row)| {
                    Chunk::row(idx as u64, collapse_whitespace(&table.render_row(row)))
                })
                .collect(),
            RawCorpus::Document(text) => self
                .splitter
                .split(text)
                .into_iter()
                .enumerate()
                .map(|(idx, piece)| Chunk::passage(idx as u64, collapse_whitespace(&piece)))
                .collect(),
        };

        if chunks.iter().all(|chunk| chunk.text.is_empty()) {
            return Err(CorpusError::Empty);
        }

        info!(chunks = chunks.len(), "Corpus normalized");
        Ok(chunks)
    }
}
