use std::path::Path;

use encoding_rs::{UTF_8, WINDOWS_1256};
use serde::Serialize;
use tracing::{debug, warn};

use super::error::CorpusError;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Encoding a corpus file was successfully read with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    /// Primary encoding.
    Utf8,
    /// Legacy single-byte Arabic code page, used as the fallback.
    Windows1256,
    /// Text extracted from PDF content streams.
    Pdf,
}

impl TextEncoding {
    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Windows1256 => "windows-1256",
            TextEncoding::Pdf => "pdf",
        }
    }
}

/// Text read from disk together with the encoding that decoded it.
#[derive(Debug, Clone)]
pub struct DecodedText {
    pub text: String,
    pub encoding: TextEncoding,
}

/// Decodes `bytes` as UTF-8, retrying once as Windows-1256.
///
/// Windows-1256 assigns a character to every byte, so the fallback alone never
/// fails; instead it refuses input whose decoding contains C0 control
/// characters other than tab, newline, form feed and carriage return, which
/// marks binary content rather than legacy text. Returns `None` in that case.
pub fn decode_bytes(bytes: &[u8]) -> Option<DecodedText> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(body) {
        return Some(DecodedText {
            text: text.into_owned(),
            encoding: TextEncoding::Utf8,
        });
    }

    debug!(len = bytes.len(), "UTF-8 decode failed, retrying as windows-1256");

    let text = WINDOWS_1256.decode_without_bom_handling_and_without_replacement(bytes)?;
    if text.chars().any(is_binary_control) {
        debug!("windows-1256 decode produced control characters, treating input as binary");
        return None;
    }

    Some(DecodedText {
        text: text.into_owned(),
        encoding: TextEncoding::Windows1256,
    })
}

fn is_binary_control(c: char) -> bool {
    c.is_ascii_control() && !matches!(c, '\t' | '\n' | '\r' | '\x0C')
}

/// Reads a corpus file, mapping absence to [`CorpusError::NotFound`].
pub fn read_bytes(path: &Path) -> Result<Vec<u8>, CorpusError> {
    std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CorpusError::NotFound {
            path: path.to_path_buf(),
        },
        _ => CorpusError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

/// Reads a file and decodes it with [`decode_bytes`].
pub fn read_text(path: &Path) -> Result<DecodedText, CorpusError> {
    let bytes = read_bytes(path)?;

    let decoded = decode_bytes(&bytes).ok_or_else(|| CorpusError::DecodeFailure {
        source_name: path.display().to_string(),
        tried: "utf-8, windows-1256",
    })?;

    if decoded.encoding != TextEncoding::Utf8 {
        warn!(
            path = %path.display(),
            encoding = decoded.encoding.label(),
            "Corpus decoded with fallback encoding"
        );
    }

    Ok(decoded)
}
