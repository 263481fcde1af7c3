use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use tracing::debug;

use super::decode::{DecodedText, TextEncoding, read_bytes};
use super::error::CorpusError;

/// Extracts the text of every page, in page order.
///
/// The extractor panics on some malformed files; that is reported as
/// [`CorpusError::Pdf`] like any other parse failure.
pub fn read_pdf_text(path: &Path) -> Result<DecodedText, CorpusError> {
    let bytes = read_bytes(path)?;

    let extracted = catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(&bytes)
    }))
    .map_err(|_| CorpusError::Pdf {
        path: path.to_path_buf(),
        reason: "extractor panicked on malformed input".to_string(),
    })?
    .map_err(|e| CorpusError::Pdf {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    debug!(path = %path.display(), chars = extracted.len(), "PDF text extracted");

    Ok(DecodedText {
        text: extracted,
        encoding: TextEncoding::Pdf,
    })
}
