use std::panic::{catch_unwind, AssertUnwindSafe};

use super::ExtractionError;

/// Extracts the text of every page in page order, newline-separated.
///
/// `pdf-extract` panics on some malformed inputs; a panic is reported as a parse error.
pub(super) fn extract_pdf_text(data: &[u8]) -> Result<String, ExtractionError> {
    let result = catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(data)
    }))
    .map_err(|_| ExtractionError::Pdf("parser panicked on malformed input".to_string()))?;

    let pages = result.map_err(|err| ExtractionError::Pdf(err.to_string()))?;

    Ok(pages.join("\n"))
}
