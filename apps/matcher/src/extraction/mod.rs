//! Document text extraction: turns an uploaded PDF or DOCX into plain text.

mod docx;
mod pdf;

use std::path::Path;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Detects the format from the file-name extension (case-insensitive).
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|v| v.to_str())
            .map(|v| v.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }
}

/// An uploaded document. Immutable once read.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub bytes: Bytes,
    /// `None` when the extension is neither `.pdf` nor `.docx`.
    pub format: Option<DocumentFormat>,
}

impl Document {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let name = name.into();
        let format = DocumentFormat::from_file_name(&name);
        Self {
            name,
            bytes: bytes.into(),
            format,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("PDF parse error: {0}")]
    Pdf(String),

    #[error("DOCX parse error: {0}")]
    Docx(String),

    #[error("No text could be extracted from {0}")]
    EmptyText(String),

    #[error("Extraction timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Extraction worker failed: {0}")]
    Worker(String),
}

/// Document-to-text contract. Synchronous; the pipeline runs it on a blocking thread.
pub trait DocumentExtractor: Send + Sync {
    fn extract(&self, document: &Document) -> Result<String, ExtractionError>;
}

/// Default extractor: `pdf-extract` for PDF, zip + quick-xml for DOCX.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExtractor;

impl DocumentExtractor for TextExtractor {
    fn extract(&self, document: &Document) -> Result<String, ExtractionError> {
        let text = match document.format {
            Some(DocumentFormat::Pdf) => pdf::extract_pdf_text(&document.bytes)?,
            Some(DocumentFormat::Docx) => docx::extract_docx_text(&document.bytes)?,
            None => return Err(ExtractionError::UnsupportedFormat(document.name.clone())),
        };

        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyText(document.name.clone()));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection_is_case_insensitive() {
        assert_eq!(
            DocumentFormat::from_file_name("Jane_Doe.PDF"),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::from_file_name("resume.final.docx"),
            Some(DocumentFormat::Docx)
        );
        assert_eq!(DocumentFormat::from_file_name("resume.doc"), None);
        assert_eq!(DocumentFormat::from_file_name("resume"), None);
    }

    #[test]
    fn test_unsupported_format_is_rejected() {
        let document = Document::new("notes.txt", b"plain text".to_vec());
        let err = TextExtractor.extract(&document).unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFormat(name) if name == "notes.txt"));
    }

    #[test]
    fn test_corrupt_pdf_is_an_extraction_error() {
        let document = Document::new("broken.pdf", b"%PDF-1.4 not really a pdf".to_vec());
        let err = TextExtractor.extract(&document).unwrap_err();
        assert!(matches!(err, ExtractionError::Pdf(_)));
    }

    #[test]
    fn test_docx_text_round_trips_through_extractor() {
        let bytes = docx::tests::build_docx(&["Jane Doe", "Python developer"]);
        let document = Document::new("jane.docx", bytes);
        let text = TextExtractor.extract(&document).unwrap();
        assert_eq!(text, "Jane Doe\nPython developer");
    }

    #[test]
    fn test_docx_without_text_is_empty_text_error() {
        let bytes = docx::tests::build_docx(&[]);
        let document = Document::new("blank.docx", bytes);
        let err = TextExtractor.extract(&document).unwrap_err();
        assert!(matches!(err, ExtractionError::EmptyText(_)));
    }
}
