use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF text extraction failed: {0}")]
    Extract(String),
    #[error("PDF support not available — build with `pdf` feature")]
    NotAvailable,
}

/// Abstraction over a PDF-to-text engine.
pub trait PdfBackend: Send + Sync {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<String, PdfError>;
}

/// Replays a fixed result regardless of the PDF.
pub struct MockPdfExtractor {
    result: Result<String, String>,
}

impl MockPdfExtractor {
    pub fn new(text: impl Into<String>) -> Self {
        Self { result: Ok(text.into()) }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self { result: Err(message.into()) }
    }
}

impl PdfBackend for MockPdfExtractor {
    fn extract_text(&self, _pdf_bytes: &[u8]) -> Result<String, PdfError> {
        self.result.clone().map_err(PdfError::Extract)
    }
}

/// Stand-in used when no PDF engine is compiled in.
pub struct UnavailablePdf;

impl PdfBackend for UnavailablePdf {
    fn extract_text(&self, _pdf_bytes: &[u8]) -> Result<String, PdfError> {
        Err(PdfError::NotAvailable)
    }
}

#[cfg(feature = "pdf")]
pub mod pdf_extract_backend {
    use super::{PdfBackend, PdfError};

    /// Machine text extraction via the `pdf-extract` crate. Scanned PDFs with no text
    /// layer come back empty and end up as an empty extraction, not an error.
    pub struct PdfExtractBackend;

    impl PdfBackend for PdfExtractBackend {
        fn extract_text(&self, pdf_bytes: &[u8]) -> Result<String, PdfError> {
            pdf_extract::extract_text_from_mem(pdf_bytes).map_err(|e| PdfError::Extract(e.to_string()))
        }
    }
}
