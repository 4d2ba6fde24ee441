use tally_core::{RawDocument, SourceKind};
use thiserror::Error;

use crate::pdf::{PdfBackend, PdfError};
use crate::recognizer::{OcrBackend, OcrError};

#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
    #[error("PDF text extraction failed: {0}")]
    Pdf(#[from] PdfError),
}

/// Turns an uploaded artifact into text, choosing the engine by [`SourceKind`].
pub struct TextSource<O: OcrBackend, P: PdfBackend> {
    ocr: O,
    pdf: P,
}

impl<O: OcrBackend, P: PdfBackend> TextSource<O, P> {
    pub fn new(ocr: O, pdf: P) -> Self {
        Self { ocr, pdf }
    }

    /// Blocking: OCR in particular can take seconds per page.
    pub fn acquire(&self, data: &[u8], kind: SourceKind) -> Result<RawDocument, AcquireError> {
        let text = match kind {
            SourceKind::PlainText => String::from_utf8_lossy(data).into_owned(),
            SourceKind::Pdf => self.pdf.extract_text(data)?,
            SourceKind::Image => self.ocr.recognize(data)?,
        };
        Ok(RawDocument::new(text, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::MockPdfExtractor;
    use crate::recognizer::MockRecognizer;

    fn source() -> TextSource<MockRecognizer, MockPdfExtractor> {
        TextSource::new(MockRecognizer::new("from ocr"), MockPdfExtractor::new("from pdf"))
    }

    #[test]
    fn plain_text_is_decoded_directly() {
        let doc = source().acquire(b"Milk 3.99\n", SourceKind::PlainText).unwrap();
        assert_eq!(doc.text(), "Milk 3.99\n");
        assert_eq!(doc.source_kind(), SourceKind::PlainText);
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let doc = source().acquire(b"Milk \xff 3.99", SourceKind::PlainText).unwrap();
        assert!(doc.text().contains('\u{FFFD}'));
    }

    #[test]
    fn each_kind_routes_to_its_engine() {
        assert_eq!(source().acquire(b"%PDF", SourceKind::Pdf).unwrap().text(), "from pdf");
        assert_eq!(source().acquire(b"\x89PNG", SourceKind::Image).unwrap().text(), "from ocr");
    }

    #[test]
    fn engine_faults_surface_as_acquire_errors() {
        let s = TextSource::new(MockRecognizer::failing("boom"), MockPdfExtractor::failing("bad"));
        assert!(matches!(s.acquire(b"", SourceKind::Image), Err(AcquireError::Ocr(_))));
        assert!(matches!(s.acquire(b"", SourceKind::Pdf), Err(AcquireError::Pdf(_))));
    }
}
