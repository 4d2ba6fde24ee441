use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("OCR engine error: {0}")]
    Engine(String),
    #[error("Tesseract not available — build with `tesseract` feature")]
    NotAvailable,
}

/// Abstraction over an OCR engine.
/// Implementations accept raw image bytes (PNG, JPEG, …) and return the recognized text.
pub trait OcrBackend: Send + Sync {
    fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError>;
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Replays a fixed result regardless of the image, so the extraction path can be
/// tested without Tesseract installed.
pub struct MockRecognizer {
    result: Result<String, String>,
}

impl MockRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { result: Ok(text.into()) }
    }

    /// A recognizer whose engine always faults with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self { result: Err(message.into()) }
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<String, OcrError> {
        self.result.clone().map_err(OcrError::Engine)
    }
}

/// Stand-in used when no OCR engine is compiled in.
pub struct UnavailableRecognizer;

impl OcrBackend for UnavailableRecognizer {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<String, OcrError> {
        Err(OcrError::NotAvailable)
    }
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{OcrBackend, OcrError};
    use leptess::LepTess;

    pub struct TesseractRecognizer {
        data_path: Option<String>,
        lang: String,
    }

    impl TesseractRecognizer {
        pub fn new(data_path: Option<String>, lang: &str) -> Self {
            Self { data_path, lang: lang.to_string() }
        }

        /// Receipts are read with the English model.
        pub fn english() -> Self {
            Self::new(None, "eng")
        }
    }

    impl OcrBackend for TesseractRecognizer {
        fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
            let mut lt = LepTess::new(self.data_path.as_deref(), &self.lang)
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            lt.set_image_from_mem(image_bytes)
                .map_err(|e| OcrError::ImageDecode(e.to_string()))?;
            lt.get_utf8_text().map_err(|e| OcrError::Engine(e.to_string()))
        }
    }
}
