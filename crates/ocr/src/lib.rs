pub mod hash;
pub mod pdf;
pub mod pipeline;
pub mod recognizer;
pub mod source;

pub use hash::Fingerprint;
pub use pdf::{MockPdfExtractor, PdfBackend, PdfError, UnavailablePdf};
pub use pipeline::{Upload, UploadOutcome, UploadPipeline};
pub use recognizer::{MockRecognizer, OcrBackend, OcrError, UnavailableRecognizer};
pub use source::{AcquireError, TextSource};

#[cfg(feature = "pdf")]
pub use pdf::pdf_extract_backend::PdfExtractBackend;
#[cfg(feature = "tesseract")]
pub use recognizer::tesseract_backend::TesseractRecognizer;
