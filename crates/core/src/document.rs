use serde::{Deserialize, Serialize};
use std::fmt;

/// Which upstream adapter produced a document's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    PlainText,
    Pdf,
    Image,
}

impl SourceKind {
    /// Map an upload's MIME type. Returns `None` for anything no adapter can read.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.split(';').next().unwrap_or_default().trim().to_lowercase();
        match mime.as_str() {
            "text/plain" => Some(SourceKind::PlainText),
            "application/pdf" => Some(SourceKind::Pdf),
            m if m.starts_with("image/") => Some(SourceKind::Image),
            _ => None,
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "txt" | "text" => Some(SourceKind::PlainText),
            "pdf" => Some(SourceKind::Pdf),
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "tif" | "tiff" | "webp" => {
                Some(SourceKind::Image)
            }
            _ => None,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::PlainText => write!(f, "plain_text"),
            SourceKind::Pdf => write!(f, "pdf"),
            SourceKind::Image => write!(f, "image"),
        }
    }
}

/// Text produced from one uploaded artifact. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    text: String,
    source_kind: SourceKind,
}

impl RawDocument {
    pub fn new(text: impl Into<String>, source_kind: SourceKind) -> Self {
        Self { text: text.into(), source_kind }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source_kind(&self) -> SourceKind {
        self.source_kind
    }
}
