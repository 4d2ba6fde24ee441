use std::fmt;
use thiserror::Error;

/// Why a document produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    NoLineItems,
    NoHistoryLines,
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyReason::NoLineItems => {
                write!(f, "Could not automatically find any line items on the receipt.")
            }
            EmptyReason::NoHistoryLines => {
                write!(f, "Could not find any valid transaction lines in the document.")
            }
        }
    }
}

/// A `YYYY-MM-DD` match whose numbers do not name a real day.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a calendar date")]
pub struct InvalidDate(pub String);

/// Document-level failures. Per-line mismatches never become one of these.
///
/// `Display` is safe to show to the uploader: a processing failure only says that
/// processing failed, while the underlying fault stays reachable through
/// [`std::error::Error::source`] for logging.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),
    #[error("{0}")]
    EmptyExtraction(EmptyReason),
    #[error("Failed to process file.")]
    ProcessingFailure(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ExtractError {
    pub fn processing(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        ExtractError::ProcessingFailure(err.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractError::UnsupportedInput(_) => ErrorKind::UnsupportedInput,
            ExtractError::EmptyExtraction(_) => ErrorKind::EmptyExtraction,
            ExtractError::ProcessingFailure(_) => ErrorKind::ProcessingFailure,
        }
    }

    /// The full cause chain, for logs only.
    pub fn detail(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            out.push_str(": ");
            out.push_str(&err.to_string());
            source = err.source();
        }
        out
    }
}

impl From<InvalidDate> for ExtractError {
    fn from(e: InvalidDate) -> Self {
        ExtractError::processing(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedInput,
    EmptyExtraction,
    ProcessingFailure,
}
