pub mod aggregate;
pub mod config;
pub mod error;
pub mod history;
pub mod lines;
pub mod normalize;
pub mod parse;
pub mod patterns;
pub mod receipt;

pub use aggregate::Aggregator;
pub use config::{ConfigError, ExtractConfig};
pub use error::{EmptyReason, ErrorKind, ExtractError, InvalidDate};
pub use history::{HistoryExtraction, HistoryExtractor, HistoryRecordCandidate};
pub use lines::{classify_lines, LineOutcome, ParsedLine, SkipCounts, SkipReason};
pub use normalize::Normalizer;
pub use parse::{parse_history, parse_receipt, DocumentKind};
pub use receipt::{ReceiptExtraction, ReceiptExtractor, ReceiptLineItem};
