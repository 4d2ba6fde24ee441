pub mod document;
pub mod money;
pub mod period;
pub mod sink;
pub mod transaction;

pub use document::{RawDocument, SourceKind};
pub use money::{Money, MoneyError};
pub use period::DateRange;
pub use sink::{MemorySink, TransactionSink};
pub use transaction::{
    ExtractedTransaction, ParseResult, TransactionKind, UnknownKind, UserId, UserTransaction,
};
