use chrono::NaiveDate;
use tally_core::{ExtractedTransaction, TransactionKind};

use crate::error::InvalidDate;
use crate::history::HistoryRecordCandidate;
use crate::patterns::parse_iso_date;
use crate::receipt::ReceiptLineItem;

/// Maps extractor output onto [`ExtractedTransaction`]. Only coerces types; the
/// extractors' patterns already guarantee non-empty categories and unsigned amounts.
pub struct Normalizer;

impl Normalizer {
    /// Receipt items are always expenses. Without a document date the item is dated `today`.
    pub fn from_receipt_item(
        item: ReceiptLineItem,
        document_date: Option<NaiveDate>,
        today: NaiveDate,
        description: &str,
    ) -> ExtractedTransaction {
        ExtractedTransaction {
            date: document_date.unwrap_or(today),
            kind: TransactionKind::Expense,
            category: item.label,
            amount: item.price,
            description: description.to_string(),
        }
    }

    pub fn from_history(
        candidate: HistoryRecordCandidate,
        description: &str,
    ) -> Result<ExtractedTransaction, InvalidDate> {
        Ok(ExtractedTransaction {
            date: parse_iso_date(&candidate.date)?,
            kind: candidate.kind,
            category: candidate.category,
            amount: candidate.amount,
            description: description.to_string(),
        })
    }
}
