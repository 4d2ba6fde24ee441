use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tally_core::{ParseResult, SourceKind};

use crate::aggregate::Aggregator;
use crate::config::ExtractConfig;
use crate::error::{EmptyReason, ExtractError};
use crate::history::HistoryExtractor;
use crate::normalize::Normalizer;
use crate::receipt::ReceiptExtractor;

/// Which extractor a document goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Receipt,
    History,
}

impl DocumentKind {
    /// Default transaction description for an upload named `name`.
    pub fn describe(self, name: &str) -> String {
        match self {
            DocumentKind::Receipt => format!("Uploaded from receipt: {name}"),
            DocumentKind::History => format!("Uploaded from history: {name}"),
        }
    }

    pub fn accepts(self, source: SourceKind, config: &ExtractConfig) -> bool {
        match self {
            DocumentKind::Receipt => true,
            DocumentKind::History => config.accepts_history_source(source),
        }
    }

    pub fn empty_reason(self) -> EmptyReason {
        match self {
            DocumentKind::Receipt => EmptyReason::NoLineItems,
            DocumentKind::History => EmptyReason::NoHistoryLines,
        }
    }

    pub fn parse(
        self,
        text: &str,
        description: &str,
        today: NaiveDate,
        config: &ExtractConfig,
    ) -> Result<ParseResult, ExtractError> {
        match self {
            DocumentKind::Receipt => parse_receipt(text, description, today, config),
            DocumentKind::History => parse_history(text, description, config),
        }
    }
}

/// Receipt text to expense transactions, one per item line.
///
/// Items are dated with the receipt's own date when it has one, else `today`.
pub fn parse_receipt(
    text: &str,
    description: &str,
    today: NaiveDate,
    config: &ExtractConfig,
) -> Result<ParseResult, ExtractError> {
    let extraction = ReceiptExtractor::new(config).extract(text)?;
    tracing::debug!(
        items = extraction.items.len(),
        skipped = extraction.skipped.total(),
        noise = extraction.skipped.noise,
        dated = extraction.document_date.is_some(),
        "receipt extracted"
    );

    let document_date = extraction.document_date;
    let transactions = extraction
        .items
        .into_iter()
        .map(|item| Normalizer::from_receipt_item(item, document_date, today, description))
        .collect();

    Aggregator::collect(transactions, document_date, EmptyReason::NoLineItems)
}

/// Statement text to transactions, one per `date kind category amount` line.
pub fn parse_history(
    text: &str,
    description: &str,
    config: &ExtractConfig,
) -> Result<ParseResult, ExtractError> {
    let extraction = HistoryExtractor::new(config).extract(text);
    tracing::debug!(
        records = extraction.records.len(),
        skipped = extraction.skipped.total(),
        bad_amount = extraction.skipped.bad_amount,
        "history extracted"
    );

    let transactions = extraction
        .records
        .into_iter()
        .map(|candidate| Normalizer::from_history(candidate, description))
        .collect::<Result<Vec<_>, _>>()?;

    Aggregator::collect(transactions, None, EmptyReason::NoHistoryLines)
}
