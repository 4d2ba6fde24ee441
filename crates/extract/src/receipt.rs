use chrono::NaiveDate;
use tally_core::Money;

use crate::config::ExtractConfig;
use crate::error::InvalidDate;
use crate::lines::{classify_lines, LineOutcome, SkipCounts, SkipReason};
use crate::patterns::{IsoDatePattern, ReceiptItemPattern};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLineItem {
    pub label: String,
    pub price: Money,
}

/// Raw output of one pass over a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptExtraction {
    pub document_date: Option<NaiveDate>,
    pub items: Vec<ReceiptLineItem>,
    pub skipped: SkipCounts,
}

impl ReceiptExtraction {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub struct ReceiptExtractor<'c> {
    config: &'c ExtractConfig,
}

impl<'c> ReceiptExtractor<'c> {
    pub fn new(config: &'c ExtractConfig) -> Self {
        Self { config }
    }

    /// Pull the document date and every item line out of receipt text.
    ///
    /// Only a date that matches `YYYY-MM-DD` but names no real day is an error; lines
    /// that are not items are counted and dropped.
    pub fn extract(&self, text: &str) -> Result<ReceiptExtraction, InvalidDate> {
        let document_date = Self::extract_date(text)?;

        let mut items = Vec::new();
        let mut skipped = SkipCounts::default();
        for line in classify_lines(text) {
            match self.classify_line(&line.raw_text) {
                LineOutcome::Matched(item) => items.push(item),
                LineOutcome::Skipped(reason) => {
                    tracing::trace!(line = line.line_index, ?reason, "receipt line skipped");
                    skipped.record(reason);
                }
            }
        }

        Ok(ReceiptExtraction { document_date, items, skipped })
    }

    /// First `YYYY-MM-DD` anywhere in the raw text.
    pub fn extract_date(text: &str) -> Result<Option<NaiveDate>, InvalidDate> {
        IsoDatePattern::find_first(text).map(|m| m.to_date()).transpose()
    }

    pub fn classify_line(&self, line: &str) -> LineOutcome<ReceiptLineItem> {
        // Noise wins even when the line is shaped like an item.
        if self.config.is_noise(line) {
            return LineOutcome::Skipped(SkipReason::Noise);
        }
        let Some(m) = ReceiptItemPattern::matches(line.trim()) else {
            return LineOutcome::Skipped(SkipReason::NoMatch);
        };
        let Ok(price) = Money::parse(m.price) else {
            return LineOutcome::Skipped(SkipReason::BadAmount);
        };
        if price.is_zero() && self.config.reject_zero_amounts {
            return LineOutcome::Skipped(SkipReason::ZeroAmount);
        }
        LineOutcome::Matched(ReceiptLineItem { label: m.label.trim().to_string(), price })
    }
}
