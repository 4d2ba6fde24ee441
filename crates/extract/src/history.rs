use std::str::FromStr;

use tally_core::{Money, TransactionKind};

use crate::config::ExtractConfig;
use crate::lines::{classify_lines, LineOutcome, SkipCounts, SkipReason};
use crate::patterns::HistoryLinePattern;

/// One statement row that had all four fields.
///
/// `date` is the `YYYY-MM-DD` text as written; it is checked against the calendar
/// during normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecordCandidate {
    pub date: String,
    pub kind: TransactionKind,
    pub category: String,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryExtraction {
    pub records: Vec<HistoryRecordCandidate>,
    pub skipped: SkipCounts,
}

impl HistoryExtraction {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub struct HistoryExtractor<'c> {
    config: &'c ExtractConfig,
}

impl<'c> HistoryExtractor<'c> {
    pub fn new(config: &'c ExtractConfig) -> Self {
        Self { config }
    }

    pub fn extract(&self, text: &str) -> HistoryExtraction {
        let mut records = Vec::new();
        let mut skipped = SkipCounts::default();
        for line in classify_lines(text) {
            match self.classify_line(&line.raw_text) {
                LineOutcome::Matched(record) => records.push(record),
                LineOutcome::Skipped(reason) => {
                    tracing::trace!(line = line.line_index, ?reason, "history line skipped");
                    skipped.record(reason);
                }
            }
        }
        HistoryExtraction { records, skipped }
    }

    pub fn classify_line(&self, line: &str) -> LineOutcome<HistoryRecordCandidate> {
        let Some(m) = HistoryLinePattern::matches(line.trim()) else {
            return LineOutcome::Skipped(SkipReason::NoMatch);
        };
        // The pattern only admits the two kind literals.
        let Ok(kind) = TransactionKind::from_str(m.kind) else {
            return LineOutcome::Skipped(SkipReason::NoMatch);
        };
        let Ok(amount) = Money::parse(m.amount) else {
            return LineOutcome::Skipped(SkipReason::BadAmount);
        };
        if amount.is_zero() && self.config.reject_zero_amounts {
            return LineOutcome::Skipped(SkipReason::ZeroAmount);
        }
        LineOutcome::Matched(HistoryRecordCandidate {
            date: m.date.raw.to_string(),
            kind,
            category: m.category.trim().to_string(),
            amount,
        })
    }
}
