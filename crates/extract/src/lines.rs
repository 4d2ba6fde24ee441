/// One non-blank line of a document, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub raw_text: String,
    /// Zero-based position in the original text; blank lines still consume an index.
    pub line_index: usize,
}

/// Split `text` into trimmed, non-blank lines in document order.
pub fn classify_lines(text: &str) -> Vec<ParsedLine> {
    text.lines()
        .enumerate()
        .map(|(line_index, line)| (line_index, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(line_index, line)| ParsedLine { raw_text: line.to_string(), line_index })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Contains a noise token such as "total".
    Noise,
    /// Wrong shape for the extractor's line pattern.
    NoMatch,
    /// Matched the shape but the amount is not a number.
    BadAmount,
    /// Amount is zero and the config rejects zero amounts.
    ZeroAmount,
}

/// What happened to a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome<T> {
    Matched(T),
    Skipped(SkipReason),
}

impl<T> LineOutcome<T> {
    pub fn matched(self) -> Option<T> {
        match self {
            LineOutcome::Matched(v) => Some(v),
            LineOutcome::Skipped(_) => None,
        }
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            LineOutcome::Matched(_) => None,
            LineOutcome::Skipped(reason) => Some(*reason),
        }
    }
}

/// Per-reason counts of dropped lines, kept for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    pub noise: usize,
    pub no_match: usize,
    pub bad_amount: usize,
    pub zero_amount: usize,
}

impl SkipCounts {
    pub fn record(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Noise => self.noise += 1,
            SkipReason::NoMatch => self.no_match += 1,
            SkipReason::BadAmount => self.bad_amount += 1,
            SkipReason::ZeroAmount => self.zero_amount += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.noise + self.no_match + self.bad_amount + self.zero_amount
    }
}
