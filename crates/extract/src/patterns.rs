//! Line patterns. Each pattern hands back a typed match so callers never index
//! capture groups themselves.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};

use crate::error::InvalidDate;

// ── Compiled regex cache ─────────────────────────────────────────────────────
// Digits are spelled `[0-9]`: `\d` would also admit non-ASCII digits.

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_iso_date,
    r"(([0-9]{4})-([0-9]{2})-([0-9]{2}))");
re!(re_receipt_item,
    r"^([a-zA-Z\s]+?)\s+\$?([0-9]+\.[0-9]{2})$");
re!(re_history_line,
    r"(?i)^(([0-9]{4})-([0-9]{2})-([0-9]{2}))\s+(expense|income)\s+([a-zA-Z][a-zA-Z\s]*?)\s+([0-9.]+)$");

// ── Dates ─────────────────────────────────────────────────────────────────────

/// A `YYYY-MM-DD` substring. Not yet checked against the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateMatch<'a> {
    pub raw: &'a str,
    year: i32,
    month: u32,
    day: u32,
}

impl DateMatch<'_> {
    pub fn to_date(&self) -> Result<NaiveDate, InvalidDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .ok_or_else(|| InvalidDate(self.raw.to_string()))
    }

    /// `group` is the whole date; year, month and day follow it.
    fn from_captures<'a>(c: &Captures<'a>, group: usize) -> Option<DateMatch<'a>> {
        Some(DateMatch {
            raw: c.get(group)?.as_str(),
            year: c.get(group + 1)?.as_str().parse().ok()?,
            month: c.get(group + 2)?.as_str().parse().ok()?,
            day: c.get(group + 3)?.as_str().parse().ok()?,
        })
    }
}

/// Parse a whole string as `YYYY-MM-DD`, rejecting days that do not exist.
pub fn parse_iso_date(s: &str) -> Result<NaiveDate, InvalidDate> {
    IsoDatePattern::find_first(s)
        .filter(|m| m.raw == s)
        .ok_or_else(|| InvalidDate(s.to_string()))?
        .to_date()
}

pub struct IsoDatePattern;

impl IsoDatePattern {
    /// The first `YYYY-MM-DD` anywhere in `text`.
    pub fn find_first(text: &str) -> Option<DateMatch<'_>> {
        let c = re_iso_date().captures(text)?;
        DateMatch::from_captures(&c, 1)
    }
}

// ── Receipt items ─────────────────────────────────────────────────────────────

/// `<label> [$]<digits>.<two digits>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemMatch<'a> {
    /// Untrimmed label text.
    pub label: &'a str,
    pub price: &'a str,
}

pub struct ReceiptItemPattern;

impl ReceiptItemPattern {
    pub fn matches(line: &str) -> Option<ItemMatch<'_>> {
        let c = re_receipt_item().captures(line)?;
        Some(ItemMatch { label: c.get(1)?.as_str(), price: c.get(2)?.as_str() })
    }
}

// ── History lines ─────────────────────────────────────────────────────────────

/// `<date> <expense|income> <category> <amount>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryMatch<'a> {
    pub date: DateMatch<'a>,
    /// As written; callers lower-case it.
    pub kind: &'a str,
    /// Starts with a letter; may carry trailing whitespace.
    pub category: &'a str,
    pub amount: &'a str,
}

pub struct HistoryLinePattern;

impl HistoryLinePattern {
    pub fn matches(line: &str) -> Option<HistoryMatch<'_>> {
        let c = re_history_line().captures(line)?;
        Some(HistoryMatch {
            date: DateMatch::from_captures(&c, 1)?,
            kind: c.get(5)?.as_str(),
            category: c.get(6)?.as_str(),
            amount: c.get(7)?.as_str(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Dates ─────────────────────────────────────────────────────────────────

    #[test]
    fn find_first_date_in_running_text() {
        let m = IsoDatePattern::find_first("STORE\nDate: 2024-03-15 10:42\n").unwrap();
        assert_eq!(m.raw, "2024-03-15");
        assert_eq!(m.to_date().unwrap(), NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    }

    #[test]
    fn only_first_date_is_used() {
        let m = IsoDatePattern::find_first("2024-01-01 then 2025-12-31").unwrap();
        assert_eq!(m.raw, "2024-01-01");
    }

    #[test]
    fn no_date_is_none() {
        assert!(IsoDatePattern::find_first("01/15/2024").is_none());
        assert!(IsoDatePattern::find_first("").is_none());
    }

    #[test]
    fn non_ascii_digits_are_not_dates() {
        assert!(IsoDatePattern::find_first("２０２４-０１-０１").is_none());
        assert!(IsoDatePattern::find_first("٢٠٢٤-٠١-٠١").is_none());

        let m = IsoDatePattern::find_first("Ref ２０２４-０１-０１\nDate 2024-03-15").unwrap();
        assert_eq!(m.raw, "2024-03-15");
    }

    #[test]
    fn pattern_matching_but_impossible_date_is_rejected() {
        let m = IsoDatePattern::find_first("2024-13-01").unwrap();
        assert_eq!(m.to_date(), Err(InvalidDate("2024-13-01".to_string())));

        let m = IsoDatePattern::find_first("2024-02-30").unwrap();
        assert!(m.to_date().is_err());
    }

    #[test]
    fn parse_iso_date_whole_string() {
        assert_eq!(
            parse_iso_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_iso_date("2023-02-29").is_err());
        assert!(parse_iso_date("x2024-02-01").is_err());
        assert!(parse_iso_date("2024-2-1").is_err());
    }

    // ── Receipt items ─────────────────────────────────────────────────────────

    #[test]
    fn item_simple() {
        let m = ReceiptItemPattern::matches("Milk 3.99").unwrap();
        assert_eq!(m.label, "Milk");
        assert_eq!(m.price, "3.99");
    }

    #[test]
    fn item_multiword_label_and_dollar_sign() {
        let m = ReceiptItemPattern::matches("Whole Wheat Bread   $12.50").unwrap();
        assert_eq!(m.label.trim(), "Whole Wheat Bread");
        assert_eq!(m.price, "12.50");
    }

    #[test]
    fn item_rejects_wrong_shapes() {
        assert!(ReceiptItemPattern::matches("Milk 3.9").is_none());
        assert!(ReceiptItemPattern::matches("Milk 3.999").is_none());
        assert!(ReceiptItemPattern::matches("Milk 3").is_none());
        assert!(ReceiptItemPattern::matches("Milk2 3.99").is_none());
        assert!(ReceiptItemPattern::matches("Milk, whole 3.99").is_none());
        assert!(ReceiptItemPattern::matches("3.99").is_none());
        assert!(ReceiptItemPattern::matches("Milk 3.99 x2").is_none());
        assert!(ReceiptItemPattern::matches("Milk3.99").is_none());
        assert!(ReceiptItemPattern::matches("Milk ３.９９").is_none());
    }

    // ── History lines ─────────────────────────────────────────────────────────

    #[test]
    fn history_line_four_fields() {
        let m = HistoryLinePattern::matches("2024-01-15 expense Groceries 45.50").unwrap();
        assert_eq!(m.date.raw, "2024-01-15");
        assert_eq!(m.kind, "expense");
        assert_eq!(m.category, "Groceries");
        assert_eq!(m.amount, "45.50");
    }

    #[test]
    fn history_line_kind_any_case_multiword_category() {
        let m = HistoryLinePattern::matches("2024-01-16 INCOME Side Gig   300").unwrap();
        assert_eq!(m.kind, "INCOME");
        assert_eq!(m.category.trim(), "Side Gig");
        assert_eq!(m.amount, "300");
    }

    #[test]
    fn history_line_rejects_other_shapes() {
        assert!(HistoryLinePattern::matches("2024-01-15 transfer Savings 10.00").is_none());
        assert!(HistoryLinePattern::matches("expense 2024-01-15 Groceries 45.50").is_none());
        assert!(HistoryLinePattern::matches("2024-01-15 expense 45.50").is_none());
        assert!(HistoryLinePattern::matches("2024-01-15 expense Groceries $45.50").is_none());
        assert!(HistoryLinePattern::matches("2024-01-15 expense Groceries2 45.50").is_none());
        assert!(HistoryLinePattern::matches("2024-01-15 expense Groceries ４５.５０").is_none());
    }

    #[test]
    fn history_line_needs_a_category_word() {
        assert!(HistoryLinePattern::matches("2024-01-15 expense   45.50").is_none());
        assert!(HistoryLinePattern::matches("2024-01-15\texpense\t\t\t45.50").is_none());

        let m = HistoryLinePattern::matches("2024-01-15\texpense\tRent\t\t1200.00").unwrap();
        assert_eq!(m.category.trim(), "Rent");
    }

    #[test]
    fn history_amount_with_two_points_still_matches_shape() {
        let m = HistoryLinePattern::matches("2024-01-15 expense Groceries 1.2.3").unwrap();
        assert_eq!(m.amount, "1.2.3");
    }
}
