//! Receipt field extraction from OCR text.
//!
//! Each field is detected by an ordered list of independent strategies;
//! the first strategy that returns a value wins. Fields never influence
//! each other, and a field nothing matched stays `None`.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::ParsedReceiptFields;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

pub mod amount;
pub mod currency;
pub mod dates;
pub mod parties;

re!(re_reimbursed, r"(?i)reimbursed|paid in full|payment received");

/// OCR text prepared once and shared by every strategy.
pub struct ReceiptText<'a> {
    pub raw: &'a str,
    pub lower: String,
    /// Trimmed, non-blank lines in reading order.
    pub lines: Vec<&'a str>,
}

impl<'a> ReceiptText<'a> {
    pub fn new(raw: &'a str) -> Self {
        let lines = raw.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        Self { raw, lower: raw.to_lowercase(), lines }
    }
}

/// A single detection rule for one field.
pub type Strategy<T> = fn(&ReceiptText<'_>) -> Option<T>;

/// Run strategies in precedence order and keep the first hit.
pub fn first_match<T>(text: &ReceiptText<'_>, strategies: &[Strategy<T>]) -> Option<T> {
    strategies.iter().find_map(|s| s(text))
}

// ── Public extraction API ─────────────────────────────────────────────────────

pub struct Extractor;

impl Extractor {
    /// Extract structured fields from raw OCR text. Never fails; garbled
    /// input simply yields an empty record.
    pub fn extract(ocr_text: &str) -> ParsedReceiptFields {
        let text = ReceiptText::new(ocr_text);

        let dates = dates::distinct_dates(&text);
        let (date, start_date, end_date) = match dates.as_slice() {
            [] => (None, None, None),
            [only] => (Some(only.clone()), None, None),
            [first, .., last] => (Some(first.clone()), Some(first.clone()), Some(last.clone())),
        };

        let fields = ParsedReceiptFields {
            date,
            start_date,
            end_date,
            merchant: first_match(&text, parties::MERCHANT_STRATEGIES)
                .and_then(|m| parties::normalize_merchant(&m)),
            patient_name: first_match(&text, parties::PATIENT_STRATEGIES),
            amount_minor_units: first_match(&text, amount::AMOUNT_STRATEGIES),
            currency_code: first_match(&text, currency::CURRENCY_STRATEGIES).map(str::to_string),
            reimbursed: first_match(&text, REIMBURSED_STRATEGIES),
        };

        tracing::debug!(
            lines = text.lines.len(),
            dates = dates.len(),
            missing = ?fields.missing_fields(),
            "extracted receipt fields"
        );
        fields
    }
}

// ── Reimbursement ─────────────────────────────────────────────────────────────

pub const REIMBURSED_STRATEGIES: &[Strategy<bool>] = &[paid_phrase];

/// Only positive evidence is reported; silence is not "unreimbursed".
fn paid_phrase(text: &ReceiptText<'_>) -> Option<bool> {
    re_reimbursed().is_match(text.raw).then_some(true)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_text_drops_blank_lines() {
        let t = ReceiptText::new("  A  \r\n\n   \nB\n");
        assert_eq!(t.lines, vec!["A", "B"]);
    }

    #[test]
    fn first_match_respects_order() {
        fn a(_: &ReceiptText<'_>) -> Option<u8> { None }
        fn b(_: &ReceiptText<'_>) -> Option<u8> { Some(2) }
        fn c(_: &ReceiptText<'_>) -> Option<u8> { Some(3) }
        let t = ReceiptText::new("");
        let strategies: &[Strategy<u8>] = &[a, b, c];
        assert_eq!(first_match(&t, strategies), Some(2));
        assert_eq!(first_match(&t, &strategies[..1]), None);
    }

    #[test]
    fn reimbursed_detected() {
        assert_eq!(Extractor::extract("Payment Received").reimbursed, Some(true));
        assert_eq!(Extractor::extract("PAID IN FULL").reimbursed, Some(true));
        assert_eq!(Extractor::extract("claim reimbursed 3/4").reimbursed, Some(true));
    }

    #[test]
    fn reimbursed_absent_not_false() {
        assert_eq!(Extractor::extract("Thanks for visiting").reimbursed, None);
    }

    #[test]
    fn single_date_sets_date_only() {
        let r = Extractor::extract("Visit 2024-03-01");
        assert_eq!(r.date.as_deref(), Some("2024-03-01"));
        assert_eq!(r.start_date, None);
        assert_eq!(r.end_date, None);
    }

    #[test]
    fn date_range_sets_start_and_end() {
        let r = Extractor::extract("Service Date: 2024-03-01\nPaid: 2024-03-15");
        assert_eq!(r.start_date.as_deref(), Some("2024-03-01"));
        assert_eq!(r.end_date.as_deref(), Some("2024-03-15"));
        assert_eq!(r.date.as_deref(), Some("2024-03-01"));
    }

    #[test]
    fn repeated_date_counts_once() {
        let r = Extractor::extract("2024-03-01\n03/01/2024\n3.1.24");
        assert_eq!(r.date.as_deref(), Some("2024-03-01"));
        assert_eq!(r.start_date, None);
    }

    #[test]
    fn full_receipt() {
        let text = "Mercury Dental Group\n\
                    Patient: Jane Q Public\n\
                    Date of service 01/15/2024\n\
                    Cleaning            $120.00\n\
                    X-Ray                $80.00\n\
                    Total Due           $200.00\n\
                    Paid in full";
        let r = Extractor::extract(text);
        assert_eq!(r.merchant.as_deref(), Some("Mercury Dental Group"));
        assert_eq!(r.patient_name.as_deref(), Some("Jane Q Public"));
        assert_eq!(r.date.as_deref(), Some("2024-01-15"));
        assert_eq!(r.amount_minor_units, Some(20000));
        assert_eq!(r.currency_code.as_deref(), Some("USD"));
        assert_eq!(r.reimbursed, Some(true));
    }

    #[test]
    fn empty_text_yields_empty_record() {
        assert!(Extractor::extract("").is_empty());
    }

    #[test]
    fn no_panic_on_garbage_input() {
        let _ = Extractor::extract("!@#$%^&*()\n\0\x01\x02\u{FFFD}99/99/99");
    }
}
