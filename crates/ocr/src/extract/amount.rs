use std::sync::OnceLock;

use regex::Regex;

use super::{ReceiptText, Strategy};

re!(re_money, r"\$?\s*([0-9]{1,3}(?:,[0-9]{3})*|[0-9]+)[.,]([0-9]{2})");

const AMOUNT_KEYWORDS: [&str; 3] = ["total", "amount", "balance"];

/// Keyword lines first; only when none carries an amount, anywhere.
pub const AMOUNT_STRATEGIES: &[Strategy<i64>] = &[keyword_line_amount, last_amount_anywhere];

/// A money-shaped token split at the decimal separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoneyToken {
    pub major_units: i64,
    pub minor_units: u8,
}

impl MoneyToken {
    pub fn to_minor_units(self) -> Option<i64> {
        self.major_units.checked_mul(100)?.checked_add(self.minor_units as i64)
    }
}

/// Every money-shaped token in `s`, in order of appearance.
pub fn money_tokens(s: &str) -> impl Iterator<Item = MoneyToken> + '_ {
    re_money().captures_iter(s).filter_map(|c| {
        let major = c.get(1)?.as_str().replace(',', "").parse().ok()?;
        let minor = c.get(2)?.as_str().parse().ok()?;
        Some(MoneyToken { major_units: major, minor_units: minor })
    })
}

fn last_amount(s: &str) -> Option<i64> {
    money_tokens(s).filter_map(MoneyToken::to_minor_units).last()
}

/// Last amount across all lines mentioning total, amount or balance.
pub fn keyword_line_amount(text: &ReceiptText<'_>) -> Option<i64> {
    text.lines
        .iter()
        .filter(|line| {
            let lower = line.to_lowercase();
            AMOUNT_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .filter_map(|line| last_amount(line))
        .last()
}

/// Last amount anywhere in the text.
pub fn last_amount_anywhere(text: &ReceiptText<'_>) -> Option<i64> {
    last_amount(text.raw)
}
