use super::{ReceiptText, Strategy};

/// Checked in this order; a receipt showing both `$` and "eur" is USD.
pub const CURRENCY_STRATEGIES: &[Strategy<&'static str>] = &[usd, eur, gbp];

fn mentions(text: &ReceiptText<'_>, symbol: char, keyword: &str) -> bool {
    text.raw.contains(symbol) || text.lower.contains(keyword)
}

pub fn usd(text: &ReceiptText<'_>) -> Option<&'static str> {
    mentions(text, '$', " usd").then_some("USD")
}

pub fn eur(text: &ReceiptText<'_>) -> Option<&'static str> {
    mentions(text, '€', " eur").then_some("EUR")
}

pub fn gbp(text: &ReceiptText<'_>) -> Option<&'static str> {
    mentions(text, '£', " gbp").then_some("GBP")
}
