use std::collections::BTreeSet;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};

use super::ReceiptText;

re!(re_year_first, r"(20\d{2})[-/.](\d{1,2})[-/.](\d{1,2})");
re!(re_year_last, r"(\d{1,2})[-/.](\d{1,2})[-/.](20\d{2})");
re!(re_short_year, r"(\d{1,2})[-/.](\d{1,2})[-/.](\d{2})");

/// Every date shape scanned, each producing zero or more candidates.
pub const DATE_STRATEGIES: &[fn(&str) -> Vec<NaiveDate>] =
    &[year_first_dates, year_last_dates, short_year_dates];

/// All distinct dates in the text as ISO strings, earliest first.
pub fn distinct_dates(text: &ReceiptText<'_>) -> Vec<String> {
    DATE_STRATEGIES
        .iter()
        .flat_map(|s| s(text.raw))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect()
}

/// `YYYY-MM-DD`, `YYYY/M/D`, `YYYY.MM.DD`.
pub fn year_first_dates(text: &str) -> Vec<NaiveDate> {
    scan(text, re_year_first(), |c| {
        NaiveDate::from_ymd_opt(num(c, 1)? as i32, num(c, 2)?, num(c, 3)?)
    })
}

/// `MM/DD/YYYY` or `DD/MM/YYYY`.
pub fn year_last_dates(text: &str) -> Vec<NaiveDate> {
    scan(text, re_year_last(), |c| {
        let (month, day) = month_day(num(c, 1)?, num(c, 2)?);
        NaiveDate::from_ymd_opt(num(c, 3)? as i32, month, day)
    })
}

/// `M/D/YY`, always read as 20YY.
pub fn short_year_dates(text: &str) -> Vec<NaiveDate> {
    scan(text, re_short_year(), |c| {
        let (month, day) = month_day(num(c, 1)?, num(c, 2)?);
        NaiveDate::from_ymd_opt(2000 + num(c, 3)? as i32, month, day)
    })
}

/// Whichever leading number can be a month is the month; when both can,
/// the first one is (US order). No locale guessing.
fn month_day(a: u32, b: u32) -> (u32, u32) {
    if a <= 12 {
        (a, b)
    } else {
        (b, a)
    }
}

fn num(c: &Captures<'_>, i: usize) -> Option<u32> {
    c.get(i)?.as_str().parse().ok()
}

/// Collect regex hits that stand alone as numbers (no digit directly
/// before or after) and form a real calendar date. A hit glued to another
/// digit is retried one character later, so an overlapping candidate that
/// does stand alone is still found.
fn scan(
    text: &str,
    re: &Regex,
    to_date: impl Fn(&Captures<'_>) -> Option<NaiveDate>,
) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut pos = 0;
    while let Some(c) = re.captures_at(text, pos) {
        let Some(m) = c.get(0) else { break };
        if digit_bounded(text, m.start(), m.end()) {
            dates.extend(to_date(&c));
            pos = m.end();
        } else {
            pos = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
        }
    }
    dates
}

fn digit_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(|c| c.is_ascii_digit()) && !after.is_some_and(|c| c.is_ascii_digit())
}
