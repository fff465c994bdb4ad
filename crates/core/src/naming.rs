use chrono::Datelike;

use super::receipt::Receipt;

const MAX_SLUG_LEN: usize = 64;
const VAULT_ROOT: &str = "HSA Vault";

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Reduce arbitrary text to a filesystem- and URL-safe token.
///
/// Runs of unsafe characters (including whitespace) become a single `-`,
/// leading/trailing dashes are dropped, and the result is capped at 64
/// characters. Empty input yields `"receipt"`.
pub fn slug(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.trim().chars() {
        if is_safe(c) && c != '-' {
            out.push(c);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed: String = out.trim_matches('-').chars().take(MAX_SLUG_LEN).collect();
    if trimmed.is_empty() {
        "receipt".to_string()
    } else {
        trimmed
    }
}

/// Deterministic base file name, e.g. `2025-01-31_Mercury-Dental_123-45_USD`.
pub fn file_name(receipt: &Receipt) -> String {
    let money = receipt.money();
    format!(
        "{}_{}_{}-{:02}_{}",
        receipt.date.format("%Y-%m-%d"),
        slug(&receipt.merchant),
        money.major_part(),
        money.minor_part(),
        money.currency()
    )
}

/// Folder a receipt is filed under: one folder per calendar year.
pub fn folder_path(receipt: &Receipt) -> String {
    format!("{VAULT_ROOT}/{}", receipt.date.year())
}
