use std::sync::OnceLock;

use regex::Regex;

use super::{ReceiptText, Strategy};

re!(re_provider_label,
    r"(?i)(provider|doctor|physician|clinic|hospital|dental|dentist|pharmacy|optometrist|therap(?:y|ist)|urgent care)\s*[:\-]\s*(.+)");
re!(re_patient_label,
    r"(?i)(patient|member|dependent|name)\s*[:\-]\s*(.+)");
re!(re_boilerplate,
    r"(?i)\b(?:receipt|invoice|total|amount|date|merchant|thank you|statement|account|number|qty|balance)\b|\bno\.");
re!(re_currency_symbol, r"[$€£]");
re!(re_digit_run, r"[0-9]{3,}");
re!(re_word3, r"[A-Za-z]{3,}");
re!(re_spaces, r"\s{2,}");

/// Only the head of a receipt is searched for a provider label.
const LABEL_SEARCH_LINES: usize = 15;

pub const MERCHANT_STRATEGIES: &[Strategy<String>] = &[labeled_provider, name_like_line];

pub const PATIENT_STRATEGIES: &[Strategy<String>] = &[labeled_patient];

/// `Provider: …`, `Clinic - …`, `Pharmacy: …` and similar in the first lines.
pub fn labeled_provider(text: &ReceiptText<'_>) -> Option<String> {
    text.lines
        .iter()
        .take(LABEL_SEARCH_LINES)
        .find_map(|l| label_value(re_provider_label(), l))
}

/// First line that reads like a business name rather than an amount,
/// address or reference number.
pub fn name_like_line(text: &ReceiptText<'_>) -> Option<String> {
    text.lines
        .iter()
        .find(|l| is_likely_name(l))
        .map(|l| l.to_string())
}

/// `Patient: …`, `Member - …`, `Name: …`. No unlabeled fallback.
pub fn labeled_patient(text: &ReceiptText<'_>) -> Option<String> {
    text.lines.iter().find_map(|l| label_value(re_patient_label(), l))
}

fn label_value(re: &Regex, line: &str) -> Option<String> {
    let value = re.captures(line)?.get(2)?.as_str().trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn is_likely_name(line: &str) -> bool {
    if re_currency_symbol().is_match(line) || re_digit_run().is_match(line) {
        return false;
    }
    let total = line.chars().count().max(1);
    let letters = line.chars().filter(|c| c.is_ascii_alphabetic()).count();
    letters > 0
        && letters as f64 / total as f64 > 0.5
        && line.split_whitespace().any(|w| re_word3().is_match(w))
}

/// Strip receipt boilerplate words and collapse whitespace. `None` when
/// nothing but boilerplate was left.
pub fn normalize_merchant(name: &str) -> Option<String> {
    let stripped = re_boilerplate().replace_all(name, "");
    let collapsed = re_spaces().replace_all(&stripped, " ");
    let trimmed = collapsed.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::first_match;

    fn merchant(s: &str) -> Option<String> {
        first_match(&ReceiptText::new(s), MERCHANT_STRATEGIES).and_then(|m| normalize_merchant(&m))
    }

    #[test]
    fn provider_label() {
        assert_eq!(
            merchant("Provider: Mercury Dental Group\nTotal $50.00").as_deref(),
            Some("Mercury Dental Group")
        );
    }

    #[test]
    fn label_beats_earlier_name_line() {
        let t = ReceiptText::new("Welcome Patients\nPharmacy - Corner Drugs\n");
        assert_eq!(labeled_provider(&t).as_deref(), Some("Corner Drugs"));
        assert_eq!(merchant("Welcome Patients\nPharmacy - Corner Drugs").as_deref(), Some("Corner Drugs"));
    }

    #[test]
    fn label_outside_first_fifteen_lines_ignored() {
        let mut text = "x\n".repeat(15);
        text.push_str("Clinic: Far Away Clinic");
        let t = ReceiptText::new(&text);
        assert_eq!(labeled_provider(&t), None);
    }

    #[test]
    fn therapy_and_urgent_care_labels() {
        let t = ReceiptText::new("Physical Therapy: Move Well PT");
        assert_eq!(labeled_provider(&t).as_deref(), Some("Move Well PT"));
        let t = ReceiptText::new("URGENT CARE - CityMed");
        assert_eq!(labeled_provider(&t).as_deref(), Some("CityMed"));
    }

    #[test]
    fn name_like_line_skips_amounts_and_numbers() {
        let t = ReceiptText::new("$12.00\n1234 Main St\nInv 55\nSunrise Optical\n");
        // "Inv 55": 3 letters of 6 chars is not a majority.
        assert_eq!(name_like_line(&t).as_deref(), Some("Sunrise Optical"));
    }

    #[test]
    fn name_like_line_needs_a_real_word() {
        let t = ReceiptText::new("A B C\nOK\n");
        assert_eq!(name_like_line(&t), None);
    }

    #[test]
    fn normalize_strips_boilerplate_words() {
        assert_eq!(normalize_merchant("Walgreens Receipt").as_deref(), Some("Walgreens"));
        assert_eq!(normalize_merchant("INVOICE  Acme   Health").as_deref(), Some("Acme Health"));
        assert_eq!(normalize_merchant("Account No. Smile Dental").as_deref(), Some("Smile Dental"));
    }

    #[test]
    fn normalize_keeps_words_containing_boilerplate() {
        assert_eq!(normalize_merchant("Nordstrom Updated").as_deref(), Some("Nordstrom Updated"));
    }

    #[test]
    fn normalize_to_nothing_is_none() {
        assert_eq!(normalize_merchant("Thank you"), None);
        assert_eq!(merchant("Thank you\n$45.67\n"), None);
    }

    #[test]
    fn patient_label_variants() {
        let t = ReceiptText::new("Clinic: X\nMember - John Smith\nPatient: Other");
        assert_eq!(labeled_patient(&t).as_deref(), Some("John Smith"));
        let t = ReceiptText::new("Patient Name: Ana Lee");
        assert_eq!(labeled_patient(&t).as_deref(), Some("Ana Lee"));
    }

    #[test]
    fn patient_absent_without_label() {
        let t = ReceiptText::new("Ana Lee\nTotal $5.00");
        assert_eq!(labeled_patient(&t), None);
    }
}
