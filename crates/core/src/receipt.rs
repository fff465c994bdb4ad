use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::money::{Currency, Money};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceiptError {
    #[error("Receipt id must not be empty")]
    MissingId,
    #[error("Merchant must not be empty")]
    MissingMerchant,
    #[error("Amount must not be negative: {0}")]
    NegativeAmount(i64),
    #[error("Currency code must be three letters: '{0}'")]
    InvalidCurrency(String),
}

/// A receipt as confirmed by the user, ready to be filed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: String,
    pub date: NaiveDate,
    pub merchant: String,
    /// Amount in minor units (cents).
    pub amount_minor_units: i64,
    #[serde(default)]
    pub currency: Currency,
    pub category: Option<String>,
    pub notes: Option<String>,
    /// `None` means the reimbursement state is unknown, not that it is unpaid.
    pub reimbursed: Option<bool>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Receipt {
    pub fn new(id: impl Into<String>, date: NaiveDate, merchant: impl Into<String>, money: Money) -> Self {
        Receipt {
            id: id.into(),
            date,
            merchant: merchant.into(),
            amount_minor_units: money.minor_units(),
            currency: money.currency().clone(),
            category: None,
            notes: None,
            reimbursed: None,
            tags: vec![],
        }
    }

    pub fn money(&self) -> Money {
        Money::from_minor_units(self.amount_minor_units, self.currency.clone())
    }

    /// Check every rule and report all violations at once, so a form can
    /// highlight each offending field.
    pub fn validate(&self) -> Result<(), Vec<ReceiptError>> {
        let mut errors = Vec::new();
        if self.id.trim().is_empty() {
            errors.push(ReceiptError::MissingId);
        }
        if self.merchant.trim().is_empty() {
            errors.push(ReceiptError::MissingMerchant);
        }
        if self.amount_minor_units < 0 {
            errors.push(ReceiptError::NegativeAmount(self.amount_minor_units));
        }
        let code = self.currency.code();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            errors.push(ReceiptError::InvalidCurrency(code.to_string()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
