use hsavault_core::{Currency, Money};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::preprocess::PreprocessError;

/// A decoded RGBA8 bitmap: `width * height * 4` bytes, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RawImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self { width, height, pixels }
    }

    /// Reject zero dimensions and buffers whose length is not exactly
    /// `width * height * 4`.
    pub fn validate(&self) -> Result<(), PreprocessError> {
        if self.width == 0 || self.height == 0 {
            return Err(PreprocessError::InvalidImage(format!(
                "zero dimension ({}x{})",
                self.width, self.height
            )));
        }
        let expected = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| {
                PreprocessError::InvalidImage(format!("{}x{} is too large to address", self.width, self.height))
            })?;
        if self.pixels.len() != expected {
            return Err(PreprocessError::InvalidImage(format!(
                "buffer length {} does not match {}x{}x4 = {expected}",
                self.pixels.len(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }

    pub fn to_rgba_image(&self) -> Result<RgbaImage, PreprocessError> {
        self.validate()?;
        RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or_else(|| PreprocessError::InvalidImage("buffer rejected by image".into()))
    }
}

impl From<RgbaImage> for RawImage {
    fn from(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        RawImage { width, height, pixels: img.into_raw() }
    }
}

/// Fields recognized in receipt text. Every field is optional; `None` means
/// "not confidently detected" and must be filled in by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedReceiptFields {
    /// ISO `YYYY-MM-DD`. When several dates are present this is the earliest.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_minor_units: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    /// Only ever `Some(true)`; absence is not evidence of non-payment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reimbursed: Option<bool>,
}

impl ParsedReceiptFields {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Amount and currency together, when both were detected.
    pub fn money(&self) -> Option<Money> {
        let amount = self.amount_minor_units?;
        let currency: Currency = self.currency_code.as_deref()?.parse().ok()?;
        Some(Money::from_minor_units(amount, currency))
    }

    /// Names of the fields a receipt cannot be filed without and that were
    /// not detected.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.date.is_none() {
            missing.push("date");
        }
        if self.merchant.is_none() {
            missing.push("merchant");
        }
        if self.amount_minor_units.is_none() {
            missing.push("amount");
        }
        missing
    }
}
