use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("OCR engine error: {0}")]
    Engine(String),
    #[error("Tesseract not available; build with the `tesseract` feature")]
    NotAvailable,
}

/// Text recognition engine. Receives the binarized receipt as PNG bytes and
/// returns plain UTF-8 text, one receipt line per text line.
pub trait OcrBackend: Send + Sync {
    /// Short identifier used in logs (e.g. "tesseract").
    fn name(&self) -> &'static str;

    fn recognize(&self, png_bytes: &[u8]) -> Result<String, OcrError>;
}

// ── Canned backend ────────────────────────────────────────────────────────────

/// Returns text supplied up front. Used by tests and by the CLI when the
/// text was produced by an OCR run elsewhere.
pub struct MockRecognizer {
    text: String,
}

impl MockRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl OcrBackend for MockRecognizer {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn recognize(&self, png_bytes: &[u8]) -> Result<String, OcrError> {
        if png_bytes.is_empty() {
            return Err(OcrError::ImageDecode("empty image buffer".into()));
        }
        Ok(self.text.clone())
    }
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{OcrBackend, OcrError};
    use leptess::LepTess;

    pub struct TesseractRecognizer {
        data_path: Option<String>,
        lang: String,
    }

    impl TesseractRecognizer {
        pub fn new(data_path: Option<String>, lang: &str) -> Self {
            Self { data_path, lang: lang.to_string() }
        }
    }

    impl OcrBackend for TesseractRecognizer {
        fn name(&self) -> &'static str {
            "tesseract"
        }

        fn recognize(&self, png_bytes: &[u8]) -> Result<String, OcrError> {
            // LepTess is not Sync; a fresh instance per call keeps the backend shareable.
            let mut lt = LepTess::new(self.data_path.as_deref(), &self.lang)
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            lt.set_image_from_mem(png_bytes)
                .map_err(|e| OcrError::ImageDecode(e.to_string()))?;
            lt.get_utf8_text().map_err(|e| OcrError::Engine(e.to_string()))
        }
    }
}
