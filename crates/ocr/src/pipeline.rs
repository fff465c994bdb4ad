use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::config::BinarizationConfig;
use crate::extract::Extractor;
use crate::hash;
use crate::preprocess;
use crate::recognizer::{OcrBackend, OcrError};
use crate::types::ParsedReceiptFields;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image preprocessing failed: {0}")]
    Preprocess(#[from] crate::preprocess::PreprocessError),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Everything a capture run produced, for the user to confirm or correct.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureResult {
    /// SHA-256 hex digest of the original file.
    pub hash_hex: String,
    /// Raw OCR text output.
    pub ocr_text: String,
    pub fields: ParsedReceiptFields,
}

/// Sequences one capture: hash → binarize → OCR → extract. Nothing is
/// persisted; storing the confirmed receipt is the caller's job.
pub struct ReceiptPipeline<R: OcrBackend> {
    recognizer: Arc<R>,
    config: BinarizationConfig,
}

impl<R: OcrBackend + 'static> ReceiptPipeline<R> {
    pub fn new(recognizer: R, config: BinarizationConfig) -> Self {
        Self { recognizer: Arc::new(recognizer), config }
    }

    /// Process raw file bytes (camera capture or upload).
    pub fn process_bytes(&self, data: &[u8]) -> Result<CaptureResult, PipelineError> {
        run(self.recognizer.as_ref(), &self.config, data)
    }

    /// Read a file and process it off the async runtime's worker threads.
    pub async fn process_file(&self, path: &Path) -> Result<CaptureResult, PipelineError> {
        let bytes = tokio::fs::read(path).await?;
        let recognizer = Arc::clone(&self.recognizer);
        let config = self.config.clone();
        tracing::info!(path = %path.display(), size = bytes.len(), "processing receipt");
        tokio::task::spawn_blocking(move || run(recognizer.as_ref(), &config, &bytes)).await?
    }
}

fn run<R: OcrBackend + ?Sized>(
    recognizer: &R,
    config: &BinarizationConfig,
    data: &[u8],
) -> Result<CaptureResult, PipelineError> {
    let hash_hex = hash::content_id(data);
    let png = preprocess::prepare_for_ocr_from_bytes(data, config)?;
    let ocr_text = recognizer.recognize(&png)?;
    let fields = Extractor::extract(&ocr_text);

    tracing::info!(
        hash = %hash_hex,
        backend = recognizer.name(),
        text_len = ocr_text.len(),
        missing = ?fields.missing_fields(),
        "receipt captured"
    );

    Ok(CaptureResult { hash_hex, ocr_text, fields })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
