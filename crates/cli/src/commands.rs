use anyhow::Context;
use chrono::NaiveDate;
use hsavault_core::{file_name, folder_path, Currency, Money, Receipt};
use hsavault_ocr::{
    binarize_dynamic, preprocess::encode_as_png, BinarizationConfig, CaptureResult, Extractor,
    MockRecognizer, OcrBackend, ParsedReceiptFields, ReceiptPipeline,
};
use serde::Serialize;
use std::io::Read;
use std::path::Path;

use crate::{CaptureArgs, TuningArgs};

/// Config file first, then flag overrides.
pub fn load_config(tuning: &TuningArgs) -> anyhow::Result<BinarizationConfig> {
    let mut config = match &tuning.config {
        Some(path) => BinarizationConfig::from_toml_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => BinarizationConfig::default(),
    };
    if let Some(max_width) = tuning.max_width {
        config.max_width = max_width;
    }
    if tuning.no_close {
        config.morph_close = false;
    }
    Ok(config)
}

pub fn binarize(input: &Path, output: &Path, tuning: &TuningArgs) -> anyhow::Result<()> {
    let config = load_config(tuning)?;
    let img = image::open(input).with_context(|| format!("opening {}", input.display()))?;
    let binary = binarize_dynamic(&img, &config)?;
    let png = encode_as_png(&binary)?;
    std::fs::write(output, png).with_context(|| format!("writing {}", output.display()))?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        width = binary.width(),
        height = binary.height(),
        "binarized"
    );
    Ok(())
}

pub fn extract(input: &str) -> anyhow::Result<()> {
    let text = read_text(input)?;
    let fields = Extractor::extract(&text);
    println!("{}", serde_json::to_string_pretty(&fields)?);
    Ok(())
}

fn read_text(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text).context("reading stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("reading {input}"))
    }
}

pub async fn capture(args: &CaptureArgs) -> anyhow::Result<()> {
    let config = load_config(&args.tuning)?;

    let report = if let Some(text_path) = &args.ocr_text {
        let text = std::fs::read_to_string(text_path)
            .with_context(|| format!("reading {}", text_path.display()))?;
        run_capture(MockRecognizer::new(text), config, &args.image).await?
    } else {
        capture_with_engine(args, config).await?
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(feature = "tesseract")]
async fn capture_with_engine(args: &CaptureArgs, config: BinarizationConfig) -> anyhow::Result<CaptureReport> {
    use hsavault_ocr::recognizer::tesseract_backend::TesseractRecognizer;

    let recognizer = TesseractRecognizer::new(args.tessdata_path.clone(), &args.language);
    run_capture(recognizer, config, &args.image).await
}

#[cfg(not(feature = "tesseract"))]
async fn capture_with_engine(args: &CaptureArgs, _config: BinarizationConfig) -> anyhow::Result<CaptureReport> {
    tracing::debug!(tessdata = ?args.tessdata_path, language = %args.language, "no OCR engine compiled in");
    anyhow::bail!("{} (or pass --ocr-text)", hsavault_ocr::OcrError::NotAvailable)
}

async fn run_capture<R: OcrBackend + 'static>(
    recognizer: R,
    config: BinarizationConfig,
    image: &Path,
) -> anyhow::Result<CaptureReport> {
    let pipeline = ReceiptPipeline::new(recognizer, config);
    let result = pipeline
        .process_file(image)
        .await
        .with_context(|| format!("capturing {}", image.display()))?;
    Ok(CaptureReport::new(result))
}

#[derive(Debug, Serialize)]
pub struct CaptureReport {
    #[serde(flatten)]
    pub result: CaptureResult,
    /// Fields the user still has to fill in by hand.
    pub missing: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filing: Option<Filing>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Filing {
    pub folder: String,
    pub file_name: String,
}

impl CaptureReport {
    pub fn new(result: CaptureResult) -> Self {
        let missing = result.fields.missing_fields();
        let filing = suggest_filing(&result.hash_hex, &result.fields);
        Self { result, missing, filing }
    }
}

/// Filing location for a capture, when date, merchant and amount were all
/// detected. Currency falls back to USD.
pub fn suggest_filing(id: &str, fields: &ParsedReceiptFields) -> Option<Filing> {
    let date = NaiveDate::parse_from_str(fields.date.as_deref()?, "%Y-%m-%d").ok()?;
    let merchant = fields.merchant.as_deref()?;
    let currency = fields.currency_code.clone().map(Currency::from).unwrap_or_default();
    let money = Money::from_minor_units(fields.amount_minor_units?, currency);

    let receipt = Receipt::new(id, date, merchant, money);
    if let Err(errors) = receipt.validate() {
        tracing::warn!(?errors, "detected fields do not form a valid receipt");
        return None;
    }
    Some(Filing { folder: folder_path(&receipt), file_name: file_name(&receipt) })
}
