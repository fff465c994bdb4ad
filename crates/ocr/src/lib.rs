pub mod config;
pub mod extract;
pub mod hash;
pub mod pipeline;
pub mod preprocess;
pub mod recognizer;
pub mod types;

pub use config::{BinarizationConfig, ConfigError};
pub use extract::Extractor;
pub use hash::{content_id, sha256_bytes, to_hex};
pub use pipeline::{CaptureResult, PipelineError, ReceiptPipeline};
pub use preprocess::{binarize, binarize_dynamic, prepare_for_ocr, prepare_for_ocr_from_bytes, PreprocessError};
pub use recognizer::{MockRecognizer, OcrBackend, OcrError};
pub use types::{ParsedReceiptFields, RawImage};
