use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "hsavault")]
#[command(about = "Receipt capture for HSA records: binarize, OCR, extract")]
#[command(version)]
pub struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Binarize a receipt photo and write it as PNG
    Binarize {
        input: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        tuning: TuningArgs,
    },
    /// Extract receipt fields from OCR text (a file, or `-` for stdin)
    Extract {
        #[arg(default_value = "-")]
        input: String,
    },
    /// Run the full capture pipeline on one image
    Capture(CaptureArgs),
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct TuningArgs {
    /// TOML file with binarization settings
    #[arg(long, env = "HSAVAULT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Downscale inputs wider than this many pixels
    #[arg(long)]
    pub max_width: Option<u32>,

    /// Skip the morphological closing step
    #[arg(long)]
    pub no_close: bool,
}

#[derive(clap::Args, Debug)]
pub struct CaptureArgs {
    pub image: PathBuf,

    /// Use this text instead of running an OCR engine
    #[arg(long)]
    pub ocr_text: Option<PathBuf>,

    /// Path to tessdata directory (uses TESSDATA_PREFIX env var if not set)
    #[arg(long, env = "TESSDATA_PREFIX")]
    pub tessdata_path: Option<String>,

    /// OCR language (e.g., "eng", "deu")
    #[arg(long, env = "HSAVAULT_OCR_LANGUAGE", default_value = "eng")]
    pub language: String,

    #[command(flatten)]
    pub tuning: TuningArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match args.command {
        Command::Binarize { input, output, tuning } => commands::binarize(&input, &output, &tuning),
        Command::Extract { input } => commands::extract(&input),
        Command::Capture(capture) => commands::capture(&capture).await,
    }
}
