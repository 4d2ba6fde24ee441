//! `tally`: turn a receipt or transaction-history file into transactions.
//!
//! Prints the accepted transactions as JSON on stdout. With `--db` the batch is
//! also committed to a SQLite ledger; otherwise it is held in memory and dropped.

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tally_core::{MemorySink, TransactionSink, UserId};
use tally_extract::{DocumentKind, ErrorKind, ExtractConfig, ExtractError};
use tally_ocr::{OcrBackend, PdfBackend, TextSource, Upload, UploadOutcome, UploadPipeline};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version,
    about = "Extract transactions from receipts and transaction-history documents"
)]
struct Cli {
    /// Receipt image, PDF, or plain-text file.
    file: PathBuf,

    /// Treat the file as a transaction history instead of a receipt.
    #[arg(long)]
    history: bool,

    /// Owner of the extracted transactions.
    #[arg(short, long, env = "TALLY_USER", default_value = "local")]
    user: String,

    /// Description stamped on every transaction.
    #[arg(short, long)]
    description: Option<String>,

    /// Commit the batch to this SQLite database (created if missing).
    #[arg(long, env = "TALLY_DB")]
    db: Option<PathBuf>,

    /// TOML extraction config.
    #[arg(short, long, env = "TALLY_CONFIG")]
    config: Option<PathBuf>,

    /// Debug-level logs on stderr.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn document_kind(&self) -> DocumentKind {
        if self.history {
            DocumentKind::History
        } else {
            DocumentKind::Receipt
        }
    }
}

#[cfg(feature = "tesseract")]
fn recognizer() -> impl OcrBackend + 'static {
    tally_ocr::TesseractRecognizer::english()
}

#[cfg(not(feature = "tesseract"))]
fn recognizer() -> impl OcrBackend + 'static {
    tally_ocr::UnavailableRecognizer
}

#[cfg(feature = "pdf")]
fn pdf_backend() -> impl PdfBackend + 'static {
    tally_ocr::PdfExtractBackend
}

#[cfg(not(feature = "pdf"))]
fn pdf_backend() -> impl PdfBackend + 'static {
    tally_ocr::UnavailablePdf
}

fn load_config(path: Option<&Path>) -> Result<ExtractConfig> {
    match path {
        Some(p) => ExtractConfig::from_file(p)
            .with_context(|| format!("Failed to load config from {}", p.display())),
        None => Ok(ExtractConfig::default()),
    }
}

async fn run<O, P, S>(
    source: TextSource<O, P>,
    sink: S,
    config: ExtractConfig,
    upload: Upload,
) -> Result<UploadOutcome, ExtractError>
where
    O: OcrBackend + 'static,
    P: PdfBackend + 'static,
    S: TransactionSink,
{
    UploadPipeline::new(source, sink, config).process(upload).await
}

fn exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::ProcessingFailure => 1,
        ErrorKind::EmptyExtraction => 2,
        ErrorKind::UnsupportedInput => 3,
    }
}

fn kind_label(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::UnsupportedInput => "unsupported_input",
        ErrorKind::EmptyExtraction => "empty_extraction",
        ErrorKind::ProcessingFailure => "processing_failure",
    }
}

fn report(result: Result<UploadOutcome, ExtractError>) -> Result<ExitCode> {
    match result {
        Ok(outcome) => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            let kind = err.kind();
            let body = serde_json::json!({
                "error": kind_label(kind),
                "message": err.to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(ExitCode::from(exit_code(kind)))
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = load_config(cli.config.as_deref())?;

    let bytes = tokio::fs::read(&cli.file)
        .await
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;
    let file_name = cli
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.file.display().to_string());

    let mut upload = Upload::new(file_name, bytes, cli.document_kind(), UserId::new(cli.user.clone()));
    if let Some(description) = &cli.description {
        upload = upload.with_description(description.clone());
    }

    let source = TextSource::new(recognizer(), pdf_backend());
    let result = match &cli.db {
        Some(path) => {
            let pool = tally_storage::create_db(path)
                .await
                .with_context(|| format!("Failed to open database {}", path.display()))?;
            tracing::debug!(db = %path.display(), "committing to SQLite");
            run(source, tally_storage::SqliteSink::new(pool), config, upload).await
        }
        None => run(source, MemorySink::default(), config, upload).await,
    };

    report(result)
}
