//! Docdrop - validated document uploads from the command line
//!
//! Reads a file from disk, validates its declared type and size, uploads it
//! to the configured object store with progress feedback, and appends a
//! metadata record to the document store.

use anyhow::bail;
use clap::Parser;
use docdrop::notify::ConsoleNotifier;
use docdrop::session::{SelectedFile, UploadSession};
use docdrop::uploader::Uploader;
use docdrop::validate::{Validator, Verdict};
use docdrop::Config;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Docdrop - upload a validated document and record its URL
#[derive(Parser, Debug)]
#[command(name = "docdrop")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Document to upload
    file: PathBuf,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Declared media type; inferred from the file extension when omitted
    #[arg(short = 't', long)]
    content_type: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

/// Declared type from the extension. The payload is never sniffed; this is
/// the CLI's stand-in for the browser-declared value.
fn declared_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Docdrop v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load(&args.config)?;
    info!("Loaded configuration from {:?}", args.config);

    // Build the file descriptor with its declared media type
    let name = match args.file.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.to_string(),
        None => bail!("{} has no usable file name", args.file.display()),
    };
    let payload = tokio::fs::read(&args.file).await?;
    let content_type = args
        .content_type
        .clone()
        .unwrap_or_else(|| declared_content_type(&args.file).to_string());
    let file = SelectedFile::new(&name, &content_type, payload.into());

    // Validate, then upload
    let validator = Validator::from_config(&config.validation);
    let session = UploadSession::shared();
    if let Verdict::Rejected(reason) = UploadSession::select(&session, file, &validator) {
        docdrop::metrics::record_validation_rejection(match reason {
            docdrop::validate::RejectReason::UnsupportedType(_) => "type",
            docdrop::validate::RejectReason::TooLarge { .. } => "size",
        });
        bail!("invalid file: {}", reason);
    }

    let uploader = Uploader::from_config(&config)?;
    let record = uploader.upload(&session, Arc::new(ConsoleNotifier)).await?;

    println!("{}", record.url);
    Ok(())
}
