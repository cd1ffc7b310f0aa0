use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use promogate_core::{
    load_config, validate_config, CandidateEntry, FanoutRecorder, HttpPageFetcher,
    JsonLinesRecorder, PromotionDetector, PromotionFilter, SanitizedConfig, TracingRecorder,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Read `--entries` from stdin.
const STDIN: &str = "-";

#[derive(Debug, Parser)]
#[command(name = "promogate", version)]
#[command(about = "Accept or reject torrent entries by their tracker promotion", long_about = None)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "PROMOGATE_CONFIG", default_value = "config.toml")]
    config: PathBuf,

    /// JSON array of entries, or "-" for stdin
    #[arg(short, long, default_value = STDIN)]
    entries: String,

    /// Append detection events as JSON lines to this file
    #[arg(long)]
    events: Option<PathBuf>,

    /// Pretty-print the output entries
    #[arg(long)]
    pretty: bool,

    /// Emit logs as JSON
    #[arg(long, env = "PROMOGATE_LOG_JSON")]
    log_json: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(e) = run(args).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    init_logging(args.log_json);

    info!("promogate {}", VERSION);
    info!("Loading configuration from {:?}", args.config);
    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;
    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = SanitizedConfig::from(&config);
    info!(
        "Configuration loaded: action={}, promotion={:?}, not_hr={}, amount={}, fingerprint={}",
        config.promotion.action.as_str(),
        sanitized.promotion.promotion,
        config.promotion.not_hr,
        config.promotion.amount,
        sanitized.fingerprint()
    );

    let mut entries = read_entries(&args.entries)?;
    info!("Read {} entries", entries.len());

    let fetcher = HttpPageFetcher::new().context("Failed to create HTTP client")?;
    let detector = PromotionDetector::new(Arc::new(fetcher), config.fetcher.clone());
    let filter = PromotionFilter::new(detector);

    let mut recorder = FanoutRecorder::new().with(TracingRecorder::new());
    if let Some(path) = &args.events {
        let file = File::options()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open events file {:?}", path))?;
        recorder = recorder.with(JsonLinesRecorder::new(BufWriter::new(file)));
    }

    let summary = filter
        .run(&mut entries, &config.promotion, &recorder)
        .await
        .context("Filter run aborted")?;

    write_entries(std::io::stdout().lock(), &entries, args.pretty)?;
    info!(
        "Run {} done: {} accepted, {} rejected ({} over amount, {} failed)",
        summary.run_id, summary.accepted, summary.rejected, summary.capped, summary.failed
    );

    Ok(())
}

/// stdout carries the filtered entries, logs go to stderr.
fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn read_entries(source: &str) -> Result<Vec<CandidateEntry>> {
    let raw = if source == STDIN {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read entries from stdin")?;
        buf
    } else {
        std::fs::read_to_string(Path::new(source))
            .with_context(|| format!("Failed to read entries from {:?}", source))?
    };
    parse_entries(&raw)
}

fn parse_entries(raw: &str) -> Result<Vec<CandidateEntry>> {
    serde_json::from_str(raw).context("Entries must be a JSON array of {title, link} objects")
}

fn write_entries(mut out: impl Write, entries: &[CandidateEntry], pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut out, entries)?;
    } else {
        serde_json::to_writer(&mut out, entries)?;
    }
    writeln!(out)?;
    Ok(())
}
