//! Sitebrief main entry point
//!
//! Command-line interface for the crawl-and-summarize pipeline.

use clap::Parser;
use sitebrief::crawler::{CrawlOutcome, Crawler};
use sitebrief::fetcher::PageFetcher;
use sitebrief::summarize::{OllamaClient, Summarize};
use sitebrief::SitebriefError;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

/// Sitebrief: recursive site crawler with Ollama summarization
///
/// Crawls one website breadth-first with a real browser session, extracts
/// the main content of each page, and records a short model-generated
/// summary per URL.
#[derive(Parser, Debug)]
#[command(name = "sitebrief")]
#[command(version)]
#[command(about = "Recursive site crawler with Ollama summarization", long_about = None)]
struct Cli {
    /// Start URL to crawl from
    #[arg(long)]
    url: String,

    /// Ollama model to use
    #[arg(long, default_value = "mistral")]
    model: String,

    /// Base URL of the Ollama service
    #[arg(long, default_value = "http://localhost:11434")]
    ollama_url: String,

    /// Run the browser in headless mode
    #[arg(long)]
    headless: bool,

    /// Maximum number of unique pages to visit
    #[arg(long = "max", visible_alias = "depth", default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    max_pages: u32,

    /// Path for the JSON report
    #[arg(long, default_value = "summary_report.json")]
    json_out: PathBuf,

    /// Path for the plain-text report
    #[arg(long, default_value = "summary_report.txt")]
    text_out: PathBuf,

    /// Path for the log file
    #[arg(long, default_value = "sitebrief.log")]
    log_file: PathBuf,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _log_guard = setup_logging(cli.verbose, cli.quiet, &cli.log_file);

    let start_url = Url::parse(&cli.url)?;

    // The summarization service must be available before crawling begins
    let ollama = OllamaClient::new(&cli.ollama_url, &cli.model)?;
    if !ollama.check_connection().await {
        tracing::error!(
            "Summarization service at {} is not accessible. Ensure 'ollama serve' is running.",
            ollama.base_url()
        );
        return Err(SitebriefError::ServiceUnavailable(ollama.base_url().to_string()).into());
    }

    let fetcher = PageFetcher::launch(cli.headless).await?;
    let crawler = Crawler::new(fetcher, ollama, &start_url, cli.max_pages as usize)?;

    // Ctrl-C stops the crawl at the next loop iteration; partial results
    // are still written out below.
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping after the current page");
            signal_token.cancel();
        }
    });

    let (report, outcome) = crawler.run(&cancel).await;

    match outcome {
        CrawlOutcome::Drained => tracing::info!("Crawl finished: frontier drained"),
        CrawlOutcome::BudgetExhausted => tracing::info!("Crawl finished: page budget reached"),
        CrawlOutcome::Interrupted => {
            tracing::info!("Crawl stopped early; partial results preserved")
        }
    }

    report.write_json(&cli.json_out)?;
    report.write_text(&cli.text_out)?;

    tracing::info!("Visited {} pages.", report.len());
    tracing::info!(
        "Results saved to {} and {}",
        cli.json_out.display(),
        cli.text_out.display()
    );

    report.print_preview();

    Ok(())
}

/// Sets up console and file logging based on verbosity flags
///
/// The returned guard must stay alive for the program duration so buffered
/// file output is flushed on exit.
fn setup_logging(
    verbose: u8,
    quiet: bool,
    log_file: &Path,
) -> tracing_appender::non_blocking::WorkerGuard {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitebrief=info,warn"),
            1 => EnvFilter::new("sitebrief=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    let log_dir = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let log_name = log_file
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("sitebrief.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_target(false),
        )
        .init();

    guard
}
