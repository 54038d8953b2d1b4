//! Sumi-Trawl main entry point
//!
//! This is the command-line interface for the Sumi-Trawl contact crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use sumi_trawl::config::{load_config, CrawlRequest, Settings};
use sumi_trawl::output::{render_event, OutputFormat};
use sumi_trawl::{CrawlEvent, Session};
use tracing_subscriber::EnvFilter;

/// Sumi-Trawl: a polite contact trawler
///
/// Sumi-Trawl crawls a single website breadth-first, staying on the seed's
/// origin, and reports the email addresses and phone numbers it finds as
/// it goes. Press Ctrl-C to stop a crawl early.
#[derive(Parser, Debug)]
#[command(name = "sumi-trawl")]
#[command(version = "1.0.0")]
#[command(about = "A polite contact trawler", long_about = None)]
struct Cli {
    /// Seed URL (absolute http:// or https://)
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of pages to fetch
    #[arg(long)]
    max_pages: Option<usize>,

    /// Politeness delay between pages, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Per-request timeout, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Do not scrape tel: links
    #[arg(long)]
    no_tel: bool,

    /// Do not scrape mailto: links
    #[arg(long)]
    no_mailto: bool,

    /// Print events as JSON lines
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Builds the start request, layering flags over the settings file
    fn request(&self, settings: &Settings) -> CrawlRequest {
        let mut request = CrawlRequest::with_defaults(self.url.clone(), &settings.crawl);

        if let Some(max_pages) = self.max_pages {
            request.max_pages = max_pages;
        }
        if let Some(delay_ms) = self.delay_ms {
            request.delay_ms = delay_ms;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            request.timeout_ms = timeout_ms;
        }
        if self.no_tel {
            request.include_tel = false;
        }
        if self.no_mailto {
            request.include_mailto = false;
        }

        request
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let settings = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?
        }
        None => Settings::default(),
    };

    let request = cli.request(&settings);
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let session = Session::new(&settings).context("Failed to build HTTP client")?;
    let mut job = session.start(&request).context("Failed to start crawl")?;

    let cancel = job.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling crawl");
            cancel.cancel();
        }
    });

    let mut failed = false;
    while let Some(event) = job.next_event().await {
        if matches!(event, CrawlEvent::Error(_)) {
            failed = true;
        }
        if !cli.quiet || failed {
            println!("{}", render_event(&event, format)?);
        }
    }
    job.wait().await;

    tracing::info!("Crawl finished with status: {}", session.status());

    if failed {
        anyhow::bail!("Crawl of {} failed", request.start_url);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so that stdout carries only events.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_trawl=info,warn"),
            1 => EnvFilter::new("sumi_trawl=debug,info"),
            2 => EnvFilter::new("sumi_trawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
