//! multiomics — PubMed multi-omics census.
//!
//! Query mode (default) writes the record log to stdout:
//!     multiomics --api-key KEY --first-year 2000 --last-year 2017 > census.log
//! Parse mode classifies a record log into yearly layer counts:
//!     multiomics --parse-results census.log

mod config;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use multiomics_classify::{classify_file, write_summary, ParseMode, YearOrder};
use multiomics_common::keywords::{DEFAULT_FIRST_YEAR, DEFAULT_LAST_YEAR, OMICS_KEYWORDS};
use multiomics_ingestion::pipeline::{run_queries, CensusJob, Fetcher};
use multiomics_ingestion::retry::RetryPolicy;
use multiomics_ingestion::sources::pubmed::PubMedClient;
use multiomics_ingestion::throttle::RateLimiter;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "multiomics")]
#[command(version)]
#[command(about = "Count PubMed studies that combine two or more omics disciplines, year by year")]
struct Cli {
    /// NCBI E-utilities API key (falls back to the config file, then MULTIOMICS_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// First publication year to query
    #[arg(long, default_value_t = DEFAULT_FIRST_YEAR)]
    first_year: i32,

    /// Last publication year to query (inclusive)
    #[arg(long, default_value_t = DEFAULT_LAST_YEAR)]
    last_year: i32,

    /// Give up on a query after this many retries; 0 retries forever
    #[arg(long)]
    max_retries: Option<u32>,

    /// Classify a previously written record log instead of querying
    #[arg(long, value_name = "PATH")]
    parse_results: Option<PathBuf>,

    /// Sort summary years ascending instead of first-seen order
    #[arg(long)]
    sort_years: bool,

    /// Skip malformed record lines instead of aborting
    #[arg(long)]
    lenient: bool,

    /// Config file (defaults to MULTIOMICS_CONFIG, then ./multiomics.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the record log or the summary.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("multiomics=info,warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Some(path) = &cli.parse_results {
        return classify(path, &cli);
    }

    let config = config::Config::load(cli.config.as_deref())?;
    census(&cli, &config).await
}

fn classify(path: &Path, cli: &Cli) -> anyhow::Result<()> {
    let mode = if cli.lenient { ParseMode::Lenient } else { ParseMode::Strict };
    let order = if cli.sort_years { YearOrder::Ascending } else { YearOrder::Encounter };

    let classification = classify_file(path, mode)
        .with_context(|| format!("failed to classify {}", path.display()))?;

    let stdout = std::io::stdout();
    write_summary(&classification, order, &mut stdout.lock())?;
    Ok(())
}

async fn census(cli: &Cli, config: &config::Config) -> anyhow::Result<()> {
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let api_key = config.resolve_api_key(cli.api_key.clone());
    if api_key.is_none() {
        tracing::warn!("No API key (set --api-key, pubmed.api_key or MULTIOMICS_API_KEY); NCBI allows 3 req/s without one");
    }

    let http = config.pubmed.http_client()?;

    let source = PubMedClient::new(http, api_key)
        .with_base_url(config.pubmed.base_url.clone())
        .with_retmax(config.pubmed.retmax);

    let max_retries = cli.max_retries.unwrap_or(config.retry.max_retries);
    let retry = RetryPolicy::from_config(max_retries, Duration::from_secs(config.retry.retry_delay_secs));

    let job = CensusJob {
        keywords: OMICS_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        first_year: cli.first_year,
        last_year: cli.last_year,
    };

    let mut fetcher = Fetcher::new(source, RateLimiter::default(), retry);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = run_queries(&job, &mut fetcher, &mut out).await?;

    info!(
        years = summary.years,
        records = summary.records,
        failed_attempts = summary.failed_attempts,
        "Census complete"
    );
    Ok(())
}
