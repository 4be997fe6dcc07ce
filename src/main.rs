//! # Dangwu Crawler
//!
//! Crawls the party-affairs regulation pages of 12371.cn, extracts the
//! article listing of every category, fetches each article's text and
//! writes link files, content files and a summary report.
//!
//! ## Usage
//!
//! ```sh
//! dangwu_crawler --output-dir ./out
//! ```
//!
//! ## Architecture
//!
//! The application follows a sequential pipeline:
//! 1. **Listing**: Extract `{title, url}` pairs from each category page
//! 2. **Links**: Persist listings as JSON (chunked for the high-volume category)
//! 3. **Content**: Fetch and extract every article, paced by fixed pauses
//! 4. **Report**: Write a plain-text summary of counts and produced files

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod crawl;
mod fetch;
mod models;
mod outputs;
mod scrapers;
mod utils;

use cli::Cli;
use config::{CrawlConfig, PacingSettings};
use crawl::{CrawlSummary, Crawler};
use fetch::HttpFetcher;
use scrapers::SiteExtractor;

#[tokio::main]
async fn main() {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("dangwu_crawler starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    match run(args).await {
        Ok(summary) => {
            log_layout(&summary);
            let elapsed = start_time.elapsed();
            info!(?elapsed, secs = elapsed.as_secs(), "Crawl complete");
        }
        Err(e) => {
            error!(error = %e, "Crawl aborted");
            error!("建议检查网络连接后重试");
        }
    }
}

fn build_config(args: &Cli) -> Result<CrawlConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => CrawlConfig::load(path)?,
        None => CrawlConfig::default(),
    };
    if let Some(dir) = &args.output_dir {
        config.output.root = dir.clone();
    }
    if let Some(size) = args.chunk_size {
        config.output.chunk_size = size;
    }
    if args.no_pacing {
        config.pacing = PacingSettings::disabled();
    }
    config.validate()?;
    Ok(config)
}

#[instrument(level = "info", skip_all)]
async fn run(args: Cli) -> Result<CrawlSummary, Box<dyn Error>> {
    let config = build_config(&args)?;
    info!(
        categories = config.categories.len(),
        root = %config.output.root.display(),
        chunk_size = config.output.chunk_size,
        "Configuration ready"
    );

    let fetcher = HttpFetcher::new(&config.http)?;
    let extractor = SiteExtractor::from_rules(&config.site)?;
    let crawler = Crawler::new(&config, fetcher, extractor);
    crawler.run().await
}

fn log_layout(summary: &CrawlSummary) {
    for category in &summary.categories {
        info!(
            category = %category.name,
            articles = category.articles.len(),
            failed = category.failed_count(),
            "Category done"
        );
    }
    for file in &summary.files {
        info!(path = %file.display(), "Produced file");
    }
    info!(path = %summary.report.display(), "Produced report");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn cli_overrides_apply_to_default_config() {
        let args = Cli::parse_from([
            "dangwu_crawler",
            "--output-dir",
            "/tmp/out",
            "--chunk-size",
            "10",
            "--no-pacing",
        ]);
        let config = build_config(&args).unwrap();
        assert_eq!(config.output.root, PathBuf::from("/tmp/out"));
        assert_eq!(config.output.chunk_size, 10);
        assert_eq!(config.pacing, PacingSettings::disabled());
    }

    #[test]
    fn zero_chunk_size_from_cli_is_rejected() {
        let args = Cli::parse_from(["dangwu_crawler", "--chunk-size", "0"]);
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = Cli::parse_from(["dangwu_crawler", "--config", "/nonexistent/crawl.yaml"]);
        assert!(build_config(&args).is_err());
    }
}
