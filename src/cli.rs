//! Command-line interface definitions.
//!
//! With no arguments the crawler uses the built-in 12371.cn configuration
//! and writes into the current directory.

use clap::Parser;
use std::path::PathBuf;

/// Crawl party-affairs regulation listings and article texts from 12371.cn.
///
/// # Examples
///
/// ```sh
/// # Default run, output in the current directory
/// dangwu_crawler
///
/// # Custom config, output root and chunk size
/// dangwu_crawler --config crawl.yaml --output-dir ./out --chunk-size 50
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config overriding the built-in site rules
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory the link folder, content folder and report are written into
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Records per file for chunked categories
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Skip the fixed pauses between requests
    #[arg(long)]
    pub no_pacing: bool,
}
