//! Output generation for link files, content files and the crawl report.
//!
//! # Submodules
//!
//! - [`chunked`]: splits a record list into fixed-size, order-preserving chunk files
//! - [`json`]: structured output (pretty JSON arrays, Unicode unescaped)
//! - [`text`]: human-readable output with a header block and numbered records
//! - [`report`]: the final summary report
//!
//! # Output Structure
//!
//! ```text
//! <root>/
//! ├── 党务链接文件夹/
//! │   ├── 党章链接文件.json
//! │   ├── ...
//! │   ├── 规范性文件链接_1-100.json
//! │   └── 规范性文件链接_101-200.json
//! ├── 党务文章内容文件夹/
//! │   ├── 党章内容文件.txt
//! │   ├── ...
//! │   ├── 规范性文件正文_1-100.txt
//! │   └── 规范性文件正文_101-200.txt
//! └── 党务文章爬取报告.txt
//! ```

pub mod chunked;
pub mod json;
pub mod report;
pub mod text;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("chunk size must be at least 1")]
    InvalidChunkSize,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Single link file of an unchunked category.
pub fn links_file_name(category: &str) -> String {
    format!("{}链接文件.json", category)
}

/// Base name that chunked link files extend with `_<start>-<end>.json`.
pub fn links_chunk_base(category: &str) -> String {
    format!("{}链接", category)
}

/// Single content file of an unchunked category.
pub fn contents_file_name(category: &str) -> String {
    format!("{}内容文件.txt", category)
}

/// Base name that chunked content files extend with `_<start>-<end>.txt`.
pub fn contents_chunk_base(category: &str) -> String {
    format!("{}正文", category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_follow_site_layout() {
        assert_eq!(links_file_name("党章"), "党章链接文件.json");
        assert_eq!(links_chunk_base("规范性文件"), "规范性文件链接");
        assert_eq!(contents_file_name("条例"), "条例内容文件.txt");
        assert_eq!(contents_chunk_base("规范性文件"), "规范性文件正文");
    }
}
