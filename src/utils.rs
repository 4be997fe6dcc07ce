//! Utility functions for timestamps, string truncation and output directories.

use chrono::Local;
use std::io;
use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};

/// Format used for the "生成时间" lines in every written text file.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time as `YYYY-MM-DD HH:MM:SS`.
pub fn now_stamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Keep at most `max` characters of `s`.
///
/// Counts `char`s, not bytes, so it never splits a multi-byte character.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_chars("中国共产党章程", 4), "中国共产");
/// assert_eq!(truncate_chars("short", 100), "short");
/// ```
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncate a string for logging, noting how many characters were cut.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let kept = truncate_chars(s, max);
    if kept.len() == s.len() {
        s.to_string()
    } else {
        format!("{}…(+{} chars)", kept, s[kept.len()..].chars().count())
    }
}

/// Create `path` and any missing parents. An existing directory is fine.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn ensure_dir(path: &Path) -> io::Result<()> {
    if path.as_os_str().is_empty() {
        return Ok(());
    }
    fs::create_dir_all(path).await?;
    debug!("Directory ready");
    Ok(())
}
