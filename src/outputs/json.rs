//! Structured output.
//!
//! Records are written as a pretty-printed JSON array: two-space indent,
//! fields in declaration order, non-ASCII characters kept as-is.

use super::PersistError;
use crate::models::Record;
use crate::utils::ensure_dir;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

pub fn render_records<R: Record>(records: &[R]) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Write all `records` to a single JSON file, creating its directory if needed.
#[instrument(level = "info", skip_all, fields(path = %path.display(), records = records.len()))]
pub async fn write_records<R: Record>(records: &[R], path: &Path) -> Result<(), PersistError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }
    let json = render_records(records)?;
    fs::write(path, json).await?;
    info!("Saved JSON file");
    Ok(())
}
