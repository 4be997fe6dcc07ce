//! Chunked persistence.
//!
//! A record list is cut into consecutive slices of at most `chunk_size`
//! records. Boundaries are purely positional (`index / chunk_size`) and
//! every slice becomes one file whose name carries the 1-based numbers of
//! its first and last record, e.g. `规范性文件链接_101-200.json`.
//! Reading the files back in start order yields the original list.

use super::{PersistError, json, text};
use crate::models::Record;
use crate::utils::{ensure_dir, now_stamp};
use std::num::NonZeroUsize;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// 1-based, inclusive record numbers covered by one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpan {
    pub start: usize,
    pub end: usize,
}

impl ChunkSpan {
    pub fn len(&self) -> usize {
        self.end + 1 - self.start
    }

    /// 0-based index range into the record list.
    pub fn range(&self) -> Range<usize> {
        self.start - 1..self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkFormat {
    /// Pretty JSON array per chunk.
    Json,
    /// Human-readable text per chunk.
    Text,
}

impl ChunkFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ChunkFormat::Json => "json",
            ChunkFormat::Text => "txt",
        }
    }
}

/// Spans of `len` records split into chunks of `chunk_size`.
///
/// Yields `ceil(len / chunk_size)` spans; all but the last are full.
pub fn plan_chunks(len: usize, chunk_size: NonZeroUsize) -> Vec<ChunkSpan> {
    let size = chunk_size.get();
    (0..len)
        .step_by(size)
        .map(|offset| ChunkSpan {
            start: offset + 1,
            end: (offset + size).min(len),
        })
        .collect()
}

pub fn chunk_file_name(base_name: &str, span: ChunkSpan, format: ChunkFormat) -> String {
    format!(
        "{}_{}-{}.{}",
        base_name,
        span.start,
        span.end,
        format.extension()
    )
}

/// Write `records` as chunk files next to `base`.
///
/// `base` is a path without extension such as `党务链接文件夹/规范性文件链接`;
/// its parent directory is created when missing. An empty list writes
/// nothing. Returns the written paths in chunk order.
#[instrument(level = "info", skip_all, fields(base = %base.display(), records = records.len(), chunk_size, ?format))]
pub async fn write_chunked<R: Record>(
    records: &[R],
    base: &Path,
    chunk_size: usize,
    format: ChunkFormat,
) -> Result<Vec<PathBuf>, PersistError> {
    let chunk_size = NonZeroUsize::new(chunk_size).ok_or(PersistError::InvalidChunkSize)?;
    if let Some(parent) = base.parent() {
        ensure_dir(parent).await?;
    }
    let base_name = base
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut written = Vec::new();
    for span in plan_chunks(records.len(), chunk_size) {
        let chunk = &records[span.range()];
        let body = match format {
            ChunkFormat::Json => json::render_records(chunk)?,
            ChunkFormat::Text => text::render_records(
                chunk,
                &format!("{} {}-{}", base_name, span.start, span.end),
                text::CHUNK_ITEM_UNIT,
                &now_stamp(),
            ),
        };

        let path = base.with_file_name(chunk_file_name(&base_name, span, format));
        fs::write(&path, body).await?;
        info!(path = %path.display(), count = span.len(), "Saved chunk");
        written.push(path);
    }
    Ok(written)
}
