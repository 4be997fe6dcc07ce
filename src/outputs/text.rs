//! Human-readable output.
//!
//! ```text
//! === 规范性文件正文 1-100 ===
//! 生成时间: 2025-01-01 12:00:00
//! ============================================================
//!
//! 【第1条】<title>
//! 链接: <url>
//! ----------------------------------------
//! <content>
//!
//! ==================================================
//!
//! ```
//!
//! The dashed rule and content appear only for records that carry content.

use super::PersistError;
use crate::models::Record;
use crate::utils::{ensure_dir, now_stamp};
use std::fmt::Write;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Item label unit used inside chunk files (`【第N条】`).
pub const CHUNK_ITEM_UNIT: &str = "条";

/// Item label unit used inside single category files (`【第N篇】`).
pub const CATEGORY_ITEM_UNIT: &str = "篇";

const HEADER_RULE: usize = 60;
const RECORD_RULE: usize = 50;
const CONTENT_RULE: usize = 40;

/// Render records under a `=== <heading> ===` header, numbering them from 1.
///
/// # Arguments
///
/// * `records` - Records in output order; numbering restarts at 1 for each call.
/// * `heading` - Text placed between the `===` markers.
/// * `item_unit` - Label unit, [`CHUNK_ITEM_UNIT`] or [`CATEGORY_ITEM_UNIT`].
/// * `stamp` - Generation time shown under the heading.
///
/// # Returns
///
/// The complete file body. Records without content omit the dashed rule.
pub fn render_records<R: Record>(
    records: &[R],
    heading: &str,
    item_unit: &str,
    stamp: &str,
) -> String {
    let mut out = String::new();
    writeln!(out, "=== {} ===", heading).unwrap();
    writeln!(out, "生成时间: {}", stamp).unwrap();
    writeln!(out, "{}\n", "=".repeat(HEADER_RULE)).unwrap();

    for (i, record) in records.iter().enumerate() {
        writeln!(out, "【第{}{}】{}", i + 1, item_unit, record.title()).unwrap();
        writeln!(out, "链接: {}", record.url()).unwrap();
        if let Some(content) = record.content() {
            writeln!(out, "{}", "-".repeat(CONTENT_RULE)).unwrap();
            writeln!(out, "{}", content).unwrap();
        }
        writeln!(out, "\n{}\n", "=".repeat(RECORD_RULE)).unwrap();
    }
    out
}

/// Write one category's records to a single text file headed `<category>内容汇总`.
#[instrument(level = "info", skip_all, fields(path = %path.display(), %category, records = records.len()))]
pub async fn write_category_file<R: Record>(
    records: &[R],
    category: &str,
    path: &Path,
) -> Result<(), PersistError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }
    let body = render_records(
        records,
        &format!("{}内容汇总", category),
        CATEGORY_ITEM_UNIT,
        &now_stamp(),
    );
    fs::write(path, body).await?;
    info!("Saved text file");
    Ok(())
}
