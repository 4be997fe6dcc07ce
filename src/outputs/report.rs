//! Final crawl report.
//!
//! A plain-text summary written once at the end of a run: per-category
//! counts, overall totals, the files that were produced and a few fixed notes.

use super::chunked::{ChunkFormat, chunk_file_name, plan_chunks};
use super::{
    PersistError, contents_chunk_base, contents_file_name, links_chunk_base, links_file_name,
};
use crate::config::OutputSettings;
use crate::models::CategoryResult;
use crate::utils::{ensure_dir, now_stamp};
use std::fmt::Write;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

const SECTION_RULE: usize = 50;

/// File names produced for one category in one output directory.
fn category_files(
    category: &CategoryResult,
    chunk_size: NonZeroUsize,
    format: ChunkFormat,
) -> Vec<String> {
    let (single, base) = match format {
        ChunkFormat::Json => (links_file_name(&category.name), links_chunk_base(&category.name)),
        ChunkFormat::Text => (
            contents_file_name(&category.name),
            contents_chunk_base(&category.name),
        ),
    };
    if category.chunked {
        plan_chunks(category.articles.len(), chunk_size)
            .into_iter()
            .map(|span| chunk_file_name(&base, span, format))
            .collect()
    } else {
        vec![single]
    }
}

fn write_tree(out: &mut String, dir: &str, files: &[String]) {
    writeln!(out, "{}/", dir).unwrap();
    for (i, file) in files.iter().enumerate() {
        let branch = if i + 1 == files.len() { "└──" } else { "├──" };
        writeln!(out, "  {} {}", branch, file).unwrap();
    }
}

/// Build the end-of-run report text.
///
/// # Arguments
///
/// * `categories` - Per-category results in crawl order.
/// * `output` - Output layout; supplies directory names and the chunk size.
/// * `stamp` - Generation time shown in the header.
///
/// # Returns
///
/// The report body, or [`PersistError::InvalidChunkSize`] when
/// `output.chunk_size` is zero.
pub fn render_report(
    categories: &[CategoryResult],
    output: &OutputSettings,
    stamp: &str,
) -> Result<String, PersistError> {
    let chunk_size = NonZeroUsize::new(output.chunk_size).ok_or(PersistError::InvalidChunkSize)?;
    let rule = "-".repeat(SECTION_RULE);
    let mut out = String::new();

    writeln!(out, "=== 党务文章爬取完成报告 ===").unwrap();
    writeln!(out, "生成时间: {}", stamp).unwrap();
    writeln!(out, "{}\n", "=".repeat(80)).unwrap();

    writeln!(out, "【分类统计】").unwrap();
    writeln!(out, "{}", rule).unwrap();
    writeln!(out, "{:<10} {:<8} {:<15}", "分类名称", "文章数量", "文件类型").unwrap();
    writeln!(out, "{}", rule).unwrap();
    for category in categories {
        let count = category.articles.len();
        let (file_type, file_info) = if category.chunked {
            let chunks = plan_chunks(count, chunk_size).len();
            ("分块文件", format!("{}个分块文件", chunks))
        } else {
            ("单个文件", "1个文件".to_string())
        };
        writeln!(
            out,
            "{:<10} {:<8} {:<15} {}",
            category.name, count, file_type, file_info
        ).unwrap();
    }

    let total: usize = categories.iter().map(|c| c.articles.len()).sum();
    let extracted: usize = categories.iter().map(|c| c.extracted_count()).sum();
    let failed: usize = categories.iter().map(|c| c.failed_count()).sum();
    writeln!(out, "\n【总体统计】").unwrap();
    writeln!(out, "{}", rule).unwrap();
    writeln!(out, "总文章数: {}", total).unwrap();
    writeln!(out, "分类数量: {}", categories.len()).unwrap();
    writeln!(out, "内容获取成功: {}", extracted).unwrap();
    writeln!(out, "内容获取失败: {}", failed).unwrap();

    writeln!(out, "\n【文件结构】").unwrap();
    writeln!(out, "{}", rule).unwrap();
    let link_files: Vec<String> = categories
        .iter()
        .flat_map(|c| category_files(c, chunk_size, ChunkFormat::Json))
        .collect();
    write_tree(&mut out, &output.links_dir, &link_files);
    writeln!(out).unwrap();
    let content_files: Vec<String> = categories
        .iter()
        .flat_map(|c| category_files(c, chunk_size, ChunkFormat::Text))
        .collect();
    write_tree(&mut out, &output.contents_dir, &content_files);

    let chunked_names: Vec<&str> = categories
        .iter()
        .filter(|c| c.chunked)
        .map(|c| c.name.as_str())
        .collect();
    let mut notes = Vec::new();
    if !chunked_names.is_empty() {
        notes.push(format!(
            "{}由于数量较多，已按每{}条进行分块保存",
            chunked_names.join("、"),
            chunk_size
        ));
    }
    notes.push("其他分类文件单独保存为一个文件".to_string());
    notes.push("爬取速度已优化，避免对服务器造成压力".to_string());
    notes.push("所有文件均采用UTF-8编码保存".to_string());

    writeln!(out, "\n【说明】").unwrap();
    writeln!(out, "{}", rule).unwrap();
    for (i, note) in notes.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, note).unwrap();
    }
    Ok(out)
}

#[instrument(level = "info", skip_all, fields(categories = categories.len()))]
pub async fn write_report(
    categories: &[CategoryResult],
    output: &OutputSettings,
) -> Result<PathBuf, PersistError> {
    let path = output.report_path();
    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }
    let report = render_report(categories, output, &now_stamp())?;
    fs::write(&path, report).await?;
    info!(path = %path.display(), "Generated report");
    Ok(path)
}
