//! Data models for crawled listings and article contents.
//!
//! This module defines the records that flow through the pipeline:
//! - [`ArticleRef`]: a `{title, url}` pair discovered on a category listing page
//! - [`ArticleContent`]: the extracted title and body text of one article
//! - [`ContentOutcome`]: the typed result of extracting one article
//! - [`CategoryResult`]: one category's listing paired with its outcomes
//!
//! All records are transient. They are written to disk once and never read back.

use serde::{Deserialize, Serialize};

/// Title used when fetching or parsing an article failed.
pub const FAILED_TITLE: &str = "获取失败";

/// Prefix of the content text recorded for a failed article.
pub const FAILED_CONTENT_PREFIX: &str = "获取文章内容时出错";

/// A single article reference found on a category listing page.
///
/// Field order is the serialized order: `title`, then `url`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleRef {
    /// The article title as it appears in the listing.
    pub title: String,
    /// The article URL as it appears in the listing.
    pub url: String,
}

/// The extracted content of one article page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleContent {
    /// Heading of the page, or a placeholder when none was found.
    pub title: String,
    /// Newline-joined body fragments, or a placeholder when nothing survived filtering.
    pub content: String,
    /// The URL the content was fetched from.
    pub url: String,
}

/// Outcome of fetching and extracting a single article.
///
/// Failures are kept typed until they are serialized; only then do they
/// turn into the sentinel record the text output expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentOutcome {
    Extracted(ArticleContent),
    Failed { url: String, reason: String },
}

impl ContentOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, ContentOutcome::Failed { .. })
    }

    /// Render this outcome as the record written to disk.
    ///
    /// A failure becomes `{title: "获取失败", content: "获取文章内容时出错: <reason>", url}`.
    pub fn to_record(&self) -> ArticleContent {
        match self {
            ContentOutcome::Extracted(content) => content.clone(),
            ContentOutcome::Failed { url, reason } => ArticleContent {
                title: FAILED_TITLE.to_string(),
                content: format!("{}: {}", FAILED_CONTENT_PREFIX, reason),
                url: url.clone(),
            },
        }
    }
}

/// Anything that can be written by the persistence layer.
///
/// The human-readable writer needs a title and URL for every record and
/// prints a content block only when the record carries one.
pub trait Record: Serialize {
    fn title(&self) -> &str;
    fn url(&self) -> &str;
    fn content(&self) -> Option<&str> {
        None
    }
}

impl Record for ArticleRef {
    fn title(&self) -> &str {
        &self.title
    }

    fn url(&self) -> &str {
        &self.url
    }
}

impl Record for ArticleContent {
    fn title(&self) -> &str {
        &self.title
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn content(&self) -> Option<&str> {
        Some(&self.content)
    }
}

/// One category's listing and, once the content phase ran, its outcomes.
///
/// `outcomes` is paired with `articles` by position and has the same length
/// after the content phase.
#[derive(Debug, Clone, Default)]
pub struct CategoryResult {
    pub name: String,
    pub chunked: bool,
    pub articles: Vec<ArticleRef>,
    pub outcomes: Vec<ContentOutcome>,
}

impl CategoryResult {
    pub fn new(name: impl Into<String>, chunked: bool, articles: Vec<ArticleRef>) -> Self {
        Self {
            name: name.into(),
            chunked,
            articles,
            outcomes: Vec::new(),
        }
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn extracted_count(&self) -> usize {
        self.outcomes.len() - self.failed_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_outcome_renders_sentinel_record() {
        let outcome = ContentOutcome::Failed {
            url: "https://www.12371.cn/a.shtml".to_string(),
            reason: "operation timed out".to_string(),
        };
        let record = outcome.to_record();
        assert_eq!(record.title, "获取失败");
        assert_eq!(record.content, "获取文章内容时出错: operation timed out");
        assert_eq!(record.url, "https://www.12371.cn/a.shtml");
    }

    #[test]
    fn extracted_outcome_renders_unchanged() {
        let content = ArticleContent {
            title: "标题".to_string(),
            content: "正文内容".to_string(),
            url: "u".to_string(),
        };
        let outcome = ContentOutcome::Extracted(content.clone());
        assert!(!outcome.is_failed());
        assert_eq!(outcome.to_record(), content);
    }

    #[test]
    fn article_ref_serializes_title_before_url_without_escaping() {
        let r = ArticleRef {
            title: "中国共产党章程".to_string(),
            url: "https://www.12371.cn/x".to_string(),
        };
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"title":"中国共产党章程","url":"https://www.12371.cn/x"}"#);
    }

    #[test]
    fn category_result_counts_failures() {
        let mut category = CategoryResult::new("党章", false, Vec::new());
        category.outcomes = vec![
            ContentOutcome::Failed {
                url: "a".into(),
                reason: "x".into(),
            },
            ContentOutcome::Extracted(ArticleContent {
                title: "t".into(),
                content: "c".into(),
                url: "b".into(),
            }),
        ];
        assert_eq!(category.failed_count(), 1);
        assert_eq!(category.extracted_count(), 1);
    }
}
