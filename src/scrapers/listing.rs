//! Category listing extraction.
//!
//! 12371.cn renders its listing pages from inline script data of the form
//! `'link_add':'<url>','title':'<title>'`. The pattern is matched directly
//! against the raw page text; no HTML parsing is involved.
//!
//! Titles containing a single quote terminate the match early, so such
//! entries come out truncated or are missed entirely. This is a property of
//! the source format.

use crate::models::ArticleRef;
use itertools::Itertools;
use regex::Regex;

/// Extracts `{title, url}` pairs from listing page text.
#[derive(Debug, Clone)]
pub struct ListingExtractor {
    pattern: Regex,
}

impl ListingExtractor {
    /// `pattern` must capture the link first and the title second.
    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }

    /// All matches in page order, deduplicated by title. The first URL seen
    /// for a title wins. No match yields an empty listing.
    pub fn extract(&self, page: &str) -> Vec<ArticleRef> {
        self.pattern
            .captures_iter(page)
            .filter_map(|caps| {
                let url = caps.get(1)?.as_str();
                let title = caps.get(2)?.as_str();
                Some(ArticleRef {
                    title: title.to_string(),
                    url: url.to_string(),
                })
            })
            .unique_by(|article| article.title.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteRules;

    fn extractor() -> ListingExtractor {
        ListingExtractor::new(Regex::new(&SiteRules::default().link_pattern).unwrap())
    }

    #[test]
    fn extracts_pairs_in_page_order() {
        let page = r#"
            var list = [{'link_add':'https://www.12371.cn/2024/01/01/ARTI1.shtml','title':'中国共产党章程'},
                        {'link_add':'https://www.12371.cn/2024/01/02/ARTI2.shtml','title':'中国共产党纪律处分条例'}];
        "#;
        let articles = extractor().extract(page);
        assert_eq!(
            articles,
            vec![
                ArticleRef {
                    title: "中国共产党章程".into(),
                    url: "https://www.12371.cn/2024/01/01/ARTI1.shtml".into(),
                },
                ArticleRef {
                    title: "中国共产党纪律处分条例".into(),
                    url: "https://www.12371.cn/2024/01/02/ARTI2.shtml".into(),
                },
            ]
        );
    }

    #[test]
    fn duplicate_title_keeps_first_url() {
        let page = "'link_add':'https://a/1','title':'内容A' \
                    'link_add':'https://b/2','title':'内容B' \
                    'link_add':'https://a/3','title':'内容A'";
        let articles = extractor().extract(page);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "内容A");
        assert_eq!(articles[0].url, "https://a/1");
        assert_eq!(articles[1].title, "内容B");
    }

    #[test]
    fn same_url_with_different_titles_is_kept() {
        let page = "'link_add':'https://a/1','title':'甲' 'link_add':'https://a/1','title':'乙'";
        assert_eq!(extractor().extract(page).len(), 2);
    }

    #[test]
    fn no_match_is_empty() {
        assert!(extractor().extract("<html><body>nothing here</body></html>").is_empty());
        assert!(extractor().extract("").is_empty());
    }

    #[test]
    fn titles_are_unique() {
        let page: String = (0..50)
            .map(|i| format!("'link_add':'https://x/{}','title':'标题{}' ", i, i % 7))
            .collect();
        let articles = extractor().extract(&page);
        assert_eq!(articles.len(), 7);
        let titles: std::collections::HashSet<_> = articles.iter().map(|a| &a.title).collect();
        assert_eq!(titles.len(), articles.len());
    }
}
