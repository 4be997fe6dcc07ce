//! Site-specific page extraction.
//!
//! Everything that depends on the target site's markup sits behind the
//! narrow [`PageExtractor`] trait: one page of text in, records out. The
//! crawler and the writers never see regexes or selectors, so another site
//! only needs another `PageExtractor`.
//!
//! | Page | Module | Method |
//! |------|--------|--------|
//! | Category listing | [`listing`] | inline script regex |
//! | Article | [`content`] | HTML parse, container and paragraph text |

pub mod content;
pub mod listing;

use crate::config::{ConfigError, SiteRules};
use crate::models::{ArticleContent, ArticleRef};
use content::ContentExtractor;
use listing::ListingExtractor;
use regex::Regex;

/// Turns fetched page text into records.
pub trait PageExtractor {
    /// Article references found on a category listing page.
    fn extract_listing(&self, page: &str) -> Vec<ArticleRef>;

    /// Title and body text of an article page fetched from `url`.
    fn extract_content(&self, page: &str, url: &str) -> ArticleContent;
}

/// [`PageExtractor`] driven entirely by [`SiteRules`].
#[derive(Debug, Clone)]
pub struct SiteExtractor {
    listing: ListingExtractor,
    content: ContentExtractor,
}

impl SiteExtractor {
    pub fn from_rules(rules: &SiteRules) -> Result<Self, ConfigError> {
        let pattern = Regex::new(&rules.link_pattern)
            .map_err(|e| ConfigError::Invalid(format!("link_pattern: {}", e)))?;
        Ok(Self {
            listing: ListingExtractor::new(pattern),
            content: ContentExtractor::from_rules(rules)?,
        })
    }
}

impl PageExtractor for SiteExtractor {
    fn extract_listing(&self, page: &str) -> Vec<ArticleRef> {
        self.listing.extract(page)
    }

    fn extract_content(&self, page: &str, url: &str) -> ArticleContent {
        self.content.extract(page, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_extractor_delegates_to_both_extractors() {
        let extractor = SiteExtractor::from_rules(&SiteRules::default()).unwrap();
        let listing = extractor.extract_listing("'link_add':'https://x/1','title':'中国共产党章程'");
        assert_eq!(listing.len(), 1);

        let article = extractor.extract_content(
            "<html><body><h1>章程</h1><div class=\"content\">第一条 党员必须履行义务</div></body></html>",
            "https://x/1",
        );
        assert_eq!(article.title, "章程");
        assert_eq!(article.content, "第一条 党员必须履行义务");
    }

    #[test]
    fn custom_rules_swap_site_coupling() {
        let rules = SiteRules {
            link_pattern: r#"href="([^"]+)" title="([^"]+)""#.to_string(),
            content_selectors: vec!["article".to_string()],
            denylist: vec!["版权所有".to_string()],
            min_fragment_chars: 2,
            ..SiteRules::default()
        };
        let extractor = SiteExtractor::from_rules(&rules).unwrap();

        let listing = extractor.extract_listing(r#"<a href="/a" title="甲文"></a>"#);
        assert_eq!(listing[0].url, "/a");
        assert_eq!(listing[0].title, "甲文");

        let article = extractor.extract_content(
            "<html><body><article><span>三个字</span><span>版权所有啊</span></article></body></html>",
            "/a",
        );
        assert_eq!(article.content, "三个字");
    }
}
