//! Article content extraction.
//!
//! A page is parsed with `scraper` and its text nodes are walked in document
//! order. A text node is a body candidate when it sits inside one of the
//! configured content containers, or inside a `<p>` whose outermost
//! paragraph ancestor is not nested in a navigation container. Each text
//! node is considered once even when several rules select it.
//!
//! Candidates are trimmed and kept only when they are longer than the
//! configured minimum and contain none of the denylisted boilerplate
//! phrases. Survivors are joined with `\n`.

use crate::config::{ConfigError, SiteRules};
use crate::models::ArticleContent;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static PAGE_TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());

/// Title and body text extraction for one article page.
///
/// Built from [`SiteRules`]; selectors are parsed once and reused for every
/// page.
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    containers: Vec<Selector>,
    nav: Selector,
    denylist: Vec<String>,
    min_fragment_chars: usize,
    untitled_placeholder: String,
    empty_content_placeholder: String,
}

impl ContentExtractor {
    pub fn from_rules(rules: &SiteRules) -> Result<Self, ConfigError> {
        let parse = |s: &String| {
            Selector::parse(s).map_err(|e| ConfigError::Invalid(format!("selector {}: {}", s, e)))
        };
        Ok(Self {
            containers: rules
                .content_selectors
                .iter()
                .map(parse)
                .collect::<Result<_, _>>()?,
            nav: parse(&rules.nav_selector)?,
            denylist: rules.denylist.clone(),
            min_fragment_chars: rules.min_fragment_chars,
            untitled_placeholder: rules.untitled_placeholder.clone(),
            empty_content_placeholder: rules.empty_content_placeholder.clone(),
        })
    }

    /// Extract the title and body of an article page.
    ///
    /// # Arguments
    ///
    /// * `page` - Raw HTML of the article.
    /// * `url` - Copied into the result unchanged.
    ///
    /// # Returns
    ///
    /// The title from the first non-empty `<h1>`, else `<title>`, else the
    /// untitled placeholder. The body is the kept fragments joined by `\n`,
    /// or the empty-content placeholder when none survive.
    pub fn extract(&self, page: &str, url: &str) -> ArticleContent {
        let document = Html::parse_document(page);

        let title = first_text(&document, &HEADING)
            .or_else(|| first_text(&document, &PAGE_TITLE))
            .unwrap_or_else(|| self.untitled_placeholder.clone());

        let mut fragments = Vec::new();
        for node in document.tree.root().descendants() {
            let Some(text) = node.value().as_text() else {
                continue;
            };
            if !self.is_candidate(node.ancestors().filter_map(ElementRef::wrap)) {
                continue;
            }
            let fragment = text.trim();
            if self.keep_fragment(fragment) {
                fragments.push(fragment);
            }
        }

        let content = fragments.join("\n");
        let content = if content.trim().is_empty() {
            self.empty_content_placeholder.clone()
        } else {
            content
        };

        ArticleContent {
            title,
            content,
            url: url.to_string(),
        }
    }

    /// `ancestors` runs from the innermost element outwards.
    fn is_candidate<'a>(&self, ancestors: impl Iterator<Item = ElementRef<'a>>) -> bool {
        let mut in_paragraph = false;
        let mut nav_above_paragraph = false;
        for element in ancestors {
            if self.containers.iter().any(|s| s.matches(&element)) {
                return true;
            }
            if element.value().name() == "p" {
                in_paragraph = true;
                nav_above_paragraph = false;
            } else if in_paragraph && self.nav.matches(&element) {
                nav_above_paragraph = true;
            }
        }
        in_paragraph && !nav_above_paragraph
    }

    /// `fragment` is expected to be trimmed already.
    pub fn keep_fragment(&self, fragment: &str) -> bool {
        fragment.chars().count() > self.min_fragment_chars
            && !self.denylist.iter().any(|phrase| fragment.contains(phrase.as_str()))
    }
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .find(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> ContentExtractor {
        ContentExtractor::from_rules(&SiteRules::default()).unwrap()
    }

    #[test]
    fn prefers_h1_over_page_title() {
        let page = "<html><head><title>页面标题</title></head><body><h1> 中国共产党章程 </h1></body></html>";
        assert_eq!(extractor().extract(page, "u").title, "中国共产党章程");
    }

    #[test]
    fn falls_back_to_page_title_then_placeholder() {
        let page = "<html><head><title>页面标题</title></head><body><h1>  </h1></body></html>";
        assert_eq!(extractor().extract(page, "u").title, "页面标题");

        let page = "<html><body><p>这是一个有效的正文段落</p></body></html>";
        assert_eq!(extractor().extract(page, "u").title, "无标题");
    }

    #[test]
    fn short_fragments_are_dropped() {
        let page = "<html><body><p>短</p><p>这是一个有效的正文段落</p></body></html>";
        let content = extractor().extract(page, "https://x/1");
        assert_eq!(content.content, "这是一个有效的正文段落");
        assert_eq!(content.url, "https://x/1");
    }

    #[test]
    fn length_boundary_is_exclusive() {
        let ex = extractor();
        assert!(!ex.keep_fragment("一二三四五"));
        assert!(ex.keep_fragment("一二三四五六"));
        assert!(!ex.keep_fragment("abcde"));
        assert!(ex.keep_fragment("abcdef"));
    }

    #[test]
    fn denylisted_phrases_are_dropped() {
        let ex = extractor();
        assert!(!ex.keep_fragment("欢迎访问共产党员网首页"));
        assert!(!ex.keep_fragment("京ICP备12345678号"));
        assert!(!ex.keep_fragment("点击这里联系我们吧"));
        assert!(ex.keep_fragment("京icp备12345678号"));
    }

    #[test]
    fn every_default_denylist_phrase_drops_its_fragment() {
        let ex = extractor();
        let rules = SiteRules::default();
        let wrap = |phrase: &str| {
            let pad = 10usize.saturating_sub(phrase.chars().count() + 2);
            format!("正文{}{}", phrase, "段".repeat(pad))
        };
        assert!(ex.keep_fragment(&wrap("")), "clean fragment must survive");

        for phrase in &rules.denylist {
            let fragment = wrap(phrase);
            assert!(fragment.chars().count() >= 10, "{fragment}");
            assert!(!ex.keep_fragment(&fragment), "kept {fragment:?}");

            for variant in [phrase.to_lowercase(), phrase.to_uppercase()] {
                if &variant != phrase {
                    assert!(ex.keep_fragment(&wrap(&variant)), "dropped {variant:?}");
                }
            }
        }
    }

    #[test]
    fn container_text_is_collected_in_document_order() {
        let page = r#"<html><body>
            <div class="main-content"><span>第一段正文内容在这里</span></div>
            <div class="article_box">第二段正文内容在这里</div>
            <div class="other">不在任何容器里的文字</div>
            <div class="textarea">第三段正文内容在这里</div>
        </body></html>"#;
        let content = extractor().extract(page, "u");
        assert_eq!(
            content.content,
            "第一段正文内容在这里\n第二段正文内容在这里\n第三段正文内容在这里"
        );
    }

    #[test]
    fn paragraphs_inside_nav_are_ignored() {
        let page = r#"<html><body>
            <div class="top-nav"><p>导航栏里的段落文字</p></div>
            <p>正文里的段落文字内容</p>
        </body></html>"#;
        assert_eq!(extractor().extract(page, "u").content, "正文里的段落文字内容");
    }

    #[test]
    fn nested_selection_counts_text_once() {
        let page = r#"<html><body>
            <div class="content"><div class="article"><p>只应出现一次的段落</p></div></div>
        </body></html>"#;
        assert_eq!(extractor().extract(page, "u").content, "只应出现一次的段落");
    }

    #[test]
    fn container_class_match_is_case_sensitive() {
        let page = r#"<html><body><div class="Content">大写类名里的正文</div></body></html>"#;
        assert_eq!(extractor().extract(page, "u").content, "未能获取到文章内容");
    }

    #[test]
    fn empty_body_uses_placeholder() {
        let page = "<html><head><title>标题</title></head><body><p>短</p></body></html>";
        let content = extractor().extract(page, "u");
        assert_eq!(content.title, "标题");
        assert_eq!(content.content, "未能获取到文章内容");
    }
}
