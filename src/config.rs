//! Crawl configuration.
//!
//! Every site-specific rule (category URLs, the listing pattern, the
//! candidate selectors and the boilerplate denylist) lives in one immutable
//! [`CrawlConfig`] that is built at startup and passed by reference to the
//! extractors, the writers and the crawler.
//!
//! The defaults reproduce the 12371.cn regulation pages. A YAML file can
//! override any subset of fields:
//!
//! ```yaml
//! output:
//!   root: ./out
//!   chunk_size: 50
//! pacing:
//!   article_pause_secs: 2
//! ```

use regex::Regex;
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// A crawled category: display name, listing URL and whether its files are chunked.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CategoryConfig {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub chunked: bool,
}

impl CategoryConfig {
    fn new(name: &str, url: &str, chunked: bool) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            chunked,
        }
    }
}

/// Scraping rules coupled to the target site's markup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteRules {
    /// Regex with two capture groups: link first, title second.
    pub link_pattern: String,
    /// CSS selectors of containers whose text counts as article body.
    pub content_selectors: Vec<String>,
    /// CSS selector of navigation containers; paragraphs inside them are ignored.
    pub nav_selector: String,
    /// Fragments containing any of these phrases are dropped.
    pub denylist: Vec<String>,
    /// Fragments must be strictly longer than this many characters.
    pub min_fragment_chars: usize,
    pub untitled_placeholder: String,
    pub empty_content_placeholder: String,
}

impl Default for SiteRules {
    fn default() -> Self {
        Self {
            link_pattern: r"'link_add':'([^']+)','title':'([^']+)'".to_string(),
            content_selectors: vec![
                r#"div[class*="content"]"#.to_string(),
                r#"div[class*="article"]"#.to_string(),
                r#"div[class*="text"]"#.to_string(),
            ],
            nav_selector: r#"div[class*="nav"]"#.to_string(),
            denylist: [
                "欢迎使用手机浏览",
                "热搜",
                "关于我们",
                "联系我们",
                "网站地图",
                "用户调查",
                "共产党员网",
                "京ICP备",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            min_fragment_chars: 5,
            untitled_placeholder: "无标题".to_string(),
            empty_content_placeholder: "未能获取到文章内容".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpSettings {
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            timeout_secs: 10,
        }
    }
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Fixed-interval throttle between requests.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PacingSettings {
    /// Pause after each category listing fetch.
    pub listing_pause_secs: u64,
    /// Pause after every `articles_per_pause` article fetches.
    pub article_pause_secs: u64,
    pub articles_per_pause: usize,
}

impl Default for PacingSettings {
    fn default() -> Self {
        Self {
            listing_pause_secs: 1,
            article_pause_secs: 1,
            articles_per_pause: 2,
        }
    }
}

impl PacingSettings {
    pub fn disabled() -> Self {
        Self {
            listing_pause_secs: 0,
            article_pause_secs: 0,
            articles_per_pause: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSettings {
    pub root: PathBuf,
    pub links_dir: String,
    pub contents_dir: String,
    pub report_file: String,
    pub chunk_size: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            links_dir: "党务链接文件夹".to_string(),
            contents_dir: "党务文章内容文件夹".to_string(),
            report_file: "党务文章爬取报告.txt".to_string(),
            chunk_size: 100,
        }
    }
}

impl OutputSettings {
    pub fn links_path(&self) -> PathBuf {
        self.root.join(&self.links_dir)
    }

    pub fn contents_path(&self) -> PathBuf {
        self.root.join(&self.contents_dir)
    }

    pub fn report_path(&self) -> PathBuf {
        self.root.join(&self.report_file)
    }
}

/// Complete, immutable configuration for one crawl.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CrawlConfig {
    pub categories: Vec<CategoryConfig>,
    pub site: SiteRules,
    pub http: HttpSettings,
    pub pacing: PacingSettings,
    pub output: OutputSettings,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            categories: vec![
                CategoryConfig::new("党章", "https://www.12371.cn/special/dnfg/", false),
                CategoryConfig::new("条例", "https://www.12371.cn/special/dnfg/tl/", false),
                CategoryConfig::new("准则", "https://www.12371.cn/special/dnfg/zz/", false),
                CategoryConfig::new("规定", "https://www.12371.cn/special/dnfg/gd/", false),
                CategoryConfig::new("办法", "https://www.12371.cn/special/dnfg/bf/", false),
                CategoryConfig::new("规则", "https://www.12371.cn/special/dnfg/gz/", false),
                CategoryConfig::new("细则", "https://www.12371.cn/special/dnfg/xz/", false),
                CategoryConfig::new("规范性文件", "https://www.12371.cn/special/zcwj/", true),
            ],
            site: SiteRules::default(),
            http: HttpSettings::default(),
            pacing: PacingSettings::default(),
            output: OutputSettings::default(),
        }
    }
}

impl CrawlConfig {
    /// Load a config from a YAML file. Fields the file omits keep their defaults.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml(&raw)?;
        info!(categories = config.categories.len(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        let config: CrawlConfig = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check everything that would otherwise fail halfway through a crawl.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk_size must be at least 1".into()));
        }
        if self.categories.is_empty() {
            return Err(ConfigError::Invalid("no categories configured".into()));
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(ConfigError::Invalid("category name is empty".into()));
            }
            if !seen.insert(category.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate category {}",
                    category.name
                )));
            }
            Url::parse(&category.url).map_err(|e| {
                ConfigError::Invalid(format!("category {} url {}: {}", category.name, category.url, e))
            })?;
        }

        let pattern = Regex::new(&self.site.link_pattern)
            .map_err(|e| ConfigError::Invalid(format!("link_pattern: {}", e)))?;
        if pattern.captures_len() < 3 {
            return Err(ConfigError::Invalid(
                "link_pattern needs two capture groups (link, title)".into(),
            ));
        }

        for selector in self
            .site
            .content_selectors
            .iter()
            .chain(std::iter::once(&self.site.nav_selector))
        {
            Selector::parse(selector)
                .map_err(|e| ConfigError::Invalid(format!("selector {}: {}", selector, e)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_and_matches_site() {
        let config = CrawlConfig::default();
        config.validate().unwrap();
        assert_eq!(config.categories.len(), 8);
        let chunked: Vec<_> = config
            .categories
            .iter()
            .filter(|c| c.chunked)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(chunked, vec!["规范性文件"]);
        assert_eq!(config.output.chunk_size, 100);
        assert_eq!(config.http.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = CrawlConfig::from_yaml(
            "output:\n  root: /tmp/out\n  chunk_size: 20\npacing:\n  article_pause_secs: 3\n",
        )
        .unwrap();
        assert_eq!(config.output.root, PathBuf::from("/tmp/out"));
        assert_eq!(config.output.chunk_size, 20);
        assert_eq!(config.output.links_dir, "党务链接文件夹");
        assert_eq!(config.pacing.article_pause_secs, 3);
        assert_eq!(config.pacing.articles_per_pause, 2);
        assert_eq!(config.categories.len(), 8);
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let err = CrawlConfig::from_yaml("output:\n  chunk_size: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn duplicate_category_is_rejected() {
        let mut config = CrawlConfig::default();
        config.categories.push(CategoryConfig::new(
            "党章",
            "https://www.12371.cn/other/",
            false,
        ));
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_url_and_pattern_are_rejected() {
        let mut config = CrawlConfig::default();
        config.categories[0].url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = CrawlConfig::default();
        config.site.link_pattern = "'link_add':'([^']+)'".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn output_paths_join_root() {
        let mut output = OutputSettings::default();
        output.root = PathBuf::from("/data");
        assert_eq!(output.links_path(), PathBuf::from("/data/党务链接文件夹"));
        assert_eq!(output.contents_path(), PathBuf::from("/data/党务文章内容文件夹"));
        assert_eq!(output.report_path(), PathBuf::from("/data/党务文章爬取报告.txt"));
    }
}
