//! Crawl orchestration.
//!
//! A run is strictly sequential:
//! 1. **Listing**: fetch each category page and extract its article references
//! 2. **Links**: persist every listing (chunked JSON or one JSON file)
//! 3. **Content**: per category, fetch every article, then persist the texts
//! 4. **Report**: write the summary report
//!
//! Listing failures leave a category empty, article failures become failed
//! outcomes; neither stops the run. Only persistence errors propagate.

use crate::config::{CategoryConfig, CrawlConfig, PacingSettings};
use crate::fetch::PageFetcher;
use crate::models::{ArticleContent, ArticleRef, CategoryResult, ContentOutcome};
use crate::outputs::chunked::{ChunkFormat, write_chunked};
use crate::outputs::{
    contents_chunk_base, contents_file_name, json, links_chunk_base, links_file_name, report, text,
};
use crate::scrapers::PageExtractor;
use crate::utils::{ensure_dir, truncate_chars, truncate_for_log};
use futures::stream::{self, StreamExt};
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Characters of an article title shown in progress logs.
const PROGRESS_TITLE_CHARS: usize = 30;

/// Fixed-interval throttle. Zero durations disable the corresponding pause.
#[derive(Debug, Clone)]
pub struct Pacer {
    settings: PacingSettings,
}

impl Pacer {
    pub fn new(settings: PacingSettings) -> Self {
        Self { settings }
    }

    pub async fn after_listing(&self) {
        if self.settings.listing_pause_secs > 0 {
            sleep(Duration::from_secs(self.settings.listing_pause_secs)).await;
        }
    }

    /// `processed` is the 1-based count of articles fetched so far in the category.
    pub async fn after_article(&self, processed: usize) {
        if self.should_pause_after(processed) {
            sleep(Duration::from_secs(self.settings.article_pause_secs)).await;
        }
    }

    fn should_pause_after(&self, processed: usize) -> bool {
        let every = self.settings.articles_per_pause;
        every > 0 && self.settings.article_pause_secs > 0 && processed % every == 0
    }
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct CrawlSummary {
    pub categories: Vec<CategoryResult>,
    pub files: Vec<PathBuf>,
    pub report: PathBuf,
}

/// Sequential crawler over the configured categories.
///
/// `F` supplies page text and `E` turns pages into references and article
/// contents; both are swapped for in-memory versions in tests.
pub struct Crawler<'a, F, E> {
    config: &'a CrawlConfig,
    fetcher: F,
    extractor: E,
    pacer: Pacer,
}

impl<'a, F, E> Crawler<'a, F, E>
where
    F: PageFetcher,
    E: PageExtractor,
{
    /// # Arguments
    ///
    /// * `config` - Categories, pacing and output layout for the run.
    /// * `fetcher` - Source of page text.
    /// * `extractor` - Listing and content extraction rules.
    ///
    /// # Returns
    ///
    /// A crawler whose pacer follows `config.pacing`.
    pub fn new(config: &'a CrawlConfig, fetcher: F, extractor: E) -> Self {
        Self {
            config,
            fetcher,
            extractor,
            pacer: Pacer::new(config.pacing.clone()),
        }
    }

    /// Run all four phases: listings, link files, contents, report.
    ///
    /// # Returns
    ///
    /// A [`CrawlSummary`] with every category result and written file.
    /// Fetch failures are absorbed; only output directory and file write
    /// errors are returned.
    #[instrument(level = "info", skip_all)]
    pub async fn run(&self) -> Result<CrawlSummary, Box<dyn Error>> {
        let output = &self.config.output;
        ensure_dir(&output.links_path()).await?;
        ensure_dir(&output.contents_path()).await?;

        info!("Collecting category listings");
        let mut categories = self.collect_listings().await;

        info!("Saving link files");
        let mut files = self.save_links(&categories).await?;

        info!("Fetching article contents");
        for category in categories.iter_mut() {
            category.outcomes = self.fetch_contents(&category.name, &category.articles).await;
            files.extend(self.save_contents(category).await?);
        }

        let report = report::write_report(&categories, output).await?;
        Ok(CrawlSummary {
            categories,
            files,
            report,
        })
    }

    async fn collect_listings(&self) -> Vec<CategoryResult> {
        let mut categories = Vec::with_capacity(self.config.categories.len());
        for category in &self.config.categories {
            let articles = self.fetch_listing(category).await;
            info!(category = %category.name, count = articles.len(), "Found articles");
            categories.push(CategoryResult::new(
                category.name.clone(),
                category.chunked,
                articles,
            ));
            self.pacer.after_listing().await;
        }
        categories
    }

    /// Listing of one category; any failure yields an empty listing.
    #[instrument(level = "info", skip_all, fields(category = %category.name, url = %category.url))]
    async fn fetch_listing(&self, category: &CategoryConfig) -> Vec<ArticleRef> {
        match self.fetcher.fetch_text(&category.url).await {
            Ok(page) => {
                let articles = self.extractor.extract_listing(&page);
                if articles.is_empty() {
                    warn!(preview = %truncate_for_log(&page, 200), "No listing entries matched");
                }
                articles
            }
            Err(e) => {
                warn!(error = %e, "Listing fetch failed; treating category as empty");
                Vec::new()
            }
        }
    }

    async fn save_links(
        &self,
        categories: &[CategoryResult],
    ) -> Result<Vec<PathBuf>, Box<dyn Error>> {
        let output = &self.config.output;
        let dir = output.links_path();
        let mut files = Vec::new();
        for category in categories {
            if category.chunked {
                let base = dir.join(links_chunk_base(&category.name));
                files.extend(
                    write_chunked(&category.articles, &base, output.chunk_size, ChunkFormat::Json)
                        .await?,
                );
            } else {
                let path = dir.join(links_file_name(&category.name));
                json::write_records(&category.articles, &path).await?;
                files.push(path);
            }
        }
        Ok(files)
    }

    /// Outcomes for `articles`, in the same order and of the same length.
    #[instrument(level = "info", skip_all, fields(%category, total = articles.len()))]
    async fn fetch_contents(
        &self,
        category: &str,
        articles: &[ArticleRef],
    ) -> Vec<ContentOutcome> {
        let total = articles.len();
        let outcomes: Vec<ContentOutcome> = stream::iter(articles.iter().enumerate())
            .then(|(i, article)| async move {
                let processed = i + 1;
                info!(
                    progress = %format!("{}/{}", processed, total),
                    title = %truncate_chars(&article.title, PROGRESS_TITLE_CHARS),
                    "Fetching article"
                );
                let outcome = self.fetch_content(article).await;
                self.pacer.after_article(processed).await;
                if processed % 10 == 0 {
                    info!(processed, total, "Progress");
                }
                outcome
            })
            .collect()
            .await;

        let failed = outcomes.iter().filter(|o| o.is_failed()).count();
        info!(total, failed, "Finished category contents");
        outcomes
    }

    async fn fetch_content(&self, article: &ArticleRef) -> ContentOutcome {
        match self.fetcher.fetch_text(&article.url).await {
            Ok(page) => {
                let content = self.extractor.extract_content(&page, &article.url);
                debug!(
                    url = %article.url,
                    chars = content.content.chars().count(),
                    "Extracted article"
                );
                ContentOutcome::Extracted(content)
            }
            Err(e) => {
                warn!(url = %article.url, error = %e, "Article fetch failed");
                ContentOutcome::Failed {
                    url: article.url.clone(),
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn save_contents(
        &self,
        category: &CategoryResult,
    ) -> Result<Vec<PathBuf>, Box<dyn Error>> {
        let output = &self.config.output;
        let dir = output.contents_path();
        let records: Vec<ArticleContent> =
            category.outcomes.iter().map(ContentOutcome::to_record).collect();

        if category.chunked {
            let base = dir.join(contents_chunk_base(&category.name));
            Ok(write_chunked(&records, &base, output.chunk_size, ChunkFormat::Text).await?)
        } else {
            let path = dir.join(contents_file_name(&category.name));
            text::write_category_file(&records, &category.name, &path).await?;
            Ok(vec![path])
        }
    }
}
