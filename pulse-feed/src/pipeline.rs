//! One run of the news job: fetch, curate, render, splice, write.

use crate::classify::classify;
use crate::model::{ClassifiedItem, FeedItem};
use crate::parse::parse_feed;
use crate::rank::{curate, DEFAULT_DEDUP_PREFIX_CHARS, DEFAULT_MAX_ITEMS};
use crate::render::render_feed;
use crate::source::FeedSource;
use crate::splice::{splice, Markers, SpliceError};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Splice(#[from] SpliceError),

    #[error("failed to read page {path}: {source}")]
    ReadPage {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write page {path}: {source}")]
    WritePage {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Fetched sequentially, in this order.
    pub feeds: Vec<String>,
    pub max_items: usize,
    pub dedup_prefix_chars: usize,
    pub markers: Markers,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            feeds: Vec::new(),
            max_items: DEFAULT_MAX_ITEMS,
            dedup_prefix_chars: DEFAULT_DEDUP_PREFIX_CHARS,
            markers: Markers::default(),
        }
    }
}

/// What happened to a single feed during [`Pipeline::collect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedOutcome {
    Fetched { url: String, items: usize },
    Failed { url: String, error: String },
}

/// Items of every feed that answered, in feed order then entry order.
#[derive(Debug, Default)]
pub struct Collected {
    pub items: Vec<FeedItem>,
    pub outcomes: Vec<FeedOutcome>,
}

impl Collected {
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FeedOutcome::Failed { .. }))
            .count()
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub feeds_total: usize,
    pub feeds_failed: usize,
    pub items_fetched: usize,
    pub items_published: usize,
    /// The page as written (or as it would be written on a dry run).
    pub document: String,
    pub written: bool,
}

pub struct Pipeline {
    source: Arc<dyn FeedSource>,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(source: Arc<dyn FeedSource>, options: PipelineOptions) -> Self {
        Self { source, options }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Fetch and parse every configured feed, one after another. A feed
    /// that fails is logged and skipped; it never stops the others.
    pub async fn collect(&self) -> Collected {
        let mut collected = Collected::default();
        for url in &self.options.feeds {
            match self.source.fetch(url).await {
                Ok(body) => {
                    let items = parse_feed(&body);
                    tracing::info!(feed = %url, count = items.len(), "fetched feed");
                    collected.outcomes.push(FeedOutcome::Fetched {
                        url: url.clone(),
                        items: items.len(),
                    });
                    collected.items.extend(items);
                }
                Err(e) => {
                    tracing::error!(feed = %url, error = %e, "error fetching feed");
                    collected.outcomes.push(FeedOutcome::Failed {
                        url: url.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
        collected
    }

    /// Dedup, rank, cut and classify the merged items.
    pub fn prepare(&self, items: Vec<FeedItem>) -> Vec<ClassifiedItem> {
        curate(
            items,
            self.options.dedup_prefix_chars,
            self.options.max_items,
        )
        .into_iter()
        .map(classify)
        .collect()
    }

    /// Render `items` and splice them into `document`. No I/O.
    pub fn build_document(
        &self,
        document: &str,
        items: &[ClassifiedItem],
        now: DateTime<Utc>,
    ) -> Result<String, SpliceError> {
        let fragments = render_feed(items, now);
        splice(document, &self.options.markers, &fragments, now)
    }

    /// Full run against the page at `page`. The page is read once up front
    /// and written once at the end; with `dry_run` it is never written.
    /// Any error leaves the page untouched.
    pub async fn run(&self, page: &Path, dry_run: bool) -> Result<RunReport, PipelineError> {
        let document =
            tokio::fs::read_to_string(page)
                .await
                .map_err(|source| PipelineError::ReadPage {
                    path: page.to_path_buf(),
                    source,
                })?;

        let collected = self.collect().await;
        let feeds_failed = collected.failed();
        let items_fetched = collected.items.len();

        let items = self.prepare(collected.items);
        tracing::info!(count = items.len(), "processing {} unique news items", items.len());

        let updated = self.build_document(&document, &items, Utc::now())?;

        if !dry_run {
            tokio::fs::write(page, &updated)
                .await
                .map_err(|source| PipelineError::WritePage {
                    path: page.to_path_buf(),
                    source,
                })?;
            tracing::info!(page = %page.display(), "page updated with fresh AI news");
        }

        Ok(RunReport {
            feeds_total: self.options.feeds.len(),
            feeds_failed,
            items_fetched,
            items_published: items.len(),
            document: updated,
            written: !dry_run,
        })
    }
}
