//! Crawl orchestration: routers in, documents out.
//!
//! A [`Pipeline`] resolves every link through the document router, extracts
//! with a bounded number of links in flight and records per-domain outcomes
//! in a [`CrawlReport`]. The `*_into_store` variants hand the documents to a
//! [`DocumentSink`] as they are produced.

mod report;

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{error, info, warn};

use crate::app::Result;
use crate::config::Config;
use crate::domain::{Document, SourceUrl};
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::harvest::HarvestOptions;
use crate::normalizer::Normalizer;
use crate::router::defaults::{
    document_router, feed_router, profile_router, DocumentRouter, FeedRouter, ProfileRouter,
};
use crate::store::DocumentSink;

pub use report::{CrawlFailure, CrawlReport, DomainReport, HarvestSummary};

pub struct Pipeline {
    documents: DocumentRouter,
    profiles: ProfileRouter,
    feeds: FeedRouter,
    workers: usize,
}

impl Pipeline {
    pub fn new(
        documents: DocumentRouter,
        profiles: ProfileRouter,
        feeds: FeedRouter,
        workers: usize,
    ) -> Self {
        Self {
            documents,
            profiles,
            feeds,
            workers: workers.max(1),
        }
    }

    /// Wires the default routers from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(&config.http)?);
        let normalizer = Normalizer::with_utc_offset_minutes(config.harvest.utc_offset_minutes);

        Ok(Self::new(
            document_router(
                fetcher.clone(),
                normalizer.clone(),
                config.git.ignored_suffixes.clone(),
            )?,
            profile_router(fetcher)?,
            feed_router(config.browser.clone(), normalizer)?,
            config.pipeline.workers,
        ))
    }

    pub fn documents(&self) -> &DocumentRouter {
        &self.documents
    }

    pub fn profiles(&self) -> &ProfileRouter {
        &self.profiles
    }

    pub fn feeds(&self) -> &FeedRouter {
        &self.feeds
    }

    /// Extracts every link, keeping input order among the documents.
    /// Failures are recorded in the report and do not stop the crawl.
    pub async fn crawl_links(&self, links: &[SourceUrl]) -> (Vec<Document>, CrawlReport) {
        let outcomes: Vec<(SourceUrl, Result<Document>)> = stream::iter(links.iter().cloned())
            .map(|url| async move {
                let strategy = self.documents.resolve(url.as_str());
                let result = strategy.extract_one(&url).await;
                (url, result)
            })
            .buffered(self.workers)
            .collect()
            .await;

        let mut report = CrawlReport::default();
        let mut docs = Vec::with_capacity(outcomes.len());

        for (url, result) in outcomes {
            match result {
                Ok(doc) => {
                    report.record_success(&url);
                    docs.push(doc);
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Extraction failed");
                    report.record_failure(&url, &e);
                }
            }
        }

        info!(
            links = links.len(),
            documents = docs.len(),
            failures = report.failure_count(),
            "Crawled links"
        );
        (docs, report)
    }

    pub async fn crawl_profile(&self, url: &SourceUrl) -> Result<Vec<SourceUrl>> {
        let strategy = self.profiles.resolve(url.as_str());
        let links = strategy.extract_links(url).await?;
        info!(url = %url, strategy = strategy.name(), links = links.len(), "Crawled profile");
        Ok(links)
    }

    /// Crawls `links` and persists the documents. Returns the report and the
    /// number of newly stored documents.
    pub async fn crawl_links_into_store(
        &self,
        links: &[SourceUrl],
        sink: &dyn DocumentSink,
    ) -> Result<(CrawlReport, usize)> {
        let (docs, report) = self.crawl_links(links).await;
        let inserted = sink.insert_documents(&docs)?;
        Ok((report, inserted))
    }

    pub async fn crawl_profile_into_store(
        &self,
        url: &SourceUrl,
        sink: &dyn DocumentSink,
    ) -> Result<(CrawlReport, usize)> {
        let links = self.crawl_profile(url).await?;
        self.crawl_links_into_store(&links, sink).await
    }

    /// Harvests a feed and persists each batch as soon as it arrives.
    /// Persistence failures are logged and the harvest goes on.
    pub async fn harvest_feed_into_store(
        &self,
        url: &SourceUrl,
        options: HarvestOptions,
        sink: &dyn DocumentSink,
    ) -> Result<HarvestSummary> {
        let strategy = self.feeds.resolve(url.as_str());
        let mut batches = strategy.harvest(url, options).await?;
        let mut summary = HarvestSummary::default();

        while let Some(batch) = batches.next().await {
            summary.batches += 1;
            summary.links += batch.len();

            let (docs, report) = self.crawl_links(&batch).await;
            summary.report.merge(report);

            match sink.insert_documents(&docs) {
                Ok(inserted) => summary.inserted += inserted,
                Err(e) => error!(url = %url, error = %e, "Failed to store harvested documents"),
            }
        }

        info!(
            url = %url,
            batches = summary.batches,
            links = summary.links,
            inserted = summary.inserted,
            "Feed harvest complete"
        );
        Ok(summary)
    }
}
