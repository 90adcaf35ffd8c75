//! Per-source extraction strategies.
//!
//! Three capabilities, each an object-safe async trait so routers can hand
//! out boxed instances:
//!
//! - [`DocumentStrategy`] turns one URL into one [`Document`]
//! - [`ProfileStrategy`] lists the post links on a profile page
//! - [`FeedStrategy`] harvests a paginated feed as a stream of link batches

mod article;
mod html;
mod repository;
mod tasnim;
mod unsupported;
mod virgool;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{Document, SourceUrl};
use crate::harvest::{HarvestOptions, LinkBatchStream};

pub use article::GenericArticleStrategy;
pub use repository::{collect_files, RepositoryStrategy, DEFAULT_IGNORED_SUFFIXES};
pub use tasnim::{TasnimArticleStrategy, TasnimFeedStrategy};
pub use unsupported::{UnsupportedFeedStrategy, UnsupportedProfileStrategy};
pub use virgool::VirgoolProfileStrategy;

#[async_trait]
pub trait DocumentStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn extract_one(&self, url: &SourceUrl) -> Result<Document>;

    /// Extracts every URL, keeping input order. The default runs them one
    /// after another; strategies that can batch override it.
    ///
    /// For callers that already hold links for this strategy. The pipeline
    /// routes each link on its own and calls [`extract_one`](Self::extract_one).
    async fn extract_many(&self, urls: &[SourceUrl]) -> Vec<(SourceUrl, Result<Document>)> {
        let mut results = Vec::with_capacity(urls.len());
        for url in urls {
            results.push((url.clone(), self.extract_one(url).await));
        }
        results
    }
}

#[async_trait]
pub trait ProfileStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn extract_links(&self, url: &SourceUrl) -> Result<Vec<SourceUrl>>;
}

#[async_trait]
pub trait FeedStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn harvest(&self, url: &SourceUrl, options: HarvestOptions) -> Result<LinkBatchStream>;
}
