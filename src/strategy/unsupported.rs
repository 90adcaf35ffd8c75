use async_trait::async_trait;

use crate::app::{GleanerError, Result};
use crate::domain::SourceUrl;
use crate::harvest::{HarvestOptions, LinkBatchStream};
use crate::strategy::{FeedStrategy, ProfileStrategy};

/// Default profile strategy for sites without a profile crawler.
#[derive(Debug, Default)]
pub struct UnsupportedProfileStrategy;

#[async_trait]
impl ProfileStrategy for UnsupportedProfileStrategy {
    fn name(&self) -> &'static str {
        "unsupported-profile"
    }

    async fn extract_links(&self, url: &SourceUrl) -> Result<Vec<SourceUrl>> {
        Err(GleanerError::Unsupported(format!(
            "no profile crawler for {}",
            url.domain()
        )))
    }
}

/// Default feed strategy for sites without a feed crawler.
#[derive(Debug, Default)]
pub struct UnsupportedFeedStrategy;

#[async_trait]
impl FeedStrategy for UnsupportedFeedStrategy {
    fn name(&self) -> &'static str {
        "unsupported-feed"
    }

    async fn harvest(&self, url: &SourceUrl, _options: HarvestOptions) -> Result<LinkBatchStream> {
        Err(GleanerError::Unsupported(format!(
            "no feed crawler for {}",
            url.domain()
        )))
    }
}
