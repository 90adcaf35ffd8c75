pub mod http_fetcher;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::app::Result;

pub use http_fetcher::HttpFetcher;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Request timeout in seconds (default: 10)
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("gleaner/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Retrieves the HTML of a page.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}
