use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::app::{GleanerError, Result};
use crate::browser::config::BrowserSettings;
use crate::browser::script::{FeedScripts, FeedSelectors};
use crate::domain::{FeedItem, SourceUrl};
use crate::harvest::FeedPage;

/// Feed page backed by a headless Chrome tab via chromiumoxide
pub struct ChromeFeedPage {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Option<Page>,
    settings: BrowserSettings,
    scripts: FeedScripts,
}

impl ChromeFeedPage {
    /// Launch a browser dedicated to one feed session
    pub async fn launch(settings: BrowserSettings, selectors: FeedSelectors) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--window-size=1920,1080")
            .request_timeout(settings.timeout());

        if !settings.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| GleanerError::Browser(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            GleanerError::Browser(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        // Spawn the browser handler
        let handler = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {
                // Handle browser events
            }
        });

        Ok(Self {
            browser,
            handler,
            page: None,
            settings,
            scripts: FeedScripts::new(selectors),
        })
    }

    fn page(&self) -> Result<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| GleanerError::Browser("Feed page not loaded".to_string()))
    }

    async fn evaluate<T: DeserializeOwned>(&self, script: String) -> Result<T> {
        self.page()?
            .evaluate(script)
            .await
            .map_err(|e| GleanerError::Browser(format!("Script execution failed: {}", e)))?
            .into_value()
            .map_err(|e| GleanerError::Browser(format!("Failed to parse result: {:?}", e)))
    }

    async fn item_count(&self) -> Result<usize> {
        self.evaluate(self.scripts.count_script()).await
    }

    /// Poll until more than `previous` items are present or the wait runs out.
    async fn wait_for_more_than(&self, previous: usize) -> bool {
        let deadline = Instant::now() + self.settings.reveal_timeout();

        loop {
            match self.item_count().await {
                Ok(count) if count > previous => return true,
                Ok(_) => {}
                Err(e) => {
                    warn!("Failed to count feed items: {}", e);
                    return false;
                }
            }
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(self.settings.poll_interval()).await;
        }
    }
}

#[async_trait]
impl FeedPage for ChromeFeedPage {
    async fn load_initial(&mut self, url: &SourceUrl) -> Result<()> {
        info!("Loading feed: {}", url);

        let page = self
            .browser
            .new_page(url.as_str())
            .await
            .map_err(|e| GleanerError::Browser(format!("Failed to create page: {}", e)))?;

        if let Some(ref ua) = self.settings.user_agent {
            page.set_user_agent(ua)
                .await
                .map_err(|e| GleanerError::Browser(format!("Failed to set user agent: {}", e)))?;
        }

        page.wait_for_navigation()
            .await
            .map_err(|e| GleanerError::Browser(format!("Navigation failed: {}", e)))?;

        self.page = Some(page);

        // Additional wait for dynamic content
        tokio::time::sleep(self.settings.wait_after_load()).await;

        if self.wait_for_more_than(0).await {
            Ok(())
        } else {
            Err(GleanerError::Browser(format!(
                "Timeout waiting for element: {}",
                self.scripts.selectors().item
            )))
        }
    }

    async fn read_visible_items(&mut self) -> Result<Vec<FeedItem>> {
        self.evaluate(self.scripts.read_items_script()).await
    }

    async fn reveal_more(&mut self) -> bool {
        let previous = match self.item_count().await {
            Ok(count) => count,
            Err(e) => {
                warn!("Load more failed: {}", e);
                return false;
            }
        };

        match self.evaluate::<bool>(self.scripts.reveal_script()).await {
            Ok(true) => debug!("Clicked: #{}", self.scripts.selectors().load_more_id),
            Ok(false) => return false,
            Err(e) => {
                warn!("Load more failed: {}", e);
                return false;
            }
        }

        let grew = self.wait_for_more_than(previous).await;
        if !grew {
            warn!("Load more timed out after {:?}", self.settings.reveal_timeout());
        }
        grew
    }

    async fn release(&mut self) {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                debug!("Failed to close page: {}", e);
            }
        }
        if let Err(e) = self.browser.close().await {
            debug!("Failed to close browser: {}", e);
        }
        self.handler.abort();
    }
}
