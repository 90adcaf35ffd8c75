use async_trait::async_trait;
use tokio::runtime::Handle;
use tracing::warn;

use crate::app::Result;
use crate::domain::{FeedItem, SourceUrl};

/// A live, paginated feed view (typically a browser tab).
///
/// Implementations are single-view and not safe for concurrent interaction;
/// the harvester calls them strictly in sequence.
#[async_trait]
pub trait FeedPage: Send {
    /// Navigates to `url` and waits until the first feed item is present.
    async fn load_initial(&mut self, url: &SourceUrl) -> Result<()>;

    /// Every feed item currently visible, in page order.
    async fn read_visible_items(&mut self) -> Result<Vec<FeedItem>>;

    /// Triggers "load more" and reports whether the visible item count grew
    /// within the page's wait timeout.
    async fn reveal_more(&mut self) -> bool;

    /// Frees the underlying resources. Called exactly once.
    async fn release(&mut self);
}

/// Owns a [`FeedPage`] and guarantees it is released, even when the owner
/// is dropped mid-harvest.
pub(crate) struct PageGuard {
    page: Option<Box<dyn FeedPage>>,
}

impl PageGuard {
    pub(crate) fn new(page: Box<dyn FeedPage>) -> Self {
        Self { page: Some(page) }
    }

    pub(crate) fn get(&mut self) -> Option<&mut (dyn FeedPage + 'static)> {
        self.page.as_deref_mut()
    }

    pub(crate) async fn release(&mut self) {
        if let Some(mut page) = self.page.take() {
            page.release().await;
        }
    }
}

impl Drop for PageGuard {
    fn drop(&mut self) {
        let Some(mut page) = self.page.take() else {
            return;
        };
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    page.release().await;
                });
            }
            Err(_) => warn!("Feed page dropped outside a runtime; release skipped"),
        }
    }
}
