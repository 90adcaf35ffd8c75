//! Headless-browser feed pages.
//!
//! Feeds that only grow through a "load more" button cannot be fetched over
//! plain HTTP. [`ChromeFeedPage`] drives a Chrome tab through chromiumoxide
//! and exposes it as a [`FeedPage`](crate::harvest::FeedPage):
//!
//! ```text
//! load_initial → read_visible_items → reveal_more → read_visible_items → … → release
//! ```

mod config;
mod feed_page;
mod script;

pub use config::BrowserSettings;
pub use feed_page::ChromeFeedPage;
pub use script::{FeedScripts, FeedSelectors};
