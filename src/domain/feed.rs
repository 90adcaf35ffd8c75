use serde::{Deserialize, Serialize};

/// One feed entry as read off the page, before any parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub link: String,
    pub raw_timestamp: String,
}

impl FeedItem {
    pub fn new(link: impl Into<String>, raw_timestamp: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            raw_timestamp: raw_timestamp.into(),
        }
    }
}
