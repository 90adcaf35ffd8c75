//! Incremental harvesting of paginated feeds.
//!
//! ```text
//! Initialized → Reading → Deciding → (Revealing → Reading | Stopped)
//! ```
//!
//! Each cycle reads every visible item, processes only the ones not read
//! before, and yields the unseen links whose timestamp is at or after the
//! caller's `min_date`. The harvest stops when an older item shows up, when
//! the reveal budget is spent, or when "load more" stops producing items.
//!
//! ```rust,ignore
//! let harvester = FeedHarvester::new(page, url, Normalizer::new(), options);
//! let mut batches = harvester.into_stream();
//! while let Some(links) = batches.next().await {
//!     pipeline.crawl_links(&links).await;
//! }
//! ```

mod harvester;
mod page;
mod state;

pub use harvester::{FeedHarvester, HarvestOptions, HarvestPhase, LinkBatchStream, StopReason};
pub use page::FeedPage;
pub use state::{CycleOutcome, HarvestState};
