use std::collections::HashSet;

use chrono::NaiveDateTime;
use tracing::warn;

use crate::domain::{FeedItem, SourceUrl};
use crate::normalizer::{CanonicalTimestamp, Normalizer};

/// Mutable bookkeeping for one harvest session.
#[derive(Debug, Default)]
pub struct HarvestState {
    seen_links: HashSet<SourceUrl>,
    revealed_count: usize,
    reveal_cycles: u32,
}

/// What one read of the feed produced.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CycleOutcome {
    /// Unseen, recent-enough links in discovery order.
    pub batch: Vec<SourceUrl>,
    /// An item older than the threshold was observed this cycle.
    pub boundary_crossed: bool,
    /// Items read for the first time this cycle.
    pub new_items: usize,
    /// New items dropped because their link or timestamp did not parse.
    pub skipped: usize,
}

impl HarvestState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed_count
    }

    pub fn reveal_cycles(&self) -> u32 {
        self.reveal_cycles
    }

    pub fn seen_count(&self) -> usize {
        self.seen_links.len()
    }

    pub fn has_seen(&self, link: &SourceUrl) -> bool {
        self.seen_links.contains(link)
    }

    pub(crate) fn record_reveal(&mut self) {
        self.reveal_cycles += 1;
    }

    /// Processes the not-yet-read suffix of `visible`.
    pub fn absorb(
        &mut self,
        visible: &[FeedItem],
        min_date: &CanonicalTimestamp,
        normalizer: &Normalizer,
        reference: NaiveDateTime,
    ) -> CycleOutcome {
        let fresh = visible.get(self.revealed_count..).unwrap_or(&[]);
        let mut outcome = CycleOutcome {
            new_items: fresh.len(),
            ..Default::default()
        };

        for item in fresh {
            let stamp = match normalizer.normalize(&item.raw_timestamp, reference) {
                Ok(stamp) => stamp,
                Err(e) => {
                    warn!(raw = %item.raw_timestamp, error = %e, "Failed to parse feed timestamp");
                    outcome.skipped += 1;
                    continue;
                }
            };

            if stamp < *min_date {
                outcome.boundary_crossed = true;
                continue;
            }

            let link = match SourceUrl::parse(&item.link) {
                Ok(link) => link,
                Err(e) => {
                    warn!(link = %item.link, error = %e, "Skipping feed item with invalid link");
                    outcome.skipped += 1;
                    continue;
                }
            };

            if self.seen_links.insert(link.clone()) {
                outcome.batch.push(link);
            }
        }

        self.revealed_count = self.revealed_count.max(visible.len());
        outcome
    }
}
