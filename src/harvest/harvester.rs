use chrono::NaiveDateTime;
use futures::stream::{self, BoxStream, StreamExt};
use tracing::{debug, info, warn};

use crate::domain::SourceUrl;
use crate::harvest::page::{FeedPage, PageGuard};
use crate::harvest::state::HarvestState;
use crate::normalizer::{CanonicalTimestamp, Normalizer};

/// A lazy sequence of link batches from one feed session.
pub type LinkBatchStream = BoxStream<'static, Vec<SourceUrl>>;

/// Caller-supplied bounds for one harvest.
#[derive(Debug, Clone)]
pub struct HarvestOptions {
    /// Items older than this stop the harvest.
    pub min_date: CanonicalTimestamp,
    /// Maximum number of "load more" interactions.
    pub max_reveals: u32,
    /// Reference time for relative timestamps; the source's current wall
    /// clock is used when unset.
    pub reference: Option<NaiveDateTime>,
}

impl HarvestOptions {
    pub fn new(min_date: CanonicalTimestamp, max_reveals: u32) -> Self {
        Self {
            min_date,
            max_reveals,
            reference: None,
        }
    }

    pub fn with_reference(mut self, reference: NaiveDateTime) -> Self {
        self.reference = Some(reference);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    BoundaryCrossed,
    RevealBudgetExhausted,
    NoFurtherContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarvestPhase {
    Initialized,
    Reading,
    Deciding,
    Revealing,
    Stopped(StopReason),
}

/// Walks a paginated feed backwards in time, one reveal cycle at a time.
pub struct FeedHarvester {
    page: PageGuard,
    url: SourceUrl,
    normalizer: Normalizer,
    options: HarvestOptions,
    state: HarvestState,
    phase: HarvestPhase,
    boundary_crossed: bool,
}

impl FeedHarvester {
    pub fn new(
        page: Box<dyn FeedPage>,
        url: SourceUrl,
        normalizer: Normalizer,
        options: HarvestOptions,
    ) -> Self {
        Self {
            page: PageGuard::new(page),
            url,
            normalizer,
            options,
            state: HarvestState::new(),
            phase: HarvestPhase::Initialized,
            boundary_crossed: false,
        }
    }

    pub fn phase(&self) -> HarvestPhase {
        self.phase
    }

    pub fn state(&self) -> &HarvestState {
        &self.state
    }

    /// Runs cycles until a non-empty batch is available or the harvest
    /// stops. Returns `None` once stopped.
    pub async fn next_batch(&mut self) -> Option<Vec<SourceUrl>> {
        loop {
            match self.phase {
                HarvestPhase::Stopped(_) => return None,
                HarvestPhase::Initialized => {
                    let page = self.page.get()?;
                    if let Err(e) = page.load_initial(&self.url).await {
                        warn!(url = %self.url, error = %e, "Initial feed load incomplete; reading what is visible");
                    }
                    self.phase = HarvestPhase::Reading;
                }
                HarvestPhase::Reading => {
                    let page = self.page.get()?;
                    let visible = match page.read_visible_items().await {
                        Ok(items) => items,
                        Err(e) => {
                            warn!(url = %self.url, error = %e, "Failed to read feed items");
                            self.stop(StopReason::NoFurtherContent).await;
                            continue;
                        }
                    };

                    let reference = self
                        .options
                        .reference
                        .unwrap_or_else(|| self.normalizer.now());
                    let outcome = self.state.absorb(
                        &visible,
                        &self.options.min_date,
                        &self.normalizer,
                        reference,
                    );

                    info!(
                        new = outcome.new_items,
                        visible = visible.len(),
                        kept = outcome.batch.len(),
                        skipped = outcome.skipped,
                        "Processed feed cycle"
                    );

                    self.boundary_crossed = outcome.boundary_crossed;
                    self.phase = HarvestPhase::Deciding;

                    if !outcome.batch.is_empty() {
                        return Some(outcome.batch);
                    }
                }
                HarvestPhase::Deciding => {
                    if self.boundary_crossed {
                        info!(min_date = %self.options.min_date, "Found feed item older than min_date");
                        self.stop(StopReason::BoundaryCrossed).await;
                    } else if self.state.reveal_cycles() >= self.options.max_reveals {
                        info!(max_reveals = self.options.max_reveals, "Reached reveal budget");
                        self.stop(StopReason::RevealBudgetExhausted).await;
                    } else {
                        self.phase = HarvestPhase::Revealing;
                    }
                }
                HarvestPhase::Revealing => {
                    let page = self.page.get()?;
                    if page.reveal_more().await {
                        self.state.record_reveal();
                        debug!(cycle = self.state.reveal_cycles(), "Revealed more feed items");
                        self.phase = HarvestPhase::Reading;
                    } else {
                        info!("No more content to load");
                        self.stop(StopReason::NoFurtherContent).await;
                    }
                }
            }
        }
    }

    /// Consumes the harvester into a stream of batches.
    pub fn into_stream(self) -> LinkBatchStream {
        stream::unfold(self, |mut harvester| async move {
            harvester
                .next_batch()
                .await
                .map(|batch| (batch, harvester))
        })
        .boxed()
    }

    async fn stop(&mut self, reason: StopReason) {
        self.phase = HarvestPhase::Stopped(reason);
        self.page.release().await;
        info!(
            url = %self.url,
            ?reason,
            links = self.state.seen_count(),
            reveals = self.state.reveal_cycles(),
            "Feed harvest stopped"
        );
    }
}
