//! Sequential forecast loading.
//!
//! A load records the location, plans its segments and scrapes them one
//! after another, handing each result to the renderer as it arrives.
//! Segment failures degrade to `NotAvailable`; they never abort the load.

use meteogram_core::ForecastConfig;
use parking_lot::Mutex;

use crate::history::HistoryStore;
use crate::load_state::{LoadState, LoadingGuard};
use crate::render::RenderAdapter;
use crate::scraper::PageScraper;
use crate::segments::SegmentPlan;
use crate::storage::KeyValueStore;
use crate::types::{ForecastResult, Location, SegmentOutcome};

/// Result of a `load_forecast` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Every segment was attempted; results are in fetch order.
    Completed(Vec<SegmentOutcome>),
    /// Another load was running, so this request was dropped.
    AlreadyLoading,
}

/// Mutable per-session state: the location on display and recent locations.
///
/// History mutations write through to the `KeyValueStore` synchronously, so
/// with `SqliteKeyValueStore` they block the calling task while the session
/// lock is held. Keep the lock scoped to a single mutation and never hold it
/// across an `.await`.
pub struct SessionState<K> {
    pub current: Option<Location>,
    pub history: HistoryStore<K>,
}

pub struct ForecastPipeline<S, K> {
    origin: String,
    plan: SegmentPlan,
    scraper: S,
    session: Mutex<SessionState<K>>,
    state: Mutex<LoadState>,
}

impl<S: PageScraper, K: KeyValueStore> ForecastPipeline<S, K> {
    pub fn new(
        origin: impl Into<String>,
        plan: SegmentPlan,
        scraper: S,
        history: HistoryStore<K>,
    ) -> Self {
        Self {
            origin: origin.into(),
            plan,
            scraper,
            session: Mutex::new(SessionState {
                current: None,
                history,
            }),
            state: Mutex::new(LoadState::Idle),
        }
    }

    pub fn from_config(config: &ForecastConfig, scraper: S, history: HistoryStore<K>) -> Self {
        Self::new(
            config.origin.clone(),
            SegmentPlan::from_config(config),
            scraper,
            history,
        )
    }

    pub fn load_state(&self) -> LoadState {
        *self.state.lock()
    }

    pub fn is_loading(&self) -> bool {
        self.load_state().is_loading()
    }

    pub fn plan(&self) -> &SegmentPlan {
        &self.plan
    }

    pub fn current_location(&self) -> Option<Location> {
        self.session.lock().current.clone()
    }

    /// Snapshot of recent locations, most recent first.
    pub fn history(&self) -> Vec<Location> {
        self.session.lock().history.entries().to_vec()
    }

    /// Load the forecast for `location`, rendering each segment as it completes.
    ///
    /// Dropped with [`LoadOutcome::AlreadyLoading`] if a load is in progress;
    /// nothing is recorded or rendered in that case.
    pub async fn load_forecast<R>(&self, location: Location, renderer: &mut R) -> LoadOutcome
    where
        R: RenderAdapter + ?Sized,
    {
        let Some(_guard) = LoadingGuard::acquire(&self.state) else {
            tracing::info!("Forecast load already running, ignoring {}", location.name);
            return LoadOutcome::AlreadyLoading;
        };

        tracing::info!(
            "Loading forecast for {} ({:.4}, {:.4})",
            location.name,
            location.lat,
            location.lon
        );

        {
            let mut session = self.session.lock();
            session.current = Some(location.clone());
            session.history.add(&location);
        }
        renderer.begin(&location);

        let segments = self.plan.plan(&self.origin, &location);
        let mut outcomes = Vec::with_capacity(segments.len());

        for segment in segments {
            tracing::debug!("Fetching segment {}: {}", segment.label, segment.url);

            let result = match self.scraper.scrape(&segment.url).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!("Segment {} failed: {}", segment.label, e);
                    ForecastResult::NotAvailable
                }
            };

            if result == ForecastResult::UpstreamError {
                tracing::warn!("Forecast host reported an error for {}", segment.label);
            }

            let outcome = SegmentOutcome { segment, result };
            renderer.segment(&outcome);
            outcomes.push(outcome);
        }

        renderer.finish();
        tracing::info!("Finished forecast for {}", location.name);

        LoadOutcome::Completed(outcomes)
    }

    /// Rename a history entry; the displayed location follows if it is the same place.
    pub fn rename_history(&self, index: usize, new_name: &str) -> Option<Location> {
        let mut session = self.session.lock();
        let renamed = session.history.rename(index, new_name)?.clone();

        if let Some(current) = session.current.as_mut() {
            if current.same_place(&renamed) {
                current.name = renamed.name.clone();
            }
        }
        Some(renamed)
    }

    pub fn remove_history(&self, index: usize) -> Option<Location> {
        self.session.lock().history.remove(index)
    }
}
