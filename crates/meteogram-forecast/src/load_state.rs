//! Forecast load state machine.
//!
//! Ensures only one forecast load runs at a time per pipeline. A load
//! requested while another is running is dropped, not queued.

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
}

impl LoadState {
    /// True if a new load can be started.
    pub fn can_start_load(self) -> bool {
        matches!(self, LoadState::Idle)
    }

    pub fn is_loading(self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn on_load_started(self) -> Self {
        LoadState::Loading
    }

    pub fn on_load_done(self) -> Self {
        LoadState::Idle
    }
}

/// Holds the pipeline in `Loading` until dropped.
///
/// Dropping covers normal completion, a panic in a scraper or renderer, and
/// the load future being dropped mid-flight.
pub(crate) struct LoadingGuard<'a> {
    state: &'a Mutex<LoadState>,
}

impl<'a> LoadingGuard<'a> {
    /// Move `Idle -> Loading`, or return `None` if a load is already running.
    pub(crate) fn acquire(state: &'a Mutex<LoadState>) -> Option<Self> {
        let mut current = state.lock();
        if !current.can_start_load() {
            return None;
        }
        *current = current.on_load_started();
        Some(Self { state })
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut current = self.state.lock();
        *current = current.on_load_done();
    }
}
