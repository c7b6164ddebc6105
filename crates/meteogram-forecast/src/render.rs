//! Rendering boundary.
//!
//! The pipeline pushes results into a `RenderAdapter` as soon as each segment
//! finishes, so a display can fill in progressively.

use crate::types::{Location, SegmentOutcome};

pub trait RenderAdapter {
    /// A new load started for `location`; clear anything previously shown.
    fn begin(&mut self, location: &Location);

    /// One segment finished (in fetch order).
    fn segment(&mut self, outcome: &SegmentOutcome);

    /// All segments finished.
    fn finish(&mut self) {}
}

/// Keeps everything it is given. Useful for headless callers.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub location: Option<Location>,
    pub outcomes: Vec<SegmentOutcome>,
    pub begin_calls: usize,
    pub finished: bool,
}

impl RenderAdapter for RecordingRenderer {
    fn begin(&mut self, location: &Location) {
        self.begin_calls += 1;
        self.location = Some(location.clone());
        self.outcomes.clear();
        self.finished = false;
    }

    fn segment(&mut self, outcome: &SegmentOutcome) {
        self.outcomes.push(outcome.clone());
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}
