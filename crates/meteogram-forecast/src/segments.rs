//! Segment planning: which forecast pages to fetch for a location, in order.

use meteogram_core::ForecastConfig;

use crate::types::{ForecastSegment, Location};
use crate::url_builder::forecast_url;

/// Ordered window offsets plus the width of one window.
///
/// The default `[0, 48, 96, 107]` with 48-hour windows covers hours 0..155
/// without gaps. The host rejects offsets past 107, so the last window
/// overlaps the third instead of starting at 144.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentPlan {
    hour_offsets: Vec<u32>,
    window_hours: u32,
}

impl SegmentPlan {
    pub fn new(hour_offsets: Vec<u32>, window_hours: u32) -> Self {
        Self {
            hour_offsets,
            window_hours,
        }
    }

    pub fn from_config(config: &ForecastConfig) -> Self {
        Self::new(config.hour_offsets.clone(), config.window_hours)
    }

    pub fn hour_offsets(&self) -> &[u32] {
        &self.hour_offsets
    }

    pub fn window_hours(&self) -> u32 {
        self.window_hours
    }

    /// Label for the window starting at `hour_offset`, e.g. `"107-155 hours"`.
    pub fn label(&self, hour_offset: u32) -> String {
        format!(
            "{}-{} hours",
            hour_offset,
            hour_offset.saturating_add(self.window_hours)
        )
    }

    /// One segment per configured offset, in configured order.
    pub fn plan(&self, origin: &str, location: &Location) -> Vec<ForecastSegment> {
        self.hour_offsets
            .iter()
            .map(|&hour_offset| ForecastSegment {
                label: self.label(hour_offset),
                url: forecast_url(origin, location.lat, location.lon, hour_offset),
                hour_offset,
            })
            .collect()
    }
}

impl Default for SegmentPlan {
    fn default() -> Self {
        Self::from_config(&ForecastConfig::default())
    }
}
