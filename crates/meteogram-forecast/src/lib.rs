//! Forecast lookup for meteogram
//!
//! Builds forecast page URLs for a location, scrapes the meteogram image out
//! of each page in sequence, and keeps a short history of recent locations.

pub mod debounce;
pub mod error_mapping;
pub mod geocode;
pub mod history;
pub mod load_state;
pub mod location;
pub mod pipeline;
pub mod render;
pub mod scraper;
pub mod segments;
pub mod share;
pub mod storage;
pub mod types;
pub mod url_builder;

pub use types::*;
pub use debounce::SearchDebouncer;
pub use geocode::{GeocodingClient, SearchOutcome};
pub use history::HistoryStore;
pub use load_state::LoadState;
pub use location::{locate_current, GeolocationProvider, UnsupportedGeolocation};
pub use pipeline::{ForecastPipeline, LoadOutcome};
pub use render::{RecordingRenderer, RenderAdapter};
pub use scraper::{HttpPageScraper, PageScraper};
pub use segments::SegmentPlan;
pub use storage::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
pub use url_builder::forecast_url;
