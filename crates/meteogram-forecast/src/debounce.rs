//! Trailing-edge debouncing for typed search queries.
//!
//! Each keystroke calls [`SearchDebouncer::submit`]. Only the last query in a
//! burst survives the delay; earlier calls resolve to `None`.

use meteogram_core::GeocodingConfig;
use parking_lot::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub struct SearchDebouncer {
    delay: Duration,
    min_query_len: usize,
    pending: Mutex<Option<CancellationToken>>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration, min_query_len: usize) -> Self {
        Self {
            delay,
            min_query_len,
            pending: Mutex::new(None),
        }
    }

    pub fn from_config(config: &GeocodingConfig) -> Self {
        Self::new(Duration::from_millis(config.debounce_ms), config.min_query_len)
    }

    /// Wait out the delay for `raw_query`.
    ///
    /// Returns the trimmed query if no newer submission arrived in the
    /// meantime. Queries shorter than the minimum cancel whatever is pending
    /// and return `None` at once.
    pub async fn submit(&self, raw_query: &str) -> Option<String> {
        let query = raw_query.trim();

        if query.chars().count() < self.min_query_len {
            self.cancel();
            return None;
        }

        let token = CancellationToken::new();
        if let Some(previous) = self.pending.lock().replace(token.clone()) {
            previous.cancel();
        }

        tokio::select! {
            _ = token.cancelled() => {
                tracing::trace!("Search for {:?} superseded", query);
                None
            }
            _ = tokio::time::sleep(self.delay) => {
                let mut pending = self.pending.lock();
                if token.is_cancelled() {
                    return None;
                }
                *pending = None;
                Some(query.to_string())
            }
        }
    }

    /// Drop any pending search.
    pub fn cancel(&self) {
        if let Some(previous) = self.pending.lock().take() {
            previous.cancel();
        }
    }
}
