//! Forecast page scraping.
//!
//! The forecast host has no image API: the meteogram URL only appears inside
//! the HTML of the graphical forecast page. Extraction is isolated here so the
//! orchestrator never depends on page markup.

use async_trait::async_trait;
use meteogram_core::ForecastConfig;
use reqwest::Client;
use std::time::Duration;
use tracing::instrument;

use crate::types::{ForecastResult, ScrapeError};

/// Path prefix of the embedded meteogram image.
const IMAGE_PATH_PREFIX: &str = "meteograms/Plotter.php?";

/// Fetches one forecast page and classifies what it contains.
#[async_trait]
pub trait PageScraper: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<ForecastResult, ScrapeError>;
}

/// Scraper backed by a real HTTP client.
#[derive(Debug, Clone)]
pub struct HttpPageScraper {
    client: Client,
    origin: String,
    error_marker: String,
}

impl HttpPageScraper {
    pub fn new(config: &ForecastConfig) -> Result<Self, ScrapeError> {
        let mut builder = Client::builder();
        if config.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_secs));
        }

        Ok(Self {
            client: builder.build()?,
            origin: config.origin.trim_end_matches('/').to_string(),
            error_marker: config.error_marker.clone(),
        })
    }

    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl PageScraper for HttpPageScraper {
    #[instrument(skip(self), level = "debug")]
    async fn scrape(&self, url: &str) -> Result<ForecastResult, ScrapeError> {
        let html = self.fetch_page(url).await?;
        Ok(classify_page(&html, &self.origin, &self.error_marker))
    }
}

/// Classify a fetched page.
///
/// The error marker wins over an embedded image: the host sometimes renders
/// a stale image link on its error page.
pub fn classify_page(html: &str, origin: &str, error_marker: &str) -> ForecastResult {
    if html.contains(error_marker) {
        return ForecastResult::UpstreamError;
    }

    match extract_image_path(html) {
        Some(path) => ForecastResult::Image {
            image_url: format!("{}/{}", origin.trim_end_matches('/'), path),
        },
        None => ForecastResult::NotAvailable,
    }
}

/// Find `meteograms/Plotter.php?<query>` and return it up to the next `"`,
/// or to the end of the page when no quote follows.
///
/// A prefix with an empty query is skipped.
pub fn extract_image_path(html: &str) -> Option<&str> {
    let mut search_from = 0;

    while let Some(found) = html[search_from..].find(IMAGE_PATH_PREFIX) {
        let start = search_from + found;
        let query_start = start + IMAGE_PATH_PREFIX.len();
        let query_len = html[query_start..]
            .find('"')
            .unwrap_or(html.len() - query_start);

        if query_len > 0 {
            return Some(&html[start..query_start + query_len]);
        }
        search_from = query_start;
    }

    None
}
