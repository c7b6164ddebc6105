//! Place search and reverse geocoding via Nominatim (OpenStreetMap).
//! Free, no API key required; a User-Agent is mandatory.

use meteogram_core::GeocodingConfig;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

use crate::types::{GeocodeError, Location};

#[derive(Debug, Deserialize)]
struct SearchHit {
    display_name: String,
    lat: String,
    lon: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
}

/// What the search results panel should show.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(Vec<Location>),
    NoResults,
    Failed,
}

impl SearchOutcome {
    pub fn from_result(result: Result<Vec<Location>, GeocodeError>) -> Self {
        match result {
            Ok(hits) if hits.is_empty() => Self::NoResults,
            Ok(hits) => Self::Found(hits),
            Err(e) => {
                tracing::warn!("Search error: {}", e);
                Self::Failed
            }
        }
    }

    /// Inline message for outcomes without results.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Found(_) => None,
            Self::NoResults => Some("No results found"),
            Self::Failed => Some("Error searching location"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: Client,
    base_url: String,
    result_limit: u32,
}

impl GeocodingClient {
    pub fn new(config: &GeocodingConfig) -> Result<Self, GeocodeError> {
        url::Url::parse(&config.base_url)
            .map_err(|e| GeocodeError::InvalidBaseUrl(format!("{}: {}", config.base_url, e)))?;

        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if config.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            result_limit: config.result_limit,
        })
    }

    /// Search for places matching `query`.
    ///
    /// Hits whose coordinates do not parse are skipped.
    #[instrument(skip(self), level = "info")]
    pub async fn search(&self, query: &str) -> Result<Vec<Location>, GeocodeError> {
        let url = format!("{}/search", self.base_url);
        let limit = self.result_limit.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("format", "json"),
                ("q", query),
                ("limit", limit.as_str()),
                ("addressdetails", "1"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let hits: Vec<SearchHit> = response.json().await?;
        let locations: Vec<Location> = hits
            .into_iter()
            .filter_map(|hit| match (hit.lat.parse::<f64>(), hit.lon.parse::<f64>()) {
                (Ok(lat), Ok(lon)) => Some(Location::new(hit.display_name, lat, lon)),
                _ => {
                    tracing::debug!("Skipping hit with bad coordinates: {}", hit.display_name);
                    None
                }
            })
            .collect();

        tracing::info!("Search returned {} locations", locations.len());
        Ok(locations)
    }

    /// Resolve coordinates to a named location.
    ///
    /// Never fails: without a usable `display_name` the location is named
    /// after its coordinates.
    pub async fn reverse(&self, lat: f64, lon: f64) -> Location {
        match self.reverse_name(lat, lon).await {
            Ok(Some(name)) => {
                tracing::info!("Reverse geocoded to: {}", name);
                Location::new(name, lat, lon)
            }
            Ok(None) => Location::from_coordinates(lat, lon),
            Err(e) => {
                tracing::warn!("Reverse geocoding error: {}", e);
                Location::from_coordinates(lat, lon)
            }
        }
    }

    #[instrument(skip(self), level = "debug")]
    async fn reverse_name(&self, lat: f64, lon: f64) -> Result<Option<String>, GeocodeError> {
        let url = format!("{}/reverse", self.base_url);
        let (lat, lon) = (lat.to_string(), lon.to_string());

        let response = self
            .client
            .get(&url)
            .query(&[("format", "json"), ("lat", lat.as_str()), ("lon", lon.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let body: ReverseResponse = response.json().await?;
        Ok(body.display_name.filter(|name| !name.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_outcome_messages() {
        assert_eq!(
            SearchOutcome::from_result(Ok(Vec::new())).message(),
            Some("No results found")
        );
        assert_eq!(
            SearchOutcome::from_result(Err(GeocodeError::Status(500))).message(),
            Some("Error searching location")
        );
        let found = SearchOutcome::from_result(Ok(vec![Location::new("x", 1.0, 2.0)]));
        assert!(found.message().is_none());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let config = GeocodingConfig {
            base_url: "nominatim".to_string(),
            ..GeocodingConfig::default()
        };
        assert!(matches!(
            GeocodingClient::new(&config),
            Err(GeocodeError::InvalidBaseUrl(_))
        ));
    }

    #[tokio::test]
    #[ignore] // Run with: cargo test -p meteogram-forecast -- --ignored
    async fn test_search_boulder_live() {
        let client = GeocodingClient::new(&GeocodingConfig::default()).unwrap();
        let hits = client.search("Boulder, Colorado").await.unwrap();
        assert!(!hits.is_empty());
        assert!(hits[0].name.to_lowercase().contains("boulder"));
    }
}
