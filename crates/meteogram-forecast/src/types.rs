use serde::{Deserialize, Serialize};

/// Decimal places used for coordinate identity and for URLs.
pub const COORD_PRECISION: i32 = 4;

/// A named place the forecast can be loaded for.
///
/// Identity is the rounded coordinate pair (see [`LocationKey`]); the name
/// can be changed by the user without turning it into a different place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
        }
    }

    /// A location named after its own coordinates, e.g. `"40.0150, -105.2705"`.
    ///
    /// Used for map clicks and whenever reverse geocoding yields nothing.
    pub fn from_coordinates(lat: f64, lon: f64) -> Self {
        Self::new(format_coordinates(lat, lon), lat, lon)
    }

    pub fn key(&self) -> LocationKey {
        LocationKey::from_coordinates(self.lat, self.lon)
    }

    /// True when both locations round to the same coordinate pair.
    pub fn same_place(&self, other: &Location) -> bool {
        self.key() == other.key()
    }
}

/// Latitude/longitude rounded to 4 decimals, stored as scaled integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocationKey {
    lat_e4: i64,
    lon_e4: i64,
}

impl LocationKey {
    pub fn from_coordinates(lat: f64, lon: f64) -> Self {
        let scale = 10f64.powi(COORD_PRECISION);
        Self {
            lat_e4: (lat * scale).round() as i64,
            lon_e4: (lon * scale).round() as i64,
        }
    }
}

pub fn format_coordinates(lat: f64, lon: f64) -> String {
    format!("{:.4}, {:.4}", lat, lon)
}

/// One forecast page covering `window_hours` starting at `hour_offset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastSegment {
    pub label: String,
    pub url: String,
    pub hour_offset: u32,
}

/// What a single forecast page yielded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ForecastResult {
    /// Absolute URL of the meteogram image
    Image { image_url: String },
    /// The forecast host answered with its own error page
    UpstreamError,
    /// Nothing extractable, or the page could not be fetched
    NotAvailable,
}

impl ForecastResult {
    pub fn image_url(&self) -> Option<&str> {
        match self {
            Self::Image { image_url } => Some(image_url),
            _ => None,
        }
    }
}

/// A segment together with its result, in the order segments are fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentOutcome {
    pub segment: ForecastSegment,
    pub result: ForecastResult,
}

/// Forecast page fetch errors
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("Forecast page returned status {0}")]
    Status(u16),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Place search errors
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("Geocoding returned status {0}")]
    Status(u16),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Invalid geocoding base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Position lookup errors
#[derive(Debug, thiserror::Error)]
pub enum GeolocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Geolocation is not supported")]
    Unsupported,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location error: {0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_ignores_differences_below_four_decimals() {
        let a = Location::new("Boulder", 40.01499, -105.27051);
        let b = Location::new("Home", 40.01501, -105.27049);
        assert!(a.same_place(&b));
    }

    #[test]
    fn test_key_distinguishes_fourth_decimal() {
        let a = Location::new("A", 40.0150, -105.2705);
        let b = Location::new("B", 40.0151, -105.2705);
        assert!(!a.same_place(&b));
    }

    #[test]
    fn test_from_coordinates_name() {
        let loc = Location::from_coordinates(40.0, -105.27051);
        assert_eq!(loc.name, "40.0000, -105.2705");
    }

    #[test]
    fn test_image_url_accessor() {
        let image = ForecastResult::Image {
            image_url: "https://example.test/a.png".to_string(),
        };
        assert_eq!(image.image_url(), Some("https://example.test/a.png"));
        assert_eq!(ForecastResult::NotAvailable.image_url(), None);
    }

    #[test]
    fn test_location_serializes_as_plain_record() {
        let json = serde_json::to_string(&Location::new("Denver", 39.7392, -104.9903)).unwrap();
        assert_eq!(json, r#"{"name":"Denver","lat":39.7392,"lon":-104.9903}"#);
    }
}
