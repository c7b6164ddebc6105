//! Current-position lookup.
//!
//! Positioning is platform-specific, so it sits behind a trait. The resolved
//! coordinates are named through reverse geocoding.

use async_trait::async_trait;

use crate::geocode::GeocodingClient;
use crate::types::{GeolocationError, Location};

#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    /// Current `(latitude, longitude)`.
    async fn current_position(&self) -> Result<(f64, f64), GeolocationError>;
}

/// Provider for platforms with no positioning source.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedGeolocation;

#[async_trait]
impl GeolocationProvider for UnsupportedGeolocation {
    async fn current_position(&self) -> Result<(f64, f64), GeolocationError> {
        Err(GeolocationError::Unsupported)
    }
}

/// A provider that always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocation {
    pub lat: f64,
    pub lon: f64,
}

#[async_trait]
impl GeolocationProvider for FixedGeolocation {
    async fn current_position(&self) -> Result<(f64, f64), GeolocationError> {
        Ok((self.lat, self.lon))
    }
}

/// Locate the user and name the spot.
///
/// Positioning errors propagate; naming never fails (see [`GeocodingClient::reverse`]).
pub async fn locate_current<P>(
    provider: &P,
    geocoder: &GeocodingClient,
) -> Result<Location, GeolocationError>
where
    P: GeolocationProvider + ?Sized,
{
    let (lat, lon) = provider.current_position().await?;
    tracing::info!("Got location: {}, {}", lat, lon);
    Ok(geocoder.reverse(lat, lon).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use meteogram_core::GeocodingConfig;

    #[tokio::test]
    async fn test_unsupported_provider_propagates() {
        let geocoder = GeocodingClient::new(&GeocodingConfig::default()).unwrap();
        let result = locate_current(&UnsupportedGeolocation, &geocoder).await;
        assert!(matches!(result, Err(GeolocationError::Unsupported)));
    }

    #[tokio::test]
    async fn test_fixed_provider_reports_position() {
        let provider = FixedGeolocation {
            lat: 40.0,
            lon: -105.0,
        };
        assert_eq!(provider.current_position().await.unwrap(), (40.0, -105.0));
    }
}
