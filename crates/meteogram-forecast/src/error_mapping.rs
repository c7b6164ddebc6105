//! Conversions from forecast-crate errors into the application taxonomy.

use meteogram_core::{AppError, ForecastError, NetworkError, ReqwestErrorExt};

use crate::types::{GeocodeError, GeolocationError, ScrapeError};

impl From<ScrapeError> for AppError {
    fn from(e: ScrapeError) -> Self {
        match e {
            ScrapeError::Status(status) => AppError::Network(NetworkError::ServerError {
                status,
                message: "forecast page request failed".to_string(),
            }),
            ScrapeError::Network(e) => AppError::Network(e.into_network_error()),
        }
    }
}

impl From<GeocodeError> for AppError {
    fn from(e: GeocodeError) -> Self {
        match e {
            GeocodeError::Status(status) => AppError::Network(NetworkError::ServerError {
                status,
                message: "geocoding request failed".to_string(),
            }),
            GeocodeError::Network(e) => AppError::Network(e.into_network_error()),
            GeocodeError::InvalidBaseUrl(url) => {
                AppError::Config(meteogram_core::ConfigError::Invalid(url))
            }
        }
    }
}

impl From<GeolocationError> for AppError {
    fn from(e: GeolocationError) -> Self {
        match e {
            GeolocationError::PermissionDenied => {
                AppError::Forecast(ForecastError::GeolocationDenied)
            }
            GeolocationError::Unsupported => {
                AppError::Forecast(ForecastError::GeolocationUnsupported)
            }
            GeolocationError::Timeout => AppError::Network(NetworkError::Timeout),
            GeolocationError::Other(msg) => {
                AppError::Forecast(ForecastError::LocationNotFound(msg))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geolocation_denied_maps_to_forecast_error() {
        let err: AppError = GeolocationError::PermissionDenied.into();
        assert!(matches!(
            err,
            AppError::Forecast(ForecastError::GeolocationDenied)
        ));
        assert!(err.user_message().contains("permission denied"));
    }

    #[test]
    fn test_scrape_status_maps_to_server_error() {
        let err: AppError = ScrapeError::Status(502).into();
        assert!(matches!(
            err,
            AppError::Network(NetworkError::ServerError { status: 502, .. })
        ));
    }

    #[test]
    fn test_geocode_bad_url_is_config_error() {
        let err: AppError = GeocodeError::InvalidBaseUrl("x".into()).into();
        assert!(matches!(err, AppError::Config(_)));
    }
}
