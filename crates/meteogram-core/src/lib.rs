pub mod config;
pub mod error;

pub use config::{Config, ForecastConfig, GeocodingConfig, HistoryConfig, ValidationResult};
pub use error::{
    AppError, ConfigError, ForecastError, NetworkError, ReqwestErrorExt, RusqliteErrorExt,
    StorageError,
};

use anyhow::Result;

/// Initialize logging for the application.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("meteogram core initialized");
    Ok(())
}
