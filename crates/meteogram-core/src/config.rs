use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Forecast page settings
    #[serde(default)]
    pub forecast: ForecastConfig,

    /// Place search settings
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Recent locations settings
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Forecast page scraping and segment policy.
///
/// `hour_offsets` is hand-tuned: the forecast host refuses `AheadHour`
/// values above 107, so the last window starts there and ends at hour 155.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Origin of the forecast host (no trailing path)
    pub origin: String,

    /// Window start offsets in hours, fetched in this order
    pub hour_offsets: Vec<u32>,

    /// Hours covered by a single forecast page
    pub window_hours: u32,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Text the forecast host puts on its error page
    pub error_marker: String,
}

pub const DEFAULT_FORECAST_ORIGIN: &str = "https://forecast.weather.gov";
pub const DEFAULT_HOUR_OFFSETS: [u32; 4] = [0, 48, 96, 107];
pub const DEFAULT_WINDOW_HOURS: u32 = 48;
pub const DEFAULT_ERROR_MARKER: &str = "An error occurred while processing your request";

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_FORECAST_ORIGIN.to_string(),
            hour_offsets: DEFAULT_HOUR_OFFSETS.to_vec(),
            window_hours: DEFAULT_WINDOW_HOURS,
            request_timeout_secs: 20,
            error_marker: DEFAULT_ERROR_MARKER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    /// Nominatim-compatible endpoint
    pub base_url: String,

    /// Maximum search results requested
    pub result_limit: u32,

    /// User-Agent sent with every geocoding request
    pub user_agent: String,

    /// Trailing-edge delay before a typed query is searched
    pub debounce_ms: u64,

    /// Queries shorter than this are never searched
    pub min_query_len: usize,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            result_limit: 5,
            user_agent: "WeatherForecastApp/1.0".to_string(),
            debounce_ms: 300,
            min_query_len: 3,
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of recent locations kept
    #[serde(default = "default_max_items")]
    pub max_items: usize,

    /// Key of the persisted history slot
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// SQLite file (relative paths resolve against `config_dir`)
    #[serde(default = "default_database_file")]
    pub database_file: String,
}

fn default_max_items() -> usize {
    10
}

fn default_storage_key() -> String {
    "weatherSearchHistory".to_string()
}

fn default_database_file() -> String {
    "history.db".to_string()
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_items: default_max_items(),
            storage_key: default_storage_key(),
            database_file: default_database_file(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("meteogram");

        Self {
            config_dir,
            forecast: ForecastConfig::default(),
            geocoding: GeocodingConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, creating a default file if missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated(config_path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match config_path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_url(&self.forecast.origin, "forecast.origin", &mut result);
        Self::validate_url(&self.geocoding.base_url, "geocoding.base_url", &mut result);

        let offsets = &self.forecast.hour_offsets;
        if offsets.is_empty() {
            result.add_error("forecast.hour_offsets", "At least one offset is required");
        } else if offsets.windows(2).any(|w| w[0] >= w[1]) {
            result.add_error(
                "forecast.hour_offsets",
                "Offsets must be strictly increasing",
            );
        }

        if self.forecast.window_hours == 0 {
            result.add_error("forecast.window_hours", "Window must be greater than 0");
        } else if offsets
            .windows(2)
            .any(|w| w[1].saturating_sub(w[0]) > self.forecast.window_hours)
        {
            result.add_warning(
                "forecast.hour_offsets",
                "Consecutive windows leave a gap in coverage",
            );
        }

        if self.forecast.request_timeout_secs == 0 {
            result.add_warning(
                "forecast.request_timeout_secs",
                "Timeout of 0 disables the per-request limit",
            );
        }

        if self.geocoding.request_timeout_secs == 0 {
            result.add_warning(
                "geocoding.request_timeout_secs",
                "Timeout of 0 disables the per-request limit",
            );
        }

        if self.forecast.error_marker.trim().is_empty() {
            result.add_error("forecast.error_marker", "Error marker must not be empty");
        }

        if self.geocoding.result_limit == 0 {
            result.add_error("geocoding.result_limit", "Result limit must be greater than 0");
        }

        if self.history.max_items == 0 {
            result.add_error("history.max_items", "History must hold at least one entry");
        } else if self.history.max_items > 100 {
            result.add_warning("history.max_items", "History is unusually large (>100)");
        }

        if self.history.storage_key.trim().is_empty() {
            result.add_error("history.storage_key", "Storage key must not be empty");
        }

        result
    }

    /// Validate a URL field
    fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Path of the SQLite file holding the history slot
    pub fn history_database_path(&self) -> PathBuf {
        let file = PathBuf::from(&self.history.database_file);
        if file.is_absolute() {
            file
        } else {
            self.config_dir.join(file)
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("meteogram");

        Ok(config_dir.join("config.toml"))
    }
}
