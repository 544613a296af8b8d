//! Configuration management for `ClimateLens`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::ClimateLensError;
use crate::models::{City, CityRegistry, Scenario, TargetYear};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Headroom on top of the fetch deadline for projecting and rendering
const REQUEST_MARGIN: Duration = Duration::from_secs(5);

/// Root configuration structure for the `ClimateLens` dashboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClimateLensConfig {
    /// Weather and air-quality provider settings
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Initial dashboard state
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Map widget settings
    #[serde(default)]
    pub map: MapConfig,
    /// Image asset naming
    #[serde(default)]
    pub assets: AssetsConfig,
    /// City registry override, empty means the built-in cities
    #[serde(default)]
    pub cities: Vec<City>,
}

/// Provider API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Weather provider API key
    pub weather_api_key: Option<String>,
    /// Air-quality provider access token
    pub air_quality_token: Option<String>,
    #[serde(default = "default_weather_base_url")]
    pub weather_base_url: String,
    #[serde(default = "default_air_quality_base_url")]
    pub air_quality_base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub timeout_seconds: u32,
    /// Retries on transient failures, 0 means a single attempt
    #[serde(default)]
    pub max_retries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the browser frontend
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// City shown on first load
    #[serde(default = "default_city")]
    pub default_city: String,
    #[serde(default = "default_year")]
    pub default_year: TargetYear,
    #[serde(default)]
    pub default_scenario: Scenario,
    /// Last known temperature before any successful fetch
    #[serde(default = "default_initial_temperature")]
    pub initial_temperature: f64,
    /// Delay before the map re-layout after a pan
    #[serde(default = "default_relayout_delay")]
    pub relayout_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_zoom")]
    pub zoom: u8,
    #[serde(default = "default_tile_url")]
    pub tile_url: String,
    #[serde(default = "default_marker_radius")]
    pub marker_radius_m: u32,
    #[serde(default = "default_marker_weight")]
    pub marker_weight: u32,
    #[serde(default = "default_initial_marker_color")]
    pub initial_marker_color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Year used for the "present" image
    #[serde(default = "default_present_year")]
    pub present_year: u16,
    /// Prefix prepended to image file names
    #[serde(default)]
    pub base_path: String,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_air_quality_base_url() -> String {
    "https://api.waqi.info".to_string()
}

fn default_provider_timeout() -> u32 {
    30
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "frontend".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_city() -> String {
    "Delhi".to_string()
}

fn default_year() -> TargetYear {
    TargetYear::NEAR_TERM
}

fn default_initial_temperature() -> f64 {
    25.0
}

fn default_relayout_delay() -> u64 {
    300
}

fn default_zoom() -> u8 {
    10
}

fn default_tile_url() -> String {
    "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string()
}

fn default_marker_radius() -> u32 {
    5000
}

fn default_marker_weight() -> u32 {
    1
}

fn default_initial_marker_color() -> String {
    "#38bdf8".to_string()
}

fn default_present_year() -> u16 {
    2025
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            weather_api_key: None,
            air_quality_token: None,
            weather_base_url: default_weather_base_url(),
            air_quality_base_url: default_air_quality_base_url(),
            timeout_seconds: default_provider_timeout(),
            max_retries: 0,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_city: default_city(),
            default_year: default_year(),
            default_scenario: Scenario::default(),
            initial_temperature: default_initial_temperature(),
            relayout_delay_ms: default_relayout_delay(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom: default_zoom(),
            tile_url: default_tile_url(),
            marker_radius_m: default_marker_radius(),
            marker_weight: default_marker_weight(),
            initial_marker_color: default_initial_marker_color(),
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            present_year: default_present_year(),
            base_path: String::new(),
        }
    }
}

impl ProvidersConfig {
    /// Upper bound for one live reading, every attempt included
    #[must_use]
    pub fn fetch_deadline(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_seconds) * (u64::from(self.max_retries) + 1))
    }
}

impl ServerConfig {
    /// Time allowed to answer one HTTP request. Outlasts the fetch deadline so
    /// a slow provider degrades inside the cycle instead of timing out here.
    #[must_use]
    pub fn request_timeout(&self, providers: &ProvidersConfig) -> Duration {
        providers.fetch_deadline() + REQUEST_MARGIN
    }
}

impl DashboardConfig {
    #[must_use]
    pub fn relayout_delay(&self) -> Duration {
        Duration::from_millis(self.relayout_delay_ms)
    }
}

impl ClimateLensConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // CLIMATELENS_PROVIDERS__WEATHER_API_KEY -> providers.weather_api_key
        builder = builder.add_source(
            Environment::with_prefix("CLIMATELENS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: ClimateLensConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("climatelens").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.providers.weather_base_url.is_empty() {
            self.providers.weather_base_url = default_weather_base_url();
        }
        if self.providers.air_quality_base_url.is_empty() {
            self.providers.air_quality_base_url = default_air_quality_base_url();
        }
        if self.providers.timeout_seconds == 0 {
            self.providers.timeout_seconds = default_provider_timeout();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
        if self.server.static_dir.is_empty() {
            self.server.static_dir = default_static_dir();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.dashboard.default_city.is_empty() {
            self.dashboard.default_city = default_city();
        }
        if self.map.zoom == 0 {
            self.map.zoom = default_zoom();
        }
        if self.map.tile_url.is_empty() {
            self.map.tile_url = default_tile_url();
        }
        if self.assets.present_year == 0 {
            self.assets.present_year = default_present_year();
        }
    }

    /// City registry described by this configuration
    #[must_use]
    pub fn city_registry(&self) -> CityRegistry {
        CityRegistry::new(self.cities.clone())
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_credentials()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_cities()?;
        Ok(())
    }

    /// Credentials are optional (the dashboard degrades without them) but
    /// must not be blank when given.
    pub fn validate_credentials(&self) -> Result<()> {
        let credentials = [
            ("Weather API key", &self.providers.weather_api_key),
            ("Air-quality token", &self.providers.air_quality_token),
        ];
        for (label, value) in credentials {
            if let Some(value) = value {
                if value.trim().is_empty() {
                    return Err(ClimateLensError::config(format!(
                        "{label} cannot be empty if provided. Either remove it or provide a valid value."
                    ))
                    .into());
                }
            }
        }
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.providers.timeout_seconds > 300 {
            return Err(
                ClimateLensError::config("Provider timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.providers.max_retries > 10 {
            return Err(ClimateLensError::config("Provider max retries cannot exceed 10").into());
        }

        if self.map.zoom > 19 {
            return Err(ClimateLensError::config("Map zoom cannot exceed 19").into());
        }

        if self.dashboard.relayout_delay_ms > 10_000 {
            return Err(
                ClimateLensError::config("Map re-layout delay cannot exceed 10000 ms").into(),
            );
        }

        if !self.dashboard.initial_temperature.is_finite() {
            return Err(
                ClimateLensError::config("Initial temperature must be a finite number").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ClimateLensError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ClimateLensError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (label, url) in [
            ("Weather", &self.providers.weather_base_url),
            ("Air-quality", &self.providers.air_quality_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ClimateLensError::config(format!(
                    "{label} provider base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }

    fn validate_cities(&self) -> Result<()> {
        for city in &self.cities {
            if city.name.trim().is_empty() {
                return Err(ClimateLensError::config("City names cannot be empty").into());
            }
            let coordinates = city.coordinates;
            if !(-90.0..=90.0).contains(&coordinates.latitude)
                || !(-180.0..=180.0).contains(&coordinates.longitude)
            {
                return Err(ClimateLensError::config(format!(
                    "City '{}' has invalid coordinates: {}",
                    city.name,
                    coordinates.format()
                ))
                .into());
            }
        }

        if !self.city_registry().contains(&self.dashboard.default_city) {
            return Err(ClimateLensError::config(format!(
                "Default city '{}' is not in the city registry",
                self.dashboard.default_city
            ))
            .into());
        }

        Ok(())
    }
}
