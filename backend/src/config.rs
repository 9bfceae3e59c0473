//! Configuration management for FarmIntel
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with FARMINTEL_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Soil sample database configuration
    pub database: DatabaseConfig,

    /// Geocoding API configuration
    pub geocoder: GeocoderConfig,

    /// Weather API configuration
    pub weather: WeatherConfig,

    /// Soil type API configuration
    pub soil: SoilConfig,

    /// Advice computation settings
    pub advice: AdviceConfig,

    /// Per-user advice history limits
    pub history: HistoryConfig,

    /// CORS configuration
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL; the bundled sample set is used when absent
    pub url: Option<String>,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeocoderConfig {
    /// OpenEPI geocoding endpoint
    pub api_endpoint: String,

    pub enabled: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Weather API endpoint
    pub api_endpoint: String,

    /// Weather API key; weather is skipped when absent
    pub api_key: Option<String>,

    /// Days of forecast to request
    pub forecast_days: u8,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SoilConfig {
    /// OpenEPI soil endpoint
    pub api_endpoint: String,

    pub enabled: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdviceConfig {
    /// Radius for nearby-sample aggregation
    pub search_radius_km: f64,

    /// Crop used when a request does not name one
    pub default_crop: String,

    /// Timeout for each external API call
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    pub per_user_capacity: usize,

    pub max_users: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Allowed origins; empty allows any origin
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("FARMINTEL_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = Self::builder(&environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (FARMINTEL_ prefix)
            .add_source(
                Environment::with_prefix("FARMINTEL")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Code defaults only
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder("development")?.build()?.try_deserialize()
    }

    fn builder(
        environment: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("environment", environment)?
            .set_default("server.port", 5000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("geocoder.api_endpoint", "https://api.openepi.io/geocoding")?
            .set_default("geocoder.enabled", true)?
            .set_default("weather.api_endpoint", "https://api.weatherapi.com/v1")?
            .set_default("weather.forecast_days", 7)?
            .set_default("soil.api_endpoint", "https://api.openepi.io/soil")?
            .set_default("soil.enabled", true)?
            .set_default("advice.search_radius_km", 10.0)?
            .set_default("advice.default_crop", shared::DEFAULT_CROP)?
            .set_default("advice.request_timeout_secs", 10)?
            .set_default("history.per_user_capacity", 20)?
            .set_default("history.max_users", 1000)?
            .set_default("cors.allowed_origins", Vec::<String>::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_deserialize() {
        let config = Config::defaults().unwrap();
        assert_eq!(config.server.port, 5000);
        assert!(config.database.url.is_none());
        assert!(config.weather.api_key.is_none());
        assert_eq!(config.advice.default_crop, "maize");
        assert_eq!(config.history.per_user_capacity, 20);
        assert!(config.cors.allowed_origins.is_empty());
    }
}
