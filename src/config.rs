//! Configuration management for `GeoDash`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::GeodashError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `GeoDash` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Upstream provider settings
    #[serde(default)]
    pub sources: SourcesConfig,
    /// HTTP API listener
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Presentation settings
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Upstream base URLs and request identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Open-Meteo forecast endpoint (current, daily, flood, radiation)
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    #[serde(default = "default_marine_url")]
    pub marine_url: String,
    #[serde(default = "default_air_quality_url")]
    pub air_quality_url: String,
    /// Nominatim base URL
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    /// NASA EONET v3 base URL
    #[serde(default = "default_events_url")]
    pub events_url: String,
    /// Sent with every request; Nominatim rejects anonymous clients
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Maximum forward search candidates
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
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
pub struct DisplayConfig {
    /// Number of geocoding extratags shown before collapsing into "+N more"
    #[serde(default = "default_extratag_preview_limit")]
    pub extratag_preview_limit: usize,
    /// Name used when a map click cannot be reverse geocoded
    #[serde(default = "default_map_click_placeholder")]
    pub map_click_placeholder: String,
    /// Name used when a geolocation fix cannot be reverse geocoded
    #[serde(default = "default_geolocation_placeholder")]
    pub geolocation_placeholder: String,
}

// Default value functions
fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_marine_url() -> String {
    "https://marine-api.open-meteo.com/v1/marine".to_string()
}

fn default_air_quality_url() -> String {
    "https://air-quality-api.open-meteo.com/v1/air-quality".to_string()
}

fn default_geocoding_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_events_url() -> String {
    "https://eonet.gsfc.nasa.gov/api/v3".to_string()
}

fn default_user_agent() -> String {
    format!("GeoDash/{}", crate::VERSION)
}

fn default_search_limit() -> usize {
    5
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_extratag_preview_limit() -> usize {
    6
}

fn default_map_click_placeholder() -> String {
    "Unknown location".to_string()
}

fn default_geolocation_placeholder() -> String {
    "Your Location".to_string()
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            forecast_url: default_forecast_url(),
            marine_url: default_marine_url(),
            air_quality_url: default_air_quality_url(),
            geocoding_url: default_geocoding_url(),
            events_url: default_events_url(),
            user_agent: default_user_agent(),
            search_limit: default_search_limit(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
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

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            extratag_preview_limit: default_extratag_preview_limit(),
            map_click_placeholder: default_map_click_placeholder(),
            geolocation_placeholder: default_geolocation_placeholder(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. GEODASH_SERVER__PORT=9000
        builder = builder.add_source(
            Environment::with_prefix("GEODASH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: DashboardConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("geodash").join("config.toml"))
    }

    /// Replace blank values with their defaults
    pub fn apply_defaults(&mut self) {
        fn fill_blank(value: &mut String, default: fn() -> String) {
            if value.trim().is_empty() {
                *value = default();
            }
        }

        let sources = &mut self.sources;
        fill_blank(&mut sources.forecast_url, default_forecast_url);
        fill_blank(&mut sources.marine_url, default_marine_url);
        fill_blank(&mut sources.air_quality_url, default_air_quality_url);
        fill_blank(&mut sources.geocoding_url, default_geocoding_url);
        fill_blank(&mut sources.events_url, default_events_url);
        fill_blank(&mut sources.user_agent, default_user_agent);
        if sources.search_limit == 0 {
            sources.search_limit = default_search_limit();
        }
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.display.extratag_preview_limit == 0 {
            self.display.extratag_preview_limit = default_extratag_preview_limit();
        }
        if self.display.map_click_placeholder.is_empty() {
            self.display.map_click_placeholder = default_map_click_placeholder();
        }
        if self.display.geolocation_placeholder.is_empty() {
            self.display.geolocation_placeholder = default_geolocation_placeholder();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_urls()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if !(1..=50).contains(&self.sources.search_limit) {
            return Err(GeodashError::config("Search limit must be between 1 and 50").into());
        }

        if !(1..=50).contains(&self.display.extratag_preview_limit) {
            return Err(
                GeodashError::config("Extratag preview limit must be between 1 and 50").into(),
            );
        }

        if self.server.port == 0 {
            return Err(GeodashError::config("Server port cannot be 0").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(GeodashError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(GeodashError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }

    fn validate_urls(&self) -> Result<()> {
        let urls = [
            ("forecast", &self.sources.forecast_url),
            ("marine", &self.sources.marine_url),
            ("air quality", &self.sources.air_quality_url),
            ("geocoding", &self.sources.geocoding_url),
            ("events", &self.sources.events_url),
        ];

        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(GeodashError::config(format!(
                    "The {name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.sources.forecast_url, "https://api.open-meteo.com/v1/forecast");
        assert_eq!(config.sources.search_limit, 5);
        assert_eq!(config.display.extratag_preview_limit, 6);
        assert_eq!(config.display.map_click_placeholder, "Unknown location");
        assert_eq!(config.logging.level, "info");
        assert!(config.sources.user_agent.starts_with("GeoDash/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = DashboardConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = DashboardConfig::default();
        config.display.extratag_preview_limit = 80;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("preview limit"));
    }

    #[test]
    fn test_config_validation_urls() {
        let mut config = DashboardConfig::default();
        config.sources.events_url = "ftp://eonet".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("events base URL"));
    }

    #[test]
    fn test_apply_defaults_fills_blanks() {
        let mut config = DashboardConfig::default();
        config.sources.marine_url = "  ".to_string();
        config.sources.search_limit = 0;
        config.display.geolocation_placeholder.clear();
        config.apply_defaults();
        assert_eq!(config.sources.marine_url, "https://marine-api.open-meteo.com/v1/marine");
        assert_eq!(config.sources.search_limit, 5);
        assert_eq!(config.display.geolocation_placeholder, "Your Location");
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = env::temp_dir().join(format!("geodash-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[sources]\nsearch_limit = 3\n\n[display]\nmap_click_placeholder = \"Somewhere\"\n",
        )
        .unwrap();

        let config = DashboardConfig::load_from_path(Some(path.clone()));
        std::fs::remove_file(&path).ok();

        let config = config.unwrap();
        assert_eq!(config.sources.search_limit, 3);
        assert_eq!(config.display.map_click_placeholder, "Somewhere");
        assert_eq!(config.display.extratag_preview_limit, 6);
    }

    #[test]
    fn test_environment_variable_override() {
        // SAFETY: Test environment, setting test values only
        unsafe {
            env::set_var("GEODASH_LOGGING__FORMAT", "json");
        }

        let missing = env::temp_dir().join("geodash-no-such-config.toml");
        let result = DashboardConfig::load_from_path(Some(missing));

        // SAFETY: Test cleanup
        unsafe {
            env::remove_var("GEODASH_LOGGING__FORMAT");
        }

        assert_eq!(result.unwrap().logging.format, "json");
    }

    #[test]
    fn test_config_path_generation() {
        let path = DashboardConfig::get_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("geodash"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }
}
