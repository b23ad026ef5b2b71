//! Configuration management for the `RouteSafe` application
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings.

use crate::RouteSafeError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `RouteSafe` application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSafeConfig {
    /// External provider configuration
    pub providers: ProvidersConfig,
    /// Web server configuration
    pub server: ServerConfig,
    /// Classifier artifact configuration
    pub model: ModelConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// External provider settings: geocoding, weather and routing services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Base URL of the geocoding service
    #[serde(default = "default_geocoder_base_url")]
    pub geocoder_base_url: String,
    /// Base URL of the weather service
    #[serde(default = "default_weather_base_url")]
    pub weather_base_url: String,
    /// Weather API key
    #[serde(default)]
    pub weather_api_key: String,
    /// Base URL of the routing service
    #[serde(default = "default_routing_base_url")]
    pub routing_base_url: String,
    /// Routing API key
    #[serde(default)]
    pub routing_api_key: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// User agent sent to all providers (Nominatim requires one)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Web server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to bind the web server to
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the static frontend
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: String,
}

/// Classifier artifact settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the trained classifier artifact
    #[serde(default = "default_artifact_path")]
    pub artifact_path: String,
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

// Default value functions
fn default_geocoder_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_routing_base_url() -> String {
    "https://graphhopper.com/api/1".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_user_agent() -> String {
    "routesafe/0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_frontend_dir() -> String {
    "frontend".to_string()
}

fn default_artifact_path() -> String {
    "safety_model.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for RouteSafeConfig {
    fn default() -> Self {
        Self {
            providers: ProvidersConfig {
                geocoder_base_url: default_geocoder_base_url(),
                weather_base_url: default_weather_base_url(),
                weather_api_key: String::new(),
                routing_base_url: default_routing_base_url(),
                routing_api_key: String::new(),
                timeout_seconds: default_timeout(),
                user_agent: default_user_agent(),
            },
            server: ServerConfig {
                port: default_port(),
                frontend_dir: default_frontend_dir(),
            },
            model: ModelConfig {
                artifact_path: default_artifact_path(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
        }
    }
}

impl RouteSafeConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

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

        // Environment overrides with ROUTESAFE_ prefix, e.g.
        // ROUTESAFE_PROVIDERS__ROUTING_API_KEY
        builder = builder.add_source(
            Environment::with_prefix("ROUTESAFE")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: RouteSafeConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("routesafe").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys
    pub fn validate_api_keys(&self) -> Result<()> {
        if self.providers.weather_api_key.is_empty() {
            return Err(RouteSafeError::config(
                "Weather API key is required. Set providers.weather_api_key or ROUTESAFE_PROVIDERS__WEATHER_API_KEY.",
            )
            .into());
        }

        if self.providers.routing_api_key.is_empty() {
            return Err(RouteSafeError::config(
                "Routing API key is required. Set providers.routing_api_key or ROUTESAFE_PROVIDERS__ROUTING_API_KEY.",
            )
            .into());
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.providers.timeout_seconds == 0 {
            return Err(RouteSafeError::config("Provider timeout cannot be zero").into());
        }

        if self.providers.timeout_seconds > 300 {
            return Err(
                RouteSafeError::config("Provider timeout cannot exceed 300 seconds").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(RouteSafeError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(RouteSafeError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("geocoder", &self.providers.geocoder_base_url),
            ("weather", &self.providers.weather_base_url),
            ("routing", &self.providers.routing_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(RouteSafeError::config(format!(
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

    fn config_with_keys() -> RouteSafeConfig {
        let mut config = RouteSafeConfig::default();
        config.providers.weather_api_key = "weather_key_123".to_string();
        config.providers.routing_api_key = "routing_key_123".to_string();
        config
    }

    #[test]
    fn test_default_config() {
        let config = RouteSafeConfig::default();
        assert_eq!(
            config.providers.geocoder_base_url,
            "https://nominatim.openstreetmap.org"
        );
        assert_eq!(config.providers.routing_base_url, "https://graphhopper.com/api/1");
        assert_eq!(config.providers.timeout_seconds, 10);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.model.artifact_path, "safety_model.json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validation_missing_api_keys() {
        let config = RouteSafeConfig::default();
        let result = config.validate_api_keys();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Weather API key is required"));
    }

    #[test]
    fn test_validation_with_keys() {
        let config = config_with_keys();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let mut config = config_with_keys();
        config.logging.level = "chatty".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_validation_numeric_ranges() {
        let mut config = config_with_keys();
        config.providers.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("timeout cannot exceed"));
    }

    #[test]
    fn test_validation_base_urls() {
        let mut config = config_with_keys();
        config.providers.routing_base_url = "graphhopper.com".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("routing base URL"));
    }

    #[test]
    fn test_config_path_generation() {
        let path = RouteSafeConfig::get_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("routesafe"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }
}
