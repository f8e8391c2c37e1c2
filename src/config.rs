//! Configuration management for the `farmcast` advisor
//!
//! Handles loading configuration from a TOML file and `FARMCAST_` environment
//! variables, and validates the result. Thresholds and the district table are
//! compile-time constants and deliberately not part of this structure.

use crate::AdvisorError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Forecast provider settings
    pub weather: WeatherConfig,
    /// Sensor device and persistence settings
    pub sensors: SensorConfig,
    /// HTTP server settings
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Forecast provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Base URL of the Open-Meteo compatible API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
    /// Timezone identifier sent to the provider
    pub timezone: String,
}

/// Sensor device and persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Serial device to read from; ingestion is disabled when unset
    pub device_path: Option<String>,
    /// CSV file holding the latest reading per sensor
    pub csv_path: String,
    /// Pause between line reads in milliseconds
    pub poll_interval_ms: u64,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_weather_timeout() -> u32 {
    30
}

fn default_timezone() -> String {
    "Asia/Kolkata".to_string()
}

fn default_csv_path() -> String {
    "iot_data.csv".to_string()
}

fn default_poll_interval() -> u64 {
    100
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            timeout_seconds: default_weather_timeout(),
            timezone: default_timezone(),
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            device_path: None,
            csv_path: default_csv_path(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
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

impl AdvisorConfig {
    /// Load configuration from `config.toml` (if present) and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("config.toml"));
        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // FARMCAST_WEATHER__TIMEOUT_SECONDS=10 overrides weather.timeout_seconds
        builder = builder.add_source(
            Environment::with_prefix("FARMCAST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AdvisorConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Apply default values to empty or zeroed fields
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.weather.timezone.is_empty() {
            self.weather.timezone = default_timezone();
        }
        if self.sensors.csv_path.is_empty() {
            self.sensors.csv_path = default_csv_path();
        }
        if self.server.bind_address.is_empty() {
            self.server.bind_address = default_bind_address();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 {
            return Err(
                AdvisorError::config("Weather API timeout cannot exceed 300 seconds").into(),
            );
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AdvisorError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AdvisorError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.weather.base_url.starts_with("http://")
            && !self.weather.base_url.starts_with("https://")
        {
            return Err(AdvisorError::config(
                "Weather API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = AdvisorConfig::default();
        assert_eq!(config.weather.base_url, "https://api.open-meteo.com/v1");
        assert_eq!(config.weather.timeout_seconds, 30);
        assert_eq!(config.weather.timezone, "Asia/Kolkata");
        assert_eq!(config.sensors.csv_path, "iot_data.csv");
        assert!(config.sensors.device_path.is_none());
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = AdvisorConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = AdvisorConfig::default();
        config.weather.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = AdvisorConfig::default();
        config.weather.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_fills_empty_fields() {
        let mut config = AdvisorConfig::default();
        config.weather.timezone = String::new();
        config.logging.format = String::new();
        config.apply_defaults();
        assert_eq!(config.weather.timezone, "Asia/Kolkata");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            "[weather]\ntimeout_seconds = 10\n\n[sensors]\ndevice_path = \"/dev/ttyUSB0\"\n\n[server]\nport = 8080"
        )
        .unwrap();

        let config = AdvisorConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.weather.timeout_seconds, 10);
        assert_eq!(config.sensors.device_path.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_forecast_window_is_not_configurable() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[weather]\nforecast_days = 3").unwrap();

        let config = AdvisorConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        let weather = serde_json::to_value(&config.weather).unwrap();
        let keys: Vec<&str> = weather
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["base_url", "timeout_seconds", "timezone"]);
    }
}
