//! Configuration management for the `Daytrip` application
//!
//! Handles loading configuration from an optional TOML file and from
//! environment variables, and provides validation for all settings.
//! The bare `AMAP_KEY`, `DEEPSEEK_API_KEY` and `SECRET_KEY` environment
//! variables are honored as fallbacks for deployments that only export
//! provider credentials.

use crate::DaytripError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `Daytrip` application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaytripConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// AMap (weather, geocoding, driving directions) settings
    #[serde(default)]
    pub amap: AmapConfig,
    /// Chat-completion provider settings
    #[serde(default)]
    pub llm: LlmConfig,
    /// Trip planner settings
    #[serde(default)]
    pub planner: PlannerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port the web server binds to
    #[serde(default = "default_port")]
    pub port: u16,
    /// Application secret value
    #[serde(default = "default_secret_key")]
    pub secret_key: String,
}

/// AMap provider settings, shared by weather, geocoding and routing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmapConfig {
    /// AMap API key
    #[serde(default)]
    pub key: String,
    /// Base URL for the AMap REST API
    #[serde(default = "default_amap_base_url")]
    pub base_url: String,
    /// Request timeout in seconds for provider calls
    #[serde(default = "default_amap_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for transient failures
    #[serde(default = "default_amap_max_retries")]
    pub max_retries: u32,
}

/// Chat-completion provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key for the chat-completion endpoint
    #[serde(default)]
    pub api_key: String,
    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    /// Model identifier
    #[serde(default = "default_llm_model")]
    pub model: String,
}

/// Trip planner settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// City the whole trip is scoped to
    #[serde(default = "default_city")]
    pub city: String,
    /// Address prefix used for the primary geocoding pass
    #[serde(default = "default_city_prefix")]
    pub city_prefix: String,
    /// Upper bound on marked places accepted from one itinerary
    #[serde(default = "default_max_places")]
    pub max_places: usize,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_port() -> u16 {
    3000
}

fn default_secret_key() -> String {
    "dev".to_string()
}

fn default_amap_base_url() -> String {
    "https://restapi.amap.com/v3".to_string()
}

fn default_amap_timeout() -> u32 {
    10
}

fn default_amap_max_retries() -> u32 {
    3
}

fn default_llm_base_url() -> String {
    "https://api.deepseek.com".to_string()
}

fn default_llm_model() -> String {
    "deepseek-chat".to_string()
}

fn default_city() -> String {
    "苏州".to_string()
}

fn default_city_prefix() -> String {
    "苏州市".to_string()
}

fn default_max_places() -> usize {
    16
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            secret_key: default_secret_key(),
        }
    }
}

impl Default for AmapConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            base_url: default_amap_base_url(),
            timeout_seconds: default_amap_timeout(),
            max_retries: default_amap_max_retries(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_llm_base_url(),
            model: default_llm_model(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            city: default_city(),
            city_prefix: default_city_prefix(),
            max_places: default_max_places(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for DaytripConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            amap: AmapConfig::default(),
            llm: LlmConfig::default(),
            planner: PlannerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl DaytripConfig {
    /// Load configuration from file and environment variables
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

        // Environment overrides: DAYTRIP_AMAP__KEY, DAYTRIP_SERVER__PORT, ...
        builder = builder.add_source(
            Environment::with_prefix("DAYTRIP")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: DaytripConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_env_fallbacks();
        config.validate()?;

        Ok(config)
    }

    /// Honor the bare provider environment variables the deployment
    /// documentation names: AMAP_KEY, DEEPSEEK_API_KEY, SECRET_KEY.
    pub fn apply_env_fallbacks(&mut self) {
        if self.amap.key.is_empty()
            && let Ok(key) = std::env::var("AMAP_KEY")
        {
            self.amap.key = key;
        }
        if self.llm.api_key.is_empty()
            && let Ok(key) = std::env::var("DEEPSEEK_API_KEY")
        {
            self.llm.api_key = key;
        }
        if let Ok(secret) = std::env::var("SECRET_KEY") {
            self.server.secret_key = secret;
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        if self.amap.key.is_empty() {
            return Err(DaytripError::config(
                "AMap API key is required. Set amap.key or the AMAP_KEY environment variable.",
            )
            .into());
        }

        if self.llm.api_key.is_empty() {
            return Err(DaytripError::config(
                "Chat-completion API key is required. Set llm.api_key or the DEEPSEEK_API_KEY environment variable.",
            )
            .into());
        }

        if self.server.secret_key.is_empty() {
            return Err(DaytripError::config("Secret key cannot be empty").into());
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.amap.timeout_seconds == 0 || self.amap.timeout_seconds > 300 {
            return Err(
                DaytripError::config("AMap timeout must be between 1 and 300 seconds").into(),
            );
        }

        if self.amap.max_retries > 10 {
            return Err(DaytripError::config("AMap max retries cannot exceed 10").into());
        }

        if self.planner.max_places < 2 || self.planner.max_places > 50 {
            return Err(
                DaytripError::config("planner.max_places must be between 2 and 50").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(DaytripError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("amap.base_url", &self.amap.base_url),
            ("llm.base_url", &self.llm.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(DaytripError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if self.planner.city.is_empty() {
            return Err(DaytripError::config("planner.city cannot be empty").into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> DaytripConfig {
        let mut config = DaytripConfig::default();
        config.amap.key = "test_amap_key_123".to_string();
        config.llm.api_key = "test_llm_key_123".to_string();
        config
    }

    #[test]
    fn test_default_config() {
        let config = DaytripConfig::default();
        assert_eq!(config.amap.base_url, "https://restapi.amap.com/v3");
        assert_eq!(config.amap.timeout_seconds, 10);
        assert_eq!(config.llm.base_url, "https://api.deepseek.com");
        assert_eq!(config.llm.model, "deepseek-chat");
        assert_eq!(config.planner.city, "苏州");
        assert_eq!(config.planner.city_prefix, "苏州市");
        assert_eq!(config.planner.max_places, 16);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.secret_key, "dev");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_validation_missing_keys() {
        let config = DaytripConfig::default();
        let result = config.validate_api_keys();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("AMap API key"));
    }

    #[test]
    fn test_config_validation_valid_keys() {
        let config = valid_config();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = valid_config();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = valid_config();
        config.amap.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("between 1 and 300")
        );
    }

    #[test]
    fn test_config_validation_max_places_bounds() {
        let mut config = valid_config();
        config.planner.max_places = 1;
        assert!(config.validate().is_err());

        config.planner.max_places = 16;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = valid_config();
        config.amap.base_url = "ftp://example.com".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("amap.base_url"));
    }

    #[test]
    fn test_env_fallbacks() {
        // SAFETY: Test environment, setting test values only
        unsafe {
            std::env::set_var("AMAP_KEY", "amap_from_env");
            std::env::set_var("DEEPSEEK_API_KEY", "llm_from_env");
        }

        let mut config = DaytripConfig::default();
        config.apply_env_fallbacks();
        assert_eq!(config.amap.key, "amap_from_env");
        assert_eq!(config.llm.api_key, "llm_from_env");

        // An explicitly configured key wins over the environment
        let mut explicit = DaytripConfig::default();
        explicit.amap.key = "explicit".to_string();
        explicit.apply_env_fallbacks();
        assert_eq!(explicit.amap.key, "explicit");

        // SAFETY: Test cleanup
        unsafe {
            std::env::remove_var("AMAP_KEY");
            std::env::remove_var("DEEPSEEK_API_KEY");
        }
    }
}
