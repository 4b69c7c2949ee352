//! Configuration loading and environment variable handling

use crate::domains::FaultlineConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self::with_prefix("FAULTLINE")
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<FaultlineConfig> {
        let content = std::fs::read_to_string(path)?;
        self.from_yaml(&content)
    }

    /// Load configuration from YAML text with environment overrides
    pub fn from_yaml(&self, content: &str) -> ConfigResult<FaultlineConfig> {
        let mut config: FaultlineConfig = serde_yaml::from_str(content)?;
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<FaultlineConfig> {
        let mut config = FaultlineConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<FaultlineConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut FaultlineConfig) -> ConfigResult<()> {
        if let Ok(url) = self.get_env_var("TARGET_URL") {
            config.target.base_url = url;
        }

        if let Ok(api_key) = self.get_env_var("API_KEY") {
            config.target.api_key = api_key;
        }

        if let Some(timeout) = self.parse_env_var::<u64>("READINESS_TIMEOUT")? {
            config.target.readiness_timeout = Duration::from_secs(timeout);
        }

        if let Ok(url) = self.get_env_var("CONTROL_PLANE_URL") {
            config.control_plane.api_url = url;
        }

        if let Some(concurrency) = self.parse_env_var::<usize>("CONCURRENCY")? {
            config.load.concurrency = concurrency;
        }

        if let Some(timeout) = self.parse_env_var::<u64>("HTTP_TIMEOUT")? {
            config.http.timeout = Duration::from_secs(timeout);
        }

        if let Ok(dir) = self.get_env_var("REPORT_DIR") {
            config.report.output_dir = dir.into();
        }

        if let Ok(log_level) = self.get_env_var("LOG_LEVEL") {
            config.logging.level = crate::domains::logging::LogLevel::from_str(&log_level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", log_level)))?;
        }

        if let Ok(format) = self.get_env_var("LOG_FORMAT") {
            config.logging.format = crate::domains::logging::LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        Ok(())
    }

    /// Parse an optional numeric environment variable
    fn parse_env_var<T>(&self, name: &str) -> ConfigResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_env_var(name) {
            Ok(value) => value
                .parse()
                .map(Some)
                .map_err(|e| ConfigError::EnvError(format!("Invalid {}: {}", name, e))),
            Err(_) => Ok(None),
        }
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
