//! Configuration validation traits and utilities

use crate::error::{ConfigError, ConfigResult};
use std::time::Duration;

/// Trait for validatable configuration
pub trait Validatable {
    /// Validate the configuration
    fn validate(&self) -> ConfigResult<()>;

    /// Get the domain name for error reporting
    fn domain_name(&self) -> &'static str;

    /// Helper to create a domain-specific validation error
    fn validation_error(&self, message: impl Into<String>) -> ConfigError {
        ConfigError::DomainError {
            domain: self.domain_name().to_string(),
            message: message.into(),
        }
    }
}

/// Validate a required string field
pub fn validate_required_string(value: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} cannot be empty", field_name),
        });
    }
    Ok(())
}

/// Validate a positive number
pub fn validate_positive<T>(value: T, field_name: &str, domain: &str) -> ConfigResult<()>
where
    T: PartialOrd + Default + std::fmt::Display,
{
    if value <= T::default() {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} must be greater than 0, got {}", field_name, value),
        });
    }
    Ok(())
}

/// Validate a non-zero duration
pub fn validate_duration(value: Duration, field_name: &str, domain: &str) -> ConfigResult<()> {
    if value.is_zero() {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} must be greater than 0 seconds", field_name),
        });
    }
    Ok(())
}

/// Validate an http(s) URL
pub fn validate_url(url: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    validate_required_string(url, field_name, domain)?;

    let parsed = url::Url::parse(url).map_err(|e| ConfigError::DomainError {
        domain: domain.to_string(),
        message: format!("{} has invalid URL format: {}", field_name, e),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} scheme '{}' not supported (only http/https)", field_name, scheme),
        }),
    }
}

/// Validate a URL path such as `/actuator/health`
pub fn validate_path(path: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    if !path.starts_with('/') {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} must start with '/', got '{}'", field_name, path),
        });
    }
    Ok(())
}

/// Validate a `host:port` socket address as understood by the control plane
pub fn validate_host_port(value: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    validate_required_string(value, field_name, domain)?;

    let valid = value
        .rsplit_once(':')
        .map(|(host, port)| !host.is_empty() && port.parse::<u16>().map_or(false, |p| p != 0))
        .unwrap_or(false);

    if !valid {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} must be in host:port form, got '{}'", field_name, value),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("http://localhost:8080", "url", "test").is_ok());
        assert!(validate_url("https://gateway.internal", "url", "test").is_ok());
        assert!(validate_url("", "url", "test").is_err());
        assert!(validate_url("not-a-url", "url", "test").is_err());
        assert!(validate_url("ftp://localhost", "url", "test").is_err());
    }

    #[test]
    fn test_validate_host_port() {
        assert!(validate_host_port("0.0.0.0:6379", "listen", "test").is_ok());
        assert!(validate_host_port("redis:6379", "upstream", "test").is_ok());
        assert!(validate_host_port("redis", "upstream", "test").is_err());
        assert!(validate_host_port(":6379", "upstream", "test").is_err());
        assert!(validate_host_port("redis:0", "upstream", "test").is_err());
        assert!(validate_host_port("redis:http", "upstream", "test").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("/actuator/health", "path", "test").is_ok());
        assert!(validate_path("actuator/health", "path", "test").is_err());
    }
}
