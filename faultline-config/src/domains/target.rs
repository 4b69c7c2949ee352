//! System-under-test configuration

use crate::error::ConfigResult;
use crate::validation::{
    validate_duration, validate_path, validate_required_string, validate_url, Validatable,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where the gateway under test lives and how to call it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Base URL of the gateway
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Readiness endpoint, relative to `base_url`
    #[serde(default = "default_health_path")]
    pub health_path: String,

    /// Business endpoint exercised during every load window
    #[serde(default = "default_endpoint_path")]
    pub endpoint_path: String,

    /// Header carrying the API key
    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,

    /// API key sent with every load request
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// How long to wait for the gateway to report UP
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_readiness_timeout"
    )]
    pub readiness_timeout: Duration,

    /// Delay between two readiness polls
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_poll_interval"
    )]
    pub poll_interval: Duration,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            health_path: default_health_path(),
            endpoint_path: default_endpoint_path(),
            api_key_header: default_api_key_header(),
            api_key: default_api_key(),
            readiness_timeout: default_readiness_timeout(),
            poll_interval: default_poll_interval(),
        }
    }
}

impl TargetConfig {
    /// Absolute URL of the readiness endpoint
    pub fn health_url(&self) -> String {
        join_url(&self.base_url, &self.health_path)
    }

    /// Absolute URL of the business endpoint
    pub fn endpoint_url(&self) -> String {
        join_url(&self.base_url, &self.endpoint_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

impl Validatable for TargetConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_url(&self.base_url, "base_url", self.domain_name())?;
        validate_path(&self.health_path, "health_path", self.domain_name())?;
        validate_path(&self.endpoint_path, "endpoint_path", self.domain_name())?;
        validate_required_string(&self.api_key_header, "api_key_header", self.domain_name())?;

        check_header_name(&self.api_key_header)
            .map_err(|message| self.validation_error(message))?;

        validate_duration(
            self.readiness_timeout,
            "readiness_timeout",
            self.domain_name(),
        )?;
        validate_duration(self.poll_interval, "poll_interval", self.domain_name())?;

        if self.poll_interval > self.readiness_timeout {
            return Err(self.validation_error(format!(
                "poll_interval ({}s) cannot exceed readiness_timeout ({}s)",
                self.poll_interval.as_secs(),
                self.readiness_timeout.as_secs()
            )));
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "target"
    }
}

/// Header names are restricted to RFC 7230 token characters
fn check_header_name(name: &str) -> Result<(), String> {
    let valid = name
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b));
    if valid {
        Ok(())
    } else {
        Err(format!("api_key_header '{}' is not a valid header name", name))
    }
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_health_path() -> String {
    "/actuator/health".to_string()
}

fn default_endpoint_path() -> String {
    "/api/v1/users/1".to_string()
}

fn default_api_key_header() -> String {
    "X-API-Key".to_string()
}

fn default_api_key() -> String {
    "test-key".to_string()
}

fn default_readiness_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(1)
}
