//! HTTP client construction

use crate::config::HttpConfig;
use crate::errors::HttpError;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client, ClientBuilder,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Builds `reqwest` clients from a shared HTTP configuration
#[derive(Debug, Clone)]
pub struct HttpManager {
    config: HttpConfig,
}

impl Default for HttpManager {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpManager {
    /// Create a new HttpManager with default configuration
    pub fn new() -> Self {
        Self::with_config(HttpConfig::default())
    }

    /// Create a new HttpManager with specific configuration
    pub fn with_config(config: HttpConfig) -> Self {
        debug!(
            "Creating HttpManager with timeout: {}s",
            config.timeout.as_secs()
        );
        Self { config }
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Client with the configured timeout and pool settings
    pub fn build_client(&self) -> Result<Client, HttpError> {
        Ok(self.builder(self.config.timeout, self.config.max_idle_per_host).build()?)
    }

    /// Client whose per-request timeout is capped at `timeout`
    ///
    /// Used for polling, where one hung request must not outlive the poll
    /// interval's budget.
    pub fn build_client_with_timeout(&self, timeout: Duration) -> Result<Client, HttpError> {
        let timeout = timeout.min(self.config.timeout);
        Ok(self.builder(timeout, self.config.max_idle_per_host).build()?)
    }

    /// Client for load generation: pool sized for `concurrency` in-flight
    /// requests, with `headers` attached to every request
    pub fn build_load_client(
        &self,
        concurrency: usize,
        headers: &[(&str, &str)],
    ) -> Result<Client, HttpError> {
        let pool_size = self.config.max_idle_per_host.max(concurrency);
        let default_headers = header_map(headers)?;

        debug!(
            pool_size,
            headers = default_headers.len(),
            "Building load-generation client"
        );

        Ok(self
            .builder(self.config.timeout, pool_size)
            .default_headers(default_headers)
            .build()?)
    }

    fn builder(&self, timeout: Duration, pool_size: usize) -> ClientBuilder {
        Client::builder()
            .timeout(timeout)
            .connect_timeout(self.config.connect_timeout.min(timeout))
            .pool_max_idle_per_host(pool_size)
            .pool_idle_timeout(self.config.idle_timeout)
            .user_agent(&self.config.user_agent)
            .danger_accept_invalid_certs(!self.config.verify_ssl)
            .redirect(reqwest::redirect::Policy::limited(
                self.config.max_redirects as usize,
            ))
    }
}

/// Build a header map, rejecting names or values that are not valid HTTP
fn header_map(headers: &[(&str, &str)]) -> Result<HeaderMap, HttpError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let header_name = HeaderName::from_str(name)
            .map_err(|_| HttpError::InvalidHeader(format!("invalid name '{}'", name)))?;
        let mut header_value = HeaderValue::from_str(value)
            .map_err(|_| HttpError::InvalidHeader(format!("invalid value for '{}'", name)))?;
        header_value.set_sensitive(true);
        map.insert(header_name, header_value);
    }
    Ok(map)
}
