//! Readiness gate for the system under test

use async_trait::async_trait;
use faultline_config::TargetConfig;
use faultline_http::{HttpError, HttpManager};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Decides whether the system under test is ready to be measured
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Wait until ready, returning `false` once the probe's timeout elapses
    async fn wait_ready(&self) -> bool;

    /// Upper bound on how long `wait_ready` may take
    fn timeout(&self) -> Duration;
}

#[derive(Debug, Deserialize)]
struct HealthStatus {
    status: String,
}

/// Polls a health endpoint until it answers HTTP 200 with `{"status": "UP"}`
#[derive(Debug, Clone)]
pub struct HealthProbe {
    client: Client,
    url: String,
    timeout: Duration,
    poll_interval: Duration,
}

impl HealthProbe {
    pub fn new(
        client: Client,
        url: impl Into<String>,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            timeout,
            poll_interval,
        }
    }

    pub fn from_config(config: &TargetConfig, http: &HttpManager) -> Result<Self, HttpError> {
        let client = http.build_client_with_timeout(config.readiness_timeout)?;
        Ok(Self::new(
            client,
            config.health_url(),
            config.readiness_timeout,
            config.poll_interval,
        ))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// One poll. Transport errors and malformed bodies count as "not ready".
    pub async fn check_once(&self) -> bool {
        let response = match self.client.get(&self.url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(url = %self.url, error = %e, "Health check failed");
                return false;
            }
        };

        if response.status() != StatusCode::OK {
            debug!(url = %self.url, status = %response.status(), "Health check not OK");
            return false;
        }

        match response.json::<HealthStatus>().await {
            Ok(health) => {
                debug!(url = %self.url, status = %health.status, "Health status");
                health.status == "UP"
            }
            Err(e) => {
                debug!(url = %self.url, error = %e, "Unreadable health response");
                false
            }
        }
    }
}

#[async_trait]
impl ReadinessProbe for HealthProbe {
    async fn wait_ready(&self) -> bool {
        info!(
            url = %self.url,
            timeout_secs = self.timeout.as_secs(),
            "Waiting for system under test"
        );

        let poll = async {
            loop {
                if self.check_once().await {
                    return;
                }
                tokio::time::sleep(self.poll_interval).await;
            }
        };

        match tokio::time::timeout(self.timeout, poll).await {
            Ok(()) => {
                info!(url = %self.url, "System under test is ready");
                true
            }
            Err(_) => {
                warn!(url = %self.url, "Readiness timeout elapsed");
                false
            }
        }
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
