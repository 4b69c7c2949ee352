//! Fault-injection control plane client (Toxiproxy HTTP API)

use async_trait::async_trait;
use faultline_config::{ControlPlaneConfig, RouteConfig};
use faultline_core::FaultSpec;
use faultline_http::{HttpError, HttpManager};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ControlPlaneError {
    #[error("Control plane request failed during {operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Control plane rejected {operation} with HTTP {status}: {body}")]
    UnexpectedStatus {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("Invalid control plane response to {operation}: {message}")]
    InvalidResponse {
        operation: &'static str,
        message: String,
    },

    #[error("Fault '{0}' is applied by toggling the route, not as a toxic")]
    NotAToxic(String),
}

/// Operations on the dependency route
///
/// Implementations are called by a single orchestrator, one at a time.
#[async_trait]
pub trait FaultInjector: Send + Sync {
    /// Clear all toxics and re-enable every route
    async fn reset_all(&self) -> Result<(), ControlPlaneError>;

    /// Declare a pass-through route; an existing route of the same name is reused
    async fn configure_route(&self, route: &RouteConfig) -> Result<(), ControlPlaneError>;

    /// Apply a toxic fault, returning its identifier
    async fn inject_fault(&self, route: &str, fault: &FaultSpec)
        -> Result<String, ControlPlaneError>;

    /// Remove a toxic. `None` means nothing was injected and is a no-op.
    async fn remove_fault(&self, route: &str, fault_id: Option<&str>)
        -> Result<(), ControlPlaneError>;

    async fn set_route_enabled(&self, route: &str, enabled: bool)
        -> Result<(), ControlPlaneError>;
}

#[derive(Debug, Deserialize)]
struct ToxicResponse {
    name: String,
}

/// Client for the Toxiproxy admin API
#[derive(Debug, Clone)]
pub struct ToxiproxyClient {
    client: Client,
    api_url: String,
}

impl ToxiproxyClient {
    pub fn new(client: Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { client, api_url }
    }

    pub fn from_config(config: &ControlPlaneConfig, http: &HttpManager) -> Result<Self, HttpError> {
        Ok(Self::new(http.build_client()?, config.api_url.clone()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn send(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<Response, ControlPlaneError> {
        request
            .send()
            .await
            .map_err(|source| ControlPlaneError::Transport { operation, source })
    }
}

/// Pass 2xx responses through; turn anything else into `UnexpectedStatus`
async fn expect_success(
    operation: &'static str,
    response: Response,
) -> Result<Response, ControlPlaneError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ControlPlaneError::UnexpectedStatus {
        operation,
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl FaultInjector for ToxiproxyClient {
    async fn reset_all(&self) -> Result<(), ControlPlaneError> {
        let response = self
            .send("reset", self.client.post(self.url("/reset")))
            .await?;
        expect_success("reset", response).await?;
        debug!(api_url = %self.api_url, "Control plane reset");
        Ok(())
    }

    async fn configure_route(&self, route: &RouteConfig) -> Result<(), ControlPlaneError> {
        let body = json!({
            "name": route.name,
            "listen": route.listen,
            "upstream": route.upstream,
            "enabled": true,
        });
        let response = self
            .send(
                "configure route",
                self.client.post(self.url("/proxies")).json(&body),
            )
            .await?;

        // Reset keeps proxies, so a second run sees the route it created before
        if response.status() == StatusCode::CONFLICT {
            info!(route = %route.name, "Route already exists, reusing it");
            return Ok(());
        }

        expect_success("configure route", response).await?;
        info!(
            route = %route.name,
            listen = %route.listen,
            upstream = %route.upstream,
            "Route configured"
        );
        Ok(())
    }

    async fn inject_fault(
        &self,
        route: &str,
        fault: &FaultSpec,
    ) -> Result<String, ControlPlaneError> {
        let (toxic_type, attributes) = match (fault.toxic_type(), fault.toxic_attributes()) {
            (Some(toxic_type), Some(attributes)) => (toxic_type, attributes),
            _ => return Err(ControlPlaneError::NotAToxic(fault.to_string())),
        };

        let body = json!({ "type": toxic_type, "attributes": attributes });
        let response = self
            .send(
                "inject fault",
                self.client
                    .post(self.url(&format!("/proxies/{}/toxics", route)))
                    .json(&body),
            )
            .await?;
        let response = expect_success("inject fault", response).await?;

        let toxic = response.json::<ToxicResponse>().await.map_err(|e| {
            ControlPlaneError::InvalidResponse {
                operation: "inject fault",
                message: e.to_string(),
            }
        })?;

        info!(route = %route, toxic = %toxic.name, fault = %fault, "Fault injected");
        Ok(toxic.name)
    }

    async fn remove_fault(
        &self,
        route: &str,
        fault_id: Option<&str>,
    ) -> Result<(), ControlPlaneError> {
        let Some(fault_id) = fault_id else {
            debug!(route = %route, "No fault to remove");
            return Ok(());
        };

        let response = self
            .send(
                "remove fault",
                self.client
                    .delete(self.url(&format!("/proxies/{}/toxics/{}", route, fault_id))),
            )
            .await?;
        expect_success("remove fault", response).await?;
        info!(route = %route, toxic = %fault_id, "Fault removed");
        Ok(())
    }

    async fn set_route_enabled(
        &self,
        route: &str,
        enabled: bool,
    ) -> Result<(), ControlPlaneError> {
        let response = self
            .send(
                "toggle route",
                self.client
                    .post(self.url(&format!("/proxies/{}", route)))
                    .json(&json!({ "enabled": enabled })),
            )
            .await?;
        expect_success("toggle route", response).await?;
        info!(route = %route, enabled, "Route toggled");
        Ok(())
    }
}
