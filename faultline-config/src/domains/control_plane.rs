//! Fault-injection control plane configuration

use crate::error::ConfigResult;
use crate::validation::{validate_host_port, validate_required_string, validate_url, Validatable};
use serde::{Deserialize, Serialize};

/// Control plane (Toxiproxy) API and the route it proxies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlPlaneConfig {
    /// Base URL of the control-plane API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Dependency route shared by every scenario
    #[serde(default)]
    pub route: RouteConfig,
}

/// A named pass-through route between the gateway and its dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    #[serde(default = "default_route_name")]
    pub name: String,

    /// Address the proxy listens on
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Real dependency address
    #[serde(default = "default_upstream")]
    pub upstream: String,
}

impl Default for ControlPlaneConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            route: RouteConfig::default(),
        }
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            name: default_route_name(),
            listen: default_listen(),
            upstream: default_upstream(),
        }
    }
}

impl Validatable for ControlPlaneConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_url(&self.api_url, "api_url", self.domain_name())?;
        self.route.validate()
    }

    fn domain_name(&self) -> &'static str {
        "control_plane"
    }
}

impl Validatable for RouteConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.name, "name", self.domain_name())?;

        if self.name.contains('/') {
            return Err(self.validation_error(format!(
                "route name '{}' cannot contain '/'",
                self.name
            )));
        }

        validate_host_port(&self.listen, "listen", self.domain_name())?;
        validate_host_port(&self.upstream, "upstream", self.domain_name())?;

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "control_plane.route"
    }
}

// Default value functions
fn default_api_url() -> String {
    "http://localhost:8474".to_string()
}

fn default_route_name() -> String {
    "redis_proxy".to_string()
}

fn default_listen() -> String {
    "0.0.0.0:6379".to_string()
}

fn default_upstream() -> String {
    "redis:6379".to_string()
}
