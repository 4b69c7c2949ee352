//! Domain-specific configuration modules

pub mod control_plane;
pub mod http;
pub mod load;
pub mod logging;
pub mod report;
pub mod target;
pub mod utils;

use crate::error::{ConfigError, ConfigResult};
use crate::validation::Validatable;
use faultline_core::{standard_scenarios, FaultSpec, Scenario, ScenarioSequence};
use serde::{Deserialize, Serialize};

/// Main Faultline configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FaultlineConfig {
    /// Gateway under test
    #[serde(default)]
    pub target: target::TargetConfig,

    /// Fault-injection control plane
    #[serde(default)]
    pub control_plane: control_plane::ControlPlaneConfig,

    /// Load generator settings
    #[serde(default)]
    pub load: load::LoadConfig,

    /// HTTP client configuration
    #[serde(default)]
    pub http: http::HttpConfig,

    /// Report output
    #[serde(default)]
    pub report: report::ReportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,

    /// Scenarios, executed strictly in this order
    #[serde(default = "standard_scenarios")]
    pub scenarios: Vec<Scenario>,
}

impl Default for FaultlineConfig {
    fn default() -> Self {
        Self {
            target: Default::default(),
            control_plane: Default::default(),
            load: Default::default(),
            http: Default::default(),
            report: Default::default(),
            logging: Default::default(),
            scenarios: standard_scenarios(),
        }
    }
}

impl FaultlineConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.target.validate()?;
        self.control_plane.validate()?;
        self.load.validate()?;
        self.http.validate()?;
        self.report.validate()?;
        self.logging.validate()?;

        if self.scenarios.is_empty() {
            return Err(ConfigError::DomainError {
                domain: "scenarios".to_string(),
                message: "At least one scenario must be configured".to_string(),
            });
        }
        self.scenarios.validate_sequence()?;

        let timeout_ms = self.http.timeout.as_millis();
        for scenario in &self.scenarios {
            if let Some(FaultSpec::Latency { latency_ms, .. }) = &scenario.fault {
                if u128::from(*latency_ms) >= timeout_ms {
                    log::warn!(
                        "Scenario '{}' injects {}ms of latency but http.timeout is {}ms; \
                         its requests will time out and count as errors",
                        scenario.name,
                        latency_ms,
                        timeout_ms
                    );
                }
            }
        }

        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = FaultlineConfig::default();
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
