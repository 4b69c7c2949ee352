//! Scenario and fault definitions

use crate::error::ScenarioError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::fmt;
use std::time::Duration;

/// Longest load window a scenario may ask for
pub const MAX_SCENARIO_DURATION_SECS: u64 = 24 * 60 * 60;

const MIN_PACING: Duration = Duration::from_micros(1);

/// Delay between two submissions at `target_rate` requests per second,
/// floored at one microsecond.
///
/// Returns `None` when the rate is not a positive finite number or is so low
/// that the delay does not fit in a `Duration`.
pub fn pacing_interval(target_rate: f64) -> Option<Duration> {
    if !target_rate.is_finite() || target_rate <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(1.0 / target_rate)
        .ok()
        .map(|interval| interval.max(MIN_PACING))
}

/// A single failure mode applied to the dependency route for one scenario.
///
/// Every variant maps onto exactly one control-plane action: a toxic for
/// `Latency` and `Bandwidth`, a route toggle for `Disable`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FaultSpec {
    /// Delay every chunk of data crossing the route
    Latency {
        latency_ms: u64,
        #[serde(default)]
        jitter_ms: u64,
    },

    /// Throttle the route to the given rate in KB/s
    Bandwidth { rate_kbps: u64 },

    /// Take the route down entirely
    Disable,
}

impl FaultSpec {
    /// Toxic type understood by the control plane, or `None` when the fault
    /// is applied by toggling the route instead
    pub fn toxic_type(&self) -> Option<&'static str> {
        match self {
            FaultSpec::Latency { .. } => Some("latency"),
            FaultSpec::Bandwidth { .. } => Some("bandwidth"),
            FaultSpec::Disable => None,
        }
    }

    /// Toxic attributes in the control plane's wire format
    pub fn toxic_attributes(&self) -> Option<JsonValue> {
        match self {
            FaultSpec::Latency {
                latency_ms,
                jitter_ms,
            } => Some(json!({ "latency": latency_ms, "jitter": jitter_ms })),
            FaultSpec::Bandwidth { rate_kbps } => Some(json!({ "rate": rate_kbps })),
            FaultSpec::Disable => None,
        }
    }

    fn validate(&self) -> Result<(), String> {
        match self {
            FaultSpec::Latency { latency_ms: 0, .. } => {
                Err("latency_ms must be greater than 0".to_string())
            }
            FaultSpec::Bandwidth { rate_kbps: 0 } => {
                Err("rate_kbps must be greater than 0".to_string())
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for FaultSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultSpec::Latency {
                latency_ms,
                jitter_ms,
            } => write!(f, "latency {}ms ±{}ms", latency_ms, jitter_ms),
            FaultSpec::Bandwidth { rate_kbps } => write!(f, "bandwidth {}KB/s", rate_kbps),
            FaultSpec::Disable => write!(f, "route disabled"),
        }
    }
}

/// One named, time-boxed load window with an optional armed fault
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Display name, also used as the report row label
    pub name: String,

    /// Length of the submission window in seconds
    #[serde(rename = "duration")]
    pub duration_secs: u64,

    /// Offered load in requests per second
    pub target_rate: f64,

    /// Fault armed for the whole window; `None` is a baseline run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault: Option<FaultSpec>,
}

impl Scenario {
    /// Create a baseline scenario with no fault
    pub fn baseline(name: impl Into<String>, duration_secs: u64, target_rate: f64) -> Self {
        Self {
            name: name.into(),
            duration_secs,
            target_rate,
            fault: None,
        }
    }

    /// Attach a fault to this scenario
    pub fn with_fault(mut self, fault: FaultSpec) -> Self {
        self.fault = Some(fault);
        self
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    /// Delay between two submissions at the target rate
    pub fn pacing_interval(&self) -> Option<Duration> {
        pacing_interval(self.target_rate)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.name.trim().is_empty() {
            return Err(ScenarioError::EmptyName);
        }
        if self.duration_secs == 0 {
            return Err(ScenarioError::ZeroDuration(self.name.clone()));
        }
        if self.duration_secs > MAX_SCENARIO_DURATION_SECS {
            return Err(ScenarioError::DurationTooLong {
                name: self.name.clone(),
                secs: self.duration_secs,
                max: MAX_SCENARIO_DURATION_SECS,
            });
        }
        if self.pacing_interval().is_none() {
            return Err(ScenarioError::InvalidRate {
                name: self.name.clone(),
                rate: self.target_rate,
            });
        }
        if let Some(fault) = &self.fault {
            fault
                .validate()
                .map_err(|message| ScenarioError::InvalidFault {
                    name: self.name.clone(),
                    message,
                })?;
        }
        Ok(())
    }
}

/// The standard sequence: baseline, dependency latency, dependency down and
/// bandwidth-limited, in that order
pub fn standard_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::baseline("Baseline", 10, 20.0),
        Scenario::baseline("Dependency Latency", 15, 20.0).with_fault(FaultSpec::Latency {
            latency_ms: 2000,
            jitter_ms: 100,
        }),
        Scenario::baseline("Dependency Down", 10, 20.0).with_fault(FaultSpec::Disable),
        Scenario::baseline("Bandwidth Limited", 10, 20.0)
            .with_fault(FaultSpec::Bandwidth { rate_kbps: 1 }),
    ]
}
