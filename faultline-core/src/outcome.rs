//! Per-request outcome taxonomy

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a single request issued during a load window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeCategory {
    /// HTTP 200
    Success,
    /// HTTP 503, the degraded path signalled by a circuit breaker
    Fallback,
    /// Any other status, or no response at all
    Error,
}

impl OutcomeCategory {
    /// Classify an HTTP status code
    pub fn from_status(status: u16) -> Self {
        match status {
            200 => OutcomeCategory::Success,
            503 => OutcomeCategory::Fallback,
            _ => OutcomeCategory::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeCategory::Success => "success",
            OutcomeCategory::Fallback => "fallback",
            OutcomeCategory::Error => "error",
        }
    }
}

impl fmt::Display for OutcomeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one request.
///
/// A transport failure (connection refused, timeout) carries neither a
/// status nor a latency sample and is always an `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RequestOutcome {
    pub category: OutcomeCategory,
    pub status: Option<u16>,
    pub latency_ms: Option<f64>,
}

impl RequestOutcome {
    /// Outcome of a request that produced an HTTP response
    pub fn from_response(status: u16, latency_ms: f64) -> Self {
        Self {
            category: OutcomeCategory::from_status(status),
            status: Some(status),
            latency_ms: Some(latency_ms),
        }
    }

    /// Outcome of a request that failed before a response arrived
    pub fn transport_failure() -> Self {
        Self {
            category: OutcomeCategory::Error,
            status: None,
            latency_ms: None,
        }
    }

    pub fn is_transport_failure(&self) -> bool {
        self.status.is_none()
    }
}
