//! Reduction of request outcomes into scenario-level statistics

use crate::outcome::{OutcomeCategory, RequestOutcome};
use crate::scenario::Scenario;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Latency distribution over the outcomes that carried a sample
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencySummary {
    pub samples: u64,
    pub avg_ms: f64,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub max_ms: f64,
}

impl LatencySummary {
    /// Summarize a set of samples. No samples yields all zeros.
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut sorted = samples.to_vec();
        sorted.sort_unstable_by(|a, b| a.total_cmp(b));

        let len = sorted.len();
        // Nearest rank: the smallest sample with at least p% of samples at or below it
        let percentile = |p: usize| sorted[(len * p).div_ceil(100).clamp(1, len) - 1];

        Self {
            samples: len as u64,
            avg_ms: sorted.iter().sum::<f64>() / len as f64,
            p50_ms: percentile(50),
            p95_ms: percentile(95),
            p99_ms: percentile(99),
            max_ms: sorted[len - 1],
        }
    }
}

/// Counts and latency reduced from one load window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadStats {
    /// Requests handed to the worker pool
    pub submitted: u64,
    pub success_count: u64,
    pub error_count: u64,
    pub fallback_count: u64,
    pub latency: LatencySummary,
    /// Responses per HTTP status; transport failures are not listed
    pub status_codes: BTreeMap<u16, u64>,
}

impl LoadStats {
    /// Reduce a sequence of outcomes. Order does not matter.
    pub fn from_outcomes(submitted: u64, outcomes: impl IntoIterator<Item = RequestOutcome>) -> Self {
        let mut stats = LoadStats {
            submitted,
            ..Default::default()
        };
        let mut samples = Vec::new();

        for outcome in outcomes {
            match outcome.category {
                OutcomeCategory::Success => stats.success_count += 1,
                OutcomeCategory::Fallback => stats.fallback_count += 1,
                OutcomeCategory::Error => stats.error_count += 1,
            }
            if let Some(status) = outcome.status {
                *stats.status_codes.entry(status).or_insert(0) += 1;
            }
            if let Some(latency) = outcome.latency_ms {
                samples.push(latency);
            }
        }

        stats.latency = LatencySummary::from_samples(&samples);
        stats
    }

    /// Requests that produced an outcome
    pub fn completed(&self) -> u64 {
        self.success_count + self.error_count + self.fallback_count
    }

    pub fn avg_latency_ms(&self) -> f64 {
        self.latency.avg_ms
    }
}

/// One report row: a scenario and what its load window observed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario: Scenario,
    pub success_count: u64,
    pub error_count: u64,
    pub fallback_count: u64,
    pub avg_latency_ms: f64,
    pub submitted: u64,
    pub latency: LatencySummary,
    pub status_codes: BTreeMap<u16, u64>,
    /// Completed requests per second of measured wall-clock time
    pub achieved_rps: f64,
    /// Wall-clock bounds of the measure phase
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ScenarioResult {
    pub fn from_stats(
        scenario: Scenario,
        stats: LoadStats,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let elapsed_secs = (finished_at - started_at).num_milliseconds() as f64 / 1000.0;
        let achieved_rps = if elapsed_secs > 0.0 {
            stats.completed() as f64 / elapsed_secs
        } else {
            0.0
        };

        Self {
            scenario,
            success_count: stats.success_count,
            error_count: stats.error_count,
            fallback_count: stats.fallback_count,
            avg_latency_ms: stats.latency.avg_ms,
            submitted: stats.submitted,
            latency: stats.latency,
            status_codes: stats.status_codes,
            achieved_rps,
            started_at,
            finished_at,
        }
    }

    pub fn completed(&self) -> u64 {
        self.success_count + self.error_count + self.fallback_count
    }
}

/// Ordered results of a run, one entry per executed scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub results: Vec<ScenarioResult>,
    /// Set when the run was cancelled before every scenario executed
    #[serde(default)]
    pub interrupted: bool,
}

impl Report {
    pub fn new(title: impl Into<String>, results: Vec<ScenarioResult>) -> Self {
        Self {
            title: title.into(),
            generated_at: Utc::now(),
            results,
            interrupted: false,
        }
    }

    pub fn interrupted(mut self, interrupted: bool) -> Self {
        self.interrupted = interrupted;
        self
    }
}
