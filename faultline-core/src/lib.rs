//! Core domain models and types for Faultline
//!
//! This crate defines the language of a chaos run: the scenarios that are
//! executed, the faults they arm against a dependency route, the outcome of
//! every request issued during a load window, and the statistics reduced from
//! those outcomes. It has no I/O and minimal dependencies.

pub mod error;
pub mod outcome;
pub mod scenario;
pub mod stats;

// Re-export commonly used types at the crate root
pub use error::{ScenarioError, ScenarioSequence};
pub use outcome::{OutcomeCategory, RequestOutcome};
pub use scenario::{
    pacing_interval, standard_scenarios, FaultSpec, Scenario, MAX_SCENARIO_DURATION_SECS,
};
pub use stats::{LatencySummary, LoadStats, Report, ScenarioResult};
