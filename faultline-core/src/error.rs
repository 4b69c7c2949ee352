//! Core error types for Faultline

use thiserror::Error;

/// Errors raised when a scenario definition is not runnable
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScenarioError {
    #[error("Scenario name cannot be empty")]
    EmptyName,

    #[error("Scenario '{0}' must run for at least one second")]
    ZeroDuration(String),

    #[error("Scenario '{name}' must run for at most {max} seconds, got {secs}")]
    DurationTooLong { name: String, secs: u64, max: u64 },

    #[error("Scenario '{name}' has invalid target rate {rate}; expected a finite value greater than 0 whose pacing interval fits in a duration")]
    InvalidRate { name: String, rate: f64 },

    #[error("Scenario '{name}' has an invalid fault: {message}")]
    InvalidFault { name: String, message: String },

    #[error("Duplicate scenario name: {0}")]
    DuplicateName(String),
}

/// Convenience for validating a whole scenario sequence
pub trait ScenarioSequence {
    /// Validate every scenario and reject duplicate names
    fn validate_sequence(&self) -> Result<(), ScenarioError>;
}

impl ScenarioSequence for [crate::Scenario] {
    fn validate_sequence(&self) -> Result<(), ScenarioError> {
        let mut seen = std::collections::HashSet::new();
        for scenario in self {
            scenario.validate()?;
            if !seen.insert(scenario.name.as_str()) {
                return Err(ScenarioError::DuplicateName(scenario.name.clone()));
            }
        }
        Ok(())
    }
}
