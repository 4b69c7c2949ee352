//! Engine error types

use faultline_http::HttpError;
use thiserror::Error;

/// Errors that stop a run
#[derive(Debug, Error)]
pub enum EngineError {
    /// The readiness gate timed out; no scenario may run
    #[error("System under test did not become ready within {timeout_secs}s")]
    NotReady { timeout_secs: u64 },

    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] HttpError),
}

pub type EngineResult<T> = Result<T, EngineError>;
