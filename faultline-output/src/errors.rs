//! Output error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Filesystem error at {path} during {operation}: {error}")]
    Filesystem {
        path: String,
        operation: String,
        error: String,
    },

    #[error("Failed to serialize report as {format}: {error}")]
    Serialization { format: String, error: String },
}

impl OutputError {
    pub(crate) fn filesystem(
        path: &std::path::Path,
        operation: &str,
        error: impl ToString,
    ) -> Self {
        OutputError::Filesystem {
            path: path.display().to_string(),
            operation: operation.to_string(),
            error: error.to_string(),
        }
    }
}
