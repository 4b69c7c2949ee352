//! HTTP error types

/// Error type for HTTP client construction
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}
