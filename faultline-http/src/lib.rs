//! HTTP client functionality for Faultline
//!
//! This crate turns the `http` configuration domain into ready-to-use
//! `reqwest` clients. The readiness probe, the control-plane client and the
//! load generator each take a client from the same [`HttpManager`] so pool
//! sizing and timeouts are configured in one place.

pub mod client;
pub mod config;
pub mod errors;

// Re-export main types for convenience
pub use client::HttpManager;
pub use config::HttpConfig;
pub use errors::HttpError;
