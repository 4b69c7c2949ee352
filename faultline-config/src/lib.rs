//! Domain-driven configuration management for Faultline
//!
//! This crate provides modular configuration split by functional domains,
//! with validation, defaults, and environment variable support.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use validation::Validatable;

// Re-export domain configurations
pub use domains::{
    control_plane::{ControlPlaneConfig, RouteConfig},
    http::{ConnectionPoolConfig, HttpConfig},
    load::LoadConfig,
    logging::{LogFormat, LogLevel, LogTarget, LoggingConfig},
    report::ReportConfig,
    target::TargetConfig,
    FaultlineConfig,
};

// Re-export utilities
pub use domains::utils::serde_duration;
