//! Tracing subscriber setup for Faultline
//!
//! Log lines go to stderr or to a file, in one of the text, compact, pretty
//! or JSON formats. Stdout is left free for command output.

pub mod init;

pub use faultline_config::{LogFormat, LogLevel, LogTarget, LoggingConfig};
pub use init::{build_env_filter, init_logging_from_config, init_simple_tracing};
pub use tracing_appender::non_blocking::WorkerGuard;
