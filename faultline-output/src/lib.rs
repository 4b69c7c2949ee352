//! Report output for Faultline
//!
//! A run produces one Markdown report (and optionally a JSON twin) under a
//! timestamped filename. The report is the run's only durable output, so
//! every write failure is returned to the caller.

pub mod errors;
pub mod markdown;
pub mod writer;

pub use errors::OutputError;
pub use markdown::render_markdown;
pub use writer::ReportWriter;
