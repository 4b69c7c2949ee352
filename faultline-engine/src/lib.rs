//! Execution engine for Faultline
//!
//! This crate holds everything that talks to the outside world during a run:
//! - [`HealthProbe`] gates the run on the system under test reporting `UP`
//! - [`ToxiproxyClient`] arranges and restores faults on the dependency route
//! - [`LoadGenerator`] issues paced, bounded-concurrency load for one window
//! - [`ScenarioOrchestrator`] sequences all of the above, one scenario at a time
//!
//! The orchestrator only sees the three seams ([`ReadinessProbe`],
//! [`FaultInjector`], [`LoadDriver`]), so each can be replaced in tests.

pub mod accumulator;
pub mod control_plane;
pub mod error;
pub mod health;
pub mod load;
pub mod orchestrator;
pub mod pool;

pub use accumulator::OutcomeAccumulator;
pub use control_plane::{ControlPlaneError, FaultInjector, ToxiproxyClient};
pub use error::{EngineError, EngineResult};
pub use health::{HealthProbe, ReadinessProbe};
pub use load::{LoadDriver, LoadGenerator};
pub use orchestrator::{RunOutcome, ScenarioOrchestrator};
pub use pool::WorkerPool;

// Re-export for callers wiring up cancellation
pub use tokio_util::sync::CancellationToken;
