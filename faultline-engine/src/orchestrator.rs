//! Scenario sequencing: health gate, then arrange / measure / restore per scenario

use crate::control_plane::{FaultInjector, ToxiproxyClient};
use crate::error::{EngineError, EngineResult};
use crate::health::{HealthProbe, ReadinessProbe};
use crate::load::{LoadDriver, LoadGenerator};
use chrono::Utc;
use faultline_config::{FaultlineConfig, RouteConfig};
use faultline_core::{FaultSpec, LoadStats, Scenario, ScenarioResult};
use faultline_http::HttpManager;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Results of a run, in execution order
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub results: Vec<ScenarioResult>,
    /// Cancellation cut the run short; `results` holds what completed
    pub interrupted: bool,
}

/// Fault state armed for the scenario currently being measured
#[derive(Debug, Clone, PartialEq)]
enum ActiveFault {
    /// Baseline, or a route toggle that never took effect
    Nothing,
    /// A toxic; `toxic_id` is `None` when injection failed
    Toxic {
        route: String,
        toxic_id: Option<String>,
    },
    RouteDisabled {
        route: String,
    },
}

impl ActiveFault {
    /// Undo whatever was armed. Consumes the handle so it runs once.
    async fn release(self, injector: &dyn FaultInjector) {
        match self {
            ActiveFault::Nothing => {}
            ActiveFault::Toxic { route, toxic_id } => {
                if let Err(e) = injector.remove_fault(&route, toxic_id.as_deref()).await {
                    error!(route = %route, error = %e, "Failed to remove fault; it may leak into later scenarios");
                }
            }
            ActiveFault::RouteDisabled { route } => {
                if let Err(e) = injector.set_route_enabled(&route, true).await {
                    error!(route = %route, error = %e, "Failed to re-enable route; it may stay down for later scenarios");
                }
            }
        }
    }
}

/// Runs an ordered list of scenarios against one shared dependency route.
///
/// Scenarios execute strictly one after another; only this type changes the
/// route's fault state, and never with two changes in flight.
pub struct ScenarioOrchestrator {
    scenarios: Vec<Scenario>,
    route: RouteConfig,
    probe: Arc<dyn ReadinessProbe>,
    injector: Arc<dyn FaultInjector>,
    driver: Arc<dyn LoadDriver>,
    cancel: CancellationToken,
}

impl ScenarioOrchestrator {
    pub fn new(
        scenarios: Vec<Scenario>,
        route: RouteConfig,
        probe: Arc<dyn ReadinessProbe>,
        injector: Arc<dyn FaultInjector>,
        driver: Arc<dyn LoadDriver>,
    ) -> Self {
        Self {
            scenarios,
            route,
            probe,
            injector,
            driver,
            cancel: CancellationToken::new(),
        }
    }

    /// Wire the real collaborators from configuration
    pub fn from_config(config: &FaultlineConfig, http: &HttpManager) -> EngineResult<Self> {
        let probe = HealthProbe::from_config(&config.target, http)?;
        let injector = ToxiproxyClient::from_config(&config.control_plane, http)?;
        let driver = LoadGenerator::from_config(config, http)?;

        Ok(Self::new(
            config.scenarios.clone(),
            config.control_plane.route.clone(),
            Arc::new(probe),
            Arc::new(injector),
            Arc::new(driver),
        ))
    }

    /// Use an externally owned token, e.g. one cancelled on Ctrl-C
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Execute the whole sequence.
    ///
    /// Fails only when the readiness gate times out. Control-plane failures
    /// are logged and the run continues.
    pub async fn run(&self) -> EngineResult<RunOutcome> {
        let ready = tokio::select! {
            ready = self.probe.wait_ready() => ready,
            _ = self.cancel.cancelled() => {
                warn!("Run interrupted before the system under test became ready");
                return Ok(RunOutcome { results: Vec::new(), interrupted: true });
            }
        };
        if !ready {
            return Err(EngineError::NotReady {
                timeout_secs: self.probe.timeout().as_secs(),
            });
        }

        self.prepare_route().await;

        let total = self.scenarios.len();
        let mut results = Vec::with_capacity(total);
        for (index, scenario) in self.scenarios.iter().enumerate() {
            if self.cancel.is_cancelled() {
                warn!(skipped = total - index, "Run interrupted, skipping remaining scenarios");
                break;
            }
            info!(
                scenario = %scenario.name,
                position = index + 1,
                total,
                "Running scenario"
            );
            results.push(self.execute(scenario).await);
        }

        Ok(RunOutcome {
            results,
            interrupted: self.cancel.is_cancelled(),
        })
    }

    async fn prepare_route(&self) {
        if let Err(e) = self.injector.reset_all().await {
            error!(error = %e, "Failed to reset control plane");
        }
        if let Err(e) = self.injector.configure_route(&self.route).await {
            error!(
                route = %self.route.name,
                error = %e,
                "Failed to configure route; fault scenarios will have no effect"
            );
        }
    }

    async fn execute(&self, scenario: &Scenario) -> ScenarioResult {
        let armed = self.arrange(scenario).await;

        let started_at = Utc::now();
        let stats = self.measure(scenario).await;
        let finished_at = Utc::now();

        armed.release(self.injector.as_ref()).await;

        let result = ScenarioResult::from_stats(scenario.clone(), stats, started_at, finished_at);
        info!(
            scenario = %scenario.name,
            success = result.success_count,
            fail = result.error_count,
            fallback = result.fallback_count,
            avg_latency_ms = result.avg_latency_ms,
            "Scenario finished"
        );
        result
    }

    async fn arrange(&self, scenario: &Scenario) -> ActiveFault {
        let route = &self.route.name;
        match &scenario.fault {
            None => ActiveFault::Nothing,
            Some(FaultSpec::Disable) => match self.injector.set_route_enabled(route, false).await {
                Ok(()) => ActiveFault::RouteDisabled {
                    route: route.clone(),
                },
                Err(e) => {
                    error!(scenario = %scenario.name, error = %e, "Failed to disable route");
                    ActiveFault::Nothing
                }
            },
            Some(fault) => {
                let toxic_id = match self.injector.inject_fault(route, fault).await {
                    Ok(id) => Some(id),
                    Err(e) => {
                        error!(
                            scenario = %scenario.name,
                            fault = %fault,
                            error = %e,
                            "Failed to inject fault; measuring without it"
                        );
                        None
                    }
                };
                ActiveFault::Toxic {
                    route: route.clone(),
                    toxic_id,
                }
            }
        }
    }

    /// Run the load window on its own task so a panicking driver still
    /// returns control here and the armed fault is released
    async fn measure(&self, scenario: &Scenario) -> LoadStats {
        let driver = Arc::clone(&self.driver);
        let cancel = self.cancel.clone();
        let duration = scenario.duration();
        let target_rate = scenario.target_rate;

        let window =
            tokio::spawn(async move { driver.run(duration, target_rate, &cancel).await });

        match window.await {
            Ok(stats) => stats,
            Err(e) => {
                error!(scenario = %scenario.name, error = %e, "Load window failed");
                LoadStats::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control_plane::ControlPlaneError;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingInjector {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl FaultInjector for RecordingInjector {
        async fn reset_all(&self) -> Result<(), ControlPlaneError> {
            Ok(())
        }
        async fn configure_route(&self, _route: &RouteConfig) -> Result<(), ControlPlaneError> {
            Ok(())
        }
        async fn inject_fault(
            &self,
            _route: &str,
            _fault: &FaultSpec,
        ) -> Result<String, ControlPlaneError> {
            Ok("latency_downstream".to_string())
        }
        async fn remove_fault(
            &self,
            route: &str,
            fault_id: Option<&str>,
        ) -> Result<(), ControlPlaneError> {
            self.calls
                .lock()
                .push(format!("remove {} {:?}", route, fault_id));
            Ok(())
        }
        async fn set_route_enabled(
            &self,
            route: &str,
            enabled: bool,
        ) -> Result<(), ControlPlaneError> {
            self.calls.lock().push(format!("enable {} {}", route, enabled));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_release_runs_matching_undo() {
        let injector = RecordingInjector::default();

        ActiveFault::Nothing.release(&injector).await;
        ActiveFault::Toxic {
            route: "r".to_string(),
            toxic_id: Some("t1".to_string()),
        }
        .release(&injector)
        .await;
        ActiveFault::Toxic {
            route: "r".to_string(),
            toxic_id: None,
        }
        .release(&injector)
        .await;
        ActiveFault::RouteDisabled {
            route: "r".to_string(),
        }
        .release(&injector)
        .await;

        assert_eq!(
            *injector.calls.lock(),
            vec![
                "remove r Some(\"t1\")".to_string(),
                "remove r None".to_string(),
                "enable r true".to_string(),
            ]
        );
    }
}
