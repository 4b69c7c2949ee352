//! Paced, bounded-concurrency load generation

use crate::accumulator::OutcomeAccumulator;
use crate::pool::WorkerPool;
use async_trait::async_trait;
use faultline_config::FaultlineConfig;
use faultline_core::{pacing_interval, LoadStats, RequestOutcome};
use faultline_http::{HttpError, HttpManager};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Produces the load for one scenario window
#[async_trait]
pub trait LoadDriver: Send + Sync {
    /// Submit requests at `target_rate` per second until `duration` elapses
    /// or `cancel` fires, then wait for in-flight requests and reduce them.
    async fn run(
        &self,
        duration: Duration,
        target_rate: f64,
        cancel: &CancellationToken,
    ) -> LoadStats;
}

/// Issues GET requests against one endpoint of the system under test
#[derive(Debug, Clone)]
pub struct LoadGenerator {
    client: Client,
    url: Arc<str>,
    concurrency: usize,
}

impl LoadGenerator {
    /// `client` is expected to carry any required headers (API key) itself
    pub fn new(client: Client, url: impl Into<String>, concurrency: usize) -> Self {
        Self {
            client,
            url: Arc::from(url.into()),
            concurrency: concurrency.max(1),
        }
    }

    pub fn from_config(config: &FaultlineConfig, http: &HttpManager) -> Result<Self, HttpError> {
        let target = &config.target;
        let client = http.build_load_client(
            config.load.concurrency,
            &[(target.api_key_header.as_str(), target.api_key.as_str())],
        )?;
        Ok(Self::new(
            client,
            target.endpoint_url(),
            config.load.concurrency,
        ))
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// One request, timed from send to the last byte of the body
async fn issue_request(client: &Client, url: &str) -> RequestOutcome {
    let started = Instant::now();

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            debug!(error = %e, "Request failed before a response arrived");
            return RequestOutcome::transport_failure();
        }
    };

    let status = response.status().as_u16();
    if let Err(e) = response.bytes().await {
        debug!(status, error = %e, "Response body was cut off");
        return RequestOutcome::transport_failure();
    }

    RequestOutcome::from_response(status, started.elapsed().as_secs_f64() * 1000.0)
}

#[async_trait]
impl LoadDriver for LoadGenerator {
    async fn run(
        &self,
        duration: Duration,
        target_rate: f64,
        cancel: &CancellationToken,
    ) -> LoadStats {
        let Some(pacing) = pacing_interval(target_rate) else {
            warn!(target_rate, "Refusing to generate load at an unpaceable rate");
            return LoadStats::default();
        };
        let Some(deadline) = Instant::now().checked_add(duration) else {
            warn!(
                duration_secs = duration.as_secs(),
                "Refusing to open a load window that overflows the clock"
            );
            return LoadStats::default();
        };
        let window = tokio::time::sleep_until(deadline);
        tokio::pin!(window);

        let accumulator = Arc::new(OutcomeAccumulator::new());
        let mut pool = WorkerPool::new(self.concurrency);

        // Ticks past the deadline never fire, so the period need not exceed the window.
        let period = pacing.min(duration.max(Duration::from_micros(1)));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debug!(
            url = %self.url,
            duration_secs = duration.as_secs_f64(),
            target_rate,
            concurrency = self.concurrency,
            "Load window opened"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Load window cancelled, draining in-flight requests");
                    break;
                }
                _ = &mut window => break,
                _ = ticker.tick() => {
                    accumulator.record_submission();
                    let accumulator = Arc::clone(&accumulator);
                    let client = self.client.clone();
                    let url = Arc::clone(&self.url);
                    pool.submit(async move {
                        accumulator.record(issue_request(&client, &url).await);
                    });
                }
            }
        }

        let submitted = accumulator.submitted();
        debug!(submitted, in_flight = pool.pending(), "Submission window closed");

        // A job that panicked never recorded; count it so nothing goes missing
        let panicked = pool.drain().await;
        for _ in 0..panicked {
            accumulator.record(RequestOutcome::transport_failure());
        }

        accumulator.snapshot()
    }
}
