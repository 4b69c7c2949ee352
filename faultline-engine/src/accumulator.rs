//! Outcome accumulator shared by the workers of one load window

use faultline_core::{LoadStats, RequestOutcome};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Collects outcomes from concurrently completing requests.
///
/// Every outcome is stored once; reduction happens in [`snapshot`] so counts
/// and latency statistics are derived from the same set.
///
/// [`snapshot`]: OutcomeAccumulator::snapshot
#[derive(Debug, Default)]
pub struct OutcomeAccumulator {
    submitted: AtomicU64,
    outcomes: Mutex<Vec<RequestOutcome>>,
}

impl OutcomeAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_submission(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record(&self, outcome: RequestOutcome) {
        self.outcomes.lock().push(outcome);
    }

    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }

    pub fn recorded(&self) -> u64 {
        self.outcomes.lock().len() as u64
    }

    pub fn snapshot(&self) -> LoadStats {
        let outcomes = self.outcomes.lock();
        LoadStats::from_outcomes(self.submitted(), outcomes.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_records_are_not_lost() {
        let accumulator = Arc::new(OutcomeAccumulator::new());
        let mut handles = Vec::new();

        for worker in 0..8u16 {
            let accumulator = Arc::clone(&accumulator);
            handles.push(tokio::spawn(async move {
                for i in 0..250u16 {
                    accumulator.record_submission();
                    let outcome = match (worker + i) % 3 {
                        0 => RequestOutcome::from_response(200, 1.0),
                        1 => RequestOutcome::from_response(503, 1.0),
                        _ => RequestOutcome::transport_failure(),
                    };
                    accumulator.record(outcome);
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let stats = accumulator.snapshot();
        assert_eq!(stats.submitted, 2000);
        assert_eq!(stats.completed(), 2000);
        assert_eq!(accumulator.recorded(), 2000);
        assert_eq!(
            stats.latency.samples,
            stats.success_count + stats.fallback_count
        );
    }

    #[test]
    fn test_empty_snapshot() {
        let stats = OutcomeAccumulator::new().snapshot();
        assert_eq!(stats.completed(), 0);
        assert_eq!(stats.avg_latency_ms(), 0.0);
    }
}
