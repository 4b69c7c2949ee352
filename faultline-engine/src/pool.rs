//! Bounded worker pool with a submit/drain lifecycle

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error};

/// Runs submitted jobs with at most `concurrency` of them executing at once.
///
/// `submit` never waits: the job is spawned immediately and queues on the
/// pool's permits, so a slow job cannot hold back the caller's pacing. A job
/// does not start (and therefore does not start timing) until it holds a
/// permit.
#[derive(Debug)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    tasks: JoinSet<()>,
    concurrency: usize,
}

impl WorkerPool {
    /// Create a pool; a concurrency of 0 is raised to 1
    pub fn new(concurrency: usize) -> Self {
        let concurrency = concurrency.max(1);
        Self {
            permits: Arc::new(Semaphore::new(concurrency)),
            tasks: JoinSet::new(),
            concurrency,
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Jobs submitted and not yet reaped, running or queued
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn submit<F>(&mut self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let permits = Arc::clone(&self.permits);
        self.tasks.spawn(async move {
            // The semaphore is never closed, so acquisition only fails if it is
            let _permit = permits.acquire_owned().await.ok();
            job.await;
        });
    }

    /// Wait for every submitted job to finish. Returns how many panicked.
    pub async fn drain(mut self) -> usize {
        debug!(pending = self.tasks.len(), "Draining worker pool");
        let mut panicked = 0;
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Worker job failed");
                panicked += 1;
            }
        }
        panicked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_concurrency_ceiling() {
        let mut pool = WorkerPool::new(3);
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicUsize::new(0));

        for _ in 0..12 {
            let active = Arc::clone(&active);
            let peak = Arc::clone(&peak);
            let finished = Arc::clone(&finished);
            pool.submit(async move {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                active.fetch_sub(1, Ordering::SeqCst);
                finished.fetch_add(1, Ordering::SeqCst);
            });
        }

        assert_eq!(pool.pending(), 12);
        assert_eq!(pool.drain().await, 0);
        assert_eq!(finished.load(Ordering::SeqCst), 12);
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(peak.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn test_submit_does_not_block() {
        let mut pool = WorkerPool::new(1);
        let started = std::time::Instant::now();
        for _ in 0..5 {
            pool.submit(async {
                tokio::time::sleep(Duration::from_millis(100)).await;
            });
        }
        // All five are queued long before the first job finishes
        assert!(started.elapsed() < Duration::from_millis(100));
        pool.drain().await;
        assert!(started.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_drain_counts_panics() {
        let mut pool = WorkerPool::new(2);
        pool.submit(async {});
        pool.submit(async {
            if true {
                panic!("job failed");
            }
        });
        assert_eq!(pool.drain().await, 1);
    }

    #[test]
    fn test_zero_concurrency_is_raised() {
        assert_eq!(WorkerPool::new(0).concurrency(), 1);
    }
}
