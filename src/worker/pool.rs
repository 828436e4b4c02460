//! Worker pool management.

use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, error, warn};

use crate::crypto::CryptoError;
use crate::scorer::{Candidate, SearchMode};

use super::cpu::{SearchWorker, WorkerState, WorkerStats};
use super::ResultChannel;

/// How often shutdown checks whether worker threads have finished.
const SHUTDOWN_POLL: Duration = Duration::from_millis(5);

/// Why a worker thread ended before it was told to stop.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkerError {
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("worker panicked: {0}")]
    Panicked(String),
}

/// A fatal error reported by one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerFailure {
    /// The ID of the worker that failed
    pub worker_id: usize,
    /// What went wrong
    pub error: WorkerError,
}

/// Outcome of [`WorkerPool::shutdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownSummary {
    /// Workers whose threads finished within the grace period
    pub joined: usize,
    /// Workers still running when the grace period ran out
    pub detached: usize,
}

/// Manages the search worker threads.
pub struct WorkerPool {
    /// Worker thread handles (Option to allow taking during shutdown)
    handles: Option<Vec<JoinHandle<()>>>,
    /// Per-worker statistics, indexed by worker ID
    stats: Vec<Arc<WorkerStats>>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// First fatal error reported by any worker
    failure: Arc<Mutex<Option<WorkerFailure>>>,
    /// Start time
    start_time: Instant,
}

impl WorkerPool {
    /// Spawns `num_workers` search workers publishing into `results`.
    pub fn spawn(
        num_workers: usize,
        mode: SearchMode,
        results: ResultChannel<Candidate>,
    ) -> io::Result<Self> {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let failure = Arc::new(Mutex::new(None));
        let stats: Vec<_> = (0..num_workers).map(|_| Arc::new(WorkerStats::new())).collect();

        let mut pool = Self {
            handles: Some(Vec::with_capacity(num_workers)),
            stats,
            stop_flag,
            failure,
            start_time: Instant::now(),
        };

        for id in 0..num_workers {
            let worker = SearchWorker::new(
                id,
                mode,
                results.clone(),
                pool.stop_flag.clone(),
                pool.stats[id].clone(),
            );
            let failure = pool.failure.clone();

            // On error the partially built pool is dropped, which stops and
            // joins the workers spawned so far.
            let handle = thread::Builder::new()
                .name(format!("ygg-worker-{}", id))
                .spawn(move || run_guarded(id, &failure, || worker.run()))?;

            if let Some(handles) = pool.handles.as_mut() {
                handles.push(handle);
            }
        }

        debug!(workers = num_workers, %mode, "worker pool started");
        Ok(pool)
    }

    /// Signals all workers to stop.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Returns true if the pool has been signaled to stop.
    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }

    /// Stops the workers and waits up to `grace` for their threads to exit.
    ///
    /// Threads that finish in time are joined; the rest are left detached.
    pub fn shutdown(&mut self, grace: Duration) -> ShutdownSummary {
        self.stop();

        let Some(handles) = self.handles.take() else {
            return ShutdownSummary {
                joined: 0,
                detached: 0,
            };
        };

        let deadline = Instant::now() + grace;
        while Instant::now() < deadline && !handles.iter().all(|h| h.is_finished()) {
            thread::sleep(SHUTDOWN_POLL);
        }

        let mut summary = ShutdownSummary {
            joined: 0,
            detached: 0,
        };
        for handle in handles {
            if handle.is_finished() {
                if handle.join().is_err() {
                    warn!("worker thread panicked outside its guard");
                }
                summary.joined += 1;
            } else {
                summary.detached += 1;
            }
        }

        if summary.detached > 0 {
            warn!(
                detached = summary.detached,
                "workers still running after {:?} grace period", grace
            );
        } else {
            debug!(joined = summary.joined, "all workers stopped");
        }
        summary
    }

    /// Returns the number of workers.
    pub fn num_workers(&self) -> usize {
        self.stats.len()
    }

    /// Returns the total keys generated across all workers.
    pub fn total_keys(&self) -> u64 {
        self.stats.iter().map(|s| s.generated_key_count()).sum()
    }

    /// Returns each worker's lifecycle state.
    pub fn worker_states(&self) -> Vec<WorkerState> {
        self.stats.iter().map(|s| s.state()).collect()
    }

    /// Returns the first fatal worker error, if any.
    pub fn failure(&self) -> Option<WorkerFailure> {
        self.failure
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Returns the elapsed time since the pool was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns the current generation rate (keys per second).
    pub fn keys_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.total_keys() as f64 / elapsed
        } else {
            0.0
        }
    }
}

/// Runs one worker body, recording an error return or a panic as the
/// pool's failure. Only the first failure is kept.
fn run_guarded<F>(id: usize, failure: &Mutex<Option<WorkerFailure>>, job: F)
where
    F: FnOnce() -> Result<(), CryptoError>,
{
    let error = match panic::catch_unwind(AssertUnwindSafe(job)) {
        Ok(Ok(())) => return,
        Ok(Err(e)) => WorkerError::Crypto(e),
        Err(payload) => WorkerError::Panicked(panic_message(payload.as_ref())),
    };

    error!(worker = id, "search worker failed: {}", error);
    let mut slot = failure.lock().unwrap_or_else(|p| p.into_inner());
    slot.get_or_insert(WorkerFailure {
        worker_id: id,
        error,
    });
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
        // Wait for workers to finish if they haven't been shut down
        if let Some(handles) = self.handles.take() {
            for handle in handles {
                if handle.join().is_err() {
                    warn!("worker thread panicked outside its guard");
                }
            }
        }
    }
}
