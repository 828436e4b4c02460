//! Search coordination: global best tracking and termination policy.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::crypto::{self, CryptoError};
use crate::report::Report;
use crate::scorer::{Candidate, SearchMode};
use crate::worker::{ResultChannel, WorkerError, WorkerPool, DEFAULT_CAPACITY};

/// Interval between polls of the result channel.
pub const DEFAULT_CADENCE: Duration = Duration::from_millis(100);

/// Time workers get to exit after being told to stop.
pub const DEFAULT_GRACE: Duration = Duration::from_millis(500);

/// Parameters of one search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    /// Number of worker threads (0 = one per CPU)
    pub workers: usize,
    /// Wall-clock budget
    pub time_budget: Option<Duration>,
    /// Stop once the best key has at least this many leading zero bits
    pub target_zero_bits: Option<u32>,
    /// Candidate ordering
    pub mode: SearchMode,
    /// Include the generation rate in reports
    pub verbose: bool,
    /// Poll interval
    pub cadence: Duration,
    /// Shutdown grace period
    pub grace: Duration,
}

impl SearchSettings {
    /// Returns the number of workers, defaulting to CPU count.
    pub fn worker_count(&self) -> usize {
        match self.workers {
            0 => num_cpus::get(),
            n => n,
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            workers: 0,
            time_budget: None,
            target_zero_bits: None,
            mode: SearchMode::default(),
            verbose: false,
            cadence: DEFAULT_CADENCE,
            grace: DEFAULT_GRACE,
        }
    }
}

/// Why a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The stop handle was triggered from outside the loop
    Requested,
    /// The wall-clock budget ran out
    TimeBudget,
    /// The best key reached the target
    TargetReached,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Requested => write!(f, "stop requested"),
            StopReason::TimeBudget => write!(f, "time budget reached"),
            StopReason::TargetReached => write!(f, "target reached"),
        }
    }
}

/// Result of a finished search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// The best candidate seen, if any
    pub best: Option<Candidate>,
    /// Keys generated across all workers
    pub total_keys: u64,
    /// Duration of the search loop
    pub elapsed: Duration,
    /// Average generation rate over the pool's lifetime
    pub keys_per_second: f64,
    /// Why the search ended
    pub reason: StopReason,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Key generator unavailable: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Worker {worker_id} failed: {source}")]
    WorkerFailed {
        worker_id: usize,
        #[source]
        source: WorkerError,
    },
}

/// Runs the worker pool and merges its results into a global best.
///
/// A coordinator drives a single search: [`run`](Self::run) consumes it.
pub struct SearchCoordinator {
    settings: SearchSettings,
    stop_flag: Arc<AtomicBool>,
}

impl SearchCoordinator {
    /// Creates a coordinator; nothing runs until [`run`](Self::run).
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            settings,
            stop_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns a clone of the stop flag for external use (e.g., signal handlers).
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Requests the search to stop at the next tick.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Runs the search until a stop condition holds, calling `on_report` for
    /// every improvement of the global best.
    ///
    /// Each tick sleeps for the cadence, takes at most one candidate off the
    /// channel, and then checks the stop conditions. A worker that fails or
    /// panics ends the search with that error.
    pub fn run<F>(self, mut on_report: F) -> Result<SearchOutcome, SearchError>
    where
        F: FnMut(&Report<'_>),
    {
        crypto::initialize()?;

        let settings = &self.settings;
        let results = ResultChannel::new(DEFAULT_CAPACITY);
        let mut pool = WorkerPool::spawn(settings.worker_count(), settings.mode, results.clone())?;
        info!(
            workers = pool.num_workers(),
            mode = %settings.mode,
            "search started"
        );

        let start = Instant::now();
        let mut reason = StopReason::Requested;
        let mut failure = None;
        let mut best: Option<Candidate> = None;

        while !self.stop_flag.load(Ordering::Relaxed) {
            thread::sleep(settings.cadence);

            if let Some(candidate) = results.try_pop() {
                if settings.mode.improves_on(&candidate, best.as_ref()) {
                    debug!(
                        bits = candidate.leading_zero_bits(),
                        groups = candidate.zero_address_groups(),
                        "new global best"
                    );
                    let best = best.insert(candidate);
                    on_report(&Report {
                        elapsed: start.elapsed(),
                        total_keys: pool.total_keys(),
                        verbose: settings.verbose,
                        best,
                    });
                }
            }

            if let Some(f) = pool.failure() {
                failure = Some(f);
                self.stop();
                break;
            }

            if let Some(budget) = settings.time_budget {
                if start.elapsed() > budget {
                    reason = StopReason::TimeBudget;
                    self.stop();
                }
            }

            if let (Some(target), Some(best)) = (settings.target_zero_bits, best.as_ref()) {
                if best.leading_zero_bits() >= target {
                    reason = StopReason::TargetReached;
                    self.stop();
                }
            }
        }

        let elapsed = start.elapsed();
        let total_keys = pool.total_keys();
        let keys_per_second = pool.keys_per_second();
        pool.shutdown(settings.grace);

        if let Some(f) = failure {
            return Err(SearchError::WorkerFailed {
                worker_id: f.worker_id,
                source: f.error,
            });
        }

        info!(%reason, total_keys, "search finished");
        Ok(SearchOutcome {
            best,
            total_keys,
            elapsed,
            keys_per_second,
            reason,
        })
    }
}
