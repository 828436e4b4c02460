//! CPU worker for the key search.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::crypto::{CryptoError, KeyPairGenerator};
use crate::scorer::{Candidate, SearchMode};

use super::ResultChannel;

/// Lifecycle of a search worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerState {
    Created = 0,
    Running = 1,
    Stopping = 2,
    Stopped = 3,
}

impl WorkerState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => WorkerState::Created,
            1 => WorkerState::Running,
            2 => WorkerState::Stopping,
            _ => WorkerState::Stopped,
        }
    }
}

/// Statistics for one worker, readable from other threads.
#[derive(Debug)]
pub struct WorkerStats {
    /// Total keys generated
    keys_generated: AtomicU64,
    /// Local improvements found
    improvements: AtomicU64,
    /// Current [`WorkerState`]
    state: AtomicU8,
}

impl WorkerStats {
    /// Creates new worker stats.
    pub fn new() -> Self {
        Self {
            keys_generated: AtomicU64::new(0),
            improvements: AtomicU64::new(0),
            state: AtomicU8::new(WorkerState::Created as u8),
        }
    }

    /// Returns the total keys generated.
    pub fn generated_key_count(&self) -> u64 {
        self.keys_generated.load(Ordering::Relaxed)
    }

    /// Returns how many times the worker improved its local best.
    pub fn improvements(&self) -> u64 {
        self.improvements.load(Ordering::Relaxed)
    }

    /// Returns the worker's lifecycle state.
    pub fn state(&self) -> WorkerState {
        WorkerState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: WorkerState) {
        self.state.store(state as u8, Ordering::Release);
    }
}

impl Default for WorkerStats {
    fn default() -> Self {
        Self::new()
    }
}

/// A worker that walks its own seed sequence looking for better keys.
pub struct SearchWorker {
    /// Worker ID
    id: usize,
    /// Ordering used to compare candidates
    mode: SearchMode,
    /// Channel to publish local improvements
    results: ResultChannel<Candidate>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// Worker statistics
    stats: Arc<WorkerStats>,
}

impl SearchWorker {
    /// Creates a new search worker.
    pub fn new(
        id: usize,
        mode: SearchMode,
        results: ResultChannel<Candidate>,
        stop_flag: Arc<AtomicBool>,
        stats: Arc<WorkerStats>,
    ) -> Self {
        Self {
            id,
            mode,
            results,
            stop_flag,
            stats,
        }
    }

    /// Runs the worker loop until the stop flag is set.
    ///
    /// Draws one random seed, then for every iteration advances it, derives
    /// and scores the key pair, and publishes any local improvement. A full
    /// channel drops the publish; the next improvement supersedes it.
    pub fn run(&self) -> Result<(), CryptoError> {
        let mut generator = KeyPairGenerator::new()?;
        generator.reseed()?;
        self.stats.set_state(WorkerState::Running);
        debug!(worker = self.id, "search worker started");

        let mut best: Option<Candidate> = None;
        let mut first = true;

        while !self.stop_flag.load(Ordering::Relaxed) {
            if !first {
                generator.advance();
            }
            first = false;

            let candidate = Candidate::new(generator.generate());
            self.stats.keys_generated.fetch_add(1, Ordering::Relaxed);

            if self.mode.improves_on(&candidate, best.as_ref()) {
                self.stats.improvements.fetch_add(1, Ordering::Relaxed);
                trace!(
                    worker = self.id,
                    bits = candidate.leading_zero_bits(),
                    groups = candidate.zero_address_groups(),
                    "local improvement"
                );
                if self.results.try_push(candidate.clone()).is_err() {
                    trace!(worker = self.id, "result channel full, improvement dropped");
                }
                best = Some(candidate);
            }
        }

        self.stats.set_state(WorkerState::Stopping);
        generator.dispose();
        self.stats.set_state(WorkerState::Stopped);
        debug!(
            worker = self.id,
            keys = self.stats.generated_key_count(),
            "search worker stopped"
        );

        Ok(())
    }

    /// Returns the worker ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the worker statistics.
    pub fn stats(&self) -> &Arc<WorkerStats> {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    fn spawn_worker(
        mode: SearchMode,
        capacity: usize,
    ) -> (
        ResultChannel<Candidate>,
        Arc<AtomicBool>,
        Arc<WorkerStats>,
        thread::JoinHandle<Result<(), CryptoError>>,
    ) {
        let results = ResultChannel::new(capacity);
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stats = Arc::new(WorkerStats::new());
        let worker = SearchWorker::new(0, mode, results.clone(), stop_flag.clone(), stats.clone());
        let handle = thread::spawn(move || worker.run());
        (results, stop_flag, stats, handle)
    }

    #[test]
    fn test_new_worker_is_created() {
        let worker = SearchWorker::new(
            3,
            SearchMode::default(),
            ResultChannel::new(1),
            Arc::new(AtomicBool::new(false)),
            Arc::new(WorkerStats::new()),
        );
        assert_eq!(worker.id(), 3);
        assert_eq!(worker.stats().state(), WorkerState::Created);
        assert_eq!(worker.stats().generated_key_count(), 0);
    }

    #[test]
    fn test_stopped_before_start_generates_nothing() {
        let results = ResultChannel::new(4);
        let stop_flag = Arc::new(AtomicBool::new(true));
        let stats = Arc::new(WorkerStats::new());
        let worker = SearchWorker::new(0, SearchMode::default(), results.clone(), stop_flag, stats.clone());

        worker.run().unwrap();
        assert_eq!(stats.generated_key_count(), 0);
        assert_eq!(stats.state(), WorkerState::Stopped);
        assert!(results.is_empty());
    }

    #[test]
    fn test_worker_publishes_strict_improvements() {
        let mode = SearchMode::HighestLeadingZeroBits;
        let (results, stop_flag, stats, handle) = spawn_worker(mode, 1000);

        let first = results.pop_timeout(Duration::from_secs(5)).expect("first candidate");
        while stats.generated_key_count() < 2000 {
            thread::sleep(Duration::from_millis(5));
        }
        stop_flag.store(true, Ordering::Relaxed);
        handle.join().unwrap().unwrap();

        assert_eq!(stats.state(), WorkerState::Stopped);
        assert!(stats.generated_key_count() >= 2000);

        let mut previous = first;
        let mut published = 1;
        while let Some(next) = results.try_pop() {
            assert!(mode.is_better(&next, &previous));
            previous = next;
            published += 1;
        }
        assert_eq!(published, stats.improvements());
    }

    #[test]
    fn test_full_channel_does_not_block_worker() {
        let (results, stop_flag, stats, handle) = spawn_worker(SearchMode::MostZeroAddressGroups, 1);

        while stats.generated_key_count() < 500 {
            thread::sleep(Duration::from_millis(5));
        }
        stop_flag.store(true, Ordering::Relaxed);
        handle.join().unwrap().unwrap();

        assert_eq!(results.len(), 1);
    }
}
