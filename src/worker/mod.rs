//! Worker pool for the parallel key search.
//!
//! This module provides:
//! - Single-threaded search workers with cooperative stop
//! - A bounded result channel from workers to the coordinator
//! - Pool lifecycle, statistics and failure reporting

mod channel;
mod cpu;
mod pool;

pub use channel::{ResultChannel, DEFAULT_CAPACITY};
pub use cpu::{SearchWorker, WorkerState, WorkerStats};
pub use pool::{ShutdownSummary, WorkerError, WorkerFailure, WorkerPool};
