//! # ygg_genkeys
//!
//! Parallel search for Ed25519 keys with short Yggdrasil IPv6 addresses.
//!
//! ## Architecture
//!
//! - `crypto`: Seeded key generation and address derivation
//! - `scorer`: Candidate metrics and ordering
//! - `worker`: Search workers, result channel and pool management
//! - `coordinator`: Global best tracking and stop conditions
//! - `report`: Per-improvement output
//! - `config`: Runtime configuration

pub mod config;
pub mod coordinator;
pub mod crypto;
pub mod report;
pub mod scorer;
pub mod worker;

pub use config::Config;
pub use coordinator::{SearchCoordinator, SearchError, SearchOutcome, SearchSettings, StopReason};
pub use crypto::{Address, KeyPair, KeyPairGenerator, PublicKey, SecretKey, Seed};
pub use report::Report;
pub use scorer::{Candidate, SearchMode};
pub use worker::{ResultChannel, SearchWorker, WorkerPool};
