//! Candidate scoring for the key search.
//!
//! Supports two orderings:
//! - Leading zero bits of the public key (shorter address prefix)
//! - Longest run of zero groups in the derived address

mod candidate;
mod metrics;

pub use candidate::{Candidate, SearchMode};
pub use metrics::{leading_zero_bits, zero_address_groups};
