//! Key generation and address derivation for the Yggdrasil key search.
//!
//! This module provides:
//! - Fixed-size key types with zeroing of secret material
//! - Seeded Ed25519 key pair generation
//! - Public key to IPv6 address derivation

mod address;
mod generator;
mod keys;

pub use address::{Address, ADDRESS_LEN, ADDRESS_PREFIX, MAX_LEADING_ONES};
pub use generator::{generate, initialize, KeyPairGenerator};
pub use keys::{
    decode_hex, CryptoError, KeyPair, PublicKey, SecretKey, Seed, PUBLIC_KEY_LEN, SECRET_KEY_LEN,
    SEED_LEN,
};
