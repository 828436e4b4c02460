//! Seeded Ed25519 key pair generation.
//!
//! A generator draws one random seed and then walks the seed space by
//! incrementing it. Sequential seeds are related, so at most one key pair
//! from a run should ever be used.

use std::sync::OnceLock;

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::{debug, error};
use zeroize::{Zeroize, Zeroizing};

use super::{decode_hex, CryptoError, KeyPair, PublicKey, SecretKey, Seed};

const SELF_TEST_SEED: &str = "ef04f3926ed9959d407ab2c14c04fe4742cdf833bad31ea8c797b6ee10e7a5e2";
const SELF_TEST_PUBLIC: &str = "c14f47307e7b1a45df5ba772fe1f36249996df3cd346e192f0e9eff49fa4c506";

static INIT: OnceLock<Result<(), CryptoError>> = OnceLock::new();

/// Performs one-time setup of the key generation backend.
///
/// Runs a known-answer test against the Ed25519 implementation and probes
/// the OS random source. The outcome is computed once per process and shared
/// by every caller, so this is cheap to call from each worker.
pub fn initialize() -> Result<(), CryptoError> {
    INIT.get_or_init(|| {
        let result = self_test();
        match &result {
            Ok(()) => debug!("key generator self-test passed"),
            Err(e) => error!("key generator self-test failed: {}", e),
        }
        result
    })
    .clone()
}

fn self_test() -> Result<(), CryptoError> {
    let seed = Seed::from_hex(SELF_TEST_SEED)?;
    let expected = decode_hex::<32>(SELF_TEST_PUBLIC)?;

    let keypair = generate(&seed);
    if keypair.public_key().as_bytes() != &expected {
        return Err(CryptoError::SelfTest {
            expected: SELF_TEST_PUBLIC.into(),
            actual: keypair.public_key().to_hex(),
        });
    }

    let mut probe = Zeroizing::new([0u8; 32]);
    OsRng
        .try_fill_bytes(&mut *probe)
        .map_err(|e| CryptoError::Rng(e.to_string()))
}

/// Derives the key pair for a seed.
///
/// Deterministic: the same seed always yields the same key pair.
#[inline]
pub fn generate(seed: &Seed) -> KeyPair {
    let signing_key = SigningKey::from_bytes(seed.as_bytes());
    let public_key = PublicKey::from_bytes(signing_key.verifying_key().to_bytes());
    let keypair_bytes = Zeroizing::new(signing_key.to_keypair_bytes());

    KeyPair::new(public_key, SecretKey::from_bytes(*keypair_bytes), seed.clone())
}

/// Holds the current seed of one search worker.
pub struct KeyPairGenerator {
    seed: Seed,
}

impl KeyPairGenerator {
    /// Creates a generator with an all-zero seed.
    ///
    /// Call [`reseed`](Self::reseed) before generating keys.
    pub fn new() -> Result<Self, CryptoError> {
        Self::with_seed(Seed::default())
    }

    /// Creates a generator starting from a known seed.
    pub fn with_seed(seed: Seed) -> Result<Self, CryptoError> {
        initialize()?;
        Ok(Self { seed })
    }

    /// Replaces the seed with fresh bytes from the OS random source.
    pub fn reseed(&mut self) -> Result<(), CryptoError> {
        OsRng
            .try_fill_bytes(self.seed.as_mut_bytes())
            .map_err(|e| CryptoError::Rng(e.to_string()))
    }

    /// Moves to the next seed.
    #[inline]
    pub fn advance(&mut self) {
        self.seed.increment();
    }

    /// Generates the key pair for the current seed.
    #[inline]
    pub fn generate(&self) -> KeyPair {
        generate(&self.seed)
    }

    /// Returns the current seed.
    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    /// Zeroes the held seed. Also happens on drop.
    pub fn dispose(&mut self) {
        self.seed.zeroize();
    }
}
