//! Fixed-size key material: seeds, public keys, secret keys.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Length of an Ed25519 seed in bytes.
pub const SEED_LEN: usize = 32;
/// Length of an Ed25519 public key in bytes.
pub const PUBLIC_KEY_LEN: usize = 32;
/// Length of an expanded secret key (seed followed by the public key).
pub const SECRET_KEY_LEN: usize = 64;

/// Errors raised by key handling and the key generator.
///
/// All of these are fatal for a search: they mean the environment cannot
/// produce trustworthy keys.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    #[error("Ed25519 self-test failed: expected public key {expected}, got {actual}")]
    SelfTest { expected: String, actual: String },

    #[error("OS random source failed: {0}")]
    Rng(String),

    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Decodes a hex string into exactly `N` bytes.
pub fn decode_hex<const N: usize>(s: &str) -> Result<[u8; N], CryptoError> {
    let bytes = Zeroizing::new(hex::decode(s).map_err(|e| CryptoError::InvalidHex(e.to_string()))?);
    if bytes.len() != N {
        return Err(CryptoError::InvalidLength {
            expected: N,
            actual: bytes.len(),
        });
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// A 32-byte key generation seed, treated as a big-endian integer.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; SEED_LEN]);

impl Seed {
    #[inline]
    pub const fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        decode_hex(s).map(Self)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }

    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8; SEED_LEN] {
        &mut self.0
    }

    /// Adds one with carry, wrapping from all-`0xff` to all-zero.
    #[inline]
    pub fn increment(&mut self) {
        for byte in self.0.iter_mut().rev() {
            let (next, overflow) = byte.overflowing_add(1);
            *byte = next;
            if !overflow {
                return;
            }
        }
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Default for Seed {
    fn default() -> Self {
        Self([0u8; SEED_LEN])
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(<redacted>)")
    }
}

/// An Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    #[inline]
    pub const fn from_bytes(bytes: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        decode_hex(s).map(Self)
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// An expanded Ed25519 secret key: the 32-byte seed followed by the public key.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; SECRET_KEY_LEN]);

impl SecretKey {
    #[inline]
    pub const fn from_bytes(bytes: [u8; SECRET_KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        decode_hex(s).map(Self)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; SECRET_KEY_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// A generated key pair together with the seed that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    public_key: PublicKey,
    secret_key: SecretKey,
    seed: Seed,
}

impl KeyPair {
    pub(crate) fn new(public_key: PublicKey, secret_key: SecretKey, seed: Seed) -> Self {
        Self {
            public_key,
            secret_key,
            seed,
        }
    }

    #[inline]
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    #[inline]
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    #[inline]
    pub fn seed(&self) -> &Seed {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_wraps_to_zero() {
        let mut seed = Seed::from_bytes([0xff; SEED_LEN]);
        seed.increment();
        assert_eq!(seed.as_bytes(), &[0u8; SEED_LEN]);
    }

    #[test]
    fn test_increment_carries() {
        let mut bytes = [0u8; SEED_LEN];
        bytes[30] = 0x01;
        bytes[31] = 0xff;
        let mut seed = Seed::from_bytes(bytes);
        seed.increment();

        let mut expected = [0u8; SEED_LEN];
        expected[30] = 0x02;
        assert_eq!(seed.as_bytes(), &expected);
    }

    #[test]
    fn test_increment_low_byte() {
        let mut seed = Seed::default();
        seed.increment();
        seed.increment();
        assert_eq!(seed.as_bytes()[31], 2);
        assert!(seed.as_bytes()[..31].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_hex_round_trip() {
        fn round_trip<const N: usize>() {
            let bytes: [u8; N] = std::array::from_fn(|i| (i as u8).wrapping_mul(37).wrapping_add(11));
            let encoded = hex::encode(bytes);
            assert_eq!(encoded.len(), 2 * N);
            assert_eq!(decode_hex::<N>(&encoded).unwrap(), bytes);
        }

        round_trip::<0>();
        round_trip::<1>();
        round_trip::<7>();
        round_trip::<32>();
        round_trip::<64>();
    }

    #[test]
    fn test_hex_known_bytes() {
        let bytes = [0x12, 0x34, 0x56, 0x78, 0x90, 0xab, 0xcd];
        assert_eq!(hex::encode(bytes), "1234567890abcd");
        assert_eq!(decode_hex::<7>("1234567890abcd").unwrap(), bytes);
    }

    #[test]
    fn test_decode_hex_rejects_bad_input() {
        assert!(matches!(
            decode_hex::<2>("zz00"),
            Err(CryptoError::InvalidHex(_))
        ));
        assert_eq!(
            decode_hex::<2>("00"),
            Err(CryptoError::InvalidLength {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = SecretKey::from_bytes([0xab; SECRET_KEY_LEN]);
        assert!(!format!("{:?}", secret).contains("ab"));
        let seed = Seed::from_bytes([0xcd; SEED_LEN]);
        assert!(!format!("{:?}", seed).contains("cd"));
    }
}
