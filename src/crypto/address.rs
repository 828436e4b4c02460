//! Yggdrasil IPv6 address representation and derivation.

use std::fmt;
use std::net::Ipv6Addr;

use super::PublicKey;

/// Length of a derived address in bytes.
pub const ADDRESS_LEN: usize = 16;

/// First byte of every derived address (the overlay network prefix).
pub const ADDRESS_PREFIX: u8 = 0x02;

/// Largest leading-ones count the address layout can encode.
pub const MAX_LEADING_ONES: u32 = 127;

const TAIL_LEN: usize = ADDRESS_LEN - 2;

/// A 16-byte network address derived from a public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// Creates an address from raw bytes.
    #[inline]
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the address as raw bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Derives the address for a public key.
    ///
    /// The key is bit-inverted and its leading ones are counted. The first
    /// zero bit terminates the count and is dropped; the remaining bits form
    /// the tail. Layout: `[0x02, ones, tail[..14]]`.
    ///
    /// # Panics
    /// Panics if the inverted key has more than 127 leading ones, which the
    /// address layout cannot represent.
    pub fn for_key(public_key: &PublicKey) -> Self {
        let mut addr = [0u8; ADDRESS_LEN];
        let mut tail = [0u8; TAIL_LEN];

        let mut ones: u32 = 0;
        let mut counting = true;
        let mut acc: u8 = 0;
        let mut acc_bits = 0;
        let mut tail_len = 0;

        'bits: for byte in public_key.as_bytes().iter().map(|b| !b) {
            for shift in (0..8).rev() {
                let bit = (byte >> shift) & 1;

                if counting {
                    if bit == 1 {
                        ones += 1;
                    } else {
                        counting = false;
                    }
                    continue;
                }

                acc = (acc << 1) | bit;
                acc_bits += 1;
                if acc_bits == 8 {
                    tail[tail_len] = acc;
                    tail_len += 1;
                    acc = 0;
                    acc_bits = 0;
                    if tail_len == TAIL_LEN {
                        break 'bits;
                    }
                }
            }
        }

        assert!(
            ones <= MAX_LEADING_ONES,
            "leading ones count {} exceeds {}",
            ones,
            MAX_LEADING_ONES
        );

        addr[0] = ADDRESS_PREFIX;
        addr[1] = ones as u8;
        addr[2..].copy_from_slice(&tail);

        Self(addr)
    }

    /// Returns the eight big-endian 16-bit groups.
    pub fn groups(&self) -> [u16; 8] {
        std::array::from_fn(|i| u16::from_be_bytes([self.0[2 * i], self.0[2 * i + 1]]))
    }

    /// Converts to a standard library IPv6 address.
    pub fn to_ipv6(&self) -> Ipv6Addr {
        Ipv6Addr::from(self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

/// Formats all eight groups in lowercase hex without `::` compression.
impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.groups().iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{:x}", group)?;
        }
        Ok(())
    }
}
