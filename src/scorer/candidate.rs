//! Scored search candidates and the ordering between them.

use crate::crypto::{Address, KeyPair};

use super::metrics::{leading_zero_bits, zero_address_groups};

/// What makes one candidate better than another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// More leading zero bits in the public key
    #[default]
    HighestLeadingZeroBits,
    /// Longer run of zero address groups, ties broken by leading zero bits
    MostZeroAddressGroups,
}

impl SearchMode {
    /// Returns true if `a` is strictly better than `b` under this mode.
    ///
    /// Irreflexive: equal scores are never better, so the first candidate
    /// found with a given score is kept.
    #[inline]
    pub fn is_better(self, a: &Candidate, b: &Candidate) -> bool {
        match self {
            SearchMode::HighestLeadingZeroBits => a.leading_zero_bits > b.leading_zero_bits,
            SearchMode::MostZeroAddressGroups => {
                a.zero_address_groups > b.zero_address_groups
                    || (a.zero_address_groups == b.zero_address_groups
                        && a.leading_zero_bits > b.leading_zero_bits)
            }
        }
    }

    /// Like [`is_better`](Self::is_better), with nothing counting as worst.
    #[inline]
    pub fn improves_on(self, candidate: &Candidate, best: Option<&Candidate>) -> bool {
        best.map_or(true, |best| self.is_better(candidate, best))
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMode::HighestLeadingZeroBits => write!(f, "leading zero bits"),
            SearchMode::MostZeroAddressGroups => write!(f, "zero address groups"),
        }
    }
}

/// A generated key pair with its address and precomputed scores.
#[derive(Debug, Clone)]
pub struct Candidate {
    keypair: KeyPair,
    address: Address,
    leading_zero_bits: u32,
    zero_address_groups: u32,
}

impl Candidate {
    /// Derives the address and scores for a key pair.
    pub fn new(keypair: KeyPair) -> Self {
        let address = Address::for_key(keypair.public_key());
        Self {
            leading_zero_bits: leading_zero_bits(keypair.public_key()),
            zero_address_groups: zero_address_groups(&address),
            keypair,
            address,
        }
    }

    #[inline]
    pub fn keypair(&self) -> &KeyPair {
        &self.keypair
    }

    #[inline]
    pub fn address(&self) -> &Address {
        &self.address
    }

    #[inline]
    pub fn leading_zero_bits(&self) -> u32 {
        self.leading_zero_bits
    }

    #[inline]
    pub fn zero_address_groups(&self) -> u32 {
        self.zero_address_groups
    }
}
