//! Quality metrics for keys and addresses.

use crate::crypto::{Address, PublicKey};

/// Counts the leading zero bits of a public key.
#[inline]
pub fn leading_zero_bits(public_key: &PublicKey) -> u32 {
    let mut count = 0;
    for byte in public_key.as_bytes() {
        let bits = byte.leading_zeros();
        count += bits;
        if bits != 8 {
            break;
        }
    }
    count
}

/// Returns the longest run of all-zero 16-bit groups in an address.
///
/// Group 0 holds the prefix and the leading-ones count, so only groups
/// 1 through 7 are considered.
#[inline]
pub fn zero_address_groups(address: &Address) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    for group in address.groups().iter().skip(1) {
        if *group == 0 {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(hex_str: &str) -> PublicKey {
        PublicKey::from_hex(hex_str).unwrap()
    }

    fn address(groups: [u16; 8]) -> Address {
        let mut bytes = [0u8; 16];
        for (i, group) in groups.iter().enumerate() {
            bytes[2 * i..2 * i + 2].copy_from_slice(&group.to_be_bytes());
        }
        Address::from_bytes(bytes)
    }

    #[test]
    fn test_leading_zero_bits_vectors() {
        assert_eq!(
            leading_zero_bits(&key(
                "000000209962eff00defc3fcde53a526f5ed331c7461e3aa3b7a33c020eb8af2"
            )),
            26
        );
        assert_eq!(
            leading_zero_bits(&key(
                "00000034b94aa677c962c41441781ed9b1fb5b45f2b219326d5831485f1a64f9"
            )),
            26
        );
        assert_eq!(
            leading_zero_bits(&key(
                "00000044b94aa677c962c41441781ed9b1fb5b45f2b219326d5831485f1a64f9"
            )),
            25
        );
    }

    #[test]
    fn test_leading_zero_bits_edges() {
        assert_eq!(leading_zero_bits(&PublicKey::from_bytes([0xff; 32])), 0);
        assert_eq!(leading_zero_bits(&PublicKey::from_bytes([0x00; 32])), 256);

        let mut bytes = [0xff; 32];
        bytes[0] = 0x00;
        bytes[1] = 0x01;
        assert_eq!(leading_zero_bits(&PublicKey::from_bytes(bytes)), 15);
    }

    #[test]
    fn test_zero_groups_longest_run() {
        assert_eq!(zero_address_groups(&address([0x200, 1, 0, 0, 2, 0, 0, 0])), 3);
        assert_eq!(zero_address_groups(&address([0x200, 0, 1, 0, 0, 1, 0, 1])), 2);
        assert_eq!(zero_address_groups(&address([0x200, 1, 2, 3, 4, 5, 6, 7])), 0);
        assert_eq!(zero_address_groups(&address([0x200, 0, 0, 0, 0, 0, 0, 0])), 7);
    }

    #[test]
    fn test_zero_groups_skip_group_zero() {
        assert_eq!(zero_address_groups(&address([0, 1, 1, 1, 1, 1, 1, 1])), 0);
        assert_eq!(zero_address_groups(&address([0, 0, 1, 1, 1, 1, 1, 1])), 1);
    }
}
