// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::{Address, DomainId, MAX_POWER, Power, domain_id_from_label};
use keccak_hash::{H256, keccak};

/// Committee powers normalized so they sum to exactly [`MAX_POWER`].
pub const EXAMPLE_POWERS: [Power; 16] = [
    1_000_000_000,
    500_000_000,
    400_000_000,
    300_000_000,
    600_000_000,
    150_000_000,
    50_000_000,
    40_000_000,
    500_000_000,
    30_000_000,
    300_000_000,
    10_000_000,
    200_000_000,
    7_345_407,
    150_000_000,
    57_621_889,
];

/// Positions whose abstention drops [`EXAMPLE_POWERS`] to 2807621889, just under two thirds.
pub const SUB_QUORUM_ABSTAINERS: [usize; 9] = [1, 2, 3, 5, 6, 7, 9, 11, 13];

pub fn example_powers() -> Vec<Power> {
    debug_assert_eq!(EXAMPLE_POWERS.iter().sum::<Power>(), MAX_POWER);
    EXAMPLE_POWERS.to_vec()
}

pub fn test_domain_id() -> DomainId {
    // Unwrap is fine here as the label is a short constant.
    domain_id_from_label("foo").unwrap()
}

/// Deterministic addresses for committee members that never need to sign.
pub fn derived_addresses(n: usize) -> Vec<Address> {
    (0..n)
        .map(|i| {
            let digest: H256 = keccak(format!("gravity-test-validator-{i}"));
            let mut address = [0u8; 20];
            address.copy_from_slice(&digest.as_bytes()[12..]);
            Address(address)
        })
        .collect()
}
