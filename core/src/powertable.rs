// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::checkpoint::checkpoint;
use crate::signature::SignatureOutcome;
use crate::{Address, Checkpoint, DomainId, Nonce, Power};
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

/// A single committee member.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidatorEntry {
    pub address: Address,
    pub power: Power,
}

/// An ordered committee. Order is significant: it is part of the checkpoint and
/// signatures are matched to members by position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidatorSet(pub Vec<ValidatorEntry>);

impl Deref for ValidatorSet {
    type Target = Vec<ValidatorEntry>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl DerefMut for ValidatorSet {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl FromIterator<ValidatorEntry> for ValidatorSet {
    fn from_iter<T: IntoIterator<Item = ValidatorEntry>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl ValidatorSet {
    /// Sum of the declared power of every entry. Duplicated addresses count once per entry.
    pub fn total_power(&self) -> u128 {
        self.iter()
            .map(|entry| entry.power)
            .collect::<PowerAccumulator>()
            .total()
    }

    pub fn checkpoint(&self, domain_id: &DomainId, nonce: Nonce) -> Checkpoint {
        checkpoint(domain_id, self, nonce)
    }

    /// Splits the set back into the parallel arrays used at the external boundary.
    pub fn to_args(&self, nonce: Nonce) -> ValsetArgs {
        ValsetArgs {
            validators: self.iter().map(|entry| entry.address).collect(),
            powers: self.iter().map(|entry| entry.power).collect(),
            nonce,
        }
    }
}

/// Validator set as submitted by callers: parallel address and power arrays plus a nonce.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValsetArgs {
    pub validators: Vec<Address>,
    pub powers: Vec<Power>,
    #[serde(default)]
    pub nonce: Nonce,
}

impl ValsetArgs {
    pub fn new(validators: Vec<Address>, powers: Vec<Power>, nonce: Nonce) -> Self {
        Self {
            validators,
            powers,
            nonce,
        }
    }

    /// Both arrays have the same length.
    pub fn is_well_formed(&self) -> bool {
        self.validators.len() == self.powers.len()
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Zips the arrays into committee members, or `None` when their lengths differ.
    pub fn to_validator_set(&self) -> Option<ValidatorSet> {
        if !self.is_well_formed() {
            return None;
        }
        Some(
            self.validators
                .iter()
                .zip(&self.powers)
                .map(|(address, power)| ValidatorEntry {
                    address: *address,
                    power: *power,
                })
                .collect(),
        )
    }
}

/// Running total of voting power. Uses twice the width of [`Power`] so summing any
/// realistic committee cannot wrap.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PowerAccumulator {
    total: u128,
}

impl PowerAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, power: Power) {
        self.total = self.total.saturating_add(power as u128);
    }

    /// Adds `power` only for a verified signature; abstentions contribute nothing.
    pub fn tally(&mut self, outcome: SignatureOutcome, power: Power) {
        if outcome == SignatureOutcome::Valid {
            self.add(power);
        }
    }

    pub fn total(&self) -> u128 {
        self.total
    }
}

impl FromIterator<Power> for PowerAccumulator {
    fn from_iter<T: IntoIterator<Item = Power>>(iter: T) -> Self {
        let mut acc = PowerAccumulator::new();
        for power in iter {
            acc.add(power);
        }
        acc
    }
}
