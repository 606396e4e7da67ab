// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use gravity_bridge_core::{
    Address, Checkpoint, DomainId, Nonce, Power, ValidatorEntry, ValidatorSet, ValsetArgs,
};
use serde::{Deserialize, Serialize};

/// A committee member as the validators' home chain knows it. A validator that has not
/// registered an Ethereum key yet has no address and is left out of the bridge's set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValsetMember {
    pub power: Power,
    pub eth_address: Option<Address>,
}

/// A validator set proposed on the home chain, before it is submitted to the bridge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Valset {
    pub nonce: Nonce,
    pub members: Vec<ValsetMember>,
}

impl Valset {
    /// Members that can sign on the bridge, in order.
    pub fn members(&self) -> ValidatorSet {
        self.members
            .iter()
            .filter_map(|member| {
                member.eth_address.map(|address| ValidatorEntry {
                    address,
                    power: member.power,
                })
            })
            .collect()
    }

    /// Parallel address and power arrays with unregistered members dropped
    pub fn filter_empty_addresses(&self) -> (Vec<Address>, Vec<Power>) {
        self.members().iter().map(|entry| (entry.address, entry.power)).unzip()
    }

    pub fn to_args(&self) -> ValsetArgs {
        self.members().to_args(self.nonce)
    }

    /// The checkpoint validators are asked to sign for this set
    pub fn checkpoint(&self, domain_id: &DomainId) -> Checkpoint {
        self.members().checkpoint(domain_id, self.nonce)
    }
}
