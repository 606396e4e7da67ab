// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::error::GravityError;
use keccak_hash::H256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// `Power` is the voting weight of a single validator, scaled against [`MAX_POWER`].
pub type Power = u64;
/// `Nonce` is the strictly increasing counter attached to every validator set.
pub type Nonce = u64;
/// `Checkpoint` is the keccak256 digest anchoring a validator set, its nonce and the domain id.
pub type Checkpoint = H256;
/// `DomainId` binds checkpoints to a single bridge instance.
pub type DomainId = H256;

/// Total power of a fully normalized validator set (`2^32`).
pub const MAX_POWER: Power = 1 << 32;

/// Maximum length of a human readable domain label. One byte is kept free so the label is
/// always zero-terminated inside its 32 byte word.
pub const DOMAIN_LABEL_MAX_LEN: usize = 31;

/// Ethereum account address, the identity a validator signs with.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// Length of an address in bytes
    pub const LEN: usize = 20;

    pub fn from_slice(bytes: &[u8]) -> Result<Self, GravityError> {
        let bytes: [u8; Self::LEN] = bytes
            .try_into()
            .map_err(|_| GravityError::InvalidAddressLength(bytes.len()))?;
        Ok(Address(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; Self::LEN]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Address {
    type Err = GravityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        Address::from_slice(&hex::decode(raw)?)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Builds a domain id from a short label, right-padding it with zero bytes the same way
/// Solidity's `formatBytes32String` does.
pub fn domain_id_from_label(label: &str) -> Result<DomainId, GravityError> {
    let bytes = label.as_bytes();
    if bytes.is_empty() || bytes.len() > DOMAIN_LABEL_MAX_LEN {
        return Err(GravityError::InvalidDomainLabel(bytes.len()));
    }
    let mut id = [0u8; 32];
    id[..bytes.len()].copy_from_slice(bytes);
    Ok(H256(id))
}

/// Parses a domain id given either as `0x`-prefixed hex of exactly 32 bytes or as a label.
pub fn parse_domain_id(s: &str) -> Result<DomainId, GravityError> {
    match s.strip_prefix("0x") {
        Some(raw) => {
            let bytes = hex::decode(raw)?;
            if bytes.len() != 32 {
                return Err(GravityError::InvalidDomainIdLength(bytes.len()));
            }
            Ok(H256::from_slice(&bytes))
        }
        None => domain_id_from_label(s),
    }
}
