// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use keccak_hash::H256;
use strum_macros::Display;

/// A validator's endorsement of a checkpoint, positionally matched to the current set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Signature {
    /// The validator abstained. Carries no power and is never an error.
    #[default]
    Absent,
    /// Recoverable secp256k1 signature in Ethereum's `(v, r, s)` form, `v` being 27 or 28.
    Present { v: u8, r: H256, s: H256 },
}

impl Signature {
    /// Builds a signature from its wire triple. A zero `v` is the abstention marker.
    pub fn from_vrs(v: u8, r: H256, s: H256) -> Self {
        if v == 0 {
            Signature::Absent
        } else {
            Signature::Present { v, r, s }
        }
    }

    /// Wire triple; abstentions encode as all zeros.
    pub fn to_vrs(&self) -> (u8, H256, H256) {
        match self {
            Signature::Absent => (0, H256::zero(), H256::zero()),
            Signature::Present { v, r, s } => (*v, *r, *s),
        }
    }

    /// A zero `v` is treated as an abstention however the value was built.
    pub fn is_absent(&self) -> bool {
        matches!(self, Signature::Absent | Signature::Present { v: 0, .. })
    }
}

/// Result of checking one signature against the validator it is claimed to belong to.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum SignatureOutcome {
    /// No signature was supplied
    Abstained,
    /// The signature recovers to the claimed validator
    Valid,
    /// The signature is malformed or recovers to someone else
    Invalid,
}
