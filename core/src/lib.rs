// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Core types of the Gravity bridge validator set rotation.
//!
//! This crate provides the building blocks the valset state machine is assembled from:
//! - Committee representation (addresses, powers, nonces, domain ids)
//! - Deterministic checkpoint hashing compatible with the bridge contract
//! - Power accumulation and the quorum threshold policy
//! - The `Verifier` seam through which signatures are checked
//!
//! Key components:
//! - [`ValidatorSet`]: Ordered committee of [`ValidatorEntry`] records
//! - [`ValsetArgs`]: The parallel-array form callers submit
//! - [`checkpoint`]: Hash of a committee, its nonce and the domain id
//! - [`PowerThreshold`]: Fraction of [`MAX_POWER`] a quorum must reach
//! - [`Signature`]: A present or absent endorsement of a checkpoint

pub mod api;
pub mod checkpoint;
mod error;
mod powertable;
mod signature;
mod threshold;
mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use checkpoint::{checkpoint, encode_checkpoint, signed_message_digest};
pub use error::GravityError;
pub use powertable::{PowerAccumulator, ValidatorEntry, ValidatorSet, ValsetArgs};
pub use signature::{Signature, SignatureOutcome};
pub use threshold::{BASIS_POINTS, PowerThreshold};
pub use types::{
    Address, Checkpoint, DOMAIN_LABEL_MAX_LEN, DomainId, MAX_POWER, Nonce, Power,
    domain_id_from_label, parse_domain_id,
};

// re-exports
pub use keccak_hash::H256;
