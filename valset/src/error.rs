// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use gravity_bridge_core::{GravityError, Nonce, Power};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ValsetError {
    /// Error when the new validator set is empty or its address and power arrays differ in length.
    #[error("malformed new validator set")]
    MalformedNewValidatorSet,

    /// Error when the current validator set's addresses, powers and signatures differ in length.
    #[error("malformed current validator set")]
    MalformedCurrentValidatorSet,

    /// Error when the supplied current validator set does not hash to the last checkpoint.
    #[error("supplied current validator set does not match the last checkpoint")]
    IncorrectCheckpoint,

    /// Error when the new nonce does not strictly exceed the last accepted nonce.
    #[error("invalid valset nonce: last accepted {0}, got {1}")]
    InvalidValsetNonce(Nonce, Nonce),

    /// Error when a present signature does not recover to its validator's address.
    #[error("invalid signature")]
    InvalidSignature,

    /// Error when endorsing power, or the declared power of a validator set, is not above
    /// the threshold. Reports the power found and the required power.
    #[error("insufficient power: {0} <= {1}")]
    InsufficientPower(u128, Power),

    /// Error when the domain id or threshold configuration is invalid.
    #[error(transparent)]
    Config(#[from] GravityError),
}
