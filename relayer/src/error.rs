// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use gravity_bridge_core::Address;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum RelayerError {
    #[error("current validator set has mismatched address and power counts")]
    MalformedCurrentValset,

    #[error("proposed validator set has mismatched address and power counts")]
    MalformedProposal,

    #[error("proposed validator set is empty")]
    EmptyProposal,

    #[error("{0} is not a member of the current validator set")]
    UnknownSigner(Address),

    #[error("{0} already confirmed this validator set")]
    DuplicateConfirm(Address),

    #[error("confirm from {0} carries no signature")]
    Abstention(Address),

    #[error("confirm from {0} does not sign the proposed checkpoint")]
    InvalidConfirm(Address),
}
