// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use thiserror::Error;
#[derive(Error, Debug, PartialEq)]
pub enum GravityError {
    #[error("domain label must be 1 to 31 bytes long, got {0}")]
    InvalidDomainLabel(usize),

    #[error("domain id must be 32 bytes long, got {0}")]
    InvalidDomainIdLength(usize),

    #[error("invalid power threshold {numerator}/{denominator}")]
    InvalidPowerThreshold { numerator: u64, denominator: u64 },

    #[error("address must be 20 bytes long, got {0}")]
    InvalidAddressLength(usize),

    #[error("invalid hex encoding: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}
