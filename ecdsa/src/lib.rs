// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! secp256k1 signatures for Gravity bridge checkpoints.
//!
//! Validators sign the EIP-191 (`personal_sign`) digest of a checkpoint with their
//! Ethereum key. Verification recovers the public key from `(v, r, s)`, derives the
//! Ethereum address from it and compares that against the claimed validator.
//! High-S signatures are rejected, as the bridge contract does.

mod signer;
mod verifier;

pub use signer::EcdsaSigner;
pub use verifier::{EcdsaError, EcdsaVerifier, address_from_verifying_key};
