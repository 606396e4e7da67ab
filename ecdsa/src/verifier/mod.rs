// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use gravity_bridge_core::api::Verifier;
use gravity_bridge_core::{Address, H256};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use keccak_hash::keccak;
use thiserror::Error;
use tracing::trace;


#[derive(Error, Debug, PartialEq)]
pub enum EcdsaError {
    #[error("invalid recovery byte: expected 27 or 28, got {0}")]
    InvalidRecoveryId(u8),
    #[error("malformed signature: {0}")]
    MalformedSignature(String),
    #[error("public key recovery failed: {0}")]
    RecoveryFailed(String),
    #[error("signing failed: {0}")]
    SigningFailed(String),
    #[error("invalid signing key: {0}")]
    InvalidSigningKey(String),
}

/// Offset Ethereum adds to the raw recovery id in `v`.
const ETH_RECOVERY_OFFSET: u8 = 27;

/// secp256k1 verifier recovering Ethereum addresses, the same scheme `ecrecover` uses
#[derive(Debug, Default, Clone, Copy)]
pub struct EcdsaVerifier;

impl EcdsaVerifier {
    pub fn new() -> Self {
        Self
    }

    fn recover_address(
        &self,
        digest: &H256,
        v: u8,
        r: &H256,
        s: &H256,
    ) -> Result<Address, EcdsaError> {
        let recovery_id = parse_recovery_id(v)?;

        let signature = Signature::from_scalars(r.0, s.0)
            .map_err(|e| EcdsaError::MalformedSignature(e.to_string()))?;

        // k256 refuses high-S signatures here, so malleated copies do not recover.
        let key = VerifyingKey::recover_from_prehash(digest.as_bytes(), &signature, recovery_id)
            .map_err(|e| EcdsaError::RecoveryFailed(e.to_string()))?;

        Ok(address_from_verifying_key(&key))
    }
}

impl Verifier for EcdsaVerifier {
    type Error = EcdsaError;

    fn recover(&self, digest: &H256, v: u8, r: &H256, s: &H256) -> Result<Address, Self::Error> {
        self.recover_address(digest, v, r, s).inspect_err(|err| {
            trace!(%err, v, "signature recovery failed");
        })
    }
}

/// Ethereum address of a public key: the last 20 bytes of `keccak256(x || y)`.
pub fn address_from_verifying_key(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    // Skip the 0x04 uncompressed point tag.
    let digest = keccak(&point.as_bytes()[1..]);
    let mut address = [0u8; Address::LEN];
    address.copy_from_slice(&digest.as_bytes()[12..]);
    Address(address)
}

fn parse_recovery_id(v: u8) -> Result<RecoveryId, EcdsaError> {
    let id = match v {
        27 | 28 => v - ETH_RECOVERY_OFFSET,
        _ => return Err(EcdsaError::InvalidRecoveryId(v)),
    };
    RecoveryId::try_from(id).map_err(|_| EcdsaError::InvalidRecoveryId(v))
}

pub(crate) fn to_eth_v(recovery_id: RecoveryId) -> u8 {
    ETH_RECOVERY_OFFSET + recovery_id.to_byte()
}
