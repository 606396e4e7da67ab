// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::verifier::{EcdsaError, address_from_verifying_key, to_eth_v};
use gravity_bridge_core::{Address, Checkpoint, H256, Signature, signed_message_digest};
use k256::ecdsa::{RecoveryId, SigningKey};

/// A validator's Ethereum key, used to endorse checkpoints
pub struct EcdsaSigner {
    key: SigningKey,
    address: Address,
}

impl EcdsaSigner {
    pub fn new(key: SigningKey) -> Self {
        let address = address_from_verifying_key(key.verifying_key());
        Self { key, address }
    }

    /// Builds a signer from a raw 32 byte secret scalar.
    pub fn from_slice(secret: &[u8]) -> Result<Self, EcdsaError> {
        let key = SigningKey::from_slice(secret)
            .map_err(|e| EcdsaError::InvalidSigningKey(e.to_string()))?;
        Ok(Self::new(key))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Signs a raw 32 byte digest, returning a low-S signature with `v` in {27, 28}.
    pub fn sign_digest(&self, digest: &H256) -> Result<Signature, EcdsaError> {
        let (mut signature, mut recovery_id) = self
            .key
            .sign_prehash_recoverable(digest.as_bytes())
            .map_err(|e| EcdsaError::SigningFailed(e.to_string()))?;

        if let Some(normalized) = signature.normalize_s() {
            signature = normalized;
            recovery_id = RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced());
        }

        let (r, s) = signature.split_bytes();
        Ok(Signature::Present {
            v: to_eth_v(recovery_id),
            r: H256::from_slice(&r),
            s: H256::from_slice(&s),
        })
    }

    /// Signs the `personal_sign` digest of a checkpoint, as validators do for valset updates.
    pub fn sign_checkpoint(&self, checkpoint: &Checkpoint) -> Result<Signature, EcdsaError> {
        self.sign_digest(&signed_message_digest(checkpoint))
    }
}
