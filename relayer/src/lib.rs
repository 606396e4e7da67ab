// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Off-chain side of a validator set rotation.
//!
//! Validators confirm a proposed set by signing its checkpoint. The [`SignatureCollector`]
//! checks each confirm as it arrives and, once enough power has signed, lays the
//! signatures out in the order of the current set so the update can be submitted.

mod error;
mod valset;

use ahash::HashMap;
use gravity_bridge_core::api::Verifier;
use gravity_bridge_core::{
    Address, Checkpoint, DomainId, PowerAccumulator, PowerThreshold, Signature,
    SignatureOutcome, ValidatorSet, ValsetArgs,
};
use gravity_bridge_valset::Gravity;
use tracing::{debug, warn};

pub use error::RelayerError;
pub use valset::{Valset, ValsetMember};

/// Everything `update_valset` needs, ready to submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValsetUpdate {
    pub new_valset: ValsetArgs,
    pub current_valset: ValsetArgs,
    pub signatures: Vec<Signature>,
}

impl ValsetUpdate {
    pub fn submit<V: Verifier>(
        &self,
        gravity: &mut Gravity<V>,
    ) -> gravity_bridge_valset::Result<Checkpoint> {
        gravity.update_valset(&self.new_valset, &self.current_valset, &self.signatures)
    }
}

/// Gathers confirms of a proposed validator set from the members of the current one
pub struct SignatureCollector<V> {
    verifier: V,
    current: ValsetArgs,
    current_members: ValidatorSet,
    proposal: ValsetArgs,
    checkpoint: Checkpoint,
    confirms: HashMap<Address, Signature>,
}

impl<V: Verifier> SignatureCollector<V> {
    pub fn new(
        verifier: V,
        domain_id: &DomainId,
        current: ValsetArgs,
        proposal: ValsetArgs,
    ) -> Result<Self, RelayerError> {
        let current_members = current
            .to_validator_set()
            .ok_or(RelayerError::MalformedCurrentValset)?;
        let proposed_members = proposal
            .to_validator_set()
            .ok_or(RelayerError::MalformedProposal)?;
        if proposed_members.is_empty() {
            return Err(RelayerError::EmptyProposal);
        }
        let checkpoint = proposed_members.checkpoint(domain_id, proposal.nonce);

        Ok(Self {
            verifier,
            current,
            current_members,
            proposal,
            checkpoint,
            confirms: HashMap::default(),
        })
    }

    /// Checkpoint validators must sign
    pub fn checkpoint(&self) -> Checkpoint {
        self.checkpoint
    }

    /// Records a validator's confirm after checking it signs the proposed checkpoint.
    pub fn add_confirm(
        &mut self,
        validator: Address,
        signature: Signature,
    ) -> Result<(), RelayerError> {
        if !self.current.validators.contains(&validator) {
            return Err(RelayerError::UnknownSigner(validator));
        }
        if self.confirms.contains_key(&validator) {
            return Err(RelayerError::DuplicateConfirm(validator));
        }

        match self.verifier.verify(&validator, &self.checkpoint, &signature) {
            SignatureOutcome::Valid => {
                debug!(%validator, nonce = self.proposal.nonce, "accepted valset confirm");
                self.confirms.insert(validator, signature);
                Ok(())
            }
            SignatureOutcome::Abstained => Err(RelayerError::Abstention(validator)),
            SignatureOutcome::Invalid => {
                warn!(%validator, nonce = self.proposal.nonce, "rejected valset confirm");
                Err(RelayerError::InvalidConfirm(validator))
            }
        }
    }

    pub fn confirm_count(&self) -> usize {
        self.confirms.len()
    }

    /// Power of the current set that has confirmed. Every entry of a repeated address counts.
    pub fn signed_power(&self) -> u128 {
        self.current_members
            .iter()
            .filter(|member| self.confirms.contains_key(&member.address))
            .map(|member| member.power)
            .collect::<PowerAccumulator>()
            .total()
    }

    pub fn has_quorum(&self, threshold: &PowerThreshold) -> bool {
        threshold.is_met_by(self.signed_power())
    }

    /// Signatures aligned with the current set; validators that did not confirm abstain.
    pub fn signatures(&self) -> Vec<Signature> {
        self.current
            .validators
            .iter()
            .map(|validator| self.confirms.get(validator).copied().unwrap_or_default())
            .collect()
    }

    pub fn into_update(self) -> ValsetUpdate {
        let signatures = self.signatures();
        ValsetUpdate {
            new_valset: self.proposal,
            current_valset: self.current,
            signatures,
        }
    }
}
