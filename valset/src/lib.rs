// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

/// The `valset` package holds the state machine that lets the bridge's validator set rotate itself.
///
/// This package includes:
/// - `GravityState`: the last accepted checkpoint and nonce, the domain id and the power threshold
/// - `validate_valset_update`: checks a proposed rotation and builds the state that follows it
/// - `Gravity`: owns the state and the signature verifier and commits accepted updates
/// - `GravityConfig`: initialization parameters loaded from JSON
///
/// An update is accepted only if the caller proves which committee is current (its checkpoint
/// must equal the stored one), the nonce strictly advances, every present signature of the
/// current committee recovers to its validator, the endorsing power clears the threshold and
/// the incoming committee itself declares enough power.
///
/// Note: a single bad signature is fatal to the whole update, while abstentions only count
/// against the endorsing power and are reported in aggregate.
use gravity_bridge_core::api::Verifier;
use gravity_bridge_core::{
    Checkpoint, DomainId, Nonce, Power, PowerAccumulator, PowerThreshold, Signature,
    SignatureOutcome, ValidatorSet, ValsetArgs,
};
use tracing::{debug, info, trace, warn};

mod config;
mod error;

#[cfg(test)]
mod tests;

pub use config::GravityConfig;
pub use error::ValsetError;

pub type Result<T> = std::result::Result<T, ValsetError>;

/// State kept for the lifetime of a bridge instance. Replaced as a whole on every accepted
/// update, never modified in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GravityState {
    domain_id: DomainId,
    power_threshold: PowerThreshold,
    last_checkpoint: Checkpoint,
    last_nonce: Nonce,
}

impl GravityState {
    /// Installs the genesis committee at nonce 0.
    ///
    /// The genesis arrays must have equal lengths and the committee must declare more power
    /// than the threshold. The nonce carried by `genesis` is ignored.
    pub fn genesis(
        domain_id: DomainId,
        power_threshold: PowerThreshold,
        genesis: &ValsetArgs,
    ) -> Result<Self> {
        let members = genesis
            .to_validator_set()
            .ok_or(ValsetError::MalformedCurrentValidatorSet)?;
        check_power(&power_threshold, members.total_power())?;

        Ok(GravityState {
            domain_id,
            power_threshold,
            last_checkpoint: members.checkpoint(&domain_id, 0),
            last_nonce: 0,
        })
    }

    pub fn domain_id(&self) -> DomainId {
        self.domain_id
    }

    pub fn power_threshold(&self) -> PowerThreshold {
        self.power_threshold
    }

    pub fn last_checkpoint(&self) -> Checkpoint {
        self.last_checkpoint
    }

    pub fn last_nonce(&self) -> Nonce {
        self.last_nonce
    }
}

/// Validates a validator set rotation against `state` and returns the state that follows it.
///
/// `state` is left untouched whether or not validation succeeds. Checks run in a fixed
/// order and the first failure is returned:
/// 1. the new set is non-empty with matching array lengths
/// 2. the current set has matching array lengths
/// 3. the current set hashes to the last checkpoint
/// 4. the new nonce is above the last nonce
/// 5. every present signature of the current set endorses the new checkpoint
/// 6. the endorsing power clears the threshold
/// 7. the new set's declared power clears the threshold
pub fn validate_valset_update<V: Verifier>(
    verifier: &V,
    state: &GravityState,
    new_valset: &ValsetArgs,
    current_valset: &ValsetArgs,
    signatures: &[Signature],
) -> Result<GravityState> {
    debug!(
        validators = new_valset.validators.len(),
        powers = new_valset.powers.len(),
        nonce = new_valset.nonce,
        "checking new validator set"
    );
    let new_members = new_valset
        .to_validator_set()
        .filter(|set| !set.is_empty())
        .ok_or(ValsetError::MalformedNewValidatorSet)?;

    debug!(
        validators = current_valset.validators.len(),
        powers = current_valset.powers.len(),
        nonce = current_valset.nonce,
        "checking current validator set"
    );
    let current_members = current_valset
        .to_validator_set()
        .ok_or(ValsetError::MalformedCurrentValidatorSet)?;

    let current_checkpoint = current_members.checkpoint(&state.domain_id, current_valset.nonce);
    if current_checkpoint != state.last_checkpoint {
        debug!(
            supplied = ?current_checkpoint,
            stored = ?state.last_checkpoint,
            nonce = current_valset.nonce,
            "current validator set does not match the last checkpoint"
        );
        return Err(ValsetError::IncorrectCheckpoint);
    }

    debug!(
        last_nonce = state.last_nonce,
        new_nonce = new_valset.nonce,
        "checking valset nonce"
    );
    if new_valset.nonce <= state.last_nonce {
        return Err(ValsetError::InvalidValsetNonce(
            state.last_nonce,
            new_valset.nonce,
        ));
    }

    let new_checkpoint = new_members.checkpoint(&state.domain_id, new_valset.nonce);
    let signed_power = check_validator_signatures(
        verifier,
        &current_members,
        signatures,
        &new_checkpoint,
    )?;
    debug!(
        signed_power,
        required = state.power_threshold.required_power(),
        "endorsement power tallied"
    );
    check_power(&state.power_threshold, signed_power)?;

    let declared_power = new_members.total_power();
    debug!(
        declared_power,
        required = state.power_threshold.required_power(),
        "new validator set power tallied"
    );
    check_power(&state.power_threshold, declared_power)?;

    Ok(GravityState {
        last_checkpoint: new_checkpoint,
        last_nonce: new_valset.nonce,
        ..state.clone()
    })
}

/// Verifies every signature of the current committee against `checkpoint` and returns the
/// power of the validators that signed. Fails on the first present signature that does not
/// belong to its validator.
fn check_validator_signatures<V: Verifier>(
    verifier: &V,
    members: &ValidatorSet,
    signatures: &[Signature],
    checkpoint: &Checkpoint,
) -> Result<u128> {
    debug!(
        signatures = signatures.len(),
        validators = members.len(),
        checkpoint = ?checkpoint,
        "checking validator signatures"
    );
    if signatures.len() != members.len() {
        return Err(ValsetError::MalformedCurrentValidatorSet);
    }

    let mut power = PowerAccumulator::new();
    for (i, (member, signature)) in members.iter().zip(signatures).enumerate() {
        let outcome = verifier.verify(&member.address, checkpoint, signature);
        trace!(index = i, validator = %member.address, %outcome, "checked signature");
        if outcome == SignatureOutcome::Invalid {
            debug!(index = i, validator = %member.address, "signature does not match validator");
            return Err(ValsetError::InvalidSignature);
        }
        power.tally(outcome, member.power);
    }
    Ok(power.total())
}

fn check_power(threshold: &PowerThreshold, power: u128) -> Result<()> {
    if !threshold.is_met_by(power) {
        return Err(ValsetError::InsufficientPower(
            power,
            threshold.required_power(),
        ));
    }
    Ok(())
}

/// A bridge instance: the valset state together with the verifier used to check signatures.
pub struct Gravity<V> {
    verifier: V,
    state: GravityState,
}

impl<V: Verifier> Gravity<V> {
    /// Creates an instance whose nonce 0 checkpoint is the genesis committee's.
    pub fn new(
        verifier: V,
        domain_id: DomainId,
        power_threshold: PowerThreshold,
        genesis: &ValsetArgs,
    ) -> Result<Self> {
        let state = GravityState::genesis(domain_id, power_threshold, genesis)?;
        info!(
            domain_id = ?domain_id,
            validators = genesis.len(),
            checkpoint = ?state.last_checkpoint,
            "initialized validator set"
        );
        Ok(Self { verifier, state })
    }

    pub fn from_config(verifier: V, config: &GravityConfig) -> Result<Self> {
        Self::new(
            verifier,
            config.domain_id()?,
            config.threshold()?,
            &config.genesis_args(),
        )
    }

    /// Rotates the validator set.
    ///
    /// `signatures` are positionally aligned with `current_valset`. On success the new
    /// checkpoint and nonce are committed and the checkpoint is returned; on failure the
    /// state is unchanged.
    pub fn update_valset(
        &mut self,
        new_valset: &ValsetArgs,
        current_valset: &ValsetArgs,
        signatures: &[Signature],
    ) -> Result<Checkpoint> {
        match validate_valset_update(
            &self.verifier,
            &self.state,
            new_valset,
            current_valset,
            signatures,
        ) {
            Ok(next) => {
                info!(
                    previous_nonce = self.state.last_nonce,
                    nonce = next.last_nonce,
                    checkpoint = ?next.last_checkpoint,
                    validators = new_valset.len(),
                    "validator set updated"
                );
                self.state = next;
                Ok(self.state.last_checkpoint)
            }
            Err(err) => {
                warn!(%err, nonce = new_valset.nonce, "validator set update rejected");
                Err(err)
            }
        }
    }

    pub fn state(&self) -> &GravityState {
        &self.state
    }

    pub fn last_checkpoint(&self) -> Checkpoint {
        self.state.last_checkpoint
    }

    pub fn last_nonce(&self) -> Nonce {
        self.state.last_nonce
    }

    pub fn domain_id(&self) -> DomainId {
        self.state.domain_id
    }

    /// Absolute power an endorsement must exceed.
    pub fn power_threshold(&self) -> Power {
        self.state.power_threshold.required_power()
    }

    pub fn threshold(&self) -> PowerThreshold {
        self.state.power_threshold
    }
}
