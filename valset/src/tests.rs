// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::*;
use gravity_bridge_core::test_utils::{
    SUB_QUORUM_ABSTAINERS, derived_addresses, example_powers, test_domain_id,
};
use gravity_bridge_core::{Address, H256, MAX_POWER, checkpoint as compute_checkpoint};
use gravity_bridge_ecdsa::{EcdsaSigner, EcdsaVerifier};
use parking_lot::Mutex;
use std::sync::Arc;

/// One signer per entry of the example committee, from fixed secrets.
fn signers() -> Vec<EcdsaSigner> {
    (0..example_powers().len())
        .map(|i| EcdsaSigner::from_slice(&[i as u8 + 1; 32]).unwrap())
        .collect()
}

fn addresses(signers: &[EcdsaSigner]) -> Vec<Address> {
    signers.iter().map(EcdsaSigner::address).collect()
}

fn sign_all(signers: &[EcdsaSigner], checkpoint: &Checkpoint) -> Vec<Signature> {
    signers
        .iter()
        .map(|signer| signer.sign_checkpoint(checkpoint).unwrap())
        .collect()
}

fn genesis(threshold: PowerThreshold, signers: &[EcdsaSigner]) -> Gravity<EcdsaVerifier> {
    let args = ValsetArgs::new(addresses(signers), example_powers(), 0);
    Gravity::new(EcdsaVerifier::new(), test_domain_id(), threshold, &args).unwrap()
}

/// Knobs for a single `update_valset` call from nonce 0 to nonce 1
#[derive(Default)]
struct Scenario {
    threshold: PowerThreshold,
    malformed_new_valset: bool,
    malformed_current_valset: bool,
    non_matching_current_valset: bool,
    nonce_not_incremented: bool,
    bad_validator_sig: bool,
    zeroed_validator_sig: bool,
    not_enough_power: bool,
    not_enough_power_new_set: bool,
    zero_length_valset: bool,
}

struct Outcome {
    gravity: Gravity<EcdsaVerifier>,
    result: Result<Checkpoint>,
    new_checkpoint: Checkpoint,
}

fn run_scenario(opts: Scenario) -> Outcome {
    let signers = signers();
    let mut gravity = genesis(opts.threshold, &signers);
    let domain = test_domain_id();

    // Slightly reweighted committee; total power is unchanged.
    let mut new_powers = example_powers();
    new_powers[0] -= 3;
    new_powers[1] += 3;
    let mut new_validators = addresses(&signers);

    if opts.malformed_new_valset {
        new_validators.pop();
    } else if opts.zero_length_valset {
        new_validators.clear();
        new_powers.clear();
    } else if opts.not_enough_power_new_set {
        new_validators = derived_addresses(125);
        new_powers = vec![5; 125];
    }

    let mut current_powers = example_powers();
    if opts.non_matching_current_valset {
        current_powers[0] = 78;
    }

    let new_nonce = if opts.nonce_not_incremented { 0 } else { 1 };
    let new_valset = ValsetArgs::new(new_validators, new_powers, new_nonce);
    let new_checkpoint = new_valset
        .to_validator_set()
        .map(|set| set.checkpoint(&domain, new_nonce))
        .unwrap_or_default();

    let mut sigs = sign_all(&signers, &new_checkpoint);
    if opts.bad_validator_sig {
        sigs[1] = sigs[0];
    }
    if opts.zeroed_validator_sig {
        // Copy someone else's signature, then mark it as an abstention.
        let (_, r, s) = sigs[0].to_vrs();
        sigs[1] = Signature::from_vrs(0, r, s);
    }
    if opts.not_enough_power {
        for i in SUB_QUORUM_ABSTAINERS {
            sigs[i] = Signature::Absent;
        }
    }
    if opts.malformed_current_valset {
        current_powers.pop();
    }

    let current_valset = ValsetArgs::new(addresses(&signers), current_powers, 0);
    let result = gravity.update_valset(&new_valset, &current_valset, &sigs);

    Outcome {
        gravity,
        result,
        new_checkpoint,
    }
}

fn assert_rejected(opts: Scenario, expected: ValsetError) {
    let outcome = run_scenario(opts);
    assert_eq!(outcome.result, Err(expected));
    // Rejections never touch the state.
    assert_eq!(outcome.gravity.last_nonce(), 0);
    let genesis = ValsetArgs::new(addresses(&signers()), example_powers(), 0)
        .to_validator_set()
        .unwrap();
    assert_eq!(
        outcome.gravity.last_checkpoint(),
        genesis.checkpoint(&test_domain_id(), 0)
    );
}

#[test]
fn test_rejects_malformed_new_valset() {
    assert_rejected(
        Scenario {
            malformed_new_valset: true,
            ..Default::default()
        },
        ValsetError::MalformedNewValidatorSet,
    );
}

#[test]
fn test_rejects_empty_new_valset() {
    assert_rejected(
        Scenario {
            zero_length_valset: true,
            ..Default::default()
        },
        ValsetError::MalformedNewValidatorSet,
    );
}

/// The empty-set check wins over every later failure.
#[test]
fn test_empty_new_valset_rejected_regardless_of_other_inputs() {
    assert_rejected(
        Scenario {
            zero_length_valset: true,
            non_matching_current_valset: true,
            nonce_not_incremented: true,
            bad_validator_sig: true,
            ..Default::default()
        },
        ValsetError::MalformedNewValidatorSet,
    );
}

#[test]
fn test_rejects_malformed_current_valset() {
    assert_rejected(
        Scenario {
            malformed_current_valset: true,
            ..Default::default()
        },
        ValsetError::MalformedCurrentValidatorSet,
    );
}

#[test]
fn test_rejects_non_matching_current_valset() {
    assert_rejected(
        Scenario {
            non_matching_current_valset: true,
            ..Default::default()
        },
        ValsetError::IncorrectCheckpoint,
    );
}

#[test]
fn test_rejects_nonce_not_incremented() {
    assert_rejected(
        Scenario {
            nonce_not_incremented: true,
            ..Default::default()
        },
        ValsetError::InvalidValsetNonce(0, 0),
    );
}

#[test]
fn test_rejects_bad_validator_sig() {
    assert_rejected(
        Scenario {
            bad_validator_sig: true,
            ..Default::default()
        },
        ValsetError::InvalidSignature,
    );
}

#[test]
fn test_allows_zeroed_sig() {
    let outcome = run_scenario(Scenario {
        zeroed_validator_sig: true,
        ..Default::default()
    });
    assert_eq!(outcome.result, Ok(outcome.new_checkpoint));
    assert_eq!(outcome.gravity.last_nonce(), 1);
}

/// A zero `v` abstains even when the signature is built directly rather than through
/// `Signature::from_vrs`.
#[test]
fn test_directly_built_zero_v_sig_abstains() {
    let signers = signers();
    let mut gravity = genesis(PowerThreshold::TWO_THIRDS, &signers);
    let domain = test_domain_id();

    let mut new_powers = example_powers();
    new_powers[0] -= 3;
    new_powers[1] += 3;
    let new_valset = ValsetArgs::new(addresses(&signers), new_powers, 1);
    let new_checkpoint = new_valset
        .to_validator_set()
        .unwrap()
        .checkpoint(&domain, 1);

    let mut sigs = sign_all(&signers, &new_checkpoint);
    let (_, r, s) = sigs[0].to_vrs();
    sigs[1] = Signature::Present { v: 0, r, s };

    let current_valset = ValsetArgs::new(addresses(&signers), example_powers(), 0);
    assert_eq!(
        gravity.update_valset(&new_valset, &current_valset, &sigs),
        Ok(new_checkpoint)
    );
    assert_eq!(gravity.last_nonce(), 1);
}

#[test]
fn test_rejects_not_enough_signatures() {
    assert_rejected(
        Scenario {
            not_enough_power: true,
            ..Default::default()
        },
        ValsetError::InsufficientPower(2_807_621_889, 2_863_311_530),
    );
}

#[test]
fn test_not_enough_signatures_with_basis_point_threshold() {
    assert_rejected(
        Scenario {
            threshold: PowerThreshold::from_basis_points(6666).unwrap(),
            not_enough_power: true,
            ..Default::default()
        },
        ValsetError::InsufficientPower(2_807_621_889, 2_863_025_199),
    );
}

#[test]
fn test_rejects_not_enough_power_in_new_set() {
    assert_rejected(
        Scenario {
            not_enough_power_new_set: true,
            ..Default::default()
        },
        ValsetError::InsufficientPower(625, 2_863_311_530),
    );
}

#[test]
fn test_happy_path() {
    let outcome = run_scenario(Scenario::default());
    assert_eq!(outcome.result, Ok(outcome.new_checkpoint));
    assert_eq!(outcome.gravity.last_checkpoint(), outcome.new_checkpoint);
    assert_eq!(outcome.gravity.last_nonce(), 1);

    // Independently recompute the committed checkpoint from raw members.
    let mut powers = example_powers();
    powers[0] -= 3;
    powers[1] += 3;
    let members: ValidatorSet = addresses(&signers())
        .into_iter()
        .zip(powers)
        .map(|(address, power)| gravity_bridge_core::ValidatorEntry { address, power })
        .collect();
    assert_eq!(
        outcome.gravity.last_checkpoint(),
        compute_checkpoint(&test_domain_id(), &members, 1)
    );
}

#[test]
fn test_queries() {
    let gravity = genesis(PowerThreshold::TWO_THIRDS, &signers());
    assert_eq!(gravity.domain_id(), test_domain_id());
    assert_eq!(gravity.power_threshold(), 2_863_311_530);
    assert_eq!(gravity.threshold(), PowerThreshold::TWO_THIRDS);
    assert_eq!(gravity.last_nonce(), 0);
    assert_eq!(gravity.state().last_checkpoint(), gravity.last_checkpoint());
}

#[test]
fn test_replayed_update_rejected() {
    let signers = signers();
    let mut gravity = genesis(PowerThreshold::TWO_THIRDS, &signers);
    let domain = test_domain_id();

    let current = ValsetArgs::new(addresses(&signers), example_powers(), 0);
    let new = ValsetArgs::new(addresses(&signers), example_powers(), 1);
    let cp = new.to_validator_set().unwrap().checkpoint(&domain, 1);
    let sigs = sign_all(&signers, &cp);

    assert_eq!(gravity.update_valset(&new, &current, &sigs), Ok(cp));
    assert_eq!(
        gravity.update_valset(&new, &current, &sigs),
        Err(ValsetError::IncorrectCheckpoint)
    );
}

/// Once the current set is proven, a stale nonce is reported with both operands.
#[test]
fn test_successive_rotations_and_stale_nonce() {
    let signers = signers();
    let mut gravity = genesis(PowerThreshold::TWO_THIRDS, &signers);
    let domain = test_domain_id();

    let genesis_args = ValsetArgs::new(addresses(&signers), example_powers(), 0);
    let second = ValsetArgs::new(addresses(&signers), example_powers(), 5);
    let cp = second.to_validator_set().unwrap().checkpoint(&domain, 5);
    gravity
        .update_valset(&second, &genesis_args, &sign_all(&signers, &cp))
        .unwrap();

    // Nonces may skip ahead but never go back.
    let stale = ValsetArgs::new(addresses(&signers), example_powers(), 3);
    let stale_cp = stale.to_validator_set().unwrap().checkpoint(&domain, 3);
    assert_eq!(
        gravity.update_valset(&stale, &second, &sign_all(&signers, &stale_cp)),
        Err(ValsetError::InvalidValsetNonce(5, 3))
    );

    // Hand over to a smaller committee made of the first four signers.
    let mut third_powers = vec![MAX_POWER / 4; 4];
    third_powers[0] += MAX_POWER % 4;
    let third = ValsetArgs::new(addresses(&signers[..4]), third_powers, 6);
    let third_cp = third.to_validator_set().unwrap().checkpoint(&domain, 6);
    assert_eq!(
        gravity.update_valset(&third, &second, &sign_all(&signers, &third_cp)),
        Ok(third_cp)
    );

    // From now on only the new committee's signatures count.
    let fourth = ValsetArgs::new(addresses(&signers[..4]), third.powers.clone(), 7);
    let fourth_cp = fourth.to_validator_set().unwrap().checkpoint(&domain, 7);
    let mut sigs = sign_all(&signers[..4], &fourth_cp);
    sigs[3] = Signature::Absent;
    assert_eq!(gravity.update_valset(&fourth, &third, &sigs), Ok(fourth_cp));
    assert_eq!(gravity.last_nonce(), 7);
}

#[test]
fn test_signature_count_must_match_current_set() {
    let signers = signers();
    let mut gravity = genesis(PowerThreshold::TWO_THIRDS, &signers);
    let current = ValsetArgs::new(addresses(&signers), example_powers(), 0);
    let new = ValsetArgs::new(addresses(&signers), example_powers(), 1);
    let cp = new.to_validator_set().unwrap().checkpoint(&test_domain_id(), 1);

    let mut sigs = sign_all(&signers, &cp);
    sigs.pop();
    assert_eq!(
        gravity.update_valset(&new, &current, &sigs),
        Err(ValsetError::MalformedCurrentValidatorSet)
    );
}

/// A present signature is verified even when the power before it already forms a quorum.
#[test]
fn test_bad_signature_after_quorum_is_fatal() {
    let signers = signers();
    let mut gravity = genesis(PowerThreshold::TWO_THIRDS, &signers);
    let current = ValsetArgs::new(addresses(&signers), example_powers(), 0);
    let new = ValsetArgs::new(addresses(&signers), example_powers(), 1);
    let cp = new.to_validator_set().unwrap().checkpoint(&test_domain_id(), 1);

    let mut sigs = sign_all(&signers, &cp);
    let last = sigs.len() - 1;
    sigs[last] = Signature::Present {
        v: 27,
        r: H256::repeat_byte(0x5a),
        s: H256::repeat_byte(0x01),
    };
    assert_eq!(
        gravity.update_valset(&new, &current, &sigs),
        Err(ValsetError::InvalidSignature)
    );
}

#[test]
fn test_genesis_validation() {
    let signers = signers();
    let mut powers = example_powers();
    powers.pop();
    let malformed = ValsetArgs::new(addresses(&signers), powers, 0);
    assert!(matches!(
        Gravity::new(
            EcdsaVerifier::new(),
            test_domain_id(),
            PowerThreshold::TWO_THIRDS,
            &malformed
        ),
        Err(ValsetError::MalformedCurrentValidatorSet)
    ));

    let weak = ValsetArgs::new(addresses(&signers), vec![5; signers.len()], 0);
    assert!(matches!(
        Gravity::new(
            EcdsaVerifier::new(),
            test_domain_id(),
            PowerThreshold::TWO_THIRDS,
            &weak
        ),
        Err(ValsetError::InsufficientPower(80, 2_863_311_530))
    ));
}

#[test]
fn test_genesis_ignores_supplied_nonce() {
    let signers = signers();
    let args = ValsetArgs::new(addresses(&signers), example_powers(), 42);
    let gravity = Gravity::new(
        EcdsaVerifier::new(),
        test_domain_id(),
        PowerThreshold::TWO_THIRDS,
        &args,
    )
    .unwrap();
    assert_eq!(gravity.last_nonce(), 0);
    assert_eq!(
        gravity.last_checkpoint(),
        args.to_validator_set()
            .unwrap()
            .checkpoint(&test_domain_id(), 0)
    );
}

#[test]
fn test_validate_valset_update_is_pure() {
    let signers = signers();
    let verifier = EcdsaVerifier::new();
    let state = GravityState::genesis(
        test_domain_id(),
        PowerThreshold::TWO_THIRDS,
        &ValsetArgs::new(addresses(&signers), example_powers(), 0),
    )
    .unwrap();
    let before = state.clone();

    let current = ValsetArgs::new(addresses(&signers), example_powers(), 0);
    let new = ValsetArgs::new(addresses(&signers), example_powers(), 1);
    let cp = new.to_validator_set().unwrap().checkpoint(&test_domain_id(), 1);
    let next =
        validate_valset_update(&verifier, &state, &new, &current, &sign_all(&signers, &cp))
            .unwrap();

    assert_eq!(state, before);
    assert_eq!(next.last_checkpoint(), cp);
    assert_eq!(next.last_nonce(), 1);
    assert_eq!(next.domain_id(), state.domain_id());
    assert_eq!(next.power_threshold(), state.power_threshold());
}

/// Duplicate members are not merged: each entry signs and counts on its own.
#[test]
fn test_duplicate_members_count_per_entry() {
    let signer = EcdsaSigner::from_slice(&[7u8; 32]).unwrap();
    let half = MAX_POWER / 2;
    let genesis_args = ValsetArgs::new(vec![signer.address(); 2], vec![half, half], 0);
    let mut gravity = Gravity::new(
        EcdsaVerifier::new(),
        test_domain_id(),
        PowerThreshold::TWO_THIRDS,
        &genesis_args,
    )
    .unwrap();

    let new = ValsetArgs::new(vec![signer.address()], vec![MAX_POWER], 1);
    let cp = new.to_validator_set().unwrap().checkpoint(&test_domain_id(), 1);
    let sig = signer.sign_checkpoint(&cp).unwrap();

    assert_eq!(
        gravity.update_valset(&new, &genesis_args, &[sig, Signature::Absent]),
        Err(ValsetError::InsufficientPower(half as u128, 2_863_311_530))
    );
    assert_eq!(gravity.update_valset(&new, &genesis_args, &[sig, sig]), Ok(cp));
}

#[test]
fn test_from_config() {
    let signers = signers();
    let config = GravityConfig {
        domain_id: "foo".to_string(),
        power_threshold_bps: None,
        genesis: ValsetArgs::new(addresses(&signers), example_powers(), 0),
    };
    let gravity = Gravity::from_config(EcdsaVerifier::new(), &config).unwrap();
    let expected = genesis(PowerThreshold::TWO_THIRDS, &signers);
    assert_eq!(gravity.state(), expected.state());

    let bad = GravityConfig {
        power_threshold_bps: Some(20_000),
        ..config
    };
    assert!(matches!(
        Gravity::from_config(EcdsaVerifier::new(), &bad),
        Err(ValsetError::Config(_))
    ));
}

/// Two relayers racing the same update: exactly one commits, the other sees a stale checkpoint.
#[test]
fn test_concurrent_submissions_commit_once() {
    let signers = signers();
    let gravity = Arc::new(Mutex::new(genesis(PowerThreshold::TWO_THIRDS, &signers)));

    let current = ValsetArgs::new(addresses(&signers), example_powers(), 0);
    let new = ValsetArgs::new(addresses(&signers), example_powers(), 1);
    let cp = new.to_validator_set().unwrap().checkpoint(&test_domain_id(), 1);
    let sigs = sign_all(&signers, &cp);

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let gravity = Arc::clone(&gravity);
            let (new, current, sigs) = (new.clone(), current.clone(), sigs.clone());
            std::thread::spawn(move || gravity.lock().update_valset(&new, &current, &sigs))
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.contains(&Err(ValsetError::IncorrectCheckpoint)));
    assert_eq!(gravity.lock().last_nonce(), 1);
}
