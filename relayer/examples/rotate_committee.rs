//! # Example: validator set rotation
//!
//! Installs a genesis committee, has it confirm a successor committee and submits the
//! rotation once enough power has signed.
//!
//! ## Usage:
//! ```bash
//! cargo run --example rotate_committee
//! RUST_LOG=debug cargo run --example rotate_committee -- 21
//! ```
//!
use anyhow::{Context, Result};
use gravity_bridge_core::{MAX_POWER, PowerThreshold, ValsetArgs};
use gravity_bridge_ecdsa::{EcdsaSigner, EcdsaVerifier};
use gravity_bridge_relayer::{SignatureCollector, Valset, ValsetMember};
use gravity_bridge_valset::{Gravity, GravityConfig};
use k256::ecdsa::SigningKey;
use std::env;
use tracing_subscriber::EnvFilter;

const DEFAULT_COMMITTEE_SIZE: usize = 10;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Validator set rotation example");

    let size = committee_size()?;
    let signers: Vec<EcdsaSigner> = (0..size)
        .map(|_| EcdsaSigner::new(SigningKey::random(&mut rand::thread_rng())))
        .collect();
    let power = MAX_POWER / size as u64;

    let config = GravityConfig {
        domain_id: "example".to_string(),
        power_threshold_bps: None,
        genesis: ValsetArgs::new(
            signers.iter().map(EcdsaSigner::address).collect(),
            vec![power; size],
            0,
        ),
    };
    println!("config: {}", serde_json::to_string(&config)?);

    let mut gravity = Gravity::from_config(EcdsaVerifier::new(), &config)?;
    println!(
        "genesis checkpoint {:?}, {} validators, threshold {}",
        gravity.last_checkpoint(),
        size,
        gravity.power_threshold()
    );

    // The successor drops the last validator, whose power moves to the first.
    let mut members: Vec<ValsetMember> = signers
        .iter()
        .map(|signer| ValsetMember {
            power,
            eth_address: Some(signer.address()),
        })
        .collect();
    members[0].power += power;
    if let Some(last) = members.last_mut() {
        last.eth_address = None;
    }
    let proposal = Valset { nonce: 1, members };

    let mut collector = SignatureCollector::new(
        EcdsaVerifier::new(),
        &gravity.domain_id(),
        config.genesis_args(),
        proposal.to_args(),
    )?;
    println!(
        "collecting confirms for checkpoint {:?}",
        collector.checkpoint()
    );
    println!("------------------------");

    let threshold = gravity.threshold();
    for signer in &signers {
        if collector.has_quorum(&threshold) {
            break;
        }
        let signature = signer.sign_checkpoint(&collector.checkpoint())?;
        collector.add_confirm(signer.address(), signature)?;
        println!(
            "{} confirmed, signed power {}",
            signer.address(),
            collector.signed_power()
        );
    }
    println!("------------------------");
    println!(
        "{} of {} validators confirmed",
        collector.confirm_count(),
        size
    );

    let update = collector.into_update();
    let checkpoint = update
        .submit(&mut gravity)
        .context("validator set update was rejected")?;
    println!(
        "rotated to nonce {} with checkpoint {:?}",
        gravity.last_nonce(),
        checkpoint
    );

    Ok(())
}

fn committee_size() -> Result<usize> {
    match env::args().nth(1) {
        Some(arg) => {
            let size: usize = arg.parse().context("committee size must be a number")?;
            anyhow::ensure!(size >= 2, "committee size must be at least 2");
            Ok(size)
        }
        None => Ok(DEFAULT_COMMITTEE_SIZE),
    }
}
