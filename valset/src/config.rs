// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use anyhow::Context;
use gravity_bridge_core::{DomainId, GravityError, PowerThreshold, ValsetArgs, parse_domain_id};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Initialization parameters of a bridge instance.
///
/// ```json
/// {
///   "domain_id": "foo",
///   "power_threshold_bps": 6666,
///   "genesis": { "validators": ["0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"], "powers": [4294967296] }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GravityConfig {
    /// Short label (at most 31 bytes) or `0x`-prefixed 32 byte hex
    pub domain_id: String,
    /// Quorum in basis points; two thirds of the maximum power when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_threshold_bps: Option<u64>,
    /// Committee installed at nonce 0
    pub genesis: ValsetArgs,
}

impl GravityConfig {
    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("failed to parse gravity config")
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read gravity config {}", path.display()))?;
        Self::from_json_str(&raw)
    }

    pub fn domain_id(&self) -> Result<DomainId, GravityError> {
        parse_domain_id(&self.domain_id)
    }

    pub fn threshold(&self) -> Result<PowerThreshold, GravityError> {
        match self.power_threshold_bps {
            Some(bps) => PowerThreshold::from_basis_points(bps),
            None => Ok(PowerThreshold::default()),
        }
    }

    /// The genesis committee at nonce 0, whatever nonce the file carries.
    pub fn genesis_args(&self) -> ValsetArgs {
        ValsetArgs {
            nonce: 0,
            ..self.genesis.clone()
        }
    }
}
