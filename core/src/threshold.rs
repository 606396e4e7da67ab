// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::error::GravityError;
use crate::types::{MAX_POWER, Power};

/// Denominator used when a threshold is given in basis points.
pub const BASIS_POINTS: u64 = 10_000;

/// Fraction of [`MAX_POWER`] that signing power, and the declared power of an incoming
/// validator set, must reach before an update is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerThreshold {
    numerator: u64,
    denominator: u64,
}

impl Default for PowerThreshold {
    fn default() -> Self {
        Self::TWO_THIRDS
    }
}

impl PowerThreshold {
    /// Two thirds of the maximum power, the quorum used by the bridge contract.
    pub const TWO_THIRDS: PowerThreshold = PowerThreshold {
        numerator: 2,
        denominator: 3,
    };

    pub fn new(numerator: u64, denominator: u64) -> Result<Self, GravityError> {
        if numerator == 0 || denominator == 0 || numerator > denominator {
            return Err(GravityError::InvalidPowerThreshold {
                numerator,
                denominator,
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Threshold expressed as `bps / 10000`, e.g. `6666`.
    pub fn from_basis_points(bps: u64) -> Result<Self, GravityError> {
        Self::new(bps, BASIS_POINTS)
    }

    pub fn numerator(&self) -> u64 {
        self.numerator
    }

    pub fn denominator(&self) -> u64 {
        self.denominator
    }

    /// `floor(MAX_POWER * numerator / denominator)`, reported alongside insufficient power.
    pub fn required_power(&self) -> Power {
        let required = MAX_POWER as u128 * self.numerator as u128 / self.denominator as u128;
        // numerator <= denominator, so this never exceeds MAX_POWER.
        required as Power
    }

    /// Checks `power * denominator >= MAX_POWER * numerator` without dividing, so no
    /// precision is lost to truncation. For two thirds this is `power > 2863311530`.
    pub fn is_met_by(&self, power: u128) -> bool {
        power.saturating_mul(self.denominator as u128) >= MAX_POWER as u128 * self.numerator as u128
    }
}
