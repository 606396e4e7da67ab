// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::checkpoint::signed_message_digest;
use crate::signature::{Signature, SignatureOutcome};
use crate::{Address, Checkpoint};
use keccak_hash::H256;

/// Verifier trait for checkpoint signatures
pub trait Verifier {
    /// Error type returned when no signer can be recovered
    type Error: std::fmt::Display;

    /// Recovers the address that produced `(v, r, s)` over `digest`
    ///
    /// This method must be safe for concurrent use.
    ///
    /// # Arguments
    /// * `digest` - The 32 byte hash that was signed
    /// * `v` - Ethereum recovery byte (27 or 28)
    /// * `r`, `s` - Signature scalars
    fn recover(&self, digest: &H256, v: u8, r: &H256, s: &H256) -> Result<Address, Self::Error>;

    /// Checks `signature` over `checkpoint` against the validator it is claimed to belong to.
    ///
    /// Absent signatures, and present ones with a zero `v`, are abstentions. A present
    /// signature that cannot be recovered, or that recovers to a different address, is
    /// [`SignatureOutcome::Invalid`].
    fn verify(
        &self,
        claimed: &Address,
        checkpoint: &Checkpoint,
        signature: &Signature,
    ) -> SignatureOutcome {
        match signature {
            Signature::Absent | Signature::Present { v: 0, .. } => SignatureOutcome::Abstained,
            Signature::Present { v, r, s } => {
                match self.recover(&signed_message_digest(checkpoint), *v, r, s) {
                    Ok(recovered) if recovered == *claimed => SignatureOutcome::Valid,
                    Ok(_) => SignatureOutcome::Invalid,
                    Err(_) => SignatureOutcome::Invalid,
                }
            }
        }
    }
}
