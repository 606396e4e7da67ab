// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Validator set checkpoints.
//!
//! A checkpoint is `keccak256(abi.encode(domainId, "checkpoint", nonce, validators, powers))`,
//! byte-for-byte what the bridge contract computes. Every field is either a fixed 32 byte
//! word or a length-prefixed array, so distinct inputs never share a pre-image.

use crate::powertable::ValidatorEntry;
use crate::{Checkpoint, DomainId, Nonce};
use keccak_hash::{H256, keccak};

/// Method name mixed into every checkpoint, right-padded to a full word.
const CHECKPOINT_METHOD_NAME: &[u8] = b"checkpoint";

/// Prefix applied by `personal_sign` before a 32 byte hash is signed.
const SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Size of an ABI word.
const WORD_LEN: usize = 32;

/// Head words: domain id, method name, nonce and the offsets of the two arrays.
const HEAD_WORDS: usize = 5;

/// ABI-encodes the checkpoint pre-image.
pub fn encode_checkpoint(
    domain_id: &DomainId,
    members: &[ValidatorEntry],
    nonce: Nonce,
) -> Vec<u8> {
    let len = members.len();
    // head + two length words + one word per address and per power
    let mut buf = Vec::with_capacity((HEAD_WORDS + 2 + 2 * len) * WORD_LEN);

    buf.extend_from_slice(domain_id.as_bytes());

    let mut method = [0u8; WORD_LEN];
    method[..CHECKPOINT_METHOD_NAME.len()].copy_from_slice(CHECKPOINT_METHOD_NAME);
    buf.extend_from_slice(&method);

    push_uint(&mut buf, nonce);

    let validators_offset = HEAD_WORDS * WORD_LEN;
    let powers_offset = validators_offset + (1 + len) * WORD_LEN;
    push_uint(&mut buf, validators_offset as u64);
    push_uint(&mut buf, powers_offset as u64);

    push_uint(&mut buf, len as u64);
    for member in members {
        buf.extend_from_slice(&[0u8; WORD_LEN - 20]);
        buf.extend_from_slice(member.address.as_bytes());
    }

    push_uint(&mut buf, len as u64);
    for member in members {
        push_uint(&mut buf, member.power);
    }

    buf
}

/// Computes the checkpoint of a committee at the given nonce.
pub fn checkpoint(domain_id: &DomainId, members: &[ValidatorEntry], nonce: Nonce) -> Checkpoint {
    keccak(encode_checkpoint(domain_id, members, nonce))
}

/// Digest validators actually sign: the EIP-191 `personal_sign` hash of the checkpoint.
pub fn signed_message_digest(checkpoint: &Checkpoint) -> H256 {
    let mut buf = Vec::with_capacity(SIGNED_MESSAGE_PREFIX.len() + WORD_LEN);
    buf.extend_from_slice(SIGNED_MESSAGE_PREFIX);
    buf.extend_from_slice(checkpoint.as_bytes());
    keccak(buf)
}

/// Writes a big-endian uint256 word.
fn push_uint(buf: &mut Vec<u8>, value: u64) {
    buf.extend_from_slice(&[0u8; WORD_LEN - 8]);
    buf.extend_from_slice(&value.to_be_bytes());
}
