//! # Hashing Utilities
//!
//! The digest toolbox for the PCT stack. Two hash functions, two jobs:
//!
//! - **BLAKE3** — used for everything PCT-native: signature hashes, effects
//!   digests, script hashes, sealed shielded outputs. Always through
//!   `derive_key` with an explicit domain context, so a digest computed for
//!   one purpose can never collide with one computed for another.
//!
//! - **SHA-256** — used only for the double-SHA-256 transaction id over the
//!   final extracted bytes, for compatibility with the wider ecosystem's
//!   txid convention.

use sha2::{Digest, Sha256};

use crate::config::{PUBKEY_HASH_LENGTH, SHIELDED_RECEIVER_LENGTH};

/// Compute a domain-separated BLAKE3 digest.
///
/// The `context` string must be unique per purpose and, once shipped, must
/// never change: it is part of the consensus definition of every digest
/// derived from it.
pub fn tagged_digest(context: &str, data: &[u8]) -> [u8; 32] {
    blake3::derive_key(context, data)
}

/// Compute a domain-separated digest of arbitrary output length.
///
/// Used where a non-32-byte value is needed (e.g. the 43-byte self-change
/// receiver). Output is read from BLAKE3's extendable output mode.
pub fn tagged_digest_xof(context: &str, data: &[u8], out: &mut [u8]) {
    let mut hasher = blake3::Hasher::new_derive_key(context);
    hasher.update(data);
    hasher.finalize_xof().fill(out);
}

/// Hash a public key down to the 20-byte form embedded in transparent
/// addresses and pay-to-pubkey-hash scripts.
pub fn pubkey_hash(pubkey: &[u8]) -> [u8; PUBKEY_HASH_LENGTH] {
    let full = tagged_digest("pct transparent pubkey hash v1", pubkey);
    let mut out = [0u8; PUBKEY_HASH_LENGTH];
    out.copy_from_slice(&full[..PUBKEY_HASH_LENGTH]);
    out
}

/// Derive the implicit self-change receiver for a transparent input key.
///
/// When a proposal has surplus value and no explicit change address, the
/// builder sends the surplus to this receiver. The derivation is public and
/// deterministic so any verifier holding the PCT can recompute it from the
/// inputs alone and recognize the change action as legitimate.
pub fn self_change_receiver(pubkey: &[u8]) -> [u8; SHIELDED_RECEIVER_LENGTH] {
    let mut out = [0u8; SHIELDED_RECEIVER_LENGTH];
    tagged_digest_xof("pct self-change receiver v1", pubkey, &mut out);
    out
}

/// Compute SHA-256(SHA-256(data)) — the conventional transaction id digest.
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    let mut out = [0u8; 32];
    out.copy_from_slice(&second);
    out
}
