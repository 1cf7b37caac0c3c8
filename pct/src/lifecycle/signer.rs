//! # Signer Port — Sighashes Out, Signatures In
//!
//! Signing itself happens elsewhere (a hardware wallet, an HSM, another
//! process). This module is the port: it exposes the per-input digest an
//! external signer must sign, and accepts the 64-byte signature it
//! produces. Only shape and slot bookkeeping are validated here — the
//! cryptographic validity of a signature against its sighash is the
//! signature engine's concern, not the orchestrator's.
//!
//! `get_sighash` is non-consuming and repeatable. `append_signature` is
//! consuming: the input PCT is destroyed on failure too, so callers who
//! want to survive a failed append keep a serialized backup.

use tracing::debug;

use crate::crypto;
use crate::error::{SighashError, SignatureError};
use crate::transaction::{Pct, Sighash, Signature};

/// Compute the signature hash for one transparent input.
///
/// The digest commits to the consensus branch id in force at the PCT's
/// target height, the full transaction effects, and the input index — and
/// to nothing else, so it is identical across serialize/parse copies and
/// unaffected by other inputs' signatures.
pub fn get_sighash(pct: &Pct, input_index: usize) -> Result<Sighash, SighashError> {
    if input_index >= pct.inputs().len() {
        return Err(SighashError::IndexOutOfRange {
            index: input_index,
            input_count: pct.inputs().len(),
        });
    }

    let branch_id = pct.network().branch_id(pct.target_height());
    let mut data = pct.effects_bytes();
    data.extend_from_slice(&branch_id.to_le_bytes());
    data.extend_from_slice(&(input_index as u32).to_le_bytes());

    Ok(Sighash::from_array(crypto::tagged_digest(
        "pct transparent sighash v1",
        &data,
    )))
}

/// Append an externally produced signature for one transparent input.
///
/// Validation order: signature length first (before anything that could be
/// mistaken for a cryptographic check), then index bounds, then state, then
/// the slot. Re-appending the identical signature is accepted; replacing an
/// existing, different signature is refused.
pub fn append_signature(
    pct: Pct,
    input_index: usize,
    signature: &[u8],
) -> Result<Pct, SignatureError> {
    let signature = Signature::from_bytes(signature).ok_or(SignatureError::InvalidLength {
        got: signature.len(),
    })?;

    if input_index >= pct.inputs().len() {
        return Err(SignatureError::IndexOutOfRange {
            index: input_index,
            input_count: pct.inputs().len(),
        });
    }
    if pct.proofs.is_none() {
        return Err(SignatureError::Unproved);
    }

    let mut pct = pct;
    let slot = &mut pct.inputs[input_index].signature;
    match slot {
        Some(existing) if *existing != signature => {
            return Err(SignatureError::SlotConflict { index: input_index })
        }
        _ => *slot = Some(signature),
    }

    debug!(id = %pct.proposal_id(), input = input_index, state = %pct.state(), "appended signature");
    Ok(pct)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
