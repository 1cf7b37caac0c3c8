//! # Combiner — Merging Independently Signed Copies
//!
//! The parallel-signing workflow serializes a proved PCT, hands a copy to
//! each signer, and merges the signed copies back into one. The merge is
//! strict: the copies must be byte-equal on everything that defines the
//! transaction (the effects) and on the proof bundle, which was produced
//! once before the split. The only thing allowed to differ is which
//! signature slots are filled — and where two copies fill the same slot,
//! they must agree.
//!
//! Consuming: every element of the input vector is destroyed whether or
//! not the merge succeeds.

use tracing::{debug, warn};

use crate::error::CombineError;
use crate::transaction::Pct;

/// Merge copies of one proposal into a single PCT carrying the union of
/// their signatures.
pub fn combine(pcts: Vec<Pct>) -> Result<Pct, CombineError> {
    let mut iter = pcts.into_iter();
    let mut merged = iter.next().ok_or(CombineError::Empty)?;
    let digest = merged.proposal_digest();

    for other in iter {
        if other.proposal_digest() != digest {
            warn!(
                left = %merged.proposal_id(),
                right = %other.proposal_id(),
                "refusing to combine PCTs with different effects"
            );
            return Err(CombineError::EffectsMismatch);
        }
        if other.proofs != merged.proofs {
            return Err(CombineError::ProofMismatch);
        }

        for (index, (slot, incoming)) in merged
            .inputs
            .iter_mut()
            .zip(other.inputs.into_iter())
            .enumerate()
        {
            let Some(theirs) = incoming.signature else {
                continue;
            };
            match &slot.signature {
                Some(ours) if *ours != theirs => {
                    return Err(CombineError::ConflictingSignatures { index })
                }
                Some(_) => {}
                None => slot.signature = Some(theirs),
            }
        }
    }

    debug!(id = %merged.proposal_id(), state = %merged.state(), "combined PCTs");
    Ok(merged)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
