//! # Verifier — Anti-Malleation Check Before Signing
//!
//! A PCT retains plaintext output metadata until finalization precisely so
//! that a signer can audit what it is authorizing. This module is that
//! audit: it compares the PCT's visible outputs against the signer's own
//! copy of the request and expected change, and fails if anything paid by
//! the PCT is not explained by them.
//!
//! The check is a pure read over the PCT's own fields — no lookups
//! elsewhere, no mutation — so several independent signers can each run it
//! with their own request/expected-change view before contributing a
//! signature. Any failure here means **do not sign**: an attacker who can
//! substitute the PCT in transit (same inputs, different recipient) is
//! caught exactly at this step.
//!
//! Matching is multiset-based: two identical payments need two distinct
//! matching outputs, and every output must be claimed by exactly one
//! explanation (payment, expected change, or implicit self-change).

use tracing::warn;

use crate::address::Address;
use crate::crypto;
use crate::error::VerificationError;
use crate::request::{TransactionRequest, TransparentOutputSpec};
use crate::transaction::Pct;

/// Verify that `pct` pays exactly what `request` and `expected_change` say
/// it pays. Non-consuming and repeatable; has no effect on the PCT state.
pub fn verify_before_signing(
    pct: &Pct,
    request: &TransactionRequest,
    expected_change: &[TransparentOutputSpec],
) -> Result<(), VerificationError> {
    let mut output_claimed = vec![false; pct.outputs().len()];
    let mut action_claimed = vec![false; pct.actions().len()];

    // 1. Every requested payment must appear, with the exact script (or
    //    receiver) and the exact amount.
    for (index, payment) in request.payments.iter().enumerate() {
        let not_found = || {
            warn!(index, address = %payment.address, "payment not found in PCT");
            VerificationError::PaymentNotFound {
                index,
                address: payment.address.clone(),
                amount: payment.amount,
            }
        };

        match Address::decode(&payment.address, request.network) {
            Ok(Address::Transparent(addr)) => {
                let script = addr.script_pubkey();
                let slot = pct.outputs().iter().enumerate().position(|(i, out)| {
                    !output_claimed[i]
                        && out.script_pubkey() == script.as_slice()
                        && out.value() == payment.amount
                });
                match slot {
                    Some(i) => output_claimed[i] = true,
                    None => return Err(not_found()),
                }
            }
            Ok(Address::Shielded(addr)) => {
                let memo = payment.memo.as_deref().unwrap_or(&[]);
                let slot = pct.actions().iter().enumerate().position(|(i, action)| {
                    !action_claimed[i]
                        && action.receiver() == addr.receiver()
                        && action.value() == payment.amount
                        && action.memo() == memo
                });
                match slot {
                    Some(i) => action_claimed[i] = true,
                    None => return Err(not_found()),
                }
            }
            // An address that does not decode can never match an output.
            Err(_) => return Err(not_found()),
        }
    }

    // 2. Every expected change entry must appear, and a partial match
    //    names the field that disagreed.
    for spec in expected_change {
        let exact = pct.outputs().iter().enumerate().position(|(i, out)| {
            !output_claimed[i]
                && out.script_pubkey() == spec.script_pubkey.as_slice()
                && out.value() == spec.value
        });
        if let Some(i) = exact {
            output_claimed[i] = true;
            continue;
        }

        let by_script = pct.outputs().iter().enumerate().find(|(i, out)| {
            !output_claimed[*i] && out.script_pubkey() == spec.script_pubkey.as_slice()
        });
        if let Some((_, out)) = by_script {
            return Err(VerificationError::ChangeValueMismatch {
                expected: spec.value,
                got: out.value(),
            });
        }

        let by_value = pct
            .outputs()
            .iter()
            .enumerate()
            .any(|(i, out)| !output_claimed[i] && out.value() == spec.value);
        if by_value {
            return Err(VerificationError::ChangeScriptMismatch { value: spec.value });
        }

        return Err(VerificationError::ChangeMissing { value: spec.value });
    }

    // 3. Nothing else may be paid. Unclaimed transparent outputs are
    //    unexplained; unclaimed shielded actions are tolerated only when
    //    they are the implicit self-change derived from the PCT's own
    //    input keys.
    if let Some(i) = (0..pct.outputs().len()).find(|&i| !output_claimed[i]) {
        return Err(VerificationError::UnexpectedOutput {
            value: pct.outputs()[i].value(),
        });
    }

    let self_change: Vec<[u8; 43]> = pct
        .inputs()
        .iter()
        .map(|input| crypto::self_change_receiver(input.pubkey()))
        .collect();
    for (i, action) in pct.actions().iter().enumerate() {
        if action_claimed[i] {
            continue;
        }
        if !self_change.contains(action.receiver()) {
            return Err(VerificationError::UnexpectedShieldedAction {
                value: action.value(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
