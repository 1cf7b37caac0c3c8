//! # Builder — Proposing a PCT
//!
//! Turns caller-chosen transparent inputs and a [`TransactionRequest`] into
//! a `Proposed` PCT. No coin selection happens here: the caller names
//! exactly the coins to spend, and this module converts them 1:1 into
//! inputs, converts each payment into a transparent output or shielded
//! action, computes the required fee from the realized shape, and creates
//! at most one change output for the surplus.
//!
//! Change policy: an explicit change address (which must be transparent)
//! gets a public change output; otherwise the surplus goes to a shielded
//! self-change action derived from the first input's key — the one change
//! path the verifier treats as implicitly trusted.

use tracing::debug;

use crate::address::Address;
use crate::config::{MAX_MEMO_LENGTH, SHIELDED_RECEIVER_LENGTH, TX_VERSION};
use crate::crypto;
use crate::error::ProposalError;
use crate::fee::fee;
use crate::request::{TransactionRequest, TransparentInputSpec};
use crate::transaction::{Pct, ShieldedAction, TransparentInput, TransparentOutput};

/// Where the surplus goes if there is any.
enum ChangeKind {
    /// Public output to an explicit change address.
    Transparent(Vec<u8>),
    /// Shielded self-change action back to the sender's own key.
    SelfShielded([u8; SHIELDED_RECEIVER_LENGTH]),
}

/// Propose a transaction: validate the request, realize its shape, settle
/// the fee and change, and return a `Proposed` PCT.
///
/// Fails without producing any PCT if the request is empty or malformed,
/// an address does not decode on the request's network, an input carries an
/// empty script, amounts overflow, or the inputs do not cover payments plus
/// the required fee. The request and input specs are plain value data and
/// are never consumed.
pub fn propose(
    inputs: &[TransparentInputSpec],
    request: &TransactionRequest,
    change_address: Option<&str>,
) -> Result<Pct, ProposalError> {
    if request.payments.is_empty() {
        return Err(ProposalError::EmptyRequest);
    }
    if inputs.is_empty() {
        return Err(ProposalError::NoInputs);
    }
    for (index, spec) in inputs.iter().enumerate() {
        if spec.script_pubkey.is_empty() {
            return Err(ProposalError::EmptyInputScript { index });
        }
    }

    // Realize each payment as a transparent output or a shielded action.
    let mut outputs = Vec::new();
    let mut actions = Vec::new();
    for (index, payment) in request.payments.iter().enumerate() {
        if payment.amount == 0 {
            return Err(ProposalError::ZeroAmountPayment { index });
        }
        if let Some(memo) = &payment.memo {
            if memo.len() > MAX_MEMO_LENGTH {
                return Err(ProposalError::MemoTooLong {
                    index,
                    len: memo.len(),
                    max: MAX_MEMO_LENGTH,
                });
            }
        }

        match Address::decode(&payment.address, request.network).map_err(|source| {
            ProposalError::InvalidAddress {
                address: payment.address.clone(),
                source,
            }
        })? {
            Address::Transparent(addr) => outputs.push(TransparentOutput {
                value: payment.amount,
                script_pubkey: addr.script_pubkey(),
            }),
            Address::Shielded(addr) => actions.push(ShieldedAction {
                receiver: *addr.receiver(),
                value: payment.amount,
                memo: payment.memo.clone().unwrap_or_default(),
            }),
        }
    }

    let input_total = checked_sum(inputs.iter().map(|spec| spec.value))?;
    let payment_total = checked_sum(request.payments.iter().map(|p| p.amount))?;

    // Decide where change would go before pricing the with-change shape,
    // since a transparent change output and a shielded change action land
    // on different sides of the fee formula.
    let change_kind = match change_address {
        Some(addr) => match Address::decode(addr, request.network).map_err(|source| {
            ProposalError::InvalidAddress {
                address: addr.to_string(),
                source,
            }
        })? {
            Address::Transparent(t) => ChangeKind::Transparent(t.script_pubkey()),
            Address::Shielded(_) => {
                return Err(ProposalError::ShieldedChangeAddress {
                    address: addr.to_string(),
                })
            }
        },
        None => ChangeKind::SelfShielded(crypto::self_change_receiver(&inputs[0].pubkey)),
    };

    // Funds must cover the no-change shape; anything beyond that either
    // becomes a change output/action or, when the surplus would not survive
    // the with-change fee, is absorbed into the fee.
    let fee_no_change = fee(inputs.len(), outputs.len(), actions.len());
    let required = payment_total
        .checked_add(fee_no_change)
        .ok_or(ProposalError::ValueOverflow)?;
    if input_total < required {
        return Err(ProposalError::InsufficientFunds {
            available: input_total,
            required,
        });
    }

    let realized_fee = if input_total == required {
        fee_no_change
    } else {
        let fee_with_change = match &change_kind {
            ChangeKind::Transparent(_) => fee(inputs.len(), outputs.len() + 1, actions.len()),
            ChangeKind::SelfShielded(_) => fee(inputs.len(), outputs.len(), actions.len() + 1),
        };
        let spendable = input_total - payment_total;
        if spendable > fee_with_change {
            let change_value = spendable - fee_with_change;
            match change_kind {
                ChangeKind::Transparent(script_pubkey) => outputs.push(TransparentOutput {
                    value: change_value,
                    script_pubkey,
                }),
                ChangeKind::SelfShielded(receiver) => actions.push(ShieldedAction {
                    receiver,
                    value: change_value,
                    memo: Vec::new(),
                }),
            }
            fee_with_change
        } else {
            // Dust window: the surplus exists but would not survive the
            // with-change fee. Absorb it rather than emit a dust output.
            spendable
        }
    };

    let pct = Pct {
        version: TX_VERSION,
        network: request.network,
        target_height: request.target_height,
        fee: realized_fee,
        inputs: inputs
            .iter()
            .map(|spec| TransparentInput {
                pubkey: spec.pubkey,
                prev_txid: spec.prev_txid,
                prev_index: spec.prev_index,
                value: spec.value,
                script_pubkey: spec.script_pubkey.clone(),
                signature: None,
            })
            .collect(),
        outputs,
        actions,
        proofs: None,
    };

    debug!(
        id = %pct.proposal_id(),
        inputs = pct.inputs.len(),
        outputs = pct.outputs.len(),
        actions = pct.actions.len(),
        fee = pct.fee,
        "proposed PCT"
    );
    Ok(pct)
}

fn checked_sum(values: impl Iterator<Item = u64>) -> Result<u64, ProposalError> {
    let mut total = 0u64;
    for value in values {
        total = total
            .checked_add(value)
            .ok_or(ProposalError::ValueOverflow)?;
    }
    Ok(total)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
