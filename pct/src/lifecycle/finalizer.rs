//! # Finalizer — Witness Assembly & Transaction Extraction
//!
//! The terminal operation. Takes a fully signed, proved PCT, assembles the
//! per-input witnesses, strips the plaintext shielded metadata down to
//! sealed commitments, and emits the raw network transaction bytes. The
//! result is plain data, not a handle — there is no PCT afterwards.
//!
//! The byte layout is deterministic: fixed-width little-endian integers and
//! length-prefixed variable fields, in field order. Two PCTs with equal
//! effects and equal signatures extract to byte-identical transactions,
//! which is what makes the parallel sign-then-combine workflow equivalent
//! to sequential signing.

use tracing::info;

use crate::config::Network;
use crate::crypto;
use crate::error::FinalizationError;
use crate::transaction::Pct;

/// Finalize and extract the raw transaction.
///
/// Consuming. Fails if any transparent input lacks its signature or the
/// proof bundle is absent; the PCT is destroyed either way.
pub fn finalize_and_extract(pct: Pct) -> Result<Vec<u8>, FinalizationError> {
    let proofs = pct.proofs.as_ref().ok_or(FinalizationError::MissingProofs)?;
    if let Some(index) = pct
        .inputs
        .iter()
        .position(|input| input.signature.is_none())
    {
        return Err(FinalizationError::MissingSignature { index });
    }

    let mut tx = Vec::with_capacity(128 + pct.inputs.len() * 176 + pct.outputs.len() * 48);

    tx.extend_from_slice(&pct.version.to_le_bytes());
    tx.extend_from_slice(
        &pct.network
            .branch_id(pct.target_height)
            .to_le_bytes(),
    );
    tx.extend_from_slice(&pct.target_height.to_le_bytes());
    tx.extend_from_slice(&pct.fee.to_le_bytes());
    tx.push(match pct.network {
        Network::Mainnet => 0x00,
        Network::Testnet => 0x01,
    });

    // Transparent inputs with their witnesses: the script that satisfies
    // the coin is the signer's pubkey followed by its 64-byte signature.
    tx.extend_from_slice(&(pct.inputs.len() as u32).to_le_bytes());
    for input in &pct.inputs {
        tx.extend_from_slice(&input.prev_txid);
        tx.extend_from_slice(&input.prev_index.to_le_bytes());

        let signature = input
            .signature
            .as_ref()
            .expect("checked above: every input is signed");
        let witness_len = input.pubkey.len() + signature.as_bytes().len();
        tx.extend_from_slice(&(witness_len as u32).to_le_bytes());
        tx.extend_from_slice(&input.pubkey);
        tx.extend_from_slice(signature.as_bytes());
    }

    // Transparent outputs stay plaintext — they are public by definition.
    tx.extend_from_slice(&(pct.outputs.len() as u32).to_le_bytes());
    for output in &pct.outputs {
        tx.extend_from_slice(&output.value.to_le_bytes());
        tx.extend_from_slice(&(output.script_pubkey.len() as u32).to_le_bytes());
        tx.extend_from_slice(&output.script_pubkey);
    }

    // Shielded actions are reduced to their sealed commitments: recipient,
    // value, and memo leave the transaction here and never reach the wire.
    tx.extend_from_slice(&(pct.actions.len() as u32).to_le_bytes());
    for action in &pct.actions {
        tx.extend_from_slice(&action.seal());
    }

    tx.extend_from_slice(&(proofs.as_bytes().len() as u32).to_le_bytes());
    tx.extend_from_slice(proofs.as_bytes());

    // Closing binding digest over everything above.
    let binding = crypto::tagged_digest("pct transaction binding v1", &tx);
    tx.extend_from_slice(&binding);

    info!(
        id = %pct.proposal_id(),
        txid = %hex::encode(txid(&tx)),
        bytes = tx.len(),
        "extracted transaction"
    );
    Ok(tx)
}

/// Conventional double-SHA-256 transaction id over extracted bytes.
pub fn txid(tx_bytes: &[u8]) -> [u8; 32] {
    crypto::double_sha256(tx_bytes)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
