//! # Prover — Attaching the Proof Bundle
//!
//! The proving step delegates the actual zero-knowledge work to a
//! [`ProofEngine`]. This module only sequences it: hand the engine the
//! PCT's shielded actions, attach whatever bundle it returns, and report
//! engine failures opaquely — the orchestrator does not interpret them.
//!
//! The shipped [`CommitmentEngine`] is a deterministic commitment
//! construction over the sealed actions. It stands in for a real proving
//! backend behind the same trait, which is all the lifecycle needs: the
//! bundle is a pure function of the proposal, so independently parsed
//! copies of one proposal always carry identical bundles and the combiner
//! can treat a bundle mismatch as corruption.

use tracing::debug;

use crate::crypto;
use crate::error::ProverError;
use crate::transaction::{Pct, ProofBundle};

/// The delegated proving backend.
///
/// Implementations read the PCT (notably its shielded actions) and produce
/// the opaque proof bundle. Errors are surfaced to callers unmodified.
pub trait ProofEngine {
    fn prove(&self, pct: &Pct) -> anyhow::Result<ProofBundle>;
}

/// Deterministic commitment-based engine: one 32-byte proof per shielded
/// action plus a binding digest over all of them.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommitmentEngine;

impl ProofEngine for CommitmentEngine {
    fn prove(&self, pct: &Pct) -> anyhow::Result<ProofBundle> {
        let mut bundle = Vec::with_capacity(32 * (pct.actions().len() + 1));
        for action in pct.actions() {
            let proof = crypto::tagged_digest("pct action proof v1", &action.seal());
            bundle.extend_from_slice(&proof);
        }
        let binding = crypto::tagged_digest("pct binding digest v1", &bundle);
        bundle.extend_from_slice(&binding);
        Ok(ProofBundle::new(bundle))
    }
}

/// Run the proof engine and attach its bundle.
///
/// Consuming: the input PCT is moved in and destroyed whether or not the
/// engine succeeds. On success the returned PCT is in the `Proved` state.
pub fn prove(pct: Pct, engine: &dyn ProofEngine) -> Result<Pct, ProverError> {
    let mut pct = pct;
    let bundle = engine.prove(&pct).map_err(ProverError::Engine)?;
    debug!(
        id = %pct.proposal_id(),
        bundle_len = bundle.as_bytes().len(),
        "attached proof bundle"
    );
    pct.proofs = Some(bundle);
    Ok(pct)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{ShieldedAddress, TransparentAddress};
    use crate::config::Network;
    use crate::lifecycle::builder::propose;
    use crate::request::{Payment, TransactionRequest, TransparentInputSpec};
    use crate::transaction::PctState;

    struct FailingEngine;

    impl ProofEngine for FailingEngine {
        fn prove(&self, _pct: &Pct) -> anyhow::Result<ProofBundle> {
            anyhow::bail!("proving backend unavailable")
        }
    }

    fn proposed() -> Pct {
        let inputs = [TransparentInputSpec {
            pubkey: [0x02; 33],
            prev_txid: [0xAA; 32],
            prev_index: 0,
            value: 100_000,
            script_pubkey: vec![0x76],
        }];
        let shielded = ShieldedAddress::from_receiver([0x07; 43], Network::Testnet).encode();
        let transparent =
            TransparentAddress::from_pubkey(&[0x03; 33], Network::Testnet).encode();
        let request = TransactionRequest::new(vec![
            Payment::new(shielded, 30_000),
            Payment::new(transparent, 20_000),
        ]);
        propose(&inputs, &request, None).unwrap()
    }

    #[test]
    fn prove_transitions_to_proved() {
        let pct = prove(proposed(), &CommitmentEngine).unwrap();
        assert_eq!(pct.state(), PctState::Proved);
        assert!(pct.proof_bundle().is_some());
    }

    #[test]
    fn bundle_is_deterministic_per_proposal() {
        let a = prove(proposed(), &CommitmentEngine).unwrap();
        let b = prove(proposed(), &CommitmentEngine).unwrap();
        assert_eq!(a.proof_bundle(), b.proof_bundle());
    }

    #[test]
    fn bundle_covers_every_action_plus_binding() {
        let pct = prove(proposed(), &CommitmentEngine).unwrap();
        // Two actions (payment + self-change) plus the binding digest.
        assert_eq!(
            pct.proof_bundle().unwrap().as_bytes().len(),
            32 * (pct.actions().len() + 1),
        );
    }

    #[test]
    fn engine_failure_is_surfaced_opaquely() {
        let err = prove(proposed(), &FailingEngine).unwrap_err();
        assert!(err.to_string().contains("proof engine failed"));
        assert!(err.to_string().contains("unavailable"));
    }

    #[test]
    fn transparent_only_proposals_still_get_a_bundle() {
        let inputs = [TransparentInputSpec {
            pubkey: [0x02; 33],
            prev_txid: [0xAA; 32],
            prev_index: 0,
            value: 100_000,
            script_pubkey: vec![0x76],
        }];
        let transparent =
            TransparentAddress::from_pubkey(&[0x03; 33], Network::Testnet).encode();
        let change = TransparentAddress::from_pubkey(&[0x04; 33], Network::Testnet).encode();
        let request = TransactionRequest::new(vec![Payment::new(transparent, 50_000)]);
        let pct = propose(&inputs, &request, Some(&change)).unwrap();
        assert!(pct.actions().is_empty());

        let proved = prove(pct, &CommitmentEngine).unwrap();
        assert_eq!(proved.state(), PctState::Proved);
        // No actions: the bundle is just the binding digest.
        assert_eq!(proved.proof_bundle().unwrap().as_bytes().len(), 32);
    }
}
