//! # The Partially Constructed Transaction
//!
//! [`Pct`] is the entity every lifecycle role operates on: the transparent
//! inputs being spent, the transparent outputs and shielded actions being
//! created (each still carrying its plaintext script/value/memo so signers
//! can audit what they are authorizing), a per-input signature slot, and a
//! proof-bundle slot.
//!
//! A PCT is always in exactly one state, derived from slot occupancy:
//!
//! ```text
//! Proposed --prove--> Proved --append_signature×N--> PartiallySigned/Signed
//!     --finalize_and_extract--> raw bytes (terminal)
//! ```
//!
//! The struct is deliberately opaque: fields are crate-private and mutation
//! happens only through the lifecycle roles, so a PCT can never hold a
//! half-applied transformation.

pub mod codec;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{
    Network, PUBKEY_LENGTH, SHIELDED_RECEIVER_LENGTH, SIGHASH_LENGTH, SIGNATURE_LENGTH,
    TXID_LENGTH,
};
use crate::crypto;

// ---------------------------------------------------------------------------
// Fixed-width byte fields
// ---------------------------------------------------------------------------

/// Serde adapter for byte arrays longer than serde's built-in 32-element
/// limit. Serializes as a length-prefixed byte string.
pub(crate) mod serde_array {
    use serde::de::{Error, SeqAccess, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S, const N: usize>(bytes: &[u8; N], ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ser.serialize_bytes(bytes)
    }

    pub fn deserialize<'de, D, const N: usize>(de: D) -> Result<[u8; N], D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ArrayVisitor<const N: usize>;

        impl<'de, const N: usize> Visitor<'de> for ArrayVisitor<N> {
            type Value = [u8; N];

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a byte array of length {}", N)
            }

            fn visit_bytes<E: Error>(self, v: &[u8]) -> Result<Self::Value, E> {
                v.try_into()
                    .map_err(|_| E::invalid_length(v.len(), &self))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut out = [0u8; N];
                for (i, slot) in out.iter_mut().enumerate() {
                    *slot = seq
                        .next_element()?
                        .ok_or_else(|| A::Error::invalid_length(i, &self))?;
                }
                Ok(out)
            }
        }

        de.deserialize_bytes(ArrayVisitor::<N>)
    }
}

// ---------------------------------------------------------------------------
// Signature & Sighash
// ---------------------------------------------------------------------------

/// An externally produced signature: exactly 64 bytes, opaque to this layer.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(#[serde(with = "serde_array")] [u8; SIGNATURE_LENGTH]);

impl Signature {
    /// Wrap a signature buffer, if it has the required length.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; SIGNATURE_LENGTH] = bytes.try_into().ok()?;
        Some(Self(arr))
    }

    /// The raw 64 bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }
}

impl From<[u8; SIGNATURE_LENGTH]> for Signature {
    fn from(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}…)", hex::encode(&self.0[..8]))
    }
}

/// A per-input signature hash: 32 bytes, scoped to one transparent input.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Sighash([u8; SIGHASH_LENGTH]);

impl Sighash {
    pub(crate) fn from_array(bytes: [u8; SIGHASH_LENGTH]) -> Self {
        Self(bytes)
    }

    /// The raw 32 bytes an external signer must sign.
    pub fn as_bytes(&self) -> &[u8; SIGHASH_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for Sighash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sighash({})", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// Transaction components
// ---------------------------------------------------------------------------

/// A transparent input being spent, plus its signature slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransparentInput {
    #[serde(with = "serde_array")]
    pub(crate) pubkey: [u8; PUBKEY_LENGTH],
    pub(crate) prev_txid: [u8; TXID_LENGTH],
    pub(crate) prev_index: u32,
    pub(crate) value: u64,
    pub(crate) script_pubkey: Vec<u8>,
    /// Filled by the signer port; consumed by the finalizer.
    pub(crate) signature: Option<Signature>,
}

impl TransparentInput {
    pub fn pubkey(&self) -> &[u8; PUBKEY_LENGTH] {
        &self.pubkey
    }

    pub fn prev_txid(&self) -> &[u8; TXID_LENGTH] {
        &self.prev_txid
    }

    pub fn prev_index(&self) -> u32 {
        self.prev_index
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn script_pubkey(&self) -> &[u8] {
        &self.script_pubkey
    }

    /// The signature currently occupying this input's slot, if any.
    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }
}

/// A transparent output: plaintext script and value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransparentOutput {
    pub(crate) value: u64,
    pub(crate) script_pubkey: Vec<u8>,
}

impl TransparentOutput {
    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn script_pubkey(&self) -> &[u8] {
        &self.script_pubkey
    }
}

/// A shielded action: recipient, value, and memo, all plaintext until
/// finalization seals them into an opaque commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShieldedAction {
    #[serde(with = "serde_array")]
    pub(crate) receiver: [u8; SHIELDED_RECEIVER_LENGTH],
    pub(crate) value: u64,
    pub(crate) memo: Vec<u8>,
}

impl ShieldedAction {
    pub fn receiver(&self) -> &[u8; SHIELDED_RECEIVER_LENGTH] {
        &self.receiver
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn memo(&self) -> &[u8] {
        &self.memo
    }

    /// The sealed (metadata-stripped) on-chain form of this action.
    pub fn seal(&self) -> [u8; 32] {
        let mut data = Vec::with_capacity(SHIELDED_RECEIVER_LENGTH + 8 + 4 + self.memo.len());
        data.extend_from_slice(&self.receiver);
        data.extend_from_slice(&self.value.to_le_bytes());
        data.extend_from_slice(&(self.memo.len() as u32).to_le_bytes());
        data.extend_from_slice(&self.memo);
        crypto::tagged_digest("pct sealed action v1", &data)
    }
}

/// The proof bundle attached by the prover. Opaque: produced and consumed
/// by the proof engine, carried through everything in between unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofBundle(Vec<u8>);

impl ProofBundle {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Where a PCT stands in its lifecycle. Derived from slot occupancy, never
/// stored, so it cannot drift from the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PctState {
    /// Built, unproved. The only state the prover accepts.
    Proposed,
    /// Proof bundle attached, no signatures yet.
    Proved,
    /// Some, but not all, inputs signed.
    PartiallySigned,
    /// Every input signed; ready for finalization.
    Signed,
}

impl fmt::Display for PctState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PctState::Proposed => write!(f, "Proposed"),
            PctState::Proved => write!(f, "Proved"),
            PctState::PartiallySigned => write!(f, "PartiallySigned"),
            PctState::Signed => write!(f, "Signed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Pct
// ---------------------------------------------------------------------------

/// A partially constructed transaction.
///
/// Created only by the builder ([`crate::lifecycle::builder::propose`]) or
/// by parsing serialized bytes ([`Pct::parse`]). Threaded through exactly
/// one consuming call at a time; every consuming role takes it by value and
/// destroys it whether or not the transformation succeeds. Callers who want
/// a recovery point take a serialized backup first — that is the documented
/// usage pattern, not something this type automates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pct {
    pub(crate) version: u32,
    pub(crate) network: Network,
    pub(crate) target_height: u32,
    /// Fee in atomic units. Inputs always equal outputs + actions + fee.
    pub(crate) fee: u64,
    pub(crate) inputs: Vec<TransparentInput>,
    pub(crate) outputs: Vec<TransparentOutput>,
    pub(crate) actions: Vec<ShieldedAction>,
    pub(crate) proofs: Option<ProofBundle>,
}

impl Pct {
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn target_height(&self) -> u32 {
        self.target_height
    }

    /// The fee this proposal pays.
    pub fn fee(&self) -> u64 {
        self.fee
    }

    pub fn inputs(&self) -> &[TransparentInput] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TransparentOutput] {
        &self.outputs
    }

    pub fn actions(&self) -> &[ShieldedAction] {
        &self.actions
    }

    /// The proof bundle, once the prover has run.
    pub fn proof_bundle(&self) -> Option<&ProofBundle> {
        self.proofs.as_ref()
    }

    /// The lifecycle state, derived from slot occupancy.
    pub fn state(&self) -> PctState {
        if self.proofs.is_none() {
            return PctState::Proposed;
        }
        let signed = self
            .inputs
            .iter()
            .filter(|input| input.signature.is_some())
            .count();
        if signed == 0 {
            PctState::Proved
        } else if signed < self.inputs.len() {
            PctState::PartiallySigned
        } else {
            PctState::Signed
        }
    }

    /// Canonical byte encoding of the transaction effects: everything that
    /// defines *what the transaction does*, excluding signatures and
    /// proofs. Two PCTs are copies of the same proposal exactly when their
    /// effects bytes agree; the signature hash is derived from them too.
    pub(crate) fn effects_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(128 + self.inputs.len() * 96 + self.outputs.len() * 48);

        buf.extend_from_slice(&self.version.to_le_bytes());
        buf.push(match self.network {
            Network::Mainnet => 0x00,
            Network::Testnet => 0x01,
        });
        buf.extend_from_slice(&self.target_height.to_le_bytes());
        buf.extend_from_slice(&self.fee.to_le_bytes());

        buf.extend_from_slice(&(self.inputs.len() as u32).to_le_bytes());
        for input in &self.inputs {
            buf.extend_from_slice(&input.prev_txid);
            buf.extend_from_slice(&input.prev_index.to_le_bytes());
            buf.extend_from_slice(&input.value.to_le_bytes());
            buf.extend_from_slice(&(input.script_pubkey.len() as u32).to_le_bytes());
            buf.extend_from_slice(&input.script_pubkey);
            buf.extend_from_slice(&input.pubkey);
        }

        buf.extend_from_slice(&(self.outputs.len() as u32).to_le_bytes());
        for output in &self.outputs {
            buf.extend_from_slice(&output.value.to_le_bytes());
            buf.extend_from_slice(&(output.script_pubkey.len() as u32).to_le_bytes());
            buf.extend_from_slice(&output.script_pubkey);
        }

        buf.extend_from_slice(&(self.actions.len() as u32).to_le_bytes());
        for action in &self.actions {
            buf.extend_from_slice(&action.receiver);
            buf.extend_from_slice(&action.value.to_le_bytes());
            buf.extend_from_slice(&(action.memo.len() as u32).to_le_bytes());
            buf.extend_from_slice(&action.memo);
        }

        buf
    }

    /// Digest of the effects bytes. Stable across signing and proving, so
    /// independently parsed copies of one proposal share it.
    pub fn proposal_digest(&self) -> [u8; 32] {
        crypto::tagged_digest("pct effects digest v1", &self.effects_bytes())
    }

    /// Hex form of [`Self::proposal_digest`], for logs and diagnostics.
    pub fn proposal_id(&self) -> String {
        hex::encode(self.proposal_digest())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pct() -> Pct {
        Pct {
            version: 1,
            network: Network::Testnet,
            target_height: 100,
            fee: 10_000,
            inputs: vec![TransparentInput {
                pubkey: [0x02; 33],
                prev_txid: [0xAA; 32],
                prev_index: 0,
                value: 100_000,
                script_pubkey: vec![0x76, 0xa9],
                signature: None,
            }],
            outputs: vec![TransparentOutput {
                value: 90_000,
                script_pubkey: vec![0x76, 0xa9, 0x14],
            }],
            actions: vec![],
            proofs: None,
        }
    }

    #[test]
    fn state_is_derived_from_slots() {
        let mut pct = sample_pct();
        assert_eq!(pct.state(), PctState::Proposed);

        pct.proofs = Some(ProofBundle::new(vec![1, 2, 3]));
        assert_eq!(pct.state(), PctState::Proved);

        pct.inputs[0].signature = Some(Signature::from([0x11; 64]));
        assert_eq!(pct.state(), PctState::Signed);
    }

    #[test]
    fn partially_signed_requires_a_gap() {
        let mut pct = sample_pct();
        pct.inputs.push(pct.inputs[0].clone());
        pct.proofs = Some(ProofBundle::new(vec![]));
        pct.inputs[0].signature = Some(Signature::from([0x11; 64]));
        assert_eq!(pct.state(), PctState::PartiallySigned);
    }

    #[test]
    fn effects_ignore_signatures_and_proofs() {
        let mut pct = sample_pct();
        let before = pct.proposal_digest();

        pct.proofs = Some(ProofBundle::new(vec![0xFF; 64]));
        pct.inputs[0].signature = Some(Signature::from([0x11; 64]));
        assert_eq!(pct.proposal_digest(), before);
    }

    #[test]
    fn effects_change_with_any_effecting_field() {
        let base = sample_pct();

        let mut fee = base.clone();
        fee.fee += 1;
        assert_ne!(fee.proposal_digest(), base.proposal_digest());

        let mut value = base.clone();
        value.outputs[0].value -= 1;
        assert_ne!(value.proposal_digest(), base.proposal_digest());

        let mut net = base.clone();
        net.network = Network::Mainnet;
        assert_ne!(net.proposal_digest(), base.proposal_digest());
    }

    #[test]
    fn seal_commits_to_every_action_field() {
        let action = ShieldedAction {
            receiver: [0x01; 43],
            value: 500,
            memo: b"m".to_vec(),
        };
        let base = action.seal();

        let mut other = action.clone();
        other.value += 1;
        assert_ne!(other.seal(), base);

        let mut other = action.clone();
        other.memo = b"n".to_vec();
        assert_ne!(other.seal(), base);

        let mut other = action;
        other.receiver[0] ^= 1;
        assert_ne!(other.seal(), base);
    }

    #[test]
    fn signature_length_is_enforced() {
        assert!(Signature::from_bytes(&[0u8; 64]).is_some());
        assert!(Signature::from_bytes(&[0u8; 63]).is_none());
        assert!(Signature::from_bytes(&[0u8; 65]).is_none());
        assert!(Signature::from_bytes(&[]).is_none());
    }

    #[test]
    fn fixed_arrays_survive_bincode() {
        let input = TransparentInput {
            pubkey: [0x02; 33],
            prev_txid: [0xAA; 32],
            prev_index: 7,
            value: 1,
            script_pubkey: vec![],
            signature: Some(Signature::from([0x42; 64])),
        };
        let bytes = bincode::serialize(&input).unwrap();
        let back: TransparentInput = bincode::deserialize(&bytes).unwrap();
        assert_eq!(input, back);
    }
}
