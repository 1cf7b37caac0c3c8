//! # Error Taxonomy
//!
//! One error enum per lifecycle stage, plus the umbrella [`PctError`] that
//! boundary layers use when a single type must cover every outcome.
//!
//! Three rules hold everywhere:
//!
//! 1. Nothing is retried internally. A failed consuming operation has still
//!    consumed its input; the only recovery path is a serialized backup
//!    taken *before* the call.
//! 2. Verification failures are security-relevant and must be treated by
//!    the caller as "do not sign" — never downgraded, never retried blind.
//! 3. Delegated-engine failures (the proof engine) are surfaced opaquely,
//!    not interpreted.

use thiserror::Error;

use crate::address::AddressError;

// ---------------------------------------------------------------------------
// Proposal
// ---------------------------------------------------------------------------

/// Errors raised while turning inputs and a transaction request into a
/// proposed PCT. All of these are input-data errors: fix the request or the
/// inputs and propose again from scratch.
#[derive(Debug, Error)]
pub enum ProposalError {
    /// The request contains no payments.
    #[error("transaction request contains no payments")]
    EmptyRequest,

    /// No transparent inputs were supplied. The builder performs no coin
    /// selection; the caller must name exactly the inputs to spend.
    #[error("no transparent inputs supplied")]
    NoInputs,

    /// A payment requests a zero amount.
    #[error("payment #{index} has zero amount")]
    ZeroAmountPayment { index: usize },

    /// A payment memo exceeds the protocol limit.
    #[error("payment #{index} memo is {len} bytes (max {max})")]
    MemoTooLong { index: usize, len: usize, max: usize },

    /// A recipient or change address failed to decode.
    #[error("invalid address '{address}': {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: AddressError,
    },

    /// An input spec carries an empty script.
    #[error("input #{index} has a zero-length script")]
    EmptyInputScript { index: usize },

    /// Summing input or payment values overflowed u64.
    #[error("value overflow while summing amounts")]
    ValueOverflow,

    /// The supplied inputs do not cover payments plus the required fee.
    #[error("insufficient funds: {available} available, {required} required")]
    InsufficientFunds { available: u64, required: u64 },

    /// An explicit change address decoded to a shielded receiver. Explicit
    /// change is a public output; shielded change goes through the implicit
    /// self-change path instead.
    #[error("change address '{address}' is shielded; explicit change must be transparent")]
    ShieldedChangeAddress { address: String },
}

// ---------------------------------------------------------------------------
// Prover
// ---------------------------------------------------------------------------

/// Errors raised while attaching the proof bundle.
#[derive(Debug, Error)]
pub enum ProverError {
    /// The delegated proof engine failed. Carried opaquely.
    #[error("proof engine failed: {0}")]
    Engine(#[source] anyhow::Error),
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Anti-malleation verification failures.
///
/// Any of these means the PCT in hand does not pay what the request says it
/// pays. The caller must not sign.
#[derive(Debug, Error)]
pub enum VerificationError {
    /// A requested payment has no matching output or action in the PCT.
    #[error("payment #{index} to '{address}' for {amount} not found in PCT")]
    PaymentNotFound {
        index: usize,
        address: String,
        amount: u64,
    },

    /// An expected change output was found by script, but its value differs.
    #[error("change mismatch: value disagrees (expected {expected}, PCT has {got})")]
    ChangeValueMismatch { expected: u64, got: u64 },

    /// An expected change output was found by value, but its script differs.
    #[error("change mismatch: script disagrees for change output of {value}")]
    ChangeScriptMismatch { value: u64 },

    /// An expected change output is absent entirely.
    #[error("expected change output of {value} not present in PCT")]
    ChangeMissing { value: u64 },

    /// The PCT carries a transparent output no payment or change entry
    /// accounts for.
    #[error("unexplained transparent output of {value} in PCT")]
    UnexpectedOutput { value: u64 },

    /// The PCT carries a shielded action that is neither a requested payment
    /// nor the implicit self-change derived from its own inputs.
    #[error("unexplained shielded action of {value} in PCT")]
    UnexpectedShieldedAction { value: u64 },
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

/// Errors raised while computing a per-input signature hash.
#[derive(Debug, Error)]
pub enum SighashError {
    /// The input index does not name a transparent input.
    #[error("input index {index} out of range ({input_count} transparent inputs)")]
    IndexOutOfRange { index: usize, input_count: usize },
}

/// Errors raised while appending an externally produced signature.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// The signature buffer is not exactly 64 bytes. Checked before
    /// anything else.
    #[error("signature must be 64 bytes, got {got}")]
    InvalidLength { got: usize },

    /// The input index does not name a transparent input.
    #[error("input index {index} out of range ({input_count} transparent inputs)")]
    IndexOutOfRange { index: usize, input_count: usize },

    /// The PCT has not been proved yet; the state machine admits no
    /// signatures before the proof bundle exists.
    #[error("cannot append a signature to an unproved PCT")]
    Unproved,

    /// The slot already holds a different signature. Identical re-appends
    /// are accepted; silent replacement is not.
    #[error("input {index} already carries a different signature")]
    SlotConflict { index: usize },
}

// ---------------------------------------------------------------------------
// Combine
// ---------------------------------------------------------------------------

/// Errors raised while merging independently signed copies of a proposal.
#[derive(Debug, Error)]
pub enum CombineError {
    /// The list of PCTs to combine was empty.
    #[error("no PCTs supplied to combine")]
    Empty,

    /// The PCTs are not copies of the same proposal (inputs, outputs, fee
    /// or actions differ).
    #[error("PCTs describe different transactions and cannot be combined")]
    EffectsMismatch,

    /// The PCTs carry different proof bundles. Proofs are produced once,
    /// before any split, and must be identical across copies.
    #[error("PCTs carry diverging proof bundles")]
    ProofMismatch,

    /// Two copies supply different signatures for the same input.
    #[error("conflicting signatures supplied for input {index}")]
    ConflictingSignatures { index: usize },
}

// ---------------------------------------------------------------------------
// Finalization
// ---------------------------------------------------------------------------

/// Errors raised while assembling final witnesses and extracting bytes.
#[derive(Debug, Error)]
pub enum FinalizationError {
    /// A transparent input still lacks its signature.
    #[error("input {index} is unsigned; cannot finalize")]
    MissingSignature { index: usize },

    /// The proof bundle was never attached.
    #[error("proof bundle missing; run the prover before finalizing")]
    MissingProofs,
}

// ---------------------------------------------------------------------------
// Parse
// ---------------------------------------------------------------------------

/// Errors raised while parsing a serialized PCT.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The buffer is too short to hold even the preamble.
    #[error("buffer too short to be a serialized PCT ({len} bytes)")]
    TooShort { len: usize },

    /// The magic preamble does not match.
    #[error("not a serialized PCT (bad magic)")]
    BadMagic,

    /// The format version is newer than this library understands.
    #[error("unsupported PCT format version {version}")]
    UnsupportedVersion { version: u8 },

    /// The body failed to decode.
    #[error("malformed PCT body: {0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// Umbrella
// ---------------------------------------------------------------------------

/// Any PCT lifecycle error. Boundary layers (FFI, bindings) that must funnel
/// every stage through one type use this; Rust callers usually keep the
/// per-stage types.
#[derive(Debug, Error)]
pub enum PctError {
    #[error("proposal error: {0}")]
    Proposal(#[from] ProposalError),

    #[error("prover error: {0}")]
    Prover(#[from] ProverError),

    #[error("verification error: {0}")]
    Verification(#[from] VerificationError),

    #[error("sighash error: {0}")]
    Sighash(#[from] SighashError),

    #[error("signature error: {0}")]
    Signature(#[from] SignatureError),

    #[error("combine error: {0}")]
    Combine(#[from] CombineError),

    #[error("finalization error: {0}")]
    Finalization(#[from] FinalizationError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = ProposalError::InsufficientFunds {
            available: 5_000,
            required: 60_000,
        };
        let msg = err.to_string();
        assert!(msg.contains("5000"));
        assert!(msg.contains("60000"));
    }

    #[test]
    fn change_mismatch_names_the_field() {
        let value = VerificationError::ChangeValueMismatch {
            expected: 100,
            got: 90,
        };
        let script = VerificationError::ChangeScriptMismatch { value: 100 };
        assert!(value.to_string().contains("value"));
        assert!(script.to_string().contains("script"));
    }

    #[test]
    fn umbrella_preserves_stage_identity() {
        let err: PctError = CombineError::Empty.into();
        assert!(matches!(err, PctError::Combine(CombineError::Empty)));
        assert!(err.to_string().starts_with("combine error"));
    }
}
