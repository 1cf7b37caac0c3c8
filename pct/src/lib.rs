// Copyright (c) 2026 the pct developers. MIT License.

//! # pct — Partially Constructed Transactions
//!
//! A library for assembling a multi-party transaction in stages, passing
//! the work-in-progress between independent parties as a single owned
//! object: the **partially constructed transaction** (PCT).
//!
//! The flow, with one role per party:
//!
//! ```text
//! inputs + request ──builder──▶ PCT (Proposed)
//!                  ──prover───▶ PCT (Proved)
//!                  ──verifier─▶ (read-only: "is this still what I asked for?")
//!                  ──signer×N─▶ PCT (PartiallySigned / Signed)
//!                  ──combiner─▶ PCT (Signed, merged from parallel copies)
//!                  ──finalizer▶ raw transaction bytes
//! ```
//!
//! Two contracts make this safe to run across process and language
//! boundaries:
//!
//! 1. **Single ownership, always consumed.** Every transforming operation
//!    takes its PCT by value and destroys it, on failure as much as on
//!    success. A caller who wants retry semantics takes a serialized
//!    backup (`Pct::serialize`, non-consuming) before the risky call.
//!    There is never a moment where two live views of one logical
//!    transaction exist by accident.
//!
//! 2. **Verify before signing.** The PCT carries plaintext output
//!    metadata until finalization so that each signer can independently
//!    check, against its own copy of the request, that the object in hand
//!    still pays what was agreed — defeating an attacker who substitutes
//!    the PCT in transit. A verification failure means *do not sign*.
//!
//! Parallel signing works by giving each signer its own copy through the
//! codec (`serialize`/`parse`) and merging the signed copies with the
//! combiner. Operations on different PCTs are fully independent; a single
//! PCT must only ever be driven from one thread at a time.
//!
//! ## Quick start
//!
//! ```no_run
//! use pct::config::Network;
//! use pct::lifecycle::builder::propose;
//! use pct::lifecycle::finalizer::finalize_and_extract;
//! use pct::lifecycle::prover::{prove, CommitmentEngine};
//! use pct::lifecycle::signer::{append_signature, get_sighash};
//! use pct::lifecycle::verifier::verify_before_signing;
//! use pct::request::{Payment, TransactionRequest, TransparentInputSpec};
//!
//! # fn sign_externally(_sighash: &[u8; 32]) -> [u8; 64] { [0; 64] }
//! # fn main() -> Result<(), pct::error::PctError> {
//! let inputs = vec![TransparentInputSpec {
//!     pubkey: [0x02; 33],
//!     prev_txid: [0xAA; 32],
//!     prev_index: 0,
//!     value: 100_000,
//!     script_pubkey: vec![0x76, 0xa9],
//! }];
//! let request = TransactionRequest::new(vec![Payment::new("tpt1...", 50_000)])
//!     .with_network(Network::Testnet)
//!     .with_target_height(2_000_000);
//!
//! let pct = propose(&inputs, &request, None)?;
//! let pct = prove(pct, &CommitmentEngine)?;
//! verify_before_signing(&pct, &request, &[])?;
//!
//! let sighash = get_sighash(&pct, 0)?;
//! let signature = sign_externally(sighash.as_bytes());
//! let pct = append_signature(pct, 0, &signature)?;
//!
//! let tx_bytes = finalize_and_extract(pct)?;
//! # let _ = tx_bytes;
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod config;
pub mod crypto;
pub mod error;
pub mod fee;
pub mod lifecycle;
pub mod request;
pub mod transaction;

pub use config::Network;
pub use error::PctError;
pub use lifecycle::builder::propose;
pub use lifecycle::combiner::combine;
pub use lifecycle::finalizer::{finalize_and_extract, txid};
pub use lifecycle::prover::{prove, CommitmentEngine, ProofEngine};
pub use lifecycle::signer::{append_signature, get_sighash};
pub use lifecycle::verifier::verify_before_signing;
pub use request::{Payment, TransactionRequest, TransparentInputSpec, TransparentOutputSpec};
pub use transaction::{Pct, PctState, ProofBundle, Sighash, Signature};
