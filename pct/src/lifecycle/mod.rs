//! # Lifecycle Roles
//!
//! One module per role in the PCT pipeline, in pipeline order:
//!
//! - [`builder`] — propose a PCT from inputs and a request.
//! - [`prover`] — attach the proof bundle via a [`prover::ProofEngine`].
//! - [`verifier`] — the anti-malleation read every signer runs first.
//! - [`signer`] — sighashes out, external signatures in.
//! - [`combiner`] — merge independently signed copies.
//! - [`finalizer`] — assemble witnesses and extract raw bytes.
//!
//! Ownership contract, uniform across roles: operations that transform a
//! PCT take it **by value** and destroy it whether they succeed or fail.
//! There is no way back — callers wanting a recovery point serialize first
//! and re-parse on failure. Read-only operations (`verify_before_signing`,
//! `get_sighash`, `Pct::serialize`) borrow and leave the PCT valid.

pub mod builder;
pub mod combiner;
pub mod finalizer;
pub mod prover;
pub mod signer;
pub mod verifier;
