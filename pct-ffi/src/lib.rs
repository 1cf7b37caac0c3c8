// Copyright (c) 2026 the pct developers. MIT License.

//! # pct-ffi — The C ABI Boundary
//!
//! Exposes the PCT lifecycle over a C ABI so that host languages reach it
//! through opaque handles. The ownership contract of the core library is
//! surfaced here explicitly:
//!
//! - A handle is exclusively owned by the caller. Consuming functions
//!   (`pct_prove`, `pct_append_signature`, `pct_combine`,
//!   `pct_finalize_and_extract`) retake ownership of the raw pointer
//!   **before** doing any work, so the input handle is invalid after the
//!   call whether it succeeded or failed. Callers wanting a recovery point
//!   serialize first.
//! - Non-consuming functions (`pct_serialize`, `pct_get_sighash`,
//!   `pct_verify_before_signing`) borrow; the handle stays valid.
//! - Null handles are reported as [`PctResultCode::NullPointer`], never a
//!   crash. A dangling (already-consumed) handle cannot be detected from C
//!   and remains the caller's responsibility, exactly as with `free()`.
//! - Byte buffers returned through out-parameters are owned by the caller
//!   and must be released with [`pct_bytes_free`]; handles with
//!   [`pct_free`] / [`pct_request_free`]. Nothing is garbage collected.
//!
//! Every failing call parks a human-readable message in a thread-local
//! slot, retrievable via [`pct_last_error_message`] from the same thread.

mod last_error;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::ptr;
use std::slice;

use thiserror::Error;
use tracing::debug;

use pct::error::{
    CombineError, FinalizationError, ParseError, ProposalError, ProverError, SighashError,
    SignatureError, VerificationError,
};
use pct::lifecycle::prover::CommitmentEngine;
use pct::request::{Payment, TransactionRequest, TransparentInputSpec, TransparentOutputSpec};
use pct::Pct;

use last_error::{set_last_error, with_last_error};

// ---------------------------------------------------------------------------
// Result codes
// ---------------------------------------------------------------------------

/// Result code returned by every FFI function. One tag per outcome; the
/// message behind a non-success code is available from
/// [`pct_last_error_message`].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PctResultCode {
    Success = 0,
    NullPointer = 1,
    InvalidEncoding = 2,
    BufferTooSmall = 3,
    Proposal = 10,
    Prover = 11,
    Verification = 12,
    Sighash = 13,
    Signature = 14,
    Combine = 15,
    Finalization = 16,
    Parse = 17,
    NotImplemented = 99,
}

/// Internal error funnel: every stage error plus the boundary-only kinds.
#[derive(Debug, Error)]
enum FfiError {
    #[error("null pointer provided")]
    NullPointer,

    #[error("invalid string encoding (expected UTF-8)")]
    InvalidEncoding,

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

impl FfiError {
    fn code(&self) -> PctResultCode {
        match self {
            FfiError::NullPointer => PctResultCode::NullPointer,
            FfiError::InvalidEncoding => PctResultCode::InvalidEncoding,
            FfiError::Proposal(_) => PctResultCode::Proposal,
            FfiError::Prover(_) => PctResultCode::Prover,
            FfiError::Verification(_) => PctResultCode::Verification,
            FfiError::Sighash(_) => PctResultCode::Sighash,
            FfiError::Signature(_) => PctResultCode::Signature,
            FfiError::Combine(_) => PctResultCode::Combine,
            FfiError::Finalization(_) => PctResultCode::Finalization,
            FfiError::Parse(_) => PctResultCode::Parse,
        }
    }
}

/// Record the failure and hand back its code.
fn report(err: FfiError) -> PctResultCode {
    let code = err.code();
    debug!(code = ?code, "ffi call failed: {err}");
    set_last_error(err.to_string());
    code
}

// ---------------------------------------------------------------------------
// Opaque handles & C structs
// ---------------------------------------------------------------------------

/// Opaque handle to a PCT.
#[repr(C)]
pub struct PctHandle {
    _private: [u8; 0],
}

/// Opaque handle to a transaction request.
#[repr(C)]
pub struct PctRequestHandle {
    _private: [u8; 0],
}

/// One intended payment, C layout. `memo` may be null (with `memo_len` 0);
/// `label` and `message` may be null.
#[repr(C)]
pub struct PctPayment {
    pub address: *const c_char,
    pub amount: u64,
    pub memo: *const u8,
    pub memo_len: usize,
    pub label: *const c_char,
    pub message: *const c_char,
}

/// One transparent coin to spend, C layout.
#[repr(C)]
pub struct PctTransparentInput {
    pub pubkey: [u8; 33],
    pub prev_txid: [u8; 32],
    pub prev_index: u32,
    pub value: u64,
    pub script_pubkey: *const u8,
    pub script_pubkey_len: usize,
}

/// One expected transparent change output, C layout.
#[repr(C)]
pub struct PctTransparentOutput {
    pub script_pubkey: *const u8,
    pub script_pubkey_len: usize,
    pub value: u64,
}

// ---------------------------------------------------------------------------
// Small conversion helpers
// ---------------------------------------------------------------------------

unsafe fn required_str<'a>(ptr: *const c_char) -> Result<&'a str, FfiError> {
    if ptr.is_null() {
        return Err(FfiError::NullPointer);
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| FfiError::InvalidEncoding)
}

unsafe fn optional_str<'a>(ptr: *const c_char) -> Result<Option<&'a str>, FfiError> {
    if ptr.is_null() {
        Ok(None)
    } else {
        required_str(ptr).map(Some)
    }
}

unsafe fn byte_slice<'a>(ptr: *const u8, len: usize) -> Result<&'a [u8], FfiError> {
    if len == 0 {
        Ok(&[])
    } else if ptr.is_null() {
        Err(FfiError::NullPointer)
    } else {
        Ok(slice::from_raw_parts(ptr, len))
    }
}

/// Hand a byte vector to the caller as pointer + length. Released later by
/// `pct_bytes_free`.
unsafe fn give_bytes(bytes: Vec<u8>, out: *mut *mut u8, len_out: *mut usize) {
    let mut boxed = bytes.into_boxed_slice();
    *out = boxed.as_mut_ptr();
    *len_out = boxed.len();
    std::mem::forget(boxed);
}

// ---------------------------------------------------------------------------
// Request construction
// ---------------------------------------------------------------------------

/// Create a transaction request from an array of payments.
///
/// # Safety
/// `payments` must point to `num_payments` valid [`PctPayment`] values and
/// `request_out` must be a valid out-pointer. The returned handle is owned
/// by the caller; release with [`pct_request_free`].
#[no_mangle]
pub unsafe extern "C" fn pct_request_new(
    payments: *const PctPayment,
    num_payments: usize,
    request_out: *mut *mut PctRequestHandle,
) -> PctResultCode {
    if payments.is_null() || request_out.is_null() {
        return report(FfiError::NullPointer);
    }

    let mut converted = Vec::with_capacity(num_payments);
    for c_payment in slice::from_raw_parts(payments, num_payments) {
        let address = match required_str(c_payment.address) {
            Ok(s) => s,
            Err(e) => return report(e),
        };
        let mut payment = Payment::new(address, c_payment.amount);

        match byte_slice(c_payment.memo, c_payment.memo_len) {
            Ok([]) => {}
            Ok(memo) => payment = payment.with_memo(memo.to_vec()),
            Err(e) => return report(e),
        }
        match optional_str(c_payment.label) {
            Ok(Some(label)) => payment = payment.with_label(label),
            Ok(None) => {}
            Err(e) => return report(e),
        }
        match optional_str(c_payment.message) {
            Ok(Some(message)) => payment = payment.with_message(message),
            Ok(None) => {}
            Err(e) => return report(e),
        }
        converted.push(payment);
    }

    let request = Box::new(TransactionRequest::new(converted));
    *request_out = Box::into_raw(request) as *mut PctRequestHandle;
    PctResultCode::Success
}

/// Set the target height. Must happen before the request is used to
/// propose.
///
/// # Safety
/// `request` must be a live handle from [`pct_request_new`].
#[no_mangle]
pub unsafe extern "C" fn pct_request_set_target_height(
    request: *mut PctRequestHandle,
    target_height: u32,
) -> PctResultCode {
    if request.is_null() {
        return report(FfiError::NullPointer);
    }
    let request = &mut *(request as *mut TransactionRequest);
    request.target_height = target_height;
    PctResultCode::Success
}

/// Select mainnet (`true`) or testnet (`false`) parameters. Must happen
/// before the request is used to propose.
///
/// # Safety
/// `request` must be a live handle from [`pct_request_new`].
#[no_mangle]
pub unsafe extern "C" fn pct_request_set_mainnet(
    request: *mut PctRequestHandle,
    use_mainnet: bool,
) -> PctResultCode {
    if request.is_null() {
        return report(FfiError::NullPointer);
    }
    let request = &mut *(request as *mut TransactionRequest);
    request.network = if use_mainnet {
        pct::Network::Mainnet
    } else {
        pct::Network::Testnet
    };
    PctResultCode::Success
}

/// Release a request handle.
///
/// # Safety
/// `request` must be a handle from [`pct_request_new`] (or null, which is
/// a no-op) that has not already been freed.
#[no_mangle]
pub unsafe extern "C" fn pct_request_free(request: *mut PctRequestHandle) {
    if !request.is_null() {
        drop(Box::from_raw(request as *mut TransactionRequest));
    }
}

// ---------------------------------------------------------------------------
// Lifecycle operations
// ---------------------------------------------------------------------------

/// Propose a PCT from inputs and a request. Non-consuming on the request.
///
/// `change_address` is nullable; when null, surplus goes to the implicit
/// shielded self-change path.
///
/// # Safety
/// `inputs` must point to `num_inputs` valid values, `request` must be a
/// live request handle, and `pct_out` must be a valid out-pointer. The
/// returned handle is owned by the caller.
#[no_mangle]
pub unsafe extern "C" fn pct_propose(
    inputs: *const PctTransparentInput,
    num_inputs: usize,
    request: *const PctRequestHandle,
    change_address: *const c_char,
    pct_out: *mut *mut PctHandle,
) -> PctResultCode {
    if (inputs.is_null() && num_inputs > 0) || request.is_null() || pct_out.is_null() {
        return report(FfiError::NullPointer);
    }

    let request = &*(request as *const TransactionRequest);

    let mut specs = Vec::with_capacity(num_inputs);
    if num_inputs > 0 {
        for c_input in slice::from_raw_parts(inputs, num_inputs) {
            let script = match byte_slice(c_input.script_pubkey, c_input.script_pubkey_len) {
                Ok(s) => s.to_vec(),
                Err(e) => return report(e),
            };
            specs.push(TransparentInputSpec {
                pubkey: c_input.pubkey,
                prev_txid: c_input.prev_txid,
                prev_index: c_input.prev_index,
                value: c_input.value,
                script_pubkey: script,
            });
        }
    }

    let change = match optional_str(change_address) {
        Ok(c) => c,
        Err(e) => return report(e),
    };

    match pct::propose(&specs, request, change) {
        Ok(pct) => {
            *pct_out = Box::into_raw(Box::new(pct)) as *mut PctHandle;
            PctResultCode::Success
        }
        Err(e) => report(e.into()),
    }
}

/// Attach the proof bundle. **Consuming**: `pct` is invalid after this
/// call, success or failure.
///
/// # Safety
/// `pct` must be a live, not-yet-consumed handle; `pct_out` must be a
/// valid out-pointer.
#[no_mangle]
pub unsafe extern "C" fn pct_prove(
    pct: *mut PctHandle,
    pct_out: *mut *mut PctHandle,
) -> PctResultCode {
    if pct.is_null() || pct_out.is_null() {
        return report(FfiError::NullPointer);
    }

    // Take ownership before doing anything: the handle dies here.
    let owned = Box::from_raw(pct as *mut Pct);

    match pct::prove(*owned, &CommitmentEngine) {
        Ok(proved) => {
            *pct_out = Box::into_raw(Box::new(proved)) as *mut PctHandle;
            PctResultCode::Success
        }
        Err(e) => report(e.into()),
    }
}

/// Verify the PCT against the signer's own request and expected change.
/// Non-consuming; a non-success code means **do not sign**.
///
/// `expected_change` may be null when `num_expected` is 0.
///
/// # Safety
/// `pct` and `request` must be live handles; `expected_change` must point
/// to `num_expected` valid values when non-null.
#[no_mangle]
pub unsafe extern "C" fn pct_verify_before_signing(
    pct: *const PctHandle,
    request: *const PctRequestHandle,
    expected_change: *const PctTransparentOutput,
    num_expected: usize,
) -> PctResultCode {
    if pct.is_null() || request.is_null() || (expected_change.is_null() && num_expected > 0) {
        return report(FfiError::NullPointer);
    }

    let pct = &*(pct as *const Pct);
    let request = &*(request as *const TransactionRequest);

    let mut expected = Vec::with_capacity(num_expected);
    if num_expected > 0 {
        for c_output in slice::from_raw_parts(expected_change, num_expected) {
            let script = match byte_slice(c_output.script_pubkey, c_output.script_pubkey_len) {
                Ok(s) => s.to_vec(),
                Err(e) => return report(e),
            };
            expected.push(TransparentOutputSpec {
                script_pubkey: script,
                value: c_output.value,
            });
        }
    }

    match pct::verify_before_signing(pct, request, &expected) {
        Ok(()) => PctResultCode::Success,
        Err(e) => report(e.into()),
    }
}

/// Compute the 32-byte signature hash for one input. Non-consuming.
///
/// # Safety
/// `pct` must be a live handle and `sighash_out` must point to 32 writable
/// bytes.
#[no_mangle]
pub unsafe extern "C" fn pct_get_sighash(
    pct: *const PctHandle,
    input_index: usize,
    sighash_out: *mut [u8; 32],
) -> PctResultCode {
    if pct.is_null() || sighash_out.is_null() {
        return report(FfiError::NullPointer);
    }

    let pct = &*(pct as *const Pct);
    match pct::get_sighash(pct, input_index) {
        Ok(sighash) => {
            *sighash_out = *sighash.as_bytes();
            PctResultCode::Success
        }
        Err(e) => report(e.into()),
    }
}

/// Append a 64-byte signature for one input. **Consuming**: `pct` is
/// invalid after this call, success or failure.
///
/// # Safety
/// `pct` must be a live, not-yet-consumed handle; `signature` must point
/// to `signature_len` valid bytes; `pct_out` must be a valid out-pointer.
#[no_mangle]
pub unsafe extern "C" fn pct_append_signature(
    pct: *mut PctHandle,
    input_index: usize,
    signature: *const u8,
    signature_len: usize,
    pct_out: *mut *mut PctHandle,
) -> PctResultCode {
    if pct.is_null() || signature.is_null() || pct_out.is_null() {
        return report(FfiError::NullPointer);
    }

    let owned = Box::from_raw(pct as *mut Pct);
    let signature = slice::from_raw_parts(signature, signature_len);

    match pct::append_signature(*owned, input_index, signature) {
        Ok(signed) => {
            *pct_out = Box::into_raw(Box::new(signed)) as *mut PctHandle;
            PctResultCode::Success
        }
        Err(e) => report(e.into()),
    }
}

/// Merge independently signed copies of one proposal. **Consuming**: every
/// handle in `pcts` is invalid after this call, success or failure.
///
/// # Safety
/// `pcts` must point to `num_pcts` distinct live handles (passing the same
/// handle twice is undefined behavior, as with any double-free);
/// `pct_out` must be a valid out-pointer.
#[no_mangle]
pub unsafe extern "C" fn pct_combine(
    pcts: *const *mut PctHandle,
    num_pcts: usize,
    pct_out: *mut *mut PctHandle,
) -> PctResultCode {
    if (pcts.is_null() && num_pcts > 0) || pct_out.is_null() {
        return report(FfiError::NullPointer);
    }

    // Take ownership of every element up front so the consumption contract
    // holds even when validation below fails.
    let mut owned = Vec::with_capacity(num_pcts);
    if num_pcts > 0 {
        let handles = slice::from_raw_parts(pcts, num_pcts);
        if handles.iter().any(|h| h.is_null()) {
            // Free the non-null ones we were given; nothing valid can
            // come of a partially null batch.
            for &h in handles.iter().filter(|h| !h.is_null()) {
                drop(Box::from_raw(h as *mut Pct));
            }
            return report(FfiError::NullPointer);
        }
        for &h in handles {
            owned.push(*Box::from_raw(h as *mut Pct));
        }
    }

    match pct::combine(owned) {
        Ok(merged) => {
            *pct_out = Box::into_raw(Box::new(merged)) as *mut PctHandle;
            PctResultCode::Success
        }
        Err(e) => report(e.into()),
    }
}

/// Finalize and extract the raw transaction bytes. **Consuming**: `pct` is
/// invalid after this call, success or failure. The returned buffer must
/// be released with [`pct_bytes_free`].
///
/// # Safety
/// `pct` must be a live, not-yet-consumed handle; the out-pointers must be
/// valid.
#[no_mangle]
pub unsafe extern "C" fn pct_finalize_and_extract(
    pct: *mut PctHandle,
    tx_bytes_out: *mut *mut u8,
    tx_bytes_len_out: *mut usize,
) -> PctResultCode {
    if pct.is_null() || tx_bytes_out.is_null() || tx_bytes_len_out.is_null() {
        return report(FfiError::NullPointer);
    }

    let owned = Box::from_raw(pct as *mut Pct);

    match pct::finalize_and_extract(*owned) {
        Ok(tx_bytes) => {
            give_bytes(tx_bytes, tx_bytes_out, tx_bytes_len_out);
            PctResultCode::Success
        }
        Err(e) => report(e.into()),
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Serialize a PCT. Non-consuming; the handle stays valid. The returned
/// buffer must be released with [`pct_bytes_free`].
///
/// # Safety
/// `pct` must be a live handle; the out-pointers must be valid.
#[no_mangle]
pub unsafe extern "C" fn pct_serialize(
    pct: *const PctHandle,
    bytes_out: *mut *mut u8,
    bytes_len_out: *mut usize,
) -> PctResultCode {
    if pct.is_null() || bytes_out.is_null() || bytes_len_out.is_null() {
        return report(FfiError::NullPointer);
    }

    let pct = &*(pct as *const Pct);
    give_bytes(pct.serialize(), bytes_out, bytes_len_out);
    PctResultCode::Success
}

/// Parse serialized bytes into a fresh PCT handle.
///
/// # Safety
/// `bytes` must point to `bytes_len` valid bytes; `pct_out` must be a
/// valid out-pointer. The returned handle is owned by the caller.
#[no_mangle]
pub unsafe extern "C" fn pct_parse(
    bytes: *const u8,
    bytes_len: usize,
    pct_out: *mut *mut PctHandle,
) -> PctResultCode {
    if (bytes.is_null() && bytes_len > 0) || pct_out.is_null() {
        return report(FfiError::NullPointer);
    }

    let bytes = if bytes_len == 0 {
        &[][..]
    } else {
        slice::from_raw_parts(bytes, bytes_len)
    };

    match Pct::parse(bytes) {
        Ok(pct) => {
            *pct_out = Box::into_raw(Box::new(pct)) as *mut PctHandle;
            PctResultCode::Success
        }
        Err(e) => report(e.into()),
    }
}

// ---------------------------------------------------------------------------
// Release & diagnostics
// ---------------------------------------------------------------------------

/// Release a PCT handle that was not consumed by a lifecycle call.
///
/// # Safety
/// `pct` must be a live handle (or null, which is a no-op) that has not
/// already been freed or consumed.
#[no_mangle]
pub unsafe extern "C" fn pct_free(pct: *mut PctHandle) {
    if !pct.is_null() {
        drop(Box::from_raw(pct as *mut Pct));
    }
}

/// Release a byte buffer returned by this library.
///
/// # Safety
/// `bytes`/`len` must be exactly what an out-parameter of this library
/// produced, unmodified, and not already freed.
#[no_mangle]
pub unsafe extern "C" fn pct_bytes_free(bytes: *mut u8, len: usize) {
    if !bytes.is_null() {
        drop(Vec::from_raw_parts(bytes, len, len));
    }
}

/// Copy the most recent failure message on this thread into `buffer` as a
/// NUL-terminated string. An empty string means no failure has been
/// recorded. Returns [`PctResultCode::BufferTooSmall`] when the message
/// (plus NUL) does not fit.
///
/// # Safety
/// `buffer` must point to `buffer_len` writable bytes.
#[no_mangle]
pub unsafe extern "C" fn pct_last_error_message(
    buffer: *mut c_char,
    buffer_len: usize,
) -> PctResultCode {
    if buffer.is_null() || buffer_len == 0 {
        return PctResultCode::NullPointer;
    }

    with_last_error(|message| {
        let message = message.unwrap_or("");
        let bytes = message.as_bytes();
        if bytes.len() + 1 > buffer_len {
            return PctResultCode::BufferTooSmall;
        }
        ptr::copy_nonoverlapping(bytes.as_ptr() as *const c_char, buffer, bytes.len());
        *buffer.add(bytes.len()) = 0;
        PctResultCode::Success
    })
}
