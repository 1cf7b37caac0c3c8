//! Integration tests for the C ABI surface.
//!
//! These drive the exported functions exactly as a C caller would: raw
//! pointers in, result codes out, explicit frees, and the thread-local
//! last-error message checked after failures. Fixture addresses are built
//! with the core library since a C harness would receive them as strings
//! anyway.

use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use pct::address::TransparentAddress;
use pct::config::Network;
use pct_ffi::*;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn t_addr(seed: u8) -> CString {
    let addr = TransparentAddress::from_pubkey(&[seed; 33], Network::Testnet).encode();
    CString::new(addr).unwrap()
}

fn payment(address: &CString, amount: u64) -> PctPayment {
    PctPayment {
        address: address.as_ptr(),
        amount,
        memo: ptr::null(),
        memo_len: 0,
        label: ptr::null(),
        message: ptr::null(),
    }
}

fn input(seed: u8, value: u64, script: &[u8]) -> PctTransparentInput {
    PctTransparentInput {
        pubkey: [seed; 33],
        prev_txid: [seed; 32],
        prev_index: 0,
        value,
        script_pubkey: script.as_ptr(),
        script_pubkey_len: script.len(),
    }
}

fn last_error() -> String {
    let mut buf = vec![0 as c_char; 512];
    let code = unsafe { pct_last_error_message(buf.as_mut_ptr(), buf.len()) };
    assert_eq!(code, PctResultCode::Success);
    let bytes: Vec<u8> = buf
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8(bytes).unwrap()
}

/// Builds a request for one 50_000 payment and returns its handle.
fn make_request(address: &CString) -> *mut PctRequestHandle {
    let payments = [payment(address, 50_000)];
    let mut request = ptr::null_mut();
    let code = unsafe { pct_request_new(payments.as_ptr(), payments.len(), &mut request) };
    assert_eq!(code, PctResultCode::Success);
    assert!(!request.is_null());
    request
}

/// Proposes and proves a single-input PCT, returning the proved handle.
fn make_proved(request: *mut PctRequestHandle) -> *mut PctHandle {
    let script = [0x76u8, 0xa9, 0x14, 0x01, 0x88, 0xac];
    let inputs = [input(1, 200_000, &script)];

    let mut proposed = ptr::null_mut();
    let code = unsafe {
        pct_propose(
            inputs.as_ptr(),
            inputs.len(),
            request,
            ptr::null(),
            &mut proposed,
        )
    };
    assert_eq!(code, PctResultCode::Success);

    let mut proved = ptr::null_mut();
    let code = unsafe { pct_prove(proposed, &mut proved) };
    assert_eq!(code, PctResultCode::Success);
    proved
}

// ---------------------------------------------------------------------------
// Lifecycle through the ABI
// ---------------------------------------------------------------------------

#[test]
fn full_lifecycle_through_the_abi() {
    let address = t_addr(0x03);
    let request = make_request(&address);
    unsafe {
        assert_eq!(
            pct_request_set_target_height(request, 1_000),
            PctResultCode::Success
        );
        assert_eq!(
            pct_request_set_mainnet(request, false),
            PctResultCode::Success
        );
    }

    let proved = make_proved(request);

    // Audit before signing.
    let code = unsafe { pct_verify_before_signing(proved, request, ptr::null(), 0) };
    assert_eq!(code, PctResultCode::Success);

    // Sighash out, signature in.
    let mut sighash = [0u8; 32];
    let code = unsafe { pct_get_sighash(proved, 0, &mut sighash) };
    assert_eq!(code, PctResultCode::Success);
    assert_ne!(sighash, [0u8; 32]);

    let signature = [0x11u8; 64];
    let mut signed = ptr::null_mut();
    let code = unsafe {
        pct_append_signature(proved, 0, signature.as_ptr(), signature.len(), &mut signed)
    };
    assert_eq!(code, PctResultCode::Success);

    // Round trip through the codec.
    let mut bytes = ptr::null_mut();
    let mut bytes_len = 0usize;
    let code = unsafe { pct_serialize(signed, &mut bytes, &mut bytes_len) };
    assert_eq!(code, PctResultCode::Success);
    assert!(bytes_len > 0);

    let mut reparsed = ptr::null_mut();
    let code = unsafe { pct_parse(bytes, bytes_len, &mut reparsed) };
    assert_eq!(code, PctResultCode::Success);
    unsafe { pct_bytes_free(bytes, bytes_len) };

    // Finalize the reparsed copy; free the original handle explicitly.
    let mut tx_bytes = ptr::null_mut();
    let mut tx_len = 0usize;
    let code = unsafe { pct_finalize_and_extract(reparsed, &mut tx_bytes, &mut tx_len) };
    assert_eq!(code, PctResultCode::Success);
    assert!(tx_len > 0);

    unsafe {
        pct_bytes_free(tx_bytes, tx_len);
        pct_free(signed);
        pct_request_free(request);
    }
}

#[test]
fn combine_through_the_abi() {
    let address = t_addr(0x03);
    let request = make_request(&address);
    let proved = make_proved(request);

    // Two independent copies via the codec.
    let mut bytes = ptr::null_mut();
    let mut bytes_len = 0usize;
    unsafe {
        assert_eq!(
            pct_serialize(proved, &mut bytes, &mut bytes_len),
            PctResultCode::Success
        );
    }
    let mut copy_a = ptr::null_mut();
    let mut copy_b = ptr::null_mut();
    unsafe {
        assert_eq!(pct_parse(bytes, bytes_len, &mut copy_a), PctResultCode::Success);
        assert_eq!(pct_parse(bytes, bytes_len, &mut copy_b), PctResultCode::Success);
        pct_bytes_free(bytes, bytes_len);
    }

    // Sign the single input on copy A only; combine with the unsigned B.
    let signature = [0x22u8; 64];
    let mut signed_a = ptr::null_mut();
    unsafe {
        assert_eq!(
            pct_append_signature(copy_a, 0, signature.as_ptr(), signature.len(), &mut signed_a),
            PctResultCode::Success
        );
    }

    let handles = [signed_a, copy_b];
    let mut merged = ptr::null_mut();
    let code = unsafe { pct_combine(handles.as_ptr(), handles.len(), &mut merged) };
    assert_eq!(code, PctResultCode::Success);

    let mut tx_bytes = ptr::null_mut();
    let mut tx_len = 0usize;
    let code = unsafe { pct_finalize_and_extract(merged, &mut tx_bytes, &mut tx_len) };
    assert_eq!(code, PctResultCode::Success);

    unsafe {
        pct_bytes_free(tx_bytes, tx_len);
        pct_free(proved);
        pct_request_free(request);
    }
}

// ---------------------------------------------------------------------------
// Taxonomy mapping
// ---------------------------------------------------------------------------

#[test]
fn result_codes_match_the_published_taxonomy() {
    assert_eq!(PctResultCode::Success as i32, 0);
    assert_eq!(PctResultCode::NullPointer as i32, 1);
    assert_eq!(PctResultCode::InvalidEncoding as i32, 2);
    assert_eq!(PctResultCode::BufferTooSmall as i32, 3);
    assert_eq!(PctResultCode::Proposal as i32, 10);
    assert_eq!(PctResultCode::Prover as i32, 11);
    assert_eq!(PctResultCode::Verification as i32, 12);
    assert_eq!(PctResultCode::Sighash as i32, 13);
    assert_eq!(PctResultCode::Signature as i32, 14);
    assert_eq!(PctResultCode::Combine as i32, 15);
    assert_eq!(PctResultCode::Finalization as i32, 16);
    assert_eq!(PctResultCode::Parse as i32, 17);
    assert_eq!(PctResultCode::NotImplemented as i32, 99);
}

#[test]
fn null_handles_are_reported_not_crashed() {
    let mut out = ptr::null_mut();
    unsafe {
        assert_eq!(
            pct_propose(ptr::null(), 1, ptr::null(), ptr::null(), &mut out),
            PctResultCode::NullPointer
        );
        assert_eq!(pct_prove(ptr::null_mut(), &mut out), PctResultCode::NullPointer);
        assert_eq!(
            pct_parse(ptr::null(), 4, &mut out),
            PctResultCode::NullPointer
        );
        let mut sighash = [0u8; 32];
        assert_eq!(
            pct_get_sighash(ptr::null(), 0, &mut sighash),
            PctResultCode::NullPointer
        );
        // Null frees are no-ops, as with free().
        pct_free(ptr::null_mut());
        pct_request_free(ptr::null_mut());
        pct_bytes_free(ptr::null_mut(), 0);
    }
}

#[test]
fn proposal_failure_sets_a_readable_message() {
    let bad_address = CString::new("not an address").unwrap();
    let request = make_request(&bad_address);

    let script = [0x76u8];
    let inputs = [input(1, 100_000, &script)];
    let mut out = ptr::null_mut();
    let code = unsafe {
        pct_propose(inputs.as_ptr(), inputs.len(), request, ptr::null(), &mut out)
    };
    assert_eq!(code, PctResultCode::Proposal);

    let message = last_error();
    assert!(!message.is_empty());
    assert!(message.contains("invalid address"), "message: {message}");

    unsafe { pct_request_free(request) };
}

#[test]
fn signature_and_sighash_errors_map_to_their_codes() {
    let address = t_addr(0x03);
    let request = make_request(&address);
    let proved = make_proved(request);

    // Out-of-range sighash index.
    let mut sighash = [0u8; 32];
    let code = unsafe { pct_get_sighash(proved, 9, &mut sighash) };
    assert_eq!(code, PctResultCode::Sighash);
    assert!(last_error().contains("out of range"));

    // Wrong-length signature. This consumes the handle even on failure.
    let bogus = [0u8; 10];
    let mut out = ptr::null_mut();
    let code =
        unsafe { pct_append_signature(proved, 0, bogus.as_ptr(), bogus.len(), &mut out) };
    assert_eq!(code, PctResultCode::Signature);
    assert!(last_error().contains("64 bytes"));

    unsafe { pct_request_free(request) };
}

#[test]
fn parse_and_combine_errors_map_to_their_codes() {
    let garbage = [0xFFu8; 16];
    let mut out = ptr::null_mut();
    let code = unsafe { pct_parse(garbage.as_ptr(), garbage.len(), &mut out) };
    assert_eq!(code, PctResultCode::Parse);

    let code = unsafe { pct_combine(ptr::null(), 0, &mut out) };
    assert_eq!(code, PctResultCode::Combine);
    assert!(last_error().contains("no PCTs"));
}

#[test]
fn verification_failure_maps_to_its_code() {
    let address = t_addr(0x03);
    let request = make_request(&address);
    let proved = make_proved(request);

    // A different request than the one the PCT was built from.
    let other_address = t_addr(0x44);
    let other_request = make_request(&other_address);

    let code = unsafe { pct_verify_before_signing(proved, other_request, ptr::null(), 0) };
    assert_eq!(code, PctResultCode::Verification);
    assert!(last_error().contains("not found"));

    unsafe {
        pct_free(proved);
        pct_request_free(request);
        pct_request_free(other_request);
    }
}

#[test]
fn last_error_respects_small_buffers() {
    // Provoke an error with a known-long message first.
    let garbage = [0u8; 2];
    let mut out = ptr::null_mut();
    unsafe {
        assert_eq!(
            pct_parse(garbage.as_ptr(), garbage.len(), &mut out),
            PctResultCode::Parse
        );
    }

    let mut tiny = [0 as c_char; 2];
    let code = unsafe { pct_last_error_message(tiny.as_mut_ptr(), tiny.len()) };
    assert_eq!(code, PctResultCode::BufferTooSmall);
}
