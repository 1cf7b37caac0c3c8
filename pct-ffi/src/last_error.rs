//! # Thread-Local Last-Error Channel
//!
//! FFI functions return a bare result code; the human-readable message for
//! the most recent failure is parked here, per thread, until the caller
//! copies it out. This is a best-effort diagnostic channel: read it
//! immediately after a failing call, from the same thread that made the
//! call. It is not synchronized across threads and not a substitute for
//! the directly returned code.

use std::cell::RefCell;

thread_local! {
    static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Record the message for the most recent failure on this thread.
pub(crate) fn set_last_error(message: String) {
    LAST_ERROR.with(|slot| {
        *slot.borrow_mut() = Some(message);
    });
}

/// Read the most recent failure message, if any.
pub(crate) fn with_last_error<R>(f: impl FnOnce(Option<&str>) -> R) -> R {
    LAST_ERROR.with(|slot| f(slot.borrow().as_deref()))
}
