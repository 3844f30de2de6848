//! Error reporting through the `error` out-parameter.

use depscan_core::Error;

use crate::string::DepscanString;

/// Store `error` in `out` when the caller supplied a destination.
///
/// # Safety
///
/// `out` must be null or valid for writes. Any handle already stored there
/// is overwritten without being disposed.
pub(crate) unsafe fn write_error(out: *mut DepscanString, error: &Error) {
    let message = error.to_string();
    tracing::debug!(error = %message, "dependency query failed");
    if !out.is_null() {
        // SAFETY: guaranteed by the caller.
        unsafe { out.write(DepscanString::dup(&message)) };
    }
}

/// Store an empty string in `out`.
///
/// # Safety
///
/// Same as [`write_error`].
pub(crate) unsafe fn clear_error(out: *mut DepscanString) {
    if !out.is_null() {
        // SAFETY: guaranteed by the caller.
        unsafe { out.write(DepscanString::empty()) };
    }
}
