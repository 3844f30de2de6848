//! Standalone functions: logging setup and version.

use std::ffi::{CStr, c_char};

use depscan_core::LogLevel;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");

/// Library version as a static NUL-terminated string. Never free it.
#[unsafe(no_mangle)]
pub extern "C" fn depscan_version() -> *const c_char {
    VERSION.as_ptr() as *const c_char
}

/// Initialize logging with a level name ("silent", "error", "warn", "info",
/// "debug", "trace"). Null or unknown names fall back to "warn".
///
/// # Safety
///
/// `level` must be null or a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn depscan_init_logging(level: *const c_char) {
    let level = if level.is_null() {
        LogLevel::default()
    } else {
        // SAFETY: guaranteed by the caller.
        let name = unsafe { CStr::from_ptr(level) }.to_string_lossy();
        name.parse::<LogLevel>().unwrap_or_default()
    };
    depscan_core::init_logging(level);
}

/// Initialize logging from `RUST_LOG`.
#[unsafe(no_mangle)]
pub extern "C" fn depscan_init_logging_from_env() {
    depscan_core::init_logging_from_env();
}
