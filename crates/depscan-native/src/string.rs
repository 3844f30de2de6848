//! Owned string and string-set handles.
//!
//! Every string handed across the boundary is an independent heap copy that
//! the caller releases exactly once with [`depscan_string_dispose`] (or, for
//! sets, [`depscan_string_set_dispose`]). Empty strings use a static buffer
//! and disposing them is a no-op.

use std::ffi::{CStr, CString, c_char, c_uint, c_void};
use std::ptr;

const UNMANAGED: c_uint = 0;
const OWNED_CSTRING: c_uint = 1;

static EMPTY: &CStr = c"";

/// A string owned by the caller.
#[repr(C)]
#[derive(Debug)]
pub struct DepscanString {
    pub data: *const c_void,
    pub private_flags: c_uint,
}

/// An owned array of strings plus its length.
#[repr(C)]
#[derive(Debug)]
pub struct DepscanStringSet {
    pub strings: *mut DepscanString,
    pub count: c_uint,
}

impl DepscanString {
    /// Duplicate `s` into a new caller-owned string.
    ///
    /// Text after an interior NUL cannot be represented and is dropped.
    pub fn dup(s: &str) -> Self {
        if s.is_empty() {
            return Self::empty();
        }
        let owned = to_cstring(s);
        Self {
            data: owned.into_raw() as *const c_void,
            private_flags: OWNED_CSTRING,
        }
    }

    pub fn empty() -> Self {
        Self {
            data: EMPTY.as_ptr() as *const c_void,
            private_flags: UNMANAGED,
        }
    }

    pub fn as_ptr(&self) -> *const c_char {
        self.data as *const c_char
    }

    /// Borrow the contents, or `None` for a null handle.
    ///
    /// # Safety
    ///
    /// The handle must not have been disposed.
    pub unsafe fn to_str_lossy(&self) -> Option<std::borrow::Cow<'_, str>> {
        if self.data.is_null() {
            return None;
        }
        // SAFETY: non-null data always points at a NUL-terminated buffer.
        Some(unsafe { CStr::from_ptr(self.as_ptr()) }.to_string_lossy())
    }

    /// Release the string.
    ///
    /// # Safety
    ///
    /// Must be called at most once per handle.
    pub unsafe fn dispose(self) {
        if self.private_flags == OWNED_CSTRING && !self.data.is_null() {
            // SAFETY: owned strings come from `CString::into_raw` in `dup`.
            drop(unsafe { CString::from_raw(self.data as *mut c_char) });
        }
    }
}

impl DepscanStringSet {
    /// Duplicate every item into a new caller-owned set.
    pub fn create(items: &[String]) -> *mut DepscanStringSet {
        let strings: Box<[DepscanString]> = items.iter().map(|s| DepscanString::dup(s)).collect();
        let count = strings.len() as c_uint;
        Box::into_raw(Box::new(DepscanStringSet {
            strings: Box::into_raw(strings) as *mut DepscanString,
            count,
        }))
    }

    /// Borrow the strings of a live set.
    ///
    /// # Safety
    ///
    /// `set` must be null or a live set returned by [`DepscanStringSet::create`].
    pub unsafe fn as_slice<'a>(set: *const DepscanStringSet) -> &'a [DepscanString] {
        if set.is_null() {
            return &[];
        }
        // SAFETY: guaranteed by the caller.
        let set = unsafe { &*set };
        // SAFETY: `strings` came from a boxed slice of exactly `count` items.
        unsafe { std::slice::from_raw_parts(set.strings, set.count as usize) }
    }

    /// Free every string, the array, and the set itself.
    ///
    /// # Safety
    ///
    /// `set` must be null or a live set returned by [`DepscanStringSet::create`];
    /// it is dangling afterwards.
    pub unsafe fn dispose(set: *mut DepscanStringSet) {
        if set.is_null() {
            return;
        }
        // SAFETY: the set was allocated by `create` via `Box::into_raw`.
        let set = unsafe { Box::from_raw(set) };
        let slice = ptr::slice_from_raw_parts_mut(set.strings, set.count as usize);
        // SAFETY: the array was a boxed slice of exactly `count` items.
        let strings = unsafe { Box::from_raw(slice) };
        for string in strings.into_vec() {
            // SAFETY: each string is owned by the set and freed once here.
            unsafe { string.dispose() };
        }
    }
}

/// Copy `s` into a `CString`, dropping anything after an interior NUL.
pub(crate) fn to_cstring(s: &str) -> CString {
    match CString::new(s) {
        Ok(c) => c,
        Err(err) => {
            tracing::warn!(string = s, "truncating string at interior NUL");
            let pos = err.nul_position();
            let mut bytes = err.into_vec();
            bytes.truncate(pos);
            // SAFETY: truncated before the first NUL.
            unsafe { CString::from_vec_unchecked(bytes) }
        }
    }
}

/// Return the NUL-terminated contents of `string`, or null.
///
/// # Safety
///
/// `string` must not have been disposed. The pointer is valid until it is.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn depscan_string_get_cstr(string: DepscanString) -> *const c_char {
    string.as_ptr()
}

/// Release a string returned by this library.
///
/// # Safety
///
/// Must be called at most once per string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn depscan_string_dispose(string: DepscanString) {
    // SAFETY: forwarded from the caller.
    unsafe { string.dispose() }
}

/// Release a string set returned by this library.
///
/// # Safety
///
/// `set` must be null or a live set; it is dangling afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn depscan_string_set_dispose(set: *mut DepscanStringSet) {
    // SAFETY: forwarded from the caller.
    unsafe { DepscanStringSet::dispose(set) }
}
