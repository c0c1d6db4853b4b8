//! Marshaling helpers shared by the wrappers.

use crate::api::Api;
use crate::error::{Error, Result};
use crate::ffi::gchar;
use std::ffi::{CStr, CString};

/// Convert a Rust string into a C string for a native call.
///
/// Returns an error naming `param` if the string contains a NUL byte.
pub fn to_cstring(s: &str, param: &'static str) -> Result<CString> {
    CString::new(s).map_err(|e| Error::nul_byte(param, e))
}

/// Copy a borrowed C string into an owned `String`.
///
/// Returns `None` for a null pointer. Invalid UTF-8 is replaced.
///
/// # Safety
///
/// `ptr` must be null or point to a valid NUL-terminated string.
pub unsafe fn lossy_string(ptr: *const gchar) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    let cstr = unsafe { CStr::from_ptr(ptr) };
    Some(cstr.to_string_lossy().into_owned())
}

/// Copy a C string allocated by the native library, then release it with
/// `g_free`.
///
/// # Safety
///
/// `ptr` must be null or a NUL-terminated string owned by the caller and
/// allocated with the native allocator.
pub unsafe fn take_gstring(api: &Api, ptr: *mut gchar) -> Option<String> {
    let owned = unsafe { lossy_string(ptr) };
    if !ptr.is_null() {
        unsafe { (api.g_free)(ptr.cast()) };
    }
    owned
}

/// Read a NUL-terminated string that lives as long as the process.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string that is never
/// freed (interned quark strings, for example).
pub unsafe fn static_str(ptr: *const gchar) -> Option<&'static str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}
