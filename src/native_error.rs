//! `GError` objects and `GQuark` domains.
//!
//! Most callers only see [`crate::Error::Native`], which is a copy of a
//! `GError` taken at the call site. [`NativeError`] wraps the native object
//! itself for code that has to create, inspect or hand one back.

use crate::error::{NativeFailure, Result};
use crate::ffi::{GError, GQuark, from_gboolean, gchar};
use crate::handle::{Owned, foreign_handle, sole_owned};
use crate::library::GLib;
use crate::util::{lossy_string, static_str, to_cstring};

/// An interned string identifying an error domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Quark(pub GQuark);

impl Quark {
    /// `g_quark_from_string`
    pub fn from_name(lib: &GLib, name: &str) -> Result<Self> {
        let c_name = to_cstring(name, "name")?;
        Ok(Quark(unsafe { (lib.g_quark_from_string)(c_name.as_ptr()) }))
    }

    /// `g_quark_to_string`. Quark strings are never freed.
    pub fn as_str(self, lib: &GLib) -> Option<&'static str> {
        unsafe { static_str((lib.g_quark_to_string)(self.0)) }
    }
}

foreign_handle! {
    /// View over a `GError`.
    pub struct NativeErrorRef => GError;
}

sole_owned!(NativeErrorRef, g_error_free);

pub type NativeError = Owned<NativeErrorRef>;

impl NativeError {
    /// `g_error_new_literal`
    pub fn new(lib: &'static GLib, domain: Quark, code: i32, message: &str) -> Result<Self> {
        let c_message = to_cstring(message, "message")?;
        let ptr = unsafe { (lib.g_error_new_literal)(domain.0, code, c_message.as_ptr()) };
        unsafe { Self::adopt_new(lib, ptr, "g_error_new_literal") }
    }
}

impl NativeErrorRef {
    /// The `domain` field.
    pub fn domain(&self) -> Quark {
        Quark(unsafe { (*self.raw.as_ptr()).domain })
    }

    /// Overwrite the `domain` field.
    pub fn set_domain(&self, domain: Quark) {
        unsafe { (*self.raw.as_ptr()).domain = domain.0 };
    }

    /// The `code` field.
    pub fn code(&self) -> i32 {
        unsafe { (*self.raw.as_ptr()).code }
    }

    /// Overwrite the `code` field.
    pub fn set_code(&self, code: i32) {
        unsafe { (*self.raw.as_ptr()).code = code };
    }

    /// The `message` field.
    pub fn message_ptr(&self) -> *mut gchar {
        unsafe { (*self.raw.as_ptr()).message }
    }

    /// The `message` field, copied.
    pub fn message(&self) -> String {
        unsafe { lossy_string(self.message_ptr()) }.unwrap_or_default()
    }

    /// Overwrite the `message` field.
    ///
    /// # Safety
    ///
    /// `g_error_free` will `g_free` the new pointer; the old one is leaked
    /// unless the caller frees it.
    pub unsafe fn set_message_ptr(&self, message: *mut gchar) {
        unsafe { (*self.raw.as_ptr()).message = message };
    }

    /// `g_error_copy`
    pub fn copy(&self) -> Result<NativeError> {
        let ptr = unsafe { (self.lib.g_error_copy)(self.raw.as_ptr()) };
        unsafe { NativeError::adopt_new(self.lib, ptr, "g_error_copy") }
    }

    /// `g_error_matches`
    pub fn matches(&self, domain: Quark, code: i32) -> bool {
        from_gboolean(unsafe { (self.lib.g_error_matches)(self.raw.as_ptr(), domain.0, code) })
    }

    /// Copy the fields into a plain value.
    pub fn to_failure(&self) -> NativeFailure {
        NativeFailure {
            domain: self.domain().as_str(self.lib).unwrap_or_default().to_string(),
            code: self.code(),
            message: self.message(),
        }
    }
}
