//! `GVariantType`: type descriptors for `GVariant` values.
//!
//! Parsing and validating type strings stays in the native library. Child
//! types returned by `element`, `first`, `next`, `key` and `value` point into
//! their parent and are borrowed from it.

use crate::error::Result;
use crate::ffi::{GVariantType, from_gboolean};
use crate::handle::{Borrowed, Owned, ThreadSafe, foreign_handle, sole_owned};
use crate::library::GLib;
use crate::util::{take_gstring, to_cstring};
use std::hash::{Hash, Hasher};

foreign_handle! {
    /// View over a `GVariantType`.
    pub struct VariantTypeRef => GVariantType;
}

sole_owned!(VariantTypeRef, g_variant_type_free);

unsafe impl ThreadSafe for VariantTypeRef {}

pub type VariantType = Owned<VariantTypeRef>;

impl VariantType {
    /// `g_variant_type_new`
    ///
    /// `None` when the native library rejects `type_string` (it also logs a
    /// critical warning) or when the string contains a NUL byte.
    pub fn new(lib: &'static GLib, type_string: &str) -> Option<Self> {
        let c_type = to_cstring(type_string, "type_string").ok()?;
        let ptr = unsafe { (lib.g_variant_type_new)(c_type.as_ptr()) };
        unsafe { Self::adopt(lib, ptr) }
    }

    /// `g_variant_type_string_is_valid`
    pub fn string_is_valid(lib: &GLib, type_string: &str) -> Result<bool> {
        let c_type = to_cstring(type_string, "type_string")?;
        Ok(from_gboolean(unsafe { (lib.g_variant_type_string_is_valid)(c_type.as_ptr()) }))
    }

    /// `g_variant_type_new_array`: `a` followed by `element`.
    pub fn new_array(element: &VariantTypeRef) -> Result<Self> {
        let ptr = unsafe { (element.lib.g_variant_type_new_array)(element.raw.as_ptr()) };
        unsafe { Self::adopt_new(element.lib, ptr, "g_variant_type_new_array") }
    }

    /// `g_variant_type_new_maybe`: `m` followed by `element`.
    pub fn new_maybe(element: &VariantTypeRef) -> Result<Self> {
        let ptr = unsafe { (element.lib.g_variant_type_new_maybe)(element.raw.as_ptr()) };
        unsafe { Self::adopt_new(element.lib, ptr, "g_variant_type_new_maybe") }
    }
}

macro_rules! predicate {
    ($($(#[$meta:meta])* $method:ident => $native:ident;)*) => {
        $(
            $(#[$meta])*
            pub fn $method(&self) -> bool {
                from_gboolean(unsafe { (self.lib.$native)(self.raw.as_ptr()) })
            }
        )*
    };
}

impl VariantTypeRef {
    /// `g_variant_type_copy`
    pub fn copy(&self) -> Result<VariantType> {
        let ptr = unsafe { (self.lib.g_variant_type_copy)(self.raw.as_ptr()) };
        unsafe { VariantType::adopt_new(self.lib, ptr, "g_variant_type_copy") }
    }

    /// The type string, via `g_variant_type_peek_string` and
    /// `g_variant_type_get_string_length` (the peeked string is not
    /// NUL-terminated).
    pub fn as_str(&self) -> &str {
        let len = unsafe { (self.lib.g_variant_type_get_string_length)(self.raw.as_ptr()) };
        let ptr = unsafe { (self.lib.g_variant_type_peek_string)(self.raw.as_ptr()) };
        if ptr.is_null() || len == 0 {
            return "";
        }
        let bytes = unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), len) };
        // Type strings are ASCII by construction.
        std::str::from_utf8(bytes).unwrap_or("")
    }

    /// `g_variant_type_dup_string`
    pub fn dup_string(&self) -> String {
        let ptr = unsafe { (self.lib.g_variant_type_dup_string)(self.raw.as_ptr()) };
        unsafe { take_gstring(self.lib, ptr) }.unwrap_or_default()
    }

    predicate! {
        /// `g_variant_type_is_definite`
        is_definite => g_variant_type_is_definite;
        /// `g_variant_type_is_container`
        is_container => g_variant_type_is_container;
        /// `g_variant_type_is_basic`
        is_basic => g_variant_type_is_basic;
        /// `g_variant_type_is_maybe`
        is_maybe => g_variant_type_is_maybe;
        /// `g_variant_type_is_array`
        is_array => g_variant_type_is_array;
        /// `g_variant_type_is_tuple`
        is_tuple => g_variant_type_is_tuple;
        /// `g_variant_type_is_dict_entry`
        is_dict_entry => g_variant_type_is_dict_entry;
        /// `g_variant_type_is_variant`
        is_variant => g_variant_type_is_variant;
    }

    /// `g_variant_type_is_subtype_of`
    pub fn is_subtype_of(&self, supertype: &VariantTypeRef) -> bool {
        from_gboolean(unsafe {
            (self.lib.g_variant_type_is_subtype_of)(self.raw.as_ptr(), supertype.raw.as_ptr())
        })
    }

    /// `g_variant_type_n_items`: arity of a tuple or dict entry.
    pub fn n_items(&self) -> usize {
        unsafe { (self.lib.g_variant_type_n_items)(self.raw.as_ptr()) }
    }

    /// `g_variant_type_element`: for arrays and maybes only.
    pub fn element(&self) -> Option<Borrowed<'_, VariantTypeRef>> {
        self.child(unsafe { (self.lib.g_variant_type_element)(self.raw.as_ptr()) })
    }

    /// `g_variant_type_first`: first item of a tuple or dict entry.
    pub fn first(&self) -> Option<Borrowed<'_, VariantTypeRef>> {
        self.child(unsafe { (self.lib.g_variant_type_first)(self.raw.as_ptr()) })
    }

    /// `g_variant_type_next`: the following sibling inside the parent
    /// container.
    pub fn next(&self) -> Option<Borrowed<'_, VariantTypeRef>> {
        self.child(unsafe { (self.lib.g_variant_type_next)(self.raw.as_ptr()) })
    }

    /// `g_variant_type_key`: for dict entries only.
    pub fn key(&self) -> Option<Borrowed<'_, VariantTypeRef>> {
        self.child(unsafe { (self.lib.g_variant_type_key)(self.raw.as_ptr()) })
    }

    /// `g_variant_type_value`: for dict entries only.
    pub fn value(&self) -> Option<Borrowed<'_, VariantTypeRef>> {
        self.child(unsafe { (self.lib.g_variant_type_value)(self.raw.as_ptr()) })
    }

    fn child(&self, ptr: *const GVariantType) -> Option<Borrowed<'_, VariantTypeRef>> {
        unsafe { Borrowed::from_const_ptr(self.lib, ptr) }
    }

    /// `g_variant_type_hash`
    pub fn native_hash(&self) -> u32 {
        unsafe { (self.lib.g_variant_type_hash)(self.raw.as_ptr().cast()) }
    }
}

impl PartialEq for VariantTypeRef {
    /// `g_variant_type_equal`
    fn eq(&self, other: &Self) -> bool {
        from_gboolean(unsafe {
            (self.lib.g_variant_type_equal)(self.raw.as_ptr().cast(), other.raw.as_ptr().cast())
        })
    }
}

impl Eq for VariantTypeRef {}

impl Hash for VariantTypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.native_hash());
    }
}

impl std::fmt::Display for VariantTypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
