//! `GByteArray`: a growable byte buffer.

use crate::bytes::Bytes;
use crate::error::Result;
use crate::ffi::{GByteArray, guint};
use crate::handle::{Shared, foreign_handle, ref_counted};
use crate::library::GLib;

foreign_handle! {
    /// View over a `GByteArray`.
    pub struct ByteArrayRef => GByteArray;
}

ref_counted!(ByteArrayRef, g_byte_array_ref, g_byte_array_unref);

pub type ByteArray = Shared<ByteArrayRef>;

impl ByteArray {
    /// `g_byte_array_new`
    pub fn new(lib: &'static GLib) -> Result<Self> {
        let ptr = unsafe { (lib.g_byte_array_new)() };
        unsafe { Self::take_new(lib, ptr, "g_byte_array_new") }
    }

    /// `g_byte_array_sized_new`
    pub fn with_capacity(lib: &'static GLib, reserved: u32) -> Result<Self> {
        let ptr = unsafe { (lib.g_byte_array_sized_new)(reserved) };
        unsafe { Self::take_new(lib, ptr, "g_byte_array_sized_new") }
    }

    /// `g_byte_array_free_to_bytes`
    ///
    /// Consumes this reference. If it was the last one the buffer moves into
    /// the new `Bytes` without copying; otherwise the other owners are left
    /// with an empty array.
    pub fn into_bytes(self) -> Result<Bytes> {
        let lib = self.lib;
        let raw = self.into_raw();
        let ptr = unsafe { (lib.g_byte_array_free_to_bytes)(raw) };
        unsafe { Bytes::take_new(lib, ptr, "g_byte_array_free_to_bytes") }
    }
}

impl ByteArrayRef {
    /// The `len` field.
    pub fn len(&self) -> u32 {
        unsafe { (*self.raw.as_ptr()).len }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overwrite the `len` field.
    ///
    /// # Safety
    ///
    /// `len` must not exceed the allocated size of `data`.
    pub unsafe fn set_len(&self, len: u32) {
        unsafe { (*self.raw.as_ptr()).len = len };
    }

    /// The `data` field.
    pub fn data(&self) -> *mut u8 {
        unsafe { (*self.raw.as_ptr()).data }
    }

    /// Overwrite the `data` field.
    ///
    /// # Safety
    ///
    /// The native library will later realloc and free this pointer.
    pub unsafe fn set_data(&self, data: *mut u8) {
        unsafe { (*self.raw.as_ptr()).data = data };
    }

    pub fn to_vec(&self) -> Vec<u8> {
        let len = self.len() as usize;
        let data = self.data();
        if len == 0 || data.is_null() {
            return Vec::new();
        }
        unsafe { std::slice::from_raw_parts(data, len) }.to_vec()
    }

    /// `g_byte_array_append`
    pub fn append(&self, data: &[u8]) {
        let count = data.len() as guint;
        unsafe { (self.lib.g_byte_array_append)(self.raw.as_ptr(), data.as_ptr(), count) };
    }

    /// `g_byte_array_prepend`
    pub fn prepend(&self, data: &[u8]) {
        let count = data.len() as guint;
        unsafe { (self.lib.g_byte_array_prepend)(self.raw.as_ptr(), data.as_ptr(), count) };
    }

    /// `g_byte_array_set_size`. Bytes past the old length are left
    /// uninitialized.
    ///
    /// # Safety
    ///
    /// Every new byte must be written through [`ByteArrayRef::data`] before
    /// the array is read with [`ByteArrayRef::to_vec`].
    pub unsafe fn set_size(&self, length: u32) {
        unsafe { (self.lib.g_byte_array_set_size)(self.raw.as_ptr(), length) };
    }

    /// `g_byte_array_remove_index`
    pub fn remove_index(&self, index: u32) {
        unsafe { (self.lib.g_byte_array_remove_index)(self.raw.as_ptr(), index) };
    }

    /// `g_byte_array_remove_range`
    pub fn remove_range(&self, index: u32, length: u32) {
        unsafe { (self.lib.g_byte_array_remove_range)(self.raw.as_ptr(), index, length) };
    }
}
