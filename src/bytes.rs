//! `GBytes`: an immutable, reference-counted byte blob.
//!
//! `Eq`, `Ord` and `Hash` on [`BytesRef`] forward to `g_bytes_equal`,
//! `g_bytes_compare` and `g_bytes_hash`, so `Bytes` can key a `HashMap` the
//! same way it keys a `GHashTable`.

use crate::byte_array::ByteArray;
use crate::error::Result;
use crate::ffi::{GBytes, from_gboolean, gsize};
use crate::handle::{Shared, ThreadSafe, foreign_handle, ref_counted};
use crate::library::GLib;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

foreign_handle! {
    /// View over a `GBytes`.
    pub struct BytesRef => GBytes;
}

ref_counted!(BytesRef, g_bytes_ref, g_bytes_unref);

unsafe impl ThreadSafe for BytesRef {}

pub type Bytes = Shared<BytesRef>;

impl Bytes {
    /// `g_bytes_new`: copies `data`.
    pub fn new(lib: &'static GLib, data: &[u8]) -> Result<Self> {
        let ptr = unsafe { (lib.g_bytes_new)(data.as_ptr().cast(), data.len() as gsize) };
        unsafe { Self::take_new(lib, ptr, "g_bytes_new") }
    }

    /// `g_bytes_unref_to_array`
    ///
    /// Consumes this reference. The data is moved when it was the last one
    /// and copied otherwise.
    pub fn into_byte_array(self) -> Result<ByteArray> {
        let lib = self.lib;
        let raw = self.into_raw();
        let ptr = unsafe { (lib.g_bytes_unref_to_array)(raw) };
        unsafe { ByteArray::take_new(lib, ptr, "g_bytes_unref_to_array") }
    }
}

impl BytesRef {
    /// `g_bytes_get_data`
    pub fn data(&self) -> &[u8] {
        let mut size: gsize = 0;
        let ptr = unsafe { (self.lib.g_bytes_get_data)(self.raw.as_ptr(), &mut size) };
        if ptr.is_null() || size == 0 {
            return &[];
        }
        unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), size) }
    }

    /// `g_bytes_get_size`
    pub fn size(&self) -> usize {
        unsafe { (self.lib.g_bytes_get_size)(self.raw.as_ptr()) }
    }

    /// `g_bytes_new_from_bytes`: a sub-range sharing this buffer.
    ///
    /// Returns `None` when the range falls outside the data.
    pub fn slice(&self, offset: usize, length: usize) -> Option<Bytes> {
        if offset.checked_add(length)? > self.size() {
            return None;
        }
        let ptr = unsafe { (self.lib.g_bytes_new_from_bytes)(self.raw.as_ptr(), offset, length) };
        unsafe { Bytes::take(self.lib, ptr) }
    }

    /// `g_bytes_hash`
    pub fn native_hash(&self) -> u32 {
        unsafe { (self.lib.g_bytes_hash)(self.raw.as_ptr().cast()) }
    }

    /// `g_bytes_equal`
    pub fn equal(&self, other: &BytesRef) -> bool {
        from_gboolean(unsafe {
            (self.lib.g_bytes_equal)(self.raw.as_ptr().cast(), other.raw.as_ptr().cast())
        })
    }

    /// `g_bytes_compare`
    pub fn compare(&self, other: &BytesRef) -> Ordering {
        let order = unsafe {
            (self.lib.g_bytes_compare)(self.raw.as_ptr().cast(), other.raw.as_ptr().cast())
        };
        order.cmp(&0)
    }
}

impl PartialEq for BytesRef {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl Eq for BytesRef {}

impl PartialOrd for BytesRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BytesRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl Hash for BytesRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.native_hash());
    }
}
