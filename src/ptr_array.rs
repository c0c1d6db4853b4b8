//! `GPtrArray`: a growable array of untyped pointers.

use crate::error::Result;
use crate::ffi::{GPtrArray, from_gboolean, gint, gpointer};
use crate::handle::{Shared, foreign_handle, ref_counted};
use crate::library::GLib;

foreign_handle! {
    /// View over a `GPtrArray`. Elements are stored, never dereferenced.
    pub struct PtrArrayRef => GPtrArray;
}

ref_counted!(PtrArrayRef, g_ptr_array_ref, g_ptr_array_unref);

pub type PtrArray = Shared<PtrArrayRef>;

impl PtrArray {
    /// `g_ptr_array_new`
    pub fn new(lib: &'static GLib) -> Result<Self> {
        let ptr = unsafe { (lib.g_ptr_array_new)() };
        unsafe { Self::take_new(lib, ptr, "g_ptr_array_new") }
    }

    /// `g_ptr_array_sized_new`
    pub fn with_capacity(lib: &'static GLib, reserved: u32) -> Result<Self> {
        let ptr = unsafe { (lib.g_ptr_array_sized_new)(reserved) };
        unsafe { Self::take_new(lib, ptr, "g_ptr_array_sized_new") }
    }
}

impl PtrArrayRef {
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
    /// `len` must not exceed the allocated size of `pdata`.
    pub unsafe fn set_len(&self, len: u32) {
        unsafe { (*self.raw.as_ptr()).len = len };
    }

    /// The `pdata` field.
    pub fn pdata(&self) -> *mut gpointer {
        unsafe { (*self.raw.as_ptr()).pdata }
    }

    /// Overwrite the `pdata` field.
    ///
    /// # Safety
    ///
    /// The native library will later realloc and free this pointer.
    pub unsafe fn set_pdata(&self, pdata: *mut gpointer) {
        unsafe { (*self.raw.as_ptr()).pdata = pdata };
    }

    /// Read the pointer stored at `index`.
    pub fn get(&self, index: u32) -> Option<gpointer> {
        if index >= self.len() {
            return None;
        }
        Some(unsafe { *self.pdata().add(index as usize) })
    }

    /// `g_ptr_array_add`
    pub fn add(&self, data: gpointer) {
        unsafe { (self.lib.g_ptr_array_add)(self.raw.as_ptr(), data) };
    }

    /// `g_ptr_array_insert`. An index of -1 appends.
    pub fn insert(&self, index: i32, data: gpointer) {
        unsafe { (self.lib.g_ptr_array_insert)(self.raw.as_ptr(), index as gint, data) };
    }

    /// `g_ptr_array_remove_index`
    pub fn remove_index(&self, index: u32) -> gpointer {
        unsafe { (self.lib.g_ptr_array_remove_index)(self.raw.as_ptr(), index) }
    }

    /// `g_ptr_array_remove_index_fast`
    pub fn remove_index_fast(&self, index: u32) -> gpointer {
        unsafe { (self.lib.g_ptr_array_remove_index_fast)(self.raw.as_ptr(), index) }
    }

    /// `g_ptr_array_remove`: the first occurrence of `data`, if any.
    pub fn remove(&self, data: gpointer) -> bool {
        from_gboolean(unsafe { (self.lib.g_ptr_array_remove)(self.raw.as_ptr(), data) })
    }

    /// `g_ptr_array_set_size`. New slots are NULL.
    pub fn set_size(&self, length: i32) {
        unsafe { (self.lib.g_ptr_array_set_size)(self.raw.as_ptr(), length as gint) };
    }
}
