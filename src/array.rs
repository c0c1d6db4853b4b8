//! `GArray`: a growable array of fixed-size elements.

use crate::error::Result;
use crate::ffi::{GArray, gchar, guint, to_gboolean};
use crate::handle::{Handle, RefCounted, Shared};
use crate::library::GLib;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// View over a `GArray` whose elements are `T`.
///
/// The element size recorded by the native array must equal
/// `size_of::<T>()`; the constructors below guarantee it, and wrapping a
/// pointer from elsewhere makes it the caller's promise.
pub struct ArrayRef<T: Copy> {
    raw: NonNull<GArray>,
    lib: &'static GLib,
    _element: PhantomData<T>,
}

/// An owned reference to a `GArray`.
pub type Array<T> = Shared<ArrayRef<T>>;

unsafe impl<T: Copy> Handle for ArrayRef<T> {
    type Raw = GArray;

    unsafe fn from_raw_parts(lib: &'static GLib, raw: NonNull<GArray>) -> Self {
        Self {
            raw,
            lib,
            _element: PhantomData,
        }
    }

    fn raw(&self) -> NonNull<GArray> {
        self.raw
    }

    fn lib(&self) -> &'static GLib {
        self.lib
    }
}

unsafe impl<T: Copy> RefCounted for ArrayRef<T> {
    unsafe fn retain(lib: &GLib, raw: *mut GArray) {
        unsafe { (lib.g_array_ref)(raw) };
    }

    unsafe fn release(lib: &GLib, raw: *mut GArray) {
        unsafe { (lib.g_array_unref)(raw) };
    }
}

impl<T: Copy> std::fmt::Debug for ArrayRef<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayRef")
            .field("raw", &self.raw)
            .field("len", &self.len())
            .finish()
    }
}

fn element_size<T>() -> guint {
    std::mem::size_of::<T>() as guint
}

impl<T: Copy> Array<T> {
    /// `g_array_new`
    pub fn new(lib: &'static GLib, zero_terminated: bool, clear: bool) -> Result<Self> {
        let ptr = unsafe {
            (lib.g_array_new)(
                to_gboolean(zero_terminated),
                to_gboolean(clear),
                element_size::<T>(),
            )
        };
        unsafe { Self::take_new(lib, ptr, "g_array_new") }
    }

    /// `g_array_sized_new`
    pub fn with_capacity(
        lib: &'static GLib,
        zero_terminated: bool,
        clear: bool,
        reserved: u32,
    ) -> Result<Self> {
        let ptr = unsafe {
            (lib.g_array_sized_new)(
                to_gboolean(zero_terminated),
                to_gboolean(clear),
                element_size::<T>(),
                reserved,
            )
        };
        unsafe { Self::take_new(lib, ptr, "g_array_sized_new") }
    }
}

impl<T: Copy> ArrayRef<T> {
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
    /// No bounds checking is done; `len` must not exceed the allocated
    /// element count.
    pub unsafe fn set_len(&self, len: u32) {
        unsafe { (*self.raw.as_ptr()).len = len };
    }

    /// The `data` field.
    pub fn data(&self) -> *mut T {
        unsafe { (*self.raw.as_ptr()).data.cast() }
    }

    /// Overwrite the `data` field.
    ///
    /// # Safety
    ///
    /// The native library will later realloc and free this pointer.
    pub unsafe fn set_data(&self, data: *mut T) {
        unsafe { (*self.raw.as_ptr()).data = data.cast::<gchar>() };
    }

    /// Copy out the element at `index`.
    pub fn get(&self, index: u32) -> Option<T> {
        if index >= self.len() {
            return None;
        }
        Some(unsafe { self.data().add(index as usize).read_unaligned() })
    }

    /// Copy out every element.
    pub fn to_vec(&self) -> Vec<T> {
        unsafe { self.as_slice() }.to_vec()
    }

    /// Borrow the elements in place.
    ///
    /// # Safety
    ///
    /// The array must not be modified (through any wrapper) while the slice
    /// is alive.
    pub unsafe fn as_slice(&self) -> &[T] {
        let len = self.len() as usize;
        let data = self.data();
        if len == 0 || data.is_null() {
            return &[];
        }
        unsafe { std::slice::from_raw_parts(data, len) }
    }

    /// `g_array_append_vals`
    pub fn append(&self, values: &[T]) {
        let (data, count) = (values.as_ptr().cast(), values.len() as guint);
        unsafe { (self.lib.g_array_append_vals)(self.raw.as_ptr(), data, count) };
    }

    /// `g_array_prepend_vals`
    pub fn prepend(&self, values: &[T]) {
        let (data, count) = (values.as_ptr().cast(), values.len() as guint);
        unsafe { (self.lib.g_array_prepend_vals)(self.raw.as_ptr(), data, count) };
    }

    /// `g_array_insert_vals`.
    ///
    /// Returns `false` without touching the array when `index` is past the
    /// end: the native call would fill the gap with elements that are not
    /// valid `T`s. Grow with [`ArrayRef::set_size`] instead.
    pub fn insert(&self, index: u32, values: &[T]) -> bool {
        if index > self.len() {
            return false;
        }
        unsafe {
            (self.lib.g_array_insert_vals)(
                self.raw.as_ptr(),
                index,
                values.as_ptr().cast(),
                values.len() as guint,
            )
        };
        true
    }

    /// `g_array_remove_index`
    pub fn remove_index(&self, index: u32) {
        unsafe { (self.lib.g_array_remove_index)(self.raw.as_ptr(), index) };
    }

    /// `g_array_remove_index_fast`: the last element fills the hole.
    pub fn remove_index_fast(&self, index: u32) {
        unsafe { (self.lib.g_array_remove_index_fast)(self.raw.as_ptr(), index) };
    }

    /// `g_array_remove_range`
    pub fn remove_range(&self, index: u32, length: u32) {
        unsafe { (self.lib.g_array_remove_range)(self.raw.as_ptr(), index, length) };
    }

    /// `g_array_set_size`. New elements are zeroed only if the array was
    /// created with `clear`, and left uninitialized otherwise.
    ///
    /// # Safety
    ///
    /// Growing the array must not expose invalid values of `T`: either the
    /// array was created with `clear` and all-zero bytes are a valid `T`, or
    /// every new element is written through [`ArrayRef::data`] before it is
    /// read.
    pub unsafe fn set_size(&self, length: u32) {
        unsafe { (self.lib.g_array_set_size)(self.raw.as_ptr(), length) };
    }

    /// `g_array_get_element_size`
    pub fn element_size(&self) -> u32 {
        unsafe { (self.lib.g_array_get_element_size)(self.raw.as_ptr()) }
    }
}
