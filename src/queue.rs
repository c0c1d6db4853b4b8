//! `GQueue`: a double-ended queue of untyped pointers.

use crate::error::Result;
use crate::ffi::{GList, GQueue, from_gboolean, gconstpointer, gint, gpointer};
use crate::handle::{Borrowed, Owned, foreign_handle, sole_owned};
use crate::library::GLib;
use crate::list::ListNode;
use std::ptr::NonNull;

foreign_handle! {
    /// View over a `GQueue`.
    pub struct QueueRef => GQueue;
}

sole_owned!(QueueRef, g_queue_free);

pub type Queue = Owned<QueueRef>;

impl Queue {
    /// `g_queue_new`
    pub fn new(lib: &'static GLib) -> Result<Self> {
        let ptr = unsafe { (lib.g_queue_new)() };
        unsafe { Self::adopt_new(lib, ptr, "g_queue_new") }
    }
}

impl QueueRef {
    /// The `head` field.
    ///
    /// Links are freed by `pop_*` and `clear`, so they are handed out as
    /// raw pointers; see [`QueueRef::head_node`].
    pub fn head(&self) -> *mut GList {
        unsafe { (*self.raw.as_ptr()).head }
    }

    /// Borrow the first link.
    ///
    /// # Safety
    ///
    /// The queue must not be modified while the link is borrowed.
    pub unsafe fn head_node(&self) -> Option<Borrowed<'_, ListNode>> {
        unsafe { Borrowed::from_ptr(self.lib, self.head()) }
    }

    /// Overwrite the `head` field.
    ///
    /// # Safety
    ///
    /// `head`, `tail` and `length` must stay consistent for any later native
    /// call.
    pub unsafe fn set_head(&self, head: *mut GList) {
        unsafe { (*self.raw.as_ptr()).head = head };
    }

    /// The `tail` field.
    pub fn tail(&self) -> *mut GList {
        unsafe { (*self.raw.as_ptr()).tail }
    }

    /// Overwrite the `tail` field.
    ///
    /// # Safety
    ///
    /// See [`QueueRef::set_head`].
    pub unsafe fn set_tail(&self, tail: *mut GList) {
        unsafe { (*self.raw.as_ptr()).tail = tail };
    }

    /// The `length` field.
    pub fn length(&self) -> u32 {
        unsafe { (*self.raw.as_ptr()).length }
    }

    /// Overwrite the `length` field.
    ///
    /// # Safety
    ///
    /// See [`QueueRef::set_head`].
    pub unsafe fn set_length(&self, length: u32) {
        unsafe { (*self.raw.as_ptr()).length = length };
    }

    /// `g_queue_copy`: a new queue holding the same data pointers.
    pub fn copy(&self) -> Result<Queue> {
        let ptr = unsafe { (self.lib.g_queue_copy)(self.raw.as_ptr()) };
        unsafe { Queue::adopt_new(self.lib, ptr, "g_queue_copy") }
    }

    /// `g_queue_is_empty`
    pub fn is_empty(&self) -> bool {
        from_gboolean(unsafe { (self.lib.g_queue_is_empty)(self.raw.as_ptr()) })
    }

    /// `g_queue_get_length`
    pub fn len(&self) -> u32 {
        unsafe { (self.lib.g_queue_get_length)(self.raw.as_ptr()) }
    }

    /// `g_queue_clear`: drops every link, not the data.
    pub fn clear(&self) {
        unsafe { (self.lib.g_queue_clear)(self.raw.as_ptr()) };
    }

    /// `g_queue_reverse`
    pub fn reverse(&self) {
        unsafe { (self.lib.g_queue_reverse)(self.raw.as_ptr()) };
    }

    /// `g_queue_push_head`
    pub fn push_head(&self, data: gpointer) {
        unsafe { (self.lib.g_queue_push_head)(self.raw.as_ptr(), data) };
    }

    /// `g_queue_push_tail`
    pub fn push_tail(&self, data: gpointer) {
        unsafe { (self.lib.g_queue_push_tail)(self.raw.as_ptr(), data) };
    }

    /// `g_queue_push_nth`. Negative or out-of-range `n` pushes at the tail.
    pub fn push_nth(&self, data: gpointer, n: i32) {
        unsafe { (self.lib.g_queue_push_nth)(self.raw.as_ptr(), data, n as gint) };
    }

    /// `g_queue_pop_head`. A stored NULL reads as `None`, same as empty.
    pub fn pop_head(&self) -> Option<NonNull<libc::c_void>> {
        NonNull::new(unsafe { (self.lib.g_queue_pop_head)(self.raw.as_ptr()) })
    }

    /// `g_queue_pop_tail`
    pub fn pop_tail(&self) -> Option<NonNull<libc::c_void>> {
        NonNull::new(unsafe { (self.lib.g_queue_pop_tail)(self.raw.as_ptr()) })
    }

    /// `g_queue_peek_head`
    pub fn peek_head(&self) -> Option<NonNull<libc::c_void>> {
        NonNull::new(unsafe { (self.lib.g_queue_peek_head)(self.raw.as_ptr()) })
    }

    /// `g_queue_peek_tail`
    pub fn peek_tail(&self) -> Option<NonNull<libc::c_void>> {
        NonNull::new(unsafe { (self.lib.g_queue_peek_tail)(self.raw.as_ptr()) })
    }

    /// `g_queue_peek_nth`
    pub fn peek_nth(&self, n: u32) -> Option<NonNull<libc::c_void>> {
        NonNull::new(unsafe { (self.lib.g_queue_peek_nth)(self.raw.as_ptr(), n) })
    }

    /// `g_queue_index`
    pub fn index(&self, data: gconstpointer) -> Option<u32> {
        let index = unsafe { (self.lib.g_queue_index)(self.raw.as_ptr(), data) };
        u32::try_from(index).ok()
    }

    /// `g_queue_remove`: the first occurrence of `data`, if any.
    pub fn remove(&self, data: gconstpointer) -> bool {
        from_gboolean(unsafe { (self.lib.g_queue_remove)(self.raw.as_ptr(), data) })
    }
}
