//! `GAsyncQueue`: a locked queue for handing pointers between threads.
//!
//! Blocking and timeouts are the native library's; `pop` blocks the calling
//! thread for as long as the native call does. The `_unlocked` family
//! requires the caller to hold the queue lock taken with
//! [`AsyncQueueRef::lock`]; no guard object is provided.

use crate::error::Result;
use crate::ffi::GAsyncQueue;
use crate::handle::{Shared, ThreadSafe, foreign_handle, ref_counted};
use crate::library::GLib;
use libc::c_void;
use std::ptr::NonNull;
use std::time::Duration;

foreign_handle! {
    /// View over a `GAsyncQueue`.
    pub struct AsyncQueueRef => GAsyncQueue;
}

ref_counted!(AsyncQueueRef, g_async_queue_ref, g_async_queue_unref);

unsafe impl ThreadSafe for AsyncQueueRef {}

pub type AsyncQueue = Shared<AsyncQueueRef>;

impl AsyncQueue {
    /// `g_async_queue_new`
    pub fn new(lib: &'static GLib) -> Result<Self> {
        let ptr = unsafe { (lib.g_async_queue_new)() };
        unsafe { Self::take_new(lib, ptr, "g_async_queue_new") }
    }
}

impl AsyncQueueRef {
    /// `g_async_queue_push`. The queue does not accept NULL.
    pub fn push(&self, data: NonNull<c_void>) {
        unsafe { (self.lib.g_async_queue_push)(self.raw.as_ptr(), data.as_ptr()) };
    }

    /// `g_async_queue_pop`: blocks until an item is available.
    pub fn pop(&self) -> Option<NonNull<c_void>> {
        NonNull::new(unsafe { (self.lib.g_async_queue_pop)(self.raw.as_ptr()) })
    }

    /// `g_async_queue_try_pop`
    pub fn try_pop(&self) -> Option<NonNull<c_void>> {
        NonNull::new(unsafe { (self.lib.g_async_queue_try_pop)(self.raw.as_ptr()) })
    }

    /// `g_async_queue_timeout_pop`. `timeout` is passed on in microseconds.
    pub fn timeout_pop(&self, timeout: Duration) -> Option<NonNull<c_void>> {
        let micros = u64::try_from(timeout.as_micros()).unwrap_or(u64::MAX);
        NonNull::new(unsafe { (self.lib.g_async_queue_timeout_pop)(self.raw.as_ptr(), micros) })
    }

    /// `g_async_queue_length`. Negative while threads are waiting in `pop`.
    pub fn len(&self) -> i32 {
        unsafe { (self.lib.g_async_queue_length)(self.raw.as_ptr()) }
    }

    /// `g_async_queue_lock`
    ///
    /// # Safety
    ///
    /// The calling thread must not already hold the lock, and must release
    /// it with [`AsyncQueueRef::unlock`].
    pub unsafe fn lock(&self) {
        unsafe { (self.lib.g_async_queue_lock)(self.raw.as_ptr()) };
    }

    /// `g_async_queue_unlock`
    ///
    /// # Safety
    ///
    /// The calling thread must hold the lock.
    pub unsafe fn unlock(&self) {
        unsafe { (self.lib.g_async_queue_unlock)(self.raw.as_ptr()) };
    }

    /// `g_async_queue_push_unlocked`
    ///
    /// # Safety
    ///
    /// The calling thread must hold the lock.
    pub unsafe fn push_unlocked(&self, data: NonNull<c_void>) {
        unsafe { (self.lib.g_async_queue_push_unlocked)(self.raw.as_ptr(), data.as_ptr()) };
    }

    /// `g_async_queue_pop_unlocked`: blocks, releasing the lock while it
    /// waits.
    ///
    /// # Safety
    ///
    /// The calling thread must hold the lock.
    pub unsafe fn pop_unlocked(&self) -> Option<NonNull<c_void>> {
        NonNull::new(unsafe { (self.lib.g_async_queue_pop_unlocked)(self.raw.as_ptr()) })
    }

    /// `g_async_queue_try_pop_unlocked`
    ///
    /// # Safety
    ///
    /// The calling thread must hold the lock.
    pub unsafe fn try_pop_unlocked(&self) -> Option<NonNull<c_void>> {
        NonNull::new(unsafe { (self.lib.g_async_queue_try_pop_unlocked)(self.raw.as_ptr()) })
    }

    /// `g_async_queue_length_unlocked`
    ///
    /// # Safety
    ///
    /// The calling thread must hold the lock.
    pub unsafe fn len_unlocked(&self) -> i32 {
        unsafe { (self.lib.g_async_queue_length_unlocked)(self.raw.as_ptr()) }
    }
}
