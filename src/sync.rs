//! `GMutex`, `GRecMutex` and `GCond`.
//!
//! These are plain structs that GLib initializes in place, so each wrapper
//! boxes its struct: the address must not change between `init` and `clear`.
//! Locking is manual and every entry point that can leave the lock held is
//! `unsafe`: GLib leaves relocking a held `GMutex` and clearing a held lock
//! undefined, and nothing here ties an `unlock` to its `lock`.

use crate::ffi::{GCond, GMutex, GRecMutex, from_gboolean};
use crate::library::GLib;
use std::cell::UnsafeCell;
use std::fmt;

/// `g_get_monotonic_time`: microseconds, the clock used by
/// [`Cond::wait_until`].
pub fn monotonic_time(lib: &GLib) -> i64 {
    unsafe { (lib.g_get_monotonic_time)() }
}

macro_rules! native_lock {
    (
        $(#[$meta:meta])*
        $name:ident($raw:ident) {
            init: $init:ident,
            clear: $clear:ident,
            lock: $lock:ident,
            unlock: $unlock:ident,
            trylock: $trylock:ident,
            held: $held:literal,
        }
    ) => {
        $(#[$meta])*
        pub struct $name {
            raw: Box<UnsafeCell<$raw>>,
            lib: &'static GLib,
        }

        impl $name {
            pub fn new(lib: &'static GLib) -> Self {
                let raw = Box::new(UnsafeCell::new($raw::zeroed()));
                unsafe { (lib.$init)(raw.get()) };
                Self { raw, lib }
            }

            /// Blocks until the lock is held by the calling thread.
            ///
            /// # Safety
            ///
            #[doc = $held]
            /// Every successful lock must be matched by an
            #[doc = concat!("[`", stringify!($name), "::unlock`]")]
            /// before the lock is dropped.
            pub unsafe fn lock(&self) {
                unsafe { (self.lib.$lock)(self.raw.get()) };
            }

            /// # Safety
            ///
            /// The calling thread must hold the lock.
            pub unsafe fn unlock(&self) {
                unsafe { (self.lib.$unlock)(self.raw.get()) };
            }

            /// `true` when the lock was taken.
            ///
            /// # Safety
            ///
            /// As for
            #[doc = concat!("[`", stringify!($name), "::lock`]:")]
            /// a `true` result must be unlocked before drop.
            pub unsafe fn trylock(&self) -> bool {
                from_gboolean(unsafe { (self.lib.$trylock)(self.raw.get()) })
            }

            pub fn as_ptr(&self) -> *mut $raw {
                self.raw.get()
            }
        }

        impl Drop for $name {
            fn drop(&mut self) {
                unsafe { (self.lib.$clear)(self.raw.get()) };
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.raw.get()).finish()
            }
        }

        unsafe impl Send for $name {}
        unsafe impl Sync for $name {}
    };
}

native_lock! {
    /// A non-recursive native mutex.
    Mutex(GMutex) {
        init: g_mutex_init,
        clear: g_mutex_clear,
        lock: g_mutex_lock,
        unlock: g_mutex_unlock,
        trylock: g_mutex_trylock,
        held: "The calling thread must not already hold the lock.",
    }
}

native_lock! {
    /// A native mutex the owning thread may lock again.
    RecMutex(GRecMutex) {
        init: g_rec_mutex_init,
        clear: g_rec_mutex_clear,
        lock: g_rec_mutex_lock,
        unlock: g_rec_mutex_unlock,
        trylock: g_rec_mutex_trylock,
        held: "The calling thread may already hold the lock.",
    }
}

/// A native condition variable, used together with a [`Mutex`].
pub struct Cond {
    raw: Box<UnsafeCell<GCond>>,
    lib: &'static GLib,
}

impl Cond {
    pub fn new(lib: &'static GLib) -> Self {
        let raw = Box::new(UnsafeCell::new(GCond::zeroed()));
        unsafe { (lib.g_cond_init)(raw.get()) };
        Self { raw, lib }
    }

    /// `g_cond_wait`. Spurious wakeups happen; re-check the predicate.
    ///
    /// # Safety
    ///
    /// The calling thread must hold `mutex`.
    pub unsafe fn wait(&self, mutex: &Mutex) {
        unsafe { (self.lib.g_cond_wait)(self.raw.get(), mutex.as_ptr()) };
    }

    /// `g_cond_wait_until`. `end_time` is on the [`monotonic_time`] clock;
    /// returns `false` once it has passed.
    ///
    /// # Safety
    ///
    /// The calling thread must hold `mutex`.
    pub unsafe fn wait_until(&self, mutex: &Mutex, end_time: i64) -> bool {
        from_gboolean(unsafe {
            (self.lib.g_cond_wait_until)(self.raw.get(), mutex.as_ptr(), end_time)
        })
    }

    pub fn signal(&self) {
        unsafe { (self.lib.g_cond_signal)(self.raw.get()) };
    }

    pub fn broadcast(&self) {
        unsafe { (self.lib.g_cond_broadcast)(self.raw.get()) };
    }
}

impl Drop for Cond {
    fn drop(&mut self) {
        unsafe { (self.lib.g_cond_clear)(self.raw.get()) };
    }
}

impl fmt::Debug for Cond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cond").field(&self.raw.get()).finish()
    }
}

unsafe impl Send for Cond {}
unsafe impl Sync for Cond {}
