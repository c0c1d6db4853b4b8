//! `GThread`: native threads running Rust closures.

use crate::error::{Error, Result};
use crate::ffi::{GError, GThread, gpointer};
use crate::handle::{Handle, Shared, ThreadSafe, foreign_handle, ref_counted};
use crate::library::GLib;
use crate::util::to_cstring;
use std::ffi::CString;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::ptr;

foreign_handle! {
    /// View over a `GThread`.
    pub struct ThreadRef => GThread;
}

ref_counted!(ThreadRef, g_thread_ref, g_thread_unref);

unsafe impl ThreadSafe for ThreadRef {}

pub type Thread = Shared<ThreadRef>;

type Body = Box<dyn FnOnce() + Send + 'static>;

unsafe extern "C" fn run_body(data: gpointer) -> gpointer {
    let body = unsafe { Box::from_raw(data.cast::<Body>()) };
    if catch_unwind(AssertUnwindSafe(body)).is_err() {
        log::error!("native thread body panicked");
    }
    ptr::null_mut()
}

impl Thread {
    /// `g_thread_try_new`: start `body` on a new native thread.
    ///
    /// A failure to spawn comes back as [`Error::Native`]; `body` is dropped
    /// without running.
    pub fn try_new<F>(lib: &'static GLib, name: Option<&str>, body: F) -> Result<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        let c_name: Option<CString> = name.map(|name| to_cstring(name, "name")).transpose()?;
        let data = Box::into_raw(Box::new(Box::new(body) as Body));
        let mut error: *mut GError = ptr::null_mut();
        let thread = unsafe {
            (lib.g_thread_try_new)(
                c_name.as_ref().map_or(ptr::null(), |name| name.as_ptr()),
                run_body,
                data.cast(),
                &mut error,
            )
        };
        if thread.is_null() {
            // The body never started, so it is still ours.
            drop(unsafe { Box::from_raw(data) });
            if error.is_null() {
                return Err(Error::NullHandle { function: "g_thread_try_new" });
            }
            return Err(unsafe { Error::take_native(lib, error) });
        }
        log::debug!("started native thread {thread:p}");
        unsafe { Self::take_new(lib, thread, "g_thread_try_new") }
    }

    /// `g_thread_self` plus one retain.
    pub fn current(lib: &'static GLib) -> Result<Self> {
        let ptr = unsafe { (lib.g_thread_self)() };
        unsafe { Self::retain(lib, ptr) }.ok_or(Error::NullHandle { function: "g_thread_self" })
    }

    /// `g_thread_yield`
    pub fn yield_now(lib: &GLib) {
        unsafe { (lib.g_thread_yield)() };
    }

    /// `g_thread_join`: wait for the thread to finish. Consumes this
    /// reference; other clones stay valid.
    pub fn join(self) {
        let lib = self.lib();
        let raw = self.into_raw();
        unsafe { (lib.g_thread_join)(raw) };
    }
}
