//! `GMainContext`, `GMainLoop` and `GSource`.
//!
//! Polling and dispatch stay in the native library. A Rust closure attached
//! with [`SourceRef::set_callback`] is boxed and handed to the source; the
//! native destroy notify drops it.

use crate::error::{Error, Result};
use crate::ffi::{
    GMainContext, GMainLoop, GSource, from_gboolean, gboolean, gpointer, to_gboolean,
};
use crate::handle::{Borrowed, Handle, Shared, ThreadSafe, foreign_handle, ref_counted};
use crate::library::GLib;
use crate::util::to_cstring;
use std::ops::ControlFlow;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::ptr;
use std::time::Duration;

foreign_handle! {
    /// View over a `GMainContext`.
    pub struct MainContextRef => GMainContext;
}

ref_counted!(MainContextRef, g_main_context_ref, g_main_context_unref);

unsafe impl ThreadSafe for MainContextRef {}

pub type MainContext = Shared<MainContextRef>;

fn context_ptr(context: Option<&MainContextRef>) -> *mut GMainContext {
    context.map_or(ptr::null_mut(), |context| context.as_ptr())
}

impl MainContext {
    /// `g_main_context_new`
    pub fn new(lib: &'static GLib) -> Result<Self> {
        let ptr = unsafe { (lib.g_main_context_new)() };
        unsafe { Self::take_new(lib, ptr, "g_main_context_new") }
    }

    /// `g_main_context_default`. The global default context is never freed.
    pub fn default(lib: &'static GLib) -> Result<Borrowed<'static, MainContextRef>> {
        let ptr = unsafe { (lib.g_main_context_default)() };
        unsafe { Borrowed::from_ptr(lib, ptr) }.ok_or(Error::NullHandle {
            function: "g_main_context_default",
        })
    }

    /// `g_main_context_ref_thread_default`
    pub fn ref_thread_default(lib: &'static GLib) -> Result<Self> {
        let ptr = unsafe { (lib.g_main_context_ref_thread_default)() };
        unsafe { Self::take_new(lib, ptr, "g_main_context_ref_thread_default") }
    }
}

impl MainContextRef {
    /// `g_main_context_iteration`: `true` if some source was dispatched.
    pub fn iteration(&self, may_block: bool) -> bool {
        from_gboolean(unsafe {
            (self.lib.g_main_context_iteration)(self.raw.as_ptr(), to_gboolean(may_block))
        })
    }

    pub fn pending(&self) -> bool {
        from_gboolean(unsafe { (self.lib.g_main_context_pending)(self.raw.as_ptr()) })
    }

    pub fn wakeup(&self) {
        unsafe { (self.lib.g_main_context_wakeup)(self.raw.as_ptr()) };
    }

    /// `g_main_context_acquire`: `true` when the calling thread now owns the
    /// context.
    pub fn acquire(&self) -> bool {
        from_gboolean(unsafe { (self.lib.g_main_context_acquire)(self.raw.as_ptr()) })
    }

    /// `g_main_context_release`
    ///
    /// # Safety
    ///
    /// Must balance a successful [`MainContextRef::acquire`] on this thread.
    pub unsafe fn release(&self) {
        unsafe { (self.lib.g_main_context_release)(self.raw.as_ptr()) };
    }

    pub fn is_owner(&self) -> bool {
        from_gboolean(unsafe { (self.lib.g_main_context_is_owner)(self.raw.as_ptr()) })
    }

    /// `g_main_context_push_thread_default`. The native stack holds its own
    /// reference until the matching pop.
    pub fn push_thread_default(&self) {
        unsafe { (self.lib.g_main_context_push_thread_default)(self.raw.as_ptr()) };
    }

    /// `g_main_context_pop_thread_default`
    ///
    /// # Safety
    ///
    /// This context must be on top of the calling thread's stack.
    pub unsafe fn pop_thread_default(&self) {
        unsafe { (self.lib.g_main_context_pop_thread_default)(self.raw.as_ptr()) };
    }
}

foreign_handle! {
    /// View over a `GMainLoop`.
    pub struct MainLoopRef => GMainLoop;
}

ref_counted!(MainLoopRef, g_main_loop_ref, g_main_loop_unref);

unsafe impl ThreadSafe for MainLoopRef {}

pub type MainLoop = Shared<MainLoopRef>;

impl MainLoop {
    /// `g_main_loop_new`. `None` for `context` means the global default.
    pub fn new(
        lib: &'static GLib,
        context: Option<&MainContextRef>,
        is_running: bool,
    ) -> Result<Self> {
        let ptr = unsafe { (lib.g_main_loop_new)(context_ptr(context), to_gboolean(is_running)) };
        unsafe { Self::take_new(lib, ptr, "g_main_loop_new") }
    }
}

impl MainLoopRef {
    /// `g_main_loop_run`: blocks until [`MainLoopRef::quit`].
    pub fn run(&self) {
        unsafe { (self.lib.g_main_loop_run)(self.raw.as_ptr()) };
    }

    pub fn quit(&self) {
        unsafe { (self.lib.g_main_loop_quit)(self.raw.as_ptr()) };
    }

    pub fn is_running(&self) -> bool {
        from_gboolean(unsafe { (self.lib.g_main_loop_is_running)(self.raw.as_ptr()) })
    }

    /// `g_main_loop_get_context`
    pub fn context(&self) -> Option<Borrowed<'_, MainContextRef>> {
        let ptr = unsafe { (self.lib.g_main_loop_get_context)(self.raw.as_ptr()) };
        unsafe { Borrowed::from_ptr(self.lib, ptr) }
    }
}

foreign_handle! {
    /// View over a `GSource`.
    pub struct SourceRef => GSource;
}

ref_counted!(SourceRef, g_source_ref, g_source_unref);

unsafe impl ThreadSafe for SourceRef {}

pub type Source = Shared<SourceRef>;

/// Priority of sources made by [`Source::timeout`] and the usual default.
pub const PRIORITY_DEFAULT: i32 = 0;
/// Priority of sources made by [`Source::idle`].
pub const PRIORITY_DEFAULT_IDLE: i32 = 200;

impl Source {
    /// `g_timeout_source_new`. The interval is passed on in milliseconds.
    pub fn timeout(lib: &'static GLib, interval: Duration) -> Result<Self> {
        let millis = u32::try_from(interval.as_millis()).unwrap_or(u32::MAX);
        let ptr = unsafe { (lib.g_timeout_source_new)(millis) };
        unsafe { Self::take_new(lib, ptr, "g_timeout_source_new") }
    }

    /// `g_idle_source_new`
    pub fn idle(lib: &'static GLib) -> Result<Self> {
        let ptr = unsafe { (lib.g_idle_source_new)() };
        unsafe { Self::take_new(lib, ptr, "g_idle_source_new") }
    }
}

type Callback = Box<dyn FnMut() -> ControlFlow<()> + Send + 'static>;

unsafe extern "C" fn dispatch_callback(data: gpointer) -> gboolean {
    let callback = unsafe { &mut *data.cast::<Callback>() };
    match catch_unwind(AssertUnwindSafe(callback)) {
        Ok(flow) => to_gboolean(flow.is_continue()),
        Err(_) => {
            log::error!("source callback panicked; removing source");
            to_gboolean(false)
        }
    }
}

unsafe extern "C" fn drop_callback(data: gpointer) {
    drop(unsafe { Box::from_raw(data.cast::<Callback>()) });
}

impl SourceRef {
    /// `g_source_attach`: returns the source id. `None` for `context` means
    /// the global default.
    pub fn attach(&self, context: Option<&MainContextRef>) -> u32 {
        unsafe { (self.lib.g_source_attach)(self.raw.as_ptr(), context_ptr(context)) }
    }

    /// `g_source_destroy`: detach from its context; no more dispatches.
    pub fn destroy(&self) {
        unsafe { (self.lib.g_source_destroy)(self.raw.as_ptr()) };
    }

    pub fn is_destroyed(&self) -> bool {
        from_gboolean(unsafe { (self.lib.g_source_is_destroyed)(self.raw.as_ptr()) })
    }

    pub fn priority(&self) -> i32 {
        unsafe { (self.lib.g_source_get_priority)(self.raw.as_ptr()) }
    }

    pub fn set_priority(&self, priority: i32) {
        unsafe { (self.lib.g_source_set_priority)(self.raw.as_ptr(), priority) };
    }

    /// `g_source_get_id`. Only valid once attached.
    pub fn id(&self) -> u32 {
        unsafe { (self.lib.g_source_get_id)(self.raw.as_ptr()) }
    }

    /// `g_source_set_name`. The native side copies the string.
    pub fn set_name(&self, name: &str) -> Result<()> {
        let c_name = to_cstring(name, "name")?;
        unsafe { (self.lib.g_source_set_name)(self.raw.as_ptr(), c_name.as_ptr()) };
        Ok(())
    }

    /// `g_source_get_context`: `None` until attached.
    pub fn context(&self) -> Option<Borrowed<'_, MainContextRef>> {
        let ptr = unsafe { (self.lib.g_source_get_context)(self.raw.as_ptr()) };
        unsafe { Borrowed::from_ptr(self.lib, ptr) }
    }

    /// `g_source_set_callback`. The closure runs on whichever thread
    /// dispatches the context; returning `Break` removes the source. Any
    /// previous callback is dropped by the native library.
    pub fn set_callback<F>(&self, callback: F)
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let data = Box::into_raw(Box::new(Box::new(callback) as Callback));
        unsafe {
            (self.lib.g_source_set_callback)(
                self.raw.as_ptr(),
                Some(dispatch_callback),
                data.cast(),
                Some(drop_callback),
            )
        };
    }
}
