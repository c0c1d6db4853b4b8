//! An instrumented stand-in for the native library.
//!
//! Objects are allocated with a counter block behind the public struct, so
//! tests can see every retain, release and free a wrapper performs. Nothing
//! is ever deallocated; counts stay readable after the last release. Any
//! entry point without a stand-in aborts the process.
//!
//! Source callbacks are kept in a side table so tests can dispatch them and
//! watch the destroy notify run. Locks only count; they never block.

use crate::ffi::*;
use crate::library::GLib;
use libc::c_void;
use std::cell::UnsafeCell;
use std::ffi::{CStr, CString};
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};

pub(crate) const STANDIN_QUARK: GQuark = 42;
const STANDIN_DOMAIN: &CStr = c"gbind-standin";
pub(crate) const THREAD_ERROR_CODE: gint = 7;
const THREAD_ERROR_MESSAGE: &CStr = c"threads are disabled";

/// `g_error_free` calls across every error, stand-in or not.
pub(crate) static ERRORS_FREED: AtomicUsize = AtomicUsize::new(0);

/// Locks cleared while still held.
pub(crate) static HELD_AT_CLEAR: AtomicUsize = AtomicUsize::new(0);

#[repr(C)]
pub(crate) struct Fake<T> {
    #[allow(dead_code)]
    header: UnsafeCell<T>,
    pub refs: AtomicUsize,
    pub retains: AtomicUsize,
    pub releases: AtomicUsize,
    pub destroyed: AtomicUsize,
    pub frees: AtomicUsize,
}

impl<T> Fake<T> {
    fn retain(&self) {
        self.retains.fetch_add(1, Ordering::SeqCst);
        self.refs.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
        if self.refs.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.destroyed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn free(&self) {
        self.frees.fetch_add(1, Ordering::SeqCst);
    }

    pub fn refs(&self) -> usize {
        self.refs.load(Ordering::SeqCst)
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    /// More than one free reached this object.
    pub fn double_freed(&self) -> bool {
        self.frees.load(Ordering::SeqCst) > 1
    }
}

/// Allocate a stand-in object holding one reference.
pub(crate) fn alloc<T>(header: T) -> *mut T {
    let fake = Box::new(Fake {
        header: UnsafeCell::new(header),
        refs: AtomicUsize::new(1),
        retains: AtomicUsize::new(0),
        releases: AtomicUsize::new(0),
        destroyed: AtomicUsize::new(0),
        frees: AtomicUsize::new(0),
    });
    Box::into_raw(fake).cast()
}

/// Allocate an object of an opaque type holding one reference.
///
/// `T` must be one of the zero-sized markers from [`crate::ffi`], so the
/// counter block sits where [`fake`] expects it.
pub(crate) fn alloc_opaque<T>() -> *mut T {
    alloc(()).cast()
}

/// The counter block of an object made by [`alloc`].
pub(crate) fn fake<T>(raw: *mut T) -> &'static Fake<T> {
    unsafe { &*raw.cast::<Fake<T>>() }
}

unsafe extern "C" fn unmapped() {
    std::process::abort();
}

unsafe extern "C" fn noop_free(_mem: gpointer) {}

unsafe extern "C" fn array_new(_zt: gboolean, _clear: gboolean, _size: guint) -> *mut GArray {
    alloc(GArray {
        data: ptr::null_mut(),
        len: 0,
    })
}

unsafe extern "C" fn array_ref(array: *mut GArray) -> *mut GArray {
    fake(array).retain();
    array
}

unsafe extern "C" fn array_unref(array: *mut GArray) {
    fake(array).release();
}

unsafe extern "C" fn byte_array_new() -> *mut GByteArray {
    alloc(GByteArray {
        data: ptr::null_mut(),
        len: 0,
    })
}

unsafe extern "C" fn byte_array_ref(array: *mut GByteArray) -> *mut GByteArray {
    fake(array).retain();
    array
}

unsafe extern "C" fn byte_array_unref(array: *mut GByteArray) {
    fake(array).release();
}

unsafe extern "C" fn ptr_array_new() -> *mut GPtrArray {
    alloc(GPtrArray {
        pdata: ptr::null_mut(),
        len: 0,
    })
}

unsafe extern "C" fn ptr_array_ref(array: *mut GPtrArray) -> *mut GPtrArray {
    fake(array).retain();
    array
}

unsafe extern "C" fn ptr_array_unref(array: *mut GPtrArray) {
    fake(array).release();
}

macro_rules! counted {
    ($($retain:ident, $release:ident => $raw:ty;)*) => {
        $(
            unsafe extern "C" fn $retain(raw: *mut $raw) -> *mut $raw {
                fake(raw).retain();
                raw
            }

            unsafe extern "C" fn $release(raw: *mut $raw) {
                fake(raw).release();
            }
        )*
    };
}

counted! {
    bytes_ref, bytes_unref => GBytes;
    async_queue_ref, async_queue_unref => GAsyncQueue;
    main_context_ref, main_context_unref => GMainContext;
    main_loop_ref, main_loop_unref => GMainLoop;
    thread_ref, thread_unref => GThread;
}

unsafe extern "C" fn bytes_new(_data: gconstpointer, _size: gsize) -> *mut GBytes {
    alloc_opaque()
}

unsafe extern "C" fn bytes_equal(left: gconstpointer, right: gconstpointer) -> gboolean {
    to_gboolean(left == right)
}

/// Orders by address.
unsafe extern "C" fn bytes_compare(left: gconstpointer, right: gconstpointer) -> gint {
    left.cmp(&right) as gint
}

unsafe extern "C" fn async_queue_new() -> *mut GAsyncQueue {
    alloc_opaque()
}

unsafe extern "C" fn main_context_new() -> *mut GMainContext {
    alloc_opaque()
}

unsafe extern "C" fn main_loop_new(
    _context: *mut GMainContext,
    _running: gboolean,
) -> *mut GMainLoop {
    alloc_opaque()
}

unsafe extern "C" fn idle_source_new() -> *mut GSource {
    alloc_opaque()
}

struct Installed {
    source: *mut GSource,
    func: GSourceFunc,
    data: gpointer,
    notify: GDestroyNotify,
}

// Only ever touched under `CALLBACKS`.
unsafe impl Send for Installed {}

static CALLBACKS: Mutex<Vec<Installed>> = Mutex::new(Vec::new());

fn uninstall(source: *mut GSource) -> Option<Installed> {
    let mut callbacks = CALLBACKS.lock().unwrap_or_else(PoisonError::into_inner);
    let index = callbacks.iter().position(|installed| installed.source == source)?;
    Some(callbacks.swap_remove(index))
}

fn notify(installed: Installed) {
    if let Some(notify) = installed.notify {
        unsafe { notify(installed.data) };
    }
}

unsafe extern "C" fn source_set_callback(
    source: *mut GSource,
    func: GSourceFunc,
    data: gpointer,
    destroy: GDestroyNotify,
) {
    let previous = uninstall(source);
    CALLBACKS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(Installed {
            source,
            func,
            data,
            notify: destroy,
        });
    if let Some(previous) = previous {
        notify(previous);
    }
}

unsafe extern "C" fn source_destroy(source: *mut GSource) {
    if let Some(installed) = uninstall(source) {
        notify(installed);
    }
}

unsafe extern "C" fn source_ref(source: *mut GSource) -> *mut GSource {
    fake(source).retain();
    source
}

unsafe extern "C" fn source_unref(source: *mut GSource) {
    let counters = fake(source);
    counters.release();
    if counters.refs() == 0 {
        unsafe { source_destroy(source) };
    }
}

#[cfg(feature = "main-loop")]
/// Run the callback installed on `source` once, the way a dispatch would.
/// `None` when nothing is installed.
pub(crate) fn dispatch(source: *mut GSource) -> Option<bool> {
    let (func, data) = {
        let callbacks = CALLBACKS.lock().unwrap_or_else(PoisonError::into_inner);
        let installed = callbacks.iter().find(|installed| installed.source == source)?;
        (installed.func?, installed.data)
    };
    Some(from_gboolean(unsafe { func(data) }))
}

#[cfg(feature = "main-loop")]
/// Whether a callback is still installed on `source`.
pub(crate) fn has_callback(source: *mut GSource) -> bool {
    let callbacks = CALLBACKS.lock().unwrap_or_else(PoisonError::into_inner);
    callbacks.iter().any(|installed| installed.source == source)
}

fn clear_lock(held: guint) {
    if held != 0 {
        HELD_AT_CLEAR.fetch_add(1, Ordering::SeqCst);
    }
}

unsafe extern "C" fn mutex_init(mutex: *mut GMutex) {
    unsafe { (*mutex).i = [0; 2] };
}

unsafe extern "C" fn mutex_clear(mutex: *mut GMutex) {
    clear_lock(unsafe { (*mutex).i[0] });
}

unsafe extern "C" fn mutex_lock(mutex: *mut GMutex) {
    unsafe { (*mutex).i[0] += 1 };
}

unsafe extern "C" fn mutex_unlock(mutex: *mut GMutex) {
    unsafe { (*mutex).i[0] -= 1 };
}

unsafe extern "C" fn mutex_trylock(mutex: *mut GMutex) -> gboolean {
    let held = unsafe { &mut (*mutex).i[0] };
    if *held != 0 {
        return GFALSE;
    }
    *held = 1;
    GTRUE
}

unsafe extern "C" fn rec_mutex_init(mutex: *mut GRecMutex) {
    unsafe { (*mutex).i = [0; 2] };
}

unsafe extern "C" fn rec_mutex_clear(mutex: *mut GRecMutex) {
    clear_lock(unsafe { (*mutex).i[0] });
}

unsafe extern "C" fn rec_mutex_lock(mutex: *mut GRecMutex) {
    unsafe { (*mutex).i[0] += 1 };
}

unsafe extern "C" fn rec_mutex_unlock(mutex: *mut GRecMutex) {
    unsafe { (*mutex).i[0] -= 1 };
}

unsafe extern "C" fn rec_mutex_trylock(mutex: *mut GRecMutex) -> gboolean {
    unsafe { (*mutex).i[0] += 1 };
    GTRUE
}

unsafe extern "C" fn queue_new() -> *mut GQueue {
    alloc(GQueue {
        head: ptr::null_mut(),
        tail: ptr::null_mut(),
        length: 0,
    })
}

unsafe extern "C" fn queue_copy(queue: *mut GQueue) -> *mut GQueue {
    let source = unsafe { &*queue };
    alloc(GQueue {
        head: source.head,
        tail: source.tail,
        length: source.length,
    })
}

unsafe extern "C" fn queue_free(queue: *mut GQueue) {
    fake(queue).free();
}

unsafe extern "C" fn error_new_literal(
    domain: GQuark,
    code: gint,
    message: *const gchar,
) -> *mut GError {
    let message = unsafe { CStr::from_ptr(message) }.to_owned().into_raw();
    alloc(GError {
        domain,
        code,
        message,
    })
}

unsafe extern "C" fn error_copy(error: *const GError) -> *mut GError {
    let source = unsafe { &*error };
    unsafe { error_new_literal(source.domain, source.code, source.message) }
}

unsafe extern "C" fn error_free(error: *mut GError) {
    ERRORS_FREED.fetch_add(1, Ordering::SeqCst);
    fake(error).free();
}

unsafe extern "C" fn error_matches(error: *const GError, domain: GQuark, code: gint) -> gboolean {
    let error = unsafe { &*error };
    to_gboolean(error.domain == domain && error.code == code)
}

unsafe extern "C" fn quark_from_string(_string: *const gchar) -> GQuark {
    STANDIN_QUARK
}

unsafe extern "C" fn quark_to_string(quark: GQuark) -> *const gchar {
    if quark == STANDIN_QUARK {
        STANDIN_DOMAIN.as_ptr()
    } else {
        ptr::null()
    }
}

unsafe extern "C" fn thread_try_new(
    _name: *const gchar,
    _func: GThreadFunc,
    _data: gpointer,
    error: *mut *mut GError,
) -> *mut GThread {
    let failure = alloc(GError {
        domain: STANDIN_QUARK,
        code: THREAD_ERROR_CODE,
        message: THREAD_ERROR_MESSAGE.as_ptr().cast_mut(),
    });
    unsafe { *error = failure };
    ptr::null_mut()
}

fn address(symbol: &str) -> *mut c_void {
    let f: *const () = match symbol {
        "g_free" => noop_free as *const (),
        "g_array_new" => array_new as *const (),
        "g_array_ref" => array_ref as *const (),
        "g_array_unref" => array_unref as *const (),
        "g_byte_array_new" => byte_array_new as *const (),
        "g_byte_array_ref" => byte_array_ref as *const (),
        "g_byte_array_unref" => byte_array_unref as *const (),
        "g_ptr_array_new" => ptr_array_new as *const (),
        "g_ptr_array_ref" => ptr_array_ref as *const (),
        "g_ptr_array_unref" => ptr_array_unref as *const (),
        "g_queue_new" => queue_new as *const (),
        "g_queue_copy" => queue_copy as *const (),
        "g_queue_free" => queue_free as *const (),
        "g_error_new_literal" => error_new_literal as *const (),
        "g_error_copy" => error_copy as *const (),
        "g_error_free" => error_free as *const (),
        "g_error_matches" => error_matches as *const (),
        "g_quark_from_string" => quark_from_string as *const (),
        "g_quark_to_string" => quark_to_string as *const (),
        "g_thread_try_new" => thread_try_new as *const (),
        "g_thread_ref" => thread_ref as *const (),
        "g_thread_unref" => thread_unref as *const (),
        "g_bytes_new" => bytes_new as *const (),
        "g_bytes_ref" => bytes_ref as *const (),
        "g_bytes_unref" => bytes_unref as *const (),
        "g_bytes_equal" => bytes_equal as *const (),
        "g_bytes_compare" => bytes_compare as *const (),
        "g_async_queue_new" => async_queue_new as *const (),
        "g_async_queue_ref" => async_queue_ref as *const (),
        "g_async_queue_unref" => async_queue_unref as *const (),
        "g_main_context_new" => main_context_new as *const (),
        "g_main_context_ref" => main_context_ref as *const (),
        "g_main_context_unref" => main_context_unref as *const (),
        "g_main_loop_new" => main_loop_new as *const (),
        "g_main_loop_ref" => main_loop_ref as *const (),
        "g_main_loop_unref" => main_loop_unref as *const (),
        "g_idle_source_new" => idle_source_new as *const (),
        "g_source_ref" => source_ref as *const (),
        "g_source_unref" => source_unref as *const (),
        "g_source_destroy" => source_destroy as *const (),
        "g_source_set_callback" => source_set_callback as *const (),
        "g_mutex_init" => mutex_init as *const (),
        "g_mutex_clear" => mutex_clear as *const (),
        "g_mutex_lock" => mutex_lock as *const (),
        "g_mutex_unlock" => mutex_unlock as *const (),
        "g_mutex_trylock" => mutex_trylock as *const (),
        "g_rec_mutex_init" => rec_mutex_init as *const (),
        "g_rec_mutex_clear" => rec_mutex_clear as *const (),
        "g_rec_mutex_lock" => rec_mutex_lock as *const (),
        "g_rec_mutex_unlock" => rec_mutex_unlock as *const (),
        "g_rec_mutex_trylock" => rec_mutex_trylock as *const (),
        _ => unmapped as *const (),
    };
    f.cast_mut().cast()
}

/// The process-wide stand-in table.
pub(crate) fn lib() -> &'static GLib {
    static LIB: OnceLock<GLib> = OnceLock::new();
    LIB.get_or_init(|| {
        let resolve = |symbol: &str| Ok(address(symbol.trim_end_matches('\0')));
        unsafe { GLib::from_symbols("standin", resolve) }.expect("stand-in table resolves")
    })
}

/// Leak a C string for fields the wrappers will never free.
pub(crate) fn leaked_cstring(s: &str) -> *mut gchar {
    CString::new(s).expect("no interior NUL").into_raw()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorCode};
    use crate::handle::{Borrowed, Handle, Owned, RefCounted, Shared};
    use crate::list::ListNode;
    use crate::native_error::{NativeError, NativeErrorRef, Quark};
    use crate::queue::{Queue, QueueRef};
    use crate::{Array, ArrayRef, ByteArray, ByteArrayRef, Bytes, BytesRef, PtrArray, PtrArrayRef};
    use serial_test::serial;

    fn check_retain_path<H: RefCounted>(raw: *mut H::Raw)
    where
        H::Raw: 'static,
    {
        let lib = lib();
        let counters = fake(raw);
        let before = counters.refs();

        let wrapper = unsafe { Shared::<H>::retain(lib, raw) }.unwrap();
        assert_eq!(counters.refs(), before + 1);
        assert_eq!(Fake::<H::Raw>::count(&counters.retains), 1);

        drop(wrapper);
        assert_eq!(counters.refs(), before);
        assert_eq!(Fake::<H::Raw>::count(&counters.releases), 1);
        assert_eq!(Fake::<H::Raw>::count(&counters.destroyed), 0);
    }

    #[test]
    fn retaining_adds_one_reference_and_drop_gives_it_back() {
        let lib = lib();
        check_retain_path::<ArrayRef<u32>>(unsafe { (lib.g_array_new)(0, 0, 4) });
        check_retain_path::<ByteArrayRef>(unsafe { (lib.g_byte_array_new)() });
        check_retain_path::<PtrArrayRef>(unsafe { (lib.g_ptr_array_new)() });
    }

    #[test]
    fn every_counted_wrapper_retains_and_releases_once() {
        check_retain_path::<BytesRef>(alloc_opaque());
        #[cfg(feature = "threads")]
        {
            check_retain_path::<crate::AsyncQueueRef>(alloc_opaque());
            check_retain_path::<crate::ThreadRef>(alloc_opaque());
        }
        #[cfg(feature = "main-loop")]
        {
            check_retain_path::<crate::MainContextRef>(alloc_opaque());
            check_retain_path::<crate::MainLoopRef>(alloc_opaque());
            check_retain_path::<crate::SourceRef>(alloc_opaque());
        }
    }

    #[test]
    fn constructors_take_the_fresh_reference_without_retaining() {
        let bytes = Bytes::new(lib(), b"abc").unwrap();
        let counters = fake(bytes.as_ptr());
        drop(bytes.clone());
        drop(bytes);
        assert_eq!(Fake::<GBytes>::count(&counters.retains), 1);
        assert_eq!(Fake::<GBytes>::count(&counters.releases), 2);
        assert_eq!(Fake::<GBytes>::count(&counters.destroyed), 1);

        #[cfg(feature = "threads")]
        {
            let queue = crate::AsyncQueue::new(lib()).unwrap();
            let counters = fake(queue.as_ptr());
            drop(queue);
            assert_eq!(Fake::<GAsyncQueue>::count(&counters.destroyed), 1);
        }
        #[cfg(feature = "main-loop")]
        {
            let context = crate::MainContext::new(lib()).unwrap();
            let main_loop = crate::MainLoop::new(lib(), Some(&context), false).unwrap();
            let (context_counters, loop_counters) =
                (fake(context.as_ptr()), fake(main_loop.as_ptr()));
            drop(main_loop);
            drop(context);
            assert_eq!(Fake::<GMainContext>::count(&context_counters.retains), 0);
            assert_eq!(Fake::<GMainContext>::count(&context_counters.destroyed), 1);
            assert_eq!(Fake::<GMainLoop>::count(&loop_counters.destroyed), 1);
        }
    }

    #[test]
    fn shared_bytes_order_through_the_native_compare() {
        use std::collections::BTreeSet;

        let lib = lib();
        let first = Bytes::new(lib, b"x").unwrap();
        let second = Bytes::new(lib, b"y").unwrap();
        assert_eq!(first.cmp(&second), first.as_ptr().cmp(&second.as_ptr()));
        assert_eq!(first.partial_cmp(&first.clone()), Some(std::cmp::Ordering::Equal));

        let keys: BTreeSet<Bytes> = [second.clone(), first.clone(), second.clone()].into();
        assert_eq!(keys.len(), 2);
        let smaller = first.as_ptr().min(second.as_ptr());
        assert_eq!(keys.first().map(|bytes| bytes.as_ptr()), Some(smaller));
    }

    #[test]
    fn inserting_past_the_end_never_reaches_the_native_call() {
        // `g_array_insert_vals` has no stand-in; reaching it aborts.
        let array = Array::<u32>::new(lib(), false, false).unwrap();
        assert!(!array.insert(1, &[7]));
        assert_eq!(array.len(), 0);
    }

    #[test]
    fn retaining_null_is_none_without_native_calls() {
        let wrapper = unsafe { Shared::<ByteArrayRef>::retain(lib(), ptr::null_mut()) };
        assert!(wrapper.is_none());
    }

    #[test]
    fn taking_a_fresh_handle_releases_exactly_once() {
        let array = Array::<u64>::new(lib(), false, false).unwrap();
        let counters = fake(array.as_ptr());
        assert_eq!(counters.refs(), 1);

        drop(array);
        assert_eq!(counters.refs(), 0);
        assert_eq!(Fake::<GArray>::count(&counters.retains), 0);
        assert_eq!(Fake::<GArray>::count(&counters.releases), 1);
        assert_eq!(Fake::<GArray>::count(&counters.destroyed), 1);
    }

    #[test]
    fn into_raw_hands_the_reference_back() {
        let lib = lib();
        let array = PtrArray::new(lib).unwrap();
        let raw = array.into_raw();
        let counters = fake(raw);
        assert_eq!(counters.refs(), 1);
        assert_eq!(Fake::<GPtrArray>::count(&counters.releases), 0);

        drop(unsafe { PtrArray::take(lib, raw) });
        assert_eq!(Fake::<GPtrArray>::count(&counters.destroyed), 1);
    }

    #[test]
    fn borrowed_never_retains_or_releases() {
        let lib = lib();
        let array = ByteArray::new(lib).unwrap();
        let counters = fake(array.as_ptr());

        {
            let view = array.borrow();
            let copy = view.clone();
            let from_ptr =
                unsafe { Borrowed::<ByteArrayRef>::from_ptr(lib, array.as_ptr()) }.unwrap();
            assert_eq!(view.len(), 0);
            assert_eq!(copy.len(), from_ptr.len());
        }

        assert_eq!(Fake::<GByteArray>::count(&counters.retains), 0);
        assert_eq!(Fake::<GByteArray>::count(&counters.releases), 0);
        assert_eq!(counters.refs(), 1);
    }

    #[test]
    fn borrowed_upgrade_is_one_retain() {
        let array = ByteArray::new(lib()).unwrap();
        let counters = fake(array.as_ptr());
        let shared = array.borrow().to_shared();
        assert_eq!(counters.refs(), 2);
        drop(shared);
        drop(array);
        assert_eq!(Fake::<GByteArray>::count(&counters.destroyed), 1);
    }

    #[test]
    fn adopting_one_queue_twice_frees_it_twice() {
        let lib = lib();
        let raw = unsafe { (lib.g_queue_new)() };
        let first = unsafe { Queue::adopt(lib, raw) }.unwrap();
        let second = unsafe { Queue::adopt(lib, raw) }.unwrap();
        drop(first);
        drop(second);
        assert!(fake(raw).double_freed());
        assert_eq!(Fake::<GQueue>::count(&fake(raw).frees), 2);
    }

    #[test]
    fn sole_owner_frees_once_and_copies_independently() {
        let queue = Queue::new(lib()).unwrap();
        let copy = queue.copy().unwrap();
        let (original, duplicate) = (fake(queue.as_ptr()), fake(copy.as_ptr()));
        assert_ne!(queue.as_ptr(), copy.as_ptr());

        drop(queue);
        assert_eq!(Fake::<GQueue>::count(&original.frees), 1);
        assert_eq!(Fake::<GQueue>::count(&duplicate.frees), 0);
        drop(copy);
        assert!(!duplicate.double_freed());
    }

    #[test]
    fn owned_into_raw_skips_the_free() {
        let queue = Queue::new(lib()).unwrap();
        let raw = queue.into_raw();
        assert_eq!(Fake::<GQueue>::count(&fake(raw).frees), 0);
    }

    #[test]
    fn clone_and_drop_walks_the_count_up_and_down() {
        let first = Array::<i32>::new(lib(), false, true).unwrap();
        let counters = fake(first.as_ptr());
        assert_eq!(counters.refs(), 1);

        let second = first.clone();
        assert_eq!(counters.refs(), 2);
        assert_eq!(first.as_ptr(), second.as_ptr());

        drop(first);
        assert_eq!(counters.refs(), 1);
        assert_eq!(Fake::<GArray>::count(&counters.destroyed), 0);

        drop(second);
        assert_eq!(counters.refs(), 0);
        assert_eq!(Fake::<GArray>::count(&counters.destroyed), 1);
        assert_eq!(Fake::<GArray>::count(&counters.retains), 1);
        assert_eq!(Fake::<GArray>::count(&counters.releases), 2);
    }

    #[test]
    fn array_fields_round_trip() {
        let array = Array::<u16>::new(lib(), false, false).unwrap();
        let mut storage = [1u16, 2, 3, 4];
        unsafe {
            array.set_data(storage.as_mut_ptr());
            array.set_len(3);
        }
        assert_eq!(array.data(), storage.as_mut_ptr());
        assert_eq!(array.len(), 3);
        assert_eq!(array.to_vec(), vec![1, 2, 3]);
        assert_eq!(array.get(3), None);
        unsafe { array.set_data(ptr::null_mut()) };
    }

    #[test]
    fn byte_array_fields_round_trip() {
        let array = ByteArray::new(lib()).unwrap();
        let mut storage = *b"abc";
        unsafe {
            array.set_data(storage.as_mut_ptr());
            array.set_len(2);
        }
        assert_eq!(array.data(), storage.as_mut_ptr());
        assert_eq!(array.len(), 2);
        assert_eq!(array.to_vec(), b"ab".to_vec());
    }

    #[test]
    fn ptr_array_fields_round_trip() {
        let array = PtrArray::new(lib()).unwrap();
        let mut value = 5u8;
        let mut slots: [gpointer; 1] = [(&raw mut value).cast()];
        unsafe {
            array.set_pdata(slots.as_mut_ptr());
            array.set_len(1);
        }
        assert_eq!(array.pdata(), slots.as_mut_ptr());
        assert_eq!(array.len(), 1);
        assert_eq!(array.get(0), Some(slots[0]));
        assert_eq!(array.get(1), None);
    }

    #[test]
    fn list_node_fields_round_trip() {
        let lib = lib();
        let mut first = GList {
            data: ptr::null_mut(),
            next: ptr::null_mut(),
            prev: ptr::null_mut(),
        };
        let mut second = GList {
            data: ptr::null_mut(),
            next: ptr::null_mut(),
            prev: ptr::null_mut(),
        };
        let mut payload = 9i32;
        let node = unsafe { Borrowed::<ListNode>::from_ptr(lib, &raw mut first) }.unwrap();

        node.set_data((&raw mut payload).cast::<c_void>());
        unsafe {
            node.set_next(&raw mut second);
            node.set_prev(&raw mut second);
        }
        assert_eq!(node.data(), (&raw mut payload).cast::<c_void>());
        assert_eq!(node.next().unwrap().as_ptr(), &raw mut second);
        assert_eq!(node.prev().unwrap().as_ptr(), &raw mut second);

        unsafe { node.set_next(ptr::null_mut()) };
        assert!(node.next().is_none());
    }

    #[test]
    fn queue_fields_round_trip() {
        let queue = Queue::new(lib()).unwrap();
        let mut link = GList {
            data: ptr::null_mut(),
            next: ptr::null_mut(),
            prev: ptr::null_mut(),
        };
        unsafe {
            queue.set_head(&raw mut link);
            queue.set_tail(&raw mut link);
            queue.set_length(1);
        }
        assert_eq!(queue.head(), &raw mut link);
        assert_eq!(queue.tail(), &raw mut link);
        assert_eq!(queue.length(), 1);
        assert_eq!(unsafe { queue.head_node() }.unwrap().as_ptr(), &raw mut link);
    }

    #[test]
    #[serial]
    fn native_error_fields_round_trip() {
        let lib = lib();
        let error = NativeError::new(lib, Quark(STANDIN_QUARK), 3, "first").unwrap();
        assert_eq!(error.message(), "first");

        error.set_domain(Quark(99));
        error.set_code(-4);
        let message = leaked_cstring("second");
        unsafe { error.set_message_ptr(message) };

        assert_eq!(error.domain(), Quark(99));
        assert_eq!(error.code(), -4);
        assert_eq!(error.message_ptr(), message);
        assert_eq!(error.message(), "second");
    }

    #[test]
    #[serial]
    fn native_error_copy_and_match() {
        let lib = lib();
        let domain = Quark::from_name(lib, "gbind-standin").unwrap();
        let error = NativeError::new(lib, domain, 12, "broken pipe").unwrap();
        let copy = error.copy().unwrap();

        assert!(copy.matches(domain, 12));
        assert!(!copy.matches(domain, 13));
        assert_eq!(domain.as_str(lib), Some("gbind-standin"));

        let failure = copy.to_failure();
        assert_eq!(failure.domain, "gbind-standin");
        assert_eq!(failure.code, 12);
        assert_eq!(failure.message, "broken pipe");

        let before = ERRORS_FREED.load(Ordering::SeqCst);
        drop(copy);
        drop(error);
        assert_eq!(ERRORS_FREED.load(Ordering::SeqCst), before + 2);
    }

    #[test]
    fn native_error_rejects_interior_nul() {
        let err = NativeError::new(lib(), Quark(STANDIN_QUARK), 1, "bad\0message").unwrap_err();
        assert_eq!(err.code(), ErrorCode::NulByte);
    }

    #[test]
    #[serial]
    fn borrowed_error_does_not_free() {
        let lib = lib();
        let error = NativeError::new(lib, Quark(STANDIN_QUARK), 1, "kept").unwrap();
        let counters = fake(error.as_ptr());
        {
            let view: Borrowed<'_, NativeErrorRef> = error.borrow();
            assert_eq!(view.code(), 1);
        }
        assert_eq!(Fake::<GError>::count(&counters.frees), 0);
        let raw = error.into_raw();
        drop(unsafe { Owned::<NativeErrorRef>::adopt(lib, raw) });
        assert_eq!(Fake::<GError>::count(&counters.frees), 1);
    }

    #[test]
    fn queue_view_is_reachable_through_every_wrapper() {
        let queue = Queue::new(lib()).unwrap();
        let through_owned: &QueueRef = &queue;
        let through_borrow = queue.borrow();
        assert_eq!(through_owned.as_ptr(), through_borrow.as_ptr());
    }

    #[cfg(feature = "threads")]
    #[test]
    #[serial]
    fn failed_thread_spawn_reports_the_native_error() {
        use crate::thread::Thread;
        use std::sync::Arc;

        let witness = Arc::new(());
        let captured = Arc::clone(&witness);
        let before = ERRORS_FREED.load(Ordering::SeqCst);

        let err = Thread::try_new(lib(), Some("worker"), move || drop(captured)).unwrap_err();

        assert_eq!(err.code(), ErrorCode::Native);
        match err {
            Error::Native(failure) => {
                assert_eq!(failure.domain, "gbind-standin");
                assert_eq!(failure.code, THREAD_ERROR_CODE);
                assert_eq!(failure.message, "threads are disabled");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(ERRORS_FREED.load(Ordering::SeqCst), before + 1);
        assert_eq!(Arc::strong_count(&witness), 1);
    }

    #[cfg(feature = "main-loop")]
    #[test]
    fn destroying_a_source_drops_its_callback() {
        use crate::Source;
        use std::ops::ControlFlow;
        use std::sync::Arc;

        let witness = Arc::new(());
        let captured = Arc::clone(&witness);
        let source = Source::idle(lib()).unwrap();
        source.set_callback(move || {
            let _keep = &captured;
            ControlFlow::Continue(())
        });
        assert_eq!(Arc::strong_count(&witness), 2);
        assert_eq!(dispatch(source.as_ptr()), Some(true));
        assert_eq!(dispatch(source.as_ptr()), Some(true));

        source.destroy();
        assert!(!has_callback(source.as_ptr()));
        assert_eq!(Arc::strong_count(&witness), 1);
    }

    #[cfg(feature = "main-loop")]
    #[test]
    fn last_unref_and_replacement_drop_source_callbacks() {
        use crate::Source;
        use std::ops::ControlFlow;
        use std::sync::Arc;

        let first = Arc::new(());
        let second = Arc::new(());
        let source = Source::idle(lib()).unwrap();
        let raw = source.as_ptr();

        let captured = Arc::clone(&first);
        source.set_callback(move || {
            let _keep = &captured;
            ControlFlow::Break(())
        });
        let captured = Arc::clone(&second);
        source.set_callback(move || {
            let _keep = &captured;
            ControlFlow::Break(())
        });
        assert_eq!(Arc::strong_count(&first), 1);
        assert_eq!(Arc::strong_count(&second), 2);
        assert_eq!(dispatch(raw), Some(false));

        let extra = source.clone();
        drop(source);
        assert_eq!(Arc::strong_count(&second), 2);
        drop(extra);
        assert_eq!(Fake::<GSource>::count(&fake(raw).destroyed), 1);
        assert_eq!(Arc::strong_count(&second), 1);
    }

    #[cfg(feature = "main-loop")]
    #[test]
    fn panicking_callback_removes_the_source_instead_of_unwinding() {
        use crate::Source;

        let source = Source::idle(lib()).unwrap();
        source.set_callback(|| panic!("callback failure"));
        assert_eq!(dispatch(source.as_ptr()), Some(false));
    }
}
