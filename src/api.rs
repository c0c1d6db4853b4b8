//! The table of native entry points.
//!
//! Every wrapped GLib function has exactly one field here, named after its C
//! symbol. The table is built by resolving each symbol through a lookup
//! closure, so the same wrappers run against the system library or against
//! any other provider of the same ABI.

use crate::error::Error;
use crate::ffi::*;
use libc::c_void;

macro_rules! native_api {
    (
        $(
            $(#[$meta:meta])*
            fn $name:ident($($arg:ident: $ty:ty),* $(,)?) $(-> $ret:ty)?;
        )*
    ) => {
        /// Resolved function pointers for every wrapped native function.
        pub struct Api {
            $(
                $(#[$meta])*
                pub(crate) $name: unsafe extern "C" fn($($arg: $ty),*) $(-> $ret)?,
            )*
        }

        impl Api {
            /// Resolve every entry point through `lookup`.
            ///
            /// `lookup` receives NUL-terminated symbol names and must return a
            /// non-null address or an error.
            ///
            /// # Safety
            ///
            /// Every address returned by `lookup` must point to a function
            /// with the C signature of the symbol it was requested for.
            pub(crate) unsafe fn resolve<F>(mut lookup: F) -> Result<Self, Error>
            where
                F: FnMut(&'static str) -> Result<*mut c_void, Error>,
            {
                Ok(Self {
                    $(
                        $(#[$meta])*
                        $name: {
                            let addr = lookup(concat!(stringify!($name), "\0"))?;
                            if addr.is_null() {
                                return Err(Error::NullSymbol { name: stringify!($name) });
                            }
                            unsafe {
                                std::mem::transmute::<
                                    *mut c_void,
                                    unsafe extern "C" fn($($ty),*) $(-> $ret)?,
                                >(addr)
                            }
                        },
                    )*
                })
            }
        }
    };
}

native_api! {
    // memory
    fn g_free(mem: gpointer);

    // GArray
    fn g_array_new(zero_terminated: gboolean, clear: gboolean, element_size: guint) -> *mut GArray;
    fn g_array_sized_new(
        zero_terminated: gboolean,
        clear: gboolean,
        element_size: guint,
        reserved_size: guint,
    ) -> *mut GArray;
    fn g_array_ref(array: *mut GArray) -> *mut GArray;
    fn g_array_unref(array: *mut GArray);
    fn g_array_append_vals(array: *mut GArray, data: gconstpointer, len: guint) -> *mut GArray;
    fn g_array_prepend_vals(array: *mut GArray, data: gconstpointer, len: guint) -> *mut GArray;
    fn g_array_insert_vals(
        array: *mut GArray,
        index: guint,
        data: gconstpointer,
        len: guint,
    ) -> *mut GArray;
    fn g_array_remove_index(array: *mut GArray, index: guint) -> *mut GArray;
    fn g_array_remove_index_fast(array: *mut GArray, index: guint) -> *mut GArray;
    fn g_array_remove_range(array: *mut GArray, index: guint, length: guint) -> *mut GArray;
    fn g_array_set_size(array: *mut GArray, length: guint) -> *mut GArray;
    fn g_array_get_element_size(array: *mut GArray) -> guint;

    // GByteArray
    fn g_byte_array_new() -> *mut GByteArray;
    fn g_byte_array_sized_new(reserved_size: guint) -> *mut GByteArray;
    fn g_byte_array_ref(array: *mut GByteArray) -> *mut GByteArray;
    fn g_byte_array_unref(array: *mut GByteArray);
    fn g_byte_array_append(array: *mut GByteArray, data: *const u8, len: guint) -> *mut GByteArray;
    fn g_byte_array_prepend(array: *mut GByteArray, data: *const u8, len: guint) -> *mut GByteArray;
    fn g_byte_array_set_size(array: *mut GByteArray, length: guint) -> *mut GByteArray;
    fn g_byte_array_remove_index(array: *mut GByteArray, index: guint) -> *mut GByteArray;
    fn g_byte_array_remove_range(
        array: *mut GByteArray,
        index: guint,
        length: guint,
    ) -> *mut GByteArray;
    fn g_byte_array_free_to_bytes(array: *mut GByteArray) -> *mut GBytes;

    // GPtrArray
    fn g_ptr_array_new() -> *mut GPtrArray;
    fn g_ptr_array_sized_new(reserved_size: guint) -> *mut GPtrArray;
    fn g_ptr_array_ref(array: *mut GPtrArray) -> *mut GPtrArray;
    fn g_ptr_array_unref(array: *mut GPtrArray);
    fn g_ptr_array_add(array: *mut GPtrArray, data: gpointer);
    fn g_ptr_array_insert(array: *mut GPtrArray, index: gint, data: gpointer);
    fn g_ptr_array_remove_index(array: *mut GPtrArray, index: guint) -> gpointer;
    fn g_ptr_array_remove_index_fast(array: *mut GPtrArray, index: guint) -> gpointer;
    fn g_ptr_array_remove(array: *mut GPtrArray, data: gpointer) -> gboolean;
    fn g_ptr_array_set_size(array: *mut GPtrArray, length: gint);

    // GBytes
    fn g_bytes_new(data: gconstpointer, size: gsize) -> *mut GBytes;
    fn g_bytes_new_from_bytes(bytes: *mut GBytes, offset: gsize, length: gsize) -> *mut GBytes;
    fn g_bytes_ref(bytes: *mut GBytes) -> *mut GBytes;
    fn g_bytes_unref(bytes: *mut GBytes);
    fn g_bytes_get_data(bytes: *mut GBytes, size: *mut gsize) -> gconstpointer;
    fn g_bytes_get_size(bytes: *mut GBytes) -> gsize;
    fn g_bytes_hash(bytes: gconstpointer) -> guint;
    fn g_bytes_equal(bytes1: gconstpointer, bytes2: gconstpointer) -> gboolean;
    fn g_bytes_compare(bytes1: gconstpointer, bytes2: gconstpointer) -> gint;
    fn g_bytes_unref_to_array(bytes: *mut GBytes) -> *mut GByteArray;

    // GChecksum
    fn g_checksum_type_get_length(checksum_type: GChecksumType) -> gssize;
    fn g_checksum_new(checksum_type: GChecksumType) -> *mut GChecksum;
    fn g_checksum_copy(checksum: *const GChecksum) -> *mut GChecksum;
    fn g_checksum_free(checksum: *mut GChecksum);
    fn g_checksum_reset(checksum: *mut GChecksum);
    fn g_checksum_update(checksum: *mut GChecksum, data: *const u8, length: gssize);
    fn g_checksum_get_string(checksum: *mut GChecksum) -> *const gchar;
    fn g_checksum_get_digest(checksum: *mut GChecksum, buffer: *mut u8, digest_len: *mut gsize);
    fn g_compute_checksum_for_data(
        checksum_type: GChecksumType,
        data: *const u8,
        length: gsize,
    ) -> *mut gchar;

    // GList
    fn g_list_append(list: *mut GList, data: gpointer) -> *mut GList;
    fn g_list_prepend(list: *mut GList, data: gpointer) -> *mut GList;
    fn g_list_insert(list: *mut GList, data: gpointer, position: gint) -> *mut GList;
    fn g_list_remove(list: *mut GList, data: gconstpointer) -> *mut GList;
    fn g_list_delete_link(list: *mut GList, link: *mut GList) -> *mut GList;
    fn g_list_reverse(list: *mut GList) -> *mut GList;
    fn g_list_copy(list: *mut GList) -> *mut GList;
    fn g_list_length(list: *mut GList) -> guint;
    fn g_list_nth(list: *mut GList, n: guint) -> *mut GList;
    fn g_list_nth_data(list: *mut GList, n: guint) -> gpointer;
    fn g_list_find(list: *mut GList, data: gconstpointer) -> *mut GList;
    fn g_list_index(list: *mut GList, data: gconstpointer) -> gint;
    fn g_list_first(list: *mut GList) -> *mut GList;
    fn g_list_last(list: *mut GList) -> *mut GList;
    fn g_list_free(list: *mut GList);

    // GQueue
    fn g_queue_new() -> *mut GQueue;
    fn g_queue_free(queue: *mut GQueue);
    fn g_queue_copy(queue: *mut GQueue) -> *mut GQueue;
    fn g_queue_clear(queue: *mut GQueue);
    fn g_queue_is_empty(queue: *mut GQueue) -> gboolean;
    fn g_queue_get_length(queue: *mut GQueue) -> guint;
    fn g_queue_reverse(queue: *mut GQueue);
    fn g_queue_push_head(queue: *mut GQueue, data: gpointer);
    fn g_queue_push_tail(queue: *mut GQueue, data: gpointer);
    fn g_queue_push_nth(queue: *mut GQueue, data: gpointer, n: gint);
    fn g_queue_pop_head(queue: *mut GQueue) -> gpointer;
    fn g_queue_pop_tail(queue: *mut GQueue) -> gpointer;
    fn g_queue_peek_head(queue: *mut GQueue) -> gpointer;
    fn g_queue_peek_tail(queue: *mut GQueue) -> gpointer;
    fn g_queue_peek_nth(queue: *mut GQueue, n: guint) -> gpointer;
    fn g_queue_index(queue: *mut GQueue, data: gconstpointer) -> gint;
    fn g_queue_remove(queue: *mut GQueue, data: gconstpointer) -> gboolean;

    // GVariantType
    fn g_variant_type_new(type_string: *const gchar) -> *mut GVariantType;
    fn g_variant_type_new_array(element: *const GVariantType) -> *mut GVariantType;
    fn g_variant_type_new_maybe(element: *const GVariantType) -> *mut GVariantType;
    fn g_variant_type_copy(type_: *const GVariantType) -> *mut GVariantType;
    fn g_variant_type_free(type_: *mut GVariantType);
    fn g_variant_type_string_is_valid(type_string: *const gchar) -> gboolean;
    fn g_variant_type_peek_string(type_: *const GVariantType) -> *const gchar;
    fn g_variant_type_get_string_length(type_: *const GVariantType) -> gsize;
    fn g_variant_type_dup_string(type_: *const GVariantType) -> *mut gchar;
    fn g_variant_type_is_definite(type_: *const GVariantType) -> gboolean;
    fn g_variant_type_is_container(type_: *const GVariantType) -> gboolean;
    fn g_variant_type_is_basic(type_: *const GVariantType) -> gboolean;
    fn g_variant_type_is_maybe(type_: *const GVariantType) -> gboolean;
    fn g_variant_type_is_array(type_: *const GVariantType) -> gboolean;
    fn g_variant_type_is_tuple(type_: *const GVariantType) -> gboolean;
    fn g_variant_type_is_dict_entry(type_: *const GVariantType) -> gboolean;
    fn g_variant_type_is_variant(type_: *const GVariantType) -> gboolean;
    fn g_variant_type_is_subtype_of(
        type_: *const GVariantType,
        supertype: *const GVariantType,
    ) -> gboolean;
    fn g_variant_type_hash(type_: gconstpointer) -> guint;
    fn g_variant_type_equal(type1: gconstpointer, type2: gconstpointer) -> gboolean;
    fn g_variant_type_element(type_: *const GVariantType) -> *const GVariantType;
    fn g_variant_type_n_items(type_: *const GVariantType) -> gsize;
    fn g_variant_type_first(type_: *const GVariantType) -> *const GVariantType;
    fn g_variant_type_next(type_: *const GVariantType) -> *const GVariantType;
    fn g_variant_type_key(type_: *const GVariantType) -> *const GVariantType;
    fn g_variant_type_value(type_: *const GVariantType) -> *const GVariantType;

    // GError / GQuark
    fn g_error_new_literal(domain: GQuark, code: gint, message: *const gchar) -> *mut GError;
    fn g_error_copy(error: *const GError) -> *mut GError;
    fn g_error_free(error: *mut GError);
    fn g_error_matches(error: *const GError, domain: GQuark, code: gint) -> gboolean;
    fn g_quark_from_string(string: *const gchar) -> GQuark;
    fn g_quark_to_string(quark: GQuark) -> *const gchar;

    // GAsyncQueue
    #[cfg(feature = "threads")]
    fn g_async_queue_new() -> *mut GAsyncQueue;
    #[cfg(feature = "threads")]
    fn g_async_queue_ref(queue: *mut GAsyncQueue) -> *mut GAsyncQueue;
    #[cfg(feature = "threads")]
    fn g_async_queue_unref(queue: *mut GAsyncQueue);
    #[cfg(feature = "threads")]
    fn g_async_queue_lock(queue: *mut GAsyncQueue);
    #[cfg(feature = "threads")]
    fn g_async_queue_unlock(queue: *mut GAsyncQueue);
    #[cfg(feature = "threads")]
    fn g_async_queue_push(queue: *mut GAsyncQueue, data: gpointer);
    #[cfg(feature = "threads")]
    fn g_async_queue_push_unlocked(queue: *mut GAsyncQueue, data: gpointer);
    #[cfg(feature = "threads")]
    fn g_async_queue_pop(queue: *mut GAsyncQueue) -> gpointer;
    #[cfg(feature = "threads")]
    fn g_async_queue_pop_unlocked(queue: *mut GAsyncQueue) -> gpointer;
    #[cfg(feature = "threads")]
    fn g_async_queue_try_pop(queue: *mut GAsyncQueue) -> gpointer;
    #[cfg(feature = "threads")]
    fn g_async_queue_try_pop_unlocked(queue: *mut GAsyncQueue) -> gpointer;
    #[cfg(feature = "threads")]
    fn g_async_queue_timeout_pop(queue: *mut GAsyncQueue, timeout: guint64) -> gpointer;
    #[cfg(feature = "threads")]
    fn g_async_queue_length(queue: *mut GAsyncQueue) -> gint;
    #[cfg(feature = "threads")]
    fn g_async_queue_length_unlocked(queue: *mut GAsyncQueue) -> gint;

    // GMutex / GRecMutex / GCond
    #[cfg(feature = "threads")]
    fn g_mutex_init(mutex: *mut GMutex);
    #[cfg(feature = "threads")]
    fn g_mutex_clear(mutex: *mut GMutex);
    #[cfg(feature = "threads")]
    fn g_mutex_lock(mutex: *mut GMutex);
    #[cfg(feature = "threads")]
    fn g_mutex_unlock(mutex: *mut GMutex);
    #[cfg(feature = "threads")]
    fn g_mutex_trylock(mutex: *mut GMutex) -> gboolean;
    #[cfg(feature = "threads")]
    fn g_rec_mutex_init(rec_mutex: *mut GRecMutex);
    #[cfg(feature = "threads")]
    fn g_rec_mutex_clear(rec_mutex: *mut GRecMutex);
    #[cfg(feature = "threads")]
    fn g_rec_mutex_lock(rec_mutex: *mut GRecMutex);
    #[cfg(feature = "threads")]
    fn g_rec_mutex_unlock(rec_mutex: *mut GRecMutex);
    #[cfg(feature = "threads")]
    fn g_rec_mutex_trylock(rec_mutex: *mut GRecMutex) -> gboolean;
    #[cfg(feature = "threads")]
    fn g_cond_init(cond: *mut GCond);
    #[cfg(feature = "threads")]
    fn g_cond_clear(cond: *mut GCond);
    #[cfg(feature = "threads")]
    fn g_cond_wait(cond: *mut GCond, mutex: *mut GMutex);
    #[cfg(feature = "threads")]
    fn g_cond_wait_until(cond: *mut GCond, mutex: *mut GMutex, end_time: gint64) -> gboolean;
    #[cfg(feature = "threads")]
    fn g_cond_signal(cond: *mut GCond);
    #[cfg(feature = "threads")]
    fn g_cond_broadcast(cond: *mut GCond);
    #[cfg(feature = "threads")]
    fn g_get_monotonic_time() -> gint64;

    // GThread
    #[cfg(feature = "threads")]
    fn g_thread_try_new(
        name: *const gchar,
        func: GThreadFunc,
        data: gpointer,
        error: *mut *mut GError,
    ) -> *mut GThread;
    #[cfg(feature = "threads")]
    fn g_thread_ref(thread: *mut GThread) -> *mut GThread;
    #[cfg(feature = "threads")]
    fn g_thread_unref(thread: *mut GThread);
    #[cfg(feature = "threads")]
    fn g_thread_join(thread: *mut GThread) -> gpointer;
    #[cfg(feature = "threads")]
    fn g_thread_self() -> *mut GThread;
    #[cfg(feature = "threads")]
    fn g_thread_yield();

    // GMainContext
    #[cfg(feature = "main-loop")]
    fn g_main_context_new() -> *mut GMainContext;
    #[cfg(feature = "main-loop")]
    fn g_main_context_ref(context: *mut GMainContext) -> *mut GMainContext;
    #[cfg(feature = "main-loop")]
    fn g_main_context_unref(context: *mut GMainContext);
    #[cfg(feature = "main-loop")]
    fn g_main_context_default() -> *mut GMainContext;
    #[cfg(feature = "main-loop")]
    fn g_main_context_ref_thread_default() -> *mut GMainContext;
    #[cfg(feature = "main-loop")]
    fn g_main_context_iteration(context: *mut GMainContext, may_block: gboolean) -> gboolean;
    #[cfg(feature = "main-loop")]
    fn g_main_context_pending(context: *mut GMainContext) -> gboolean;
    #[cfg(feature = "main-loop")]
    fn g_main_context_wakeup(context: *mut GMainContext);
    #[cfg(feature = "main-loop")]
    fn g_main_context_acquire(context: *mut GMainContext) -> gboolean;
    #[cfg(feature = "main-loop")]
    fn g_main_context_release(context: *mut GMainContext);
    #[cfg(feature = "main-loop")]
    fn g_main_context_is_owner(context: *mut GMainContext) -> gboolean;
    #[cfg(feature = "main-loop")]
    fn g_main_context_push_thread_default(context: *mut GMainContext);
    #[cfg(feature = "main-loop")]
    fn g_main_context_pop_thread_default(context: *mut GMainContext);

    // GMainLoop
    #[cfg(feature = "main-loop")]
    fn g_main_loop_new(context: *mut GMainContext, is_running: gboolean) -> *mut GMainLoop;
    #[cfg(feature = "main-loop")]
    fn g_main_loop_ref(main_loop: *mut GMainLoop) -> *mut GMainLoop;
    #[cfg(feature = "main-loop")]
    fn g_main_loop_unref(main_loop: *mut GMainLoop);
    #[cfg(feature = "main-loop")]
    fn g_main_loop_run(main_loop: *mut GMainLoop);
    #[cfg(feature = "main-loop")]
    fn g_main_loop_quit(main_loop: *mut GMainLoop);
    #[cfg(feature = "main-loop")]
    fn g_main_loop_is_running(main_loop: *mut GMainLoop) -> gboolean;
    #[cfg(feature = "main-loop")]
    fn g_main_loop_get_context(main_loop: *mut GMainLoop) -> *mut GMainContext;

    // GSource
    #[cfg(feature = "main-loop")]
    fn g_timeout_source_new(interval: guint) -> *mut GSource;
    #[cfg(feature = "main-loop")]
    fn g_idle_source_new() -> *mut GSource;
    #[cfg(feature = "main-loop")]
    fn g_source_ref(source: *mut GSource) -> *mut GSource;
    #[cfg(feature = "main-loop")]
    fn g_source_unref(source: *mut GSource);
    #[cfg(feature = "main-loop")]
    fn g_source_attach(source: *mut GSource, context: *mut GMainContext) -> guint;
    #[cfg(feature = "main-loop")]
    fn g_source_destroy(source: *mut GSource);
    #[cfg(feature = "main-loop")]
    fn g_source_is_destroyed(source: *mut GSource) -> gboolean;
    #[cfg(feature = "main-loop")]
    fn g_source_set_priority(source: *mut GSource, priority: gint);
    #[cfg(feature = "main-loop")]
    fn g_source_get_priority(source: *mut GSource) -> gint;
    #[cfg(feature = "main-loop")]
    fn g_source_get_id(source: *mut GSource) -> guint;
    #[cfg(feature = "main-loop")]
    fn g_source_set_name(source: *mut GSource, name: *const gchar);
    #[cfg(feature = "main-loop")]
    fn g_source_get_context(source: *mut GSource) -> *mut GMainContext;
    #[cfg(feature = "main-loop")]
    fn g_source_set_callback(
        source: *mut GSource,
        func: GSourceFunc,
        data: gpointer,
        notify: GDestroyNotify,
    );
}
