//! Raw ABI mirrors of the GLib types wrapped by this crate.
//!
//! Structs with public fields in the GLib headers are laid out here with
//! `#[repr(C)]`. Everything else is an opaque marker only ever seen behind a
//! pointer.

#![allow(non_camel_case_types)]

use libc::{c_char, c_int, c_uint, c_void, size_t, ssize_t};

pub type gboolean = c_int;
pub type gpointer = *mut c_void;
pub type gconstpointer = *const c_void;
pub type gchar = c_char;
pub type gint = c_int;
pub type guint = c_uint;
pub type gsize = size_t;
pub type gssize = ssize_t;
pub type gint64 = i64;
pub type guint64 = u64;
pub type GQuark = u32;

pub const GFALSE: gboolean = 0;
pub const GTRUE: gboolean = 1;

/// `GChecksumType` values.
pub type GChecksumType = c_int;
pub const G_CHECKSUM_MD5: GChecksumType = 0;
pub const G_CHECKSUM_SHA1: GChecksumType = 1;
pub const G_CHECKSUM_SHA256: GChecksumType = 2;
pub const G_CHECKSUM_SHA512: GChecksumType = 3;
pub const G_CHECKSUM_SHA384: GChecksumType = 4;

pub type GSourceFunc = Option<unsafe extern "C" fn(user_data: gpointer) -> gboolean>;
pub type GDestroyNotify = Option<unsafe extern "C" fn(data: gpointer)>;
pub type GThreadFunc = unsafe extern "C" fn(data: gpointer) -> gpointer;

#[repr(C)]
#[derive(Debug)]
pub struct GArray {
    pub data: *mut gchar,
    pub len: guint,
}

#[repr(C)]
#[derive(Debug)]
pub struct GByteArray {
    pub data: *mut u8,
    pub len: guint,
}

#[repr(C)]
#[derive(Debug)]
pub struct GPtrArray {
    pub pdata: *mut gpointer,
    pub len: guint,
}

#[repr(C)]
#[derive(Debug)]
pub struct GList {
    pub data: gpointer,
    pub next: *mut GList,
    pub prev: *mut GList,
}

#[repr(C)]
#[derive(Debug)]
pub struct GQueue {
    pub head: *mut GList,
    pub tail: *mut GList,
    pub length: guint,
}

#[repr(C)]
#[derive(Debug)]
pub struct GError {
    pub domain: GQuark,
    pub code: gint,
    pub message: *mut gchar,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub union GMutex {
    pub p: gpointer,
    pub i: [guint; 2],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct GRecMutex {
    pub p: gpointer,
    pub i: [guint; 2],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct GCond {
    pub p: gpointer,
    pub i: [guint; 2],
}

impl GMutex {
    pub const fn zeroed() -> Self {
        GMutex { i: [0; 2] }
    }
}

impl GRecMutex {
    pub const fn zeroed() -> Self {
        GRecMutex {
            p: std::ptr::null_mut(),
            i: [0; 2],
        }
    }
}

impl GCond {
    pub const fn zeroed() -> Self {
        GCond {
            p: std::ptr::null_mut(),
            i: [0; 2],
        }
    }
}

macro_rules! opaque {
    ($($name:ident),* $(,)?) => {
        $(
            #[repr(C)]
            pub struct $name {
                _private: [u8; 0],
                _marker: core::marker::PhantomData<(*mut u8, core::marker::PhantomPinned)>,
            }
        )*
    };
}

opaque!(
    GBytes,
    GChecksum,
    GAsyncQueue,
    GMainContext,
    GMainLoop,
    GSource,
    GVariantType,
    GThread,
);

#[inline]
pub fn to_gboolean(value: bool) -> gboolean {
    if value { GTRUE } else { GFALSE }
}

#[inline]
pub fn from_gboolean(value: gboolean) -> bool {
    value != GFALSE
}
