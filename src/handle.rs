//! Ownership wrappers for native handles.
//!
//! A native object is reached through a [`Handle`] view: a non-null pointer
//! plus the table it came from. The view never touches the object's
//! lifetime. Ownership is expressed by which wrapper holds the view:
//!
//! - [`Borrowed`] never retains, releases or frees. Its lifetime parameter
//!   ties it to whatever keeps the object alive.
//! - [`Shared`] owns one native reference. Cloning retains, dropping
//!   releases, each exactly once.
//! - [`Owned`] is the sole owner of an object without a reference count.
//!   It cannot be cloned; dropping frees it exactly once.
//!
//! All three dereference to the view, so per-type methods are written once.

use crate::library::GLib;
use std::fmt;
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::ops::Deref;
use std::ptr::NonNull;

/// A typed view over a native pointer.
///
/// # Safety
///
/// Implementors must be a plain pointer/table pair. Constructing, copying or
/// dropping a view must never call into the native library.
pub unsafe trait Handle: Sized {
    /// The native struct behind the pointer.
    type Raw;

    /// Build a view.
    ///
    /// # Safety
    ///
    /// `raw` must point to a live object of the right type, created by the
    /// library behind `lib`.
    unsafe fn from_raw_parts(lib: &'static GLib, raw: NonNull<Self::Raw>) -> Self;

    fn raw(&self) -> NonNull<Self::Raw>;

    fn lib(&self) -> &'static GLib;

    #[inline]
    fn as_ptr(&self) -> *mut Self::Raw {
        self.raw().as_ptr()
    }
}

/// Handles whose native type carries a reference count.
///
/// # Safety
///
/// `retain` and `release` must be the native increment and decrement for
/// `Raw`.
pub unsafe trait RefCounted: Handle {
    /// # Safety
    ///
    /// `raw` must be live.
    unsafe fn retain(lib: &GLib, raw: *mut Self::Raw);

    /// # Safety
    ///
    /// The caller must own the reference being given up.
    unsafe fn release(lib: &GLib, raw: *mut Self::Raw);
}

/// Handles whose native type has a single owner and a free function.
///
/// # Safety
///
/// `free` must be the native destructor for `Raw`.
pub unsafe trait SoleOwned: Handle {
    /// # Safety
    ///
    /// The caller must be the only owner; `raw` is dangling afterwards.
    unsafe fn free(lib: &GLib, raw: *mut Self::Raw);
}

/// Marker for native types that may be used from several threads at once.
///
/// # Safety
///
/// Every operation on the view must be thread-safe in the native library,
/// and its reference count (if any) must be atomic.
pub unsafe trait ThreadSafe: Handle {}

/// A non-owning view valid for `'a`.
pub struct Borrowed<'a, H: Handle> {
    inner: H,
    _owner: PhantomData<&'a H::Raw>,
}

impl<'a, H: Handle> Borrowed<'a, H> {
    /// Borrow a native pointer. Returns `None` for NULL.
    ///
    /// # Safety
    ///
    /// `ptr` must be NULL or point to a live object created by `lib` that
    /// stays alive for `'a`.
    pub unsafe fn from_ptr(lib: &'static GLib, ptr: *mut H::Raw) -> Option<Self> {
        let raw = NonNull::new(ptr)?;
        Some(Self {
            inner: unsafe { H::from_raw_parts(lib, raw) },
            _owner: PhantomData,
        })
    }

    /// Same as [`Borrowed::from_ptr`] for APIs that hand out `const`
    /// pointers.
    ///
    /// # Safety
    ///
    /// As for [`Borrowed::from_ptr`]; the object must also not be mutated
    /// through this view.
    pub unsafe fn from_const_ptr(lib: &'static GLib, ptr: *const H::Raw) -> Option<Self> {
        unsafe { Self::from_ptr(lib, ptr.cast_mut()) }
    }
}

impl<H: RefCounted> Borrowed<'_, H> {
    /// Take a native reference of our own: one retain.
    pub fn to_shared(&self) -> Shared<H> {
        unsafe { H::retain(self.inner.lib(), self.inner.as_ptr()) };
        log::trace!("retained {:p}", self.inner.as_ptr());
        Shared {
            inner: unsafe { H::from_raw_parts(self.inner.lib(), self.inner.raw()) },
        }
    }
}

impl<H: Handle> Clone for Borrowed<'_, H> {
    fn clone(&self) -> Self {
        Self {
            inner: unsafe { H::from_raw_parts(self.inner.lib(), self.inner.raw()) },
            _owner: PhantomData,
        }
    }
}

impl<H: Handle> Deref for Borrowed<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        &self.inner
    }
}

impl<H: Handle> fmt::Debug for Borrowed<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Borrowed").field(&self.inner.as_ptr()).finish()
    }
}

/// An owned native reference on a reference-counted object.
pub struct Shared<H: RefCounted> {
    inner: H,
}

impl<H: RefCounted> Shared<H> {
    /// Adopt a reference the caller already owns, such as the result of a
    /// native `_new` function. No retain is performed.
    ///
    /// # Safety
    ///
    /// `ptr` must be NULL or a live object created by `lib`, and the caller
    /// must own one reference on it which is transferred here.
    pub unsafe fn take(lib: &'static GLib, ptr: *mut H::Raw) -> Option<Self> {
        let raw = NonNull::new(ptr)?;
        Some(Self {
            inner: unsafe { H::from_raw_parts(lib, raw) },
        })
    }

    /// Wrap an object the caller does not own a reference on. Performs
    /// exactly one retain.
    ///
    /// # Safety
    ///
    /// `ptr` must be NULL or a live object created by `lib`.
    pub unsafe fn retain(lib: &'static GLib, ptr: *mut H::Raw) -> Option<Self> {
        let raw = NonNull::new(ptr)?;
        unsafe { H::retain(lib, ptr) };
        log::trace!("retained {ptr:p}");
        Some(Self {
            inner: unsafe { H::from_raw_parts(lib, raw) },
        })
    }

    /// Take a native constructor's result, treating NULL as a failure of
    /// `function`.
    pub(crate) unsafe fn take_new(
        lib: &'static GLib,
        ptr: *mut H::Raw,
        function: &'static str,
    ) -> crate::Result<Self> {
        unsafe { Self::take(lib, ptr) }.ok_or(crate::Error::NullHandle { function })
    }

    /// Give the reference back to the caller without releasing it.
    pub fn into_raw(self) -> *mut H::Raw {
        let this = ManuallyDrop::new(self);
        this.inner.as_ptr()
    }

    /// A view that cannot outlive this reference.
    pub fn borrow(&self) -> Borrowed<'_, H> {
        Borrowed {
            inner: unsafe { H::from_raw_parts(self.inner.lib(), self.inner.raw()) },
            _owner: PhantomData,
        }
    }
}

impl<H: RefCounted> Clone for Shared<H> {
    fn clone(&self) -> Self {
        self.borrow().to_shared()
    }
}

impl<H: RefCounted> Drop for Shared<H> {
    fn drop(&mut self) {
        log::trace!("releasing {:p}", self.inner.as_ptr());
        unsafe { H::release(self.inner.lib(), self.inner.as_ptr()) };
    }
}

impl<H: RefCounted> Deref for Shared<H> {
    type Target = H;

    fn deref(&self) -> &H {
        &self.inner
    }
}

impl<H: RefCounted> fmt::Debug for Shared<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Shared").field(&self.inner.as_ptr()).finish()
    }
}

impl<H: RefCounted + PartialEq> PartialEq for Shared<H> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<H: RefCounted + Eq> Eq for Shared<H> {}

impl<H: RefCounted + PartialOrd> PartialOrd for Shared<H> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.inner.partial_cmp(&other.inner)
    }
}

impl<H: RefCounted + Ord> Ord for Shared<H> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.inner.cmp(&other.inner)
    }
}

impl<H: RefCounted + std::hash::Hash> std::hash::Hash for Shared<H> {
    fn hash<S: std::hash::Hasher>(&self, state: &mut S) {
        self.inner.hash(state);
    }
}

unsafe impl<H: RefCounted + ThreadSafe> Send for Shared<H> {}
unsafe impl<H: RefCounted + ThreadSafe> Sync for Shared<H> {}

/// The only owner of an object without a reference count.
pub struct Owned<H: SoleOwned> {
    inner: H,
}

impl<H: SoleOwned> Owned<H> {
    /// Take sole ownership of `ptr`. Returns `None` for NULL.
    ///
    /// # Safety
    ///
    /// `ptr` must be NULL or a live object created by `lib` that nothing else
    /// will free. Adopting the same pointer twice frees it twice.
    pub unsafe fn adopt(lib: &'static GLib, ptr: *mut H::Raw) -> Option<Self> {
        let raw = NonNull::new(ptr)?;
        Some(Self {
            inner: unsafe { H::from_raw_parts(lib, raw) },
        })
    }

    pub(crate) unsafe fn adopt_new(
        lib: &'static GLib,
        ptr: *mut H::Raw,
        function: &'static str,
    ) -> crate::Result<Self> {
        unsafe { Self::adopt(lib, ptr) }.ok_or(crate::Error::NullHandle { function })
    }

    /// Give up ownership without freeing.
    pub fn into_raw(self) -> *mut H::Raw {
        let this = ManuallyDrop::new(self);
        this.inner.as_ptr()
    }

    /// A view that cannot outlive this owner.
    pub fn borrow(&self) -> Borrowed<'_, H> {
        Borrowed {
            inner: unsafe { H::from_raw_parts(self.inner.lib(), self.inner.raw()) },
            _owner: PhantomData,
        }
    }
}

impl<H: SoleOwned> Drop for Owned<H> {
    fn drop(&mut self) {
        log::trace!("freeing {:p}", self.inner.as_ptr());
        unsafe { H::free(self.inner.lib(), self.inner.as_ptr()) };
    }
}

impl<H: SoleOwned> Deref for Owned<H> {
    type Target = H;

    fn deref(&self) -> &H {
        &self.inner
    }
}

impl<H: SoleOwned> fmt::Debug for Owned<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Owned").field(&self.inner.as_ptr()).finish()
    }
}

impl<H: SoleOwned + PartialEq> PartialEq for Owned<H> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<H: SoleOwned + Eq> Eq for Owned<H> {}

impl<H: SoleOwned + PartialOrd> PartialOrd for Owned<H> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.inner.partial_cmp(&other.inner)
    }
}

impl<H: SoleOwned + Ord> Ord for Owned<H> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.inner.cmp(&other.inner)
    }
}

impl<H: SoleOwned + std::hash::Hash> std::hash::Hash for Owned<H> {
    fn hash<S: std::hash::Hasher>(&self, state: &mut S) {
        self.inner.hash(state);
    }
}

unsafe impl<H: SoleOwned + ThreadSafe> Send for Owned<H> {}
unsafe impl<H: SoleOwned + ThreadSafe> Sync for Owned<H> {}

/// Declare a view type over an opaque or plain native struct.
macro_rules! foreign_handle {
    ($(#[$meta:meta])* $vis:vis struct $name:ident => $raw:ty;) => {
        $(#[$meta])*
        $vis struct $name {
            raw: ::std::ptr::NonNull<$raw>,
            lib: &'static $crate::library::GLib,
        }

        unsafe impl $crate::handle::Handle for $name {
            type Raw = $raw;

            unsafe fn from_raw_parts(
                lib: &'static $crate::library::GLib,
                raw: ::std::ptr::NonNull<$raw>,
            ) -> Self {
                Self { raw, lib }
            }

            #[inline]
            fn raw(&self) -> ::std::ptr::NonNull<$raw> {
                self.raw
            }

            #[inline]
            fn lib(&self) -> &'static $crate::library::GLib {
                self.lib
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.raw).finish()
            }
        }
    };
}

/// Implement [`RefCounted`] with a pair of native functions.
macro_rules! ref_counted {
    ($name:ty, $retain:ident, $release:ident) => {
        unsafe impl $crate::handle::RefCounted for $name {
            unsafe fn retain(lib: &$crate::library::GLib, raw: *mut Self::Raw) {
                unsafe { (lib.$retain)(raw) };
            }

            unsafe fn release(lib: &$crate::library::GLib, raw: *mut Self::Raw) {
                unsafe { (lib.$release)(raw) };
            }
        }
    };
}

/// Implement [`SoleOwned`] with a native free function.
macro_rules! sole_owned {
    ($name:ty, $free:ident) => {
        unsafe impl $crate::handle::SoleOwned for $name {
            unsafe fn free(lib: &$crate::library::GLib, raw: *mut Self::Raw) {
                unsafe { (lib.$free)(raw) };
            }
        }
    };
}

pub(crate) use {foreign_handle, ref_counted, sole_owned};
