//! Ownership-tracked wrappers over GLib's core data structures.
//!
//! The native library is opened at runtime (see [`LoaderConfig`]) and every
//! wrapper method forwards to exactly one GLib function through the resolved
//! [`Api`] table.
//!
//! # Ownership
//!
//! Each native type has a view (`ArrayRef`, `SourceRef`, ...) and is held
//! through one of three wrappers:
//!
//! - [`Borrowed`]: a lifetime-bounded view that never touches the object's
//!   lifetime.
//! - [`Shared`]: one reference on a reference-counted object. `Clone`
//!   retains, `Drop` releases.
//! - [`Owned`]: the sole owner of an object with a free function. Not
//!   `Clone`; duplicate with the type's native `copy`.
//!
//! # Thread Safety
//!
//! Only wrappers over natively thread-safe types are `Send`/`Sync`:
//! [`Bytes`], [`AsyncQueue`], [`MainContext`], [`MainLoop`], [`Source`],
//! [`Thread`] and [`VariantType`], plus the lock types in [`Mutex`],
//! [`RecMutex`] and [`Cond`].
//!
//! # Feature Flags
//!
//! - `threads` (default): async queues, locks, condition variables, threads
//! - `main-loop` (default): main contexts, main loops, sources

#![allow(clippy::missing_safety_doc)]

mod api;
mod array;
#[cfg(feature = "threads")]
mod async_queue;
mod byte_array;
mod bytes;
mod checksum;
mod config;
mod error;
pub mod ffi;
mod handle;
mod library;
mod list;
#[cfg(feature = "main-loop")]
mod main_context;
mod native_error;
mod ptr_array;
mod queue;
#[cfg(feature = "threads")]
mod sync;
#[cfg(feature = "threads")]
mod thread;
mod util;
mod variant_type;

#[cfg(test)]
mod standin;

pub use api::Api;
pub use array::{Array, ArrayRef};
#[cfg(feature = "threads")]
pub use async_queue::{AsyncQueue, AsyncQueueRef};
pub use byte_array::{ByteArray, ByteArrayRef};
pub use bytes::{Bytes, BytesRef};
pub use checksum::{Checksum, ChecksumRef, ChecksumType, compute_checksum};
pub use config::{CONFIG_ENV, LIBRARY_PATH_ENV, LoaderConfig};
pub use error::{Error, ErrorCode, NativeFailure, Result};
pub use handle::{Borrowed, Handle, Owned, RefCounted, Shared, SoleOwned, ThreadSafe};
pub use library::GLib;
pub use list::{Iter, List, ListNode};
#[cfg(feature = "main-loop")]
pub use main_context::{
    MainContext, MainContextRef, MainLoop, MainLoopRef, PRIORITY_DEFAULT, PRIORITY_DEFAULT_IDLE,
    Source, SourceRef,
};
pub use native_error::{NativeError, NativeErrorRef, Quark};
pub use ptr_array::{PtrArray, PtrArrayRef};
pub use queue::{Queue, QueueRef};
#[cfg(feature = "threads")]
pub use sync::{Cond, Mutex, RecMutex, monotonic_time};
#[cfg(feature = "threads")]
pub use thread::{Thread, ThreadRef};
pub use variant_type::{VariantType, VariantTypeRef};
