//! `GChecksum`: incremental message digests.

use crate::error::Result;
use crate::ffi::{self, GChecksum, GChecksumType, gsize, gssize};
use crate::handle::{Owned, foreign_handle, sole_owned};
use crate::library::GLib;
use crate::util::{lossy_string, take_gstring};
use serde::{Deserialize, Serialize};

/// Digest algorithms known to the native library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumType {
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl ChecksumType {
    pub fn to_raw(self) -> GChecksumType {
        match self {
            ChecksumType::Md5 => ffi::G_CHECKSUM_MD5,
            ChecksumType::Sha1 => ffi::G_CHECKSUM_SHA1,
            ChecksumType::Sha256 => ffi::G_CHECKSUM_SHA256,
            ChecksumType::Sha384 => ffi::G_CHECKSUM_SHA384,
            ChecksumType::Sha512 => ffi::G_CHECKSUM_SHA512,
        }
    }

    /// `g_checksum_type_get_length`. `None` if this build of the library
    /// does not support the algorithm.
    pub fn digest_len(self, lib: &GLib) -> Option<usize> {
        let len = unsafe { (lib.g_checksum_type_get_length)(self.to_raw()) };
        usize::try_from(len).ok()
    }
}

// Largest digest among the supported types (SHA-512).
const MAX_DIGEST_LEN: usize = 64;

foreign_handle! {
    /// View over a `GChecksum`.
    pub struct ChecksumRef => GChecksum;
}

sole_owned!(ChecksumRef, g_checksum_free);

pub type Checksum = Owned<ChecksumRef>;

impl Checksum {
    /// `g_checksum_new`. `None` when the algorithm is unsupported.
    pub fn new(lib: &'static GLib, checksum_type: ChecksumType) -> Option<Self> {
        let ptr = unsafe { (lib.g_checksum_new)(checksum_type.to_raw()) };
        unsafe { Self::adopt(lib, ptr) }
    }
}

impl ChecksumRef {
    /// `g_checksum_copy`. Works on closed checksums as well.
    pub fn copy(&self) -> Result<Checksum> {
        let ptr = unsafe { (self.lib.g_checksum_copy)(self.raw.as_ptr()) };
        unsafe { Checksum::adopt_new(self.lib, ptr, "g_checksum_copy") }
    }

    /// `g_checksum_reset`: back to the initial, open state.
    pub fn reset(&self) {
        unsafe { (self.lib.g_checksum_reset)(self.raw.as_ptr()) };
    }

    /// `g_checksum_update`. Ignored by the native library once the digest
    /// has been read.
    pub fn update(&self, data: &[u8]) {
        let length = data.len() as gssize;
        unsafe { (self.lib.g_checksum_update)(self.raw.as_ptr(), data.as_ptr(), length) };
    }

    /// `g_checksum_get_string`: lowercase hex digest. Closes the checksum.
    pub fn hex_digest(&self) -> String {
        let ptr = unsafe { (self.lib.g_checksum_get_string)(self.raw.as_ptr()) };
        unsafe { lossy_string(ptr) }.unwrap_or_default()
    }

    /// `g_checksum_get_digest`: raw digest bytes. Closes the checksum.
    pub fn digest(&self) -> Vec<u8> {
        let mut buffer = [0u8; MAX_DIGEST_LEN];
        let mut len: gsize = buffer.len();
        unsafe {
            (self.lib.g_checksum_get_digest)(self.raw.as_ptr(), buffer.as_mut_ptr(), &mut len)
        };
        buffer[..len.min(MAX_DIGEST_LEN)].to_vec()
    }
}

/// `g_compute_checksum_for_data`: one-shot hex digest.
pub fn compute_checksum(lib: &GLib, checksum_type: ChecksumType, data: &[u8]) -> Option<String> {
    let ptr = unsafe {
        (lib.g_compute_checksum_for_data)(checksum_type.to_raw(), data.as_ptr(), data.len())
    };
    unsafe { take_gstring(lib, ptr) }
}
