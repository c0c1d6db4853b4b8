//! Error handling for the binding layer.
//!
//! Native failures reported through a `GError` out-parameter are copied into
//! [`NativeFailure`] and the `GError` is freed before the error reaches the
//! caller. Loader and marshaling failures get their own variants.

use crate::api::Api;
use crate::ffi::GError;
use crate::util::lossy_string;
use serde::Serialize;
use std::ffi::NulError;
use std::path::PathBuf;

/// Stable numeric codes for every [`Error`] variant.
///
/// Codes 1-9 are loader errors, 10-19 marshaling errors and 20+ errors
/// reported by the native library itself.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    /// No candidate shared object could be loaded
    Load = 1,
    /// A required symbol is missing from the shared object
    MissingSymbol = 2,
    /// A symbol resolved to a NULL address
    NullSymbol = 3,
    /// Loader configuration was rejected
    Config = 4,
    /// Loader configuration file could not be read
    ConfigIo = 5,
    /// A string argument contained an interior NUL byte
    NulByte = 10,
    /// A native constructor returned NULL
    NullHandle = 11,
    /// The native library reported a `GError`
    Native = 20,
}

/// A failure reported by the native library through a `GError`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NativeFailure {
    /// The error domain (the quark's string form)
    pub domain: String,
    /// Domain-specific error code
    pub code: i32,
    /// Human-readable message
    pub message: String,
}

impl std::fmt::Display for NativeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (domain {}, code {})", self.message, self.domain, self.code)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No candidate shared object could be loaded.
    #[error("unable to load the native library (tried: {})", display_paths(tried))]
    Load {
        tried: Vec<PathBuf>,
        /// The last failure reported by the system loader, if any.
        #[source]
        source: Option<libloading::Error>,
    },

    /// A shared object opened but lacks one of the required symbols.
    #[error("symbol `{name}` not found in {library}")]
    MissingSymbol {
        name: &'static str,
        library: String,
        #[source]
        source: libloading::Error,
    },

    /// A symbol lookup produced a NULL address.
    #[error("symbol `{name}` resolved to a null address")]
    NullSymbol { name: &'static str },

    /// The loader configuration JSON was rejected.
    #[error("invalid loader configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The loader configuration file could not be read.
    #[error("unable to read loader configuration {path}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A string argument could not be passed as a C string.
    #[error("interior NUL byte in {param}")]
    NulByte {
        param: &'static str,
        #[source]
        source: NulError,
    },

    /// A native constructor returned NULL.
    #[error("{function} returned NULL")]
    NullHandle { function: &'static str },

    /// The native library reported a `GError`, already copied and freed.
    #[error("native error: {0}")]
    Native(NativeFailure),
}

fn display_paths(paths: &[PathBuf]) -> String {
    let names: Vec<String> = paths.iter().map(|path| path.display().to_string()).collect();
    names.join(", ")
}

impl Error {
    /// The stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Load { .. } => ErrorCode::Load,
            Error::MissingSymbol { .. } => ErrorCode::MissingSymbol,
            Error::NullSymbol { .. } => ErrorCode::NullSymbol,
            Error::Config(_) => ErrorCode::Config,
            Error::ConfigIo { .. } => ErrorCode::ConfigIo,
            Error::NulByte { .. } => ErrorCode::NulByte,
            Error::NullHandle { .. } => ErrorCode::NullHandle,
            Error::Native(_) => ErrorCode::Native,
        }
    }

    pub(crate) fn nul_byte(param: &'static str, source: NulError) -> Self {
        Error::NulByte { param, source }
    }

    /// Copy a native `GError` into an [`Error::Native`] and free it.
    ///
    /// # Safety
    ///
    /// `error` must be a valid, owned `GError` produced by `api`. It is freed
    /// by this call and must not be used afterwards.
    pub(crate) unsafe fn take_native(api: &Api, error: *mut GError) -> Self {
        let failure = unsafe {
            let err = &*error;
            let domain = lossy_string((api.g_quark_to_string)(err.domain)).unwrap_or_default();
            NativeFailure {
                domain,
                code: err.code,
                message: lossy_string(err.message).unwrap_or_default(),
            }
        };
        unsafe { (api.g_error_free)(error) };
        Error::Native(failure)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
