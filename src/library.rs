//! Loading the native library.

use crate::api::Api;
use crate::config::LoaderConfig;
use crate::error::{Error, Result};
use libc::c_void;
use libloading::Library;
use std::ops::Deref;
use std::sync::OnceLock;

static GLOBAL: OnceLock<GLib> = OnceLock::new();

/// A loaded set of native entry points.
///
/// Handles keep a `&'static GLib`, so a table has to be promoted with
/// [`GLib::leak`] or obtained from [`GLib::global`] before wrapping anything.
pub struct GLib {
    api: Api,
    origin: String,
    // Keeps the shared object mapped for as long as `api` is reachable.
    _library: Option<Library>,
}

impl GLib {
    /// Open the first library named by `config` that provides every entry
    /// point.
    ///
    /// A candidate that opens but lacks a symbol is closed again and the
    /// search moves on. When nothing loads, [`Error::Load`] carries the last
    /// loader failure.
    pub fn load(config: &LoaderConfig) -> Result<Self> {
        let tried = config.search_order();
        let mut last_error = None;

        for path in &tried {
            let name = path.display();
            log::debug!("trying native library {name}");
            // SAFETY: loading runs the library's initializers; the candidates
            // name GLib builds chosen by the caller's configuration.
            let library = match unsafe { Library::new(path) } {
                Ok(library) => library,
                Err(e) => {
                    log::warn!("could not open {name}: {e}");
                    last_error = Some(e);
                    continue;
                }
            };

            // SAFETY: every symbol is looked up by its GLib name, and the
            // table declares each one with the signature from the GLib
            // headers.
            let resolved = unsafe {
                Api::resolve(|symbol| {
                    library
                        .get::<*mut c_void>(symbol.as_bytes())
                        .map(|sym| *sym)
                        .map_err(|source| Error::MissingSymbol {
                            name: symbol.trim_end_matches('\0'),
                            library: name.to_string(),
                            source,
                        })
                })
            };
            let api = match resolved {
                Ok(api) => api,
                Err(Error::MissingSymbol { name: symbol, source, .. }) => {
                    log::warn!("{name} has no {symbol}: {source}");
                    last_error = Some(source);
                    continue;
                }
                Err(e) => {
                    log::warn!("skipping {name}: {e}");
                    continue;
                }
            };

            log::info!("loaded native library {name}");
            return Ok(Self {
                api,
                origin: name.to_string(),
                _library: Some(library),
            });
        }

        Err(Error::Load {
            tried,
            source: last_error,
        })
    }

    /// Build a table from an arbitrary symbol provider.
    ///
    /// # Safety
    ///
    /// Every address returned by `lookup` must be a function with the C
    /// signature of the requested GLib symbol, valid for the life of the
    /// process.
    pub unsafe fn from_symbols<F>(origin: impl Into<String>, lookup: F) -> Result<Self>
    where
        F: FnMut(&'static str) -> Result<*mut c_void>,
    {
        let api = unsafe { Api::resolve(lookup)? };
        Ok(Self {
            api,
            origin: origin.into(),
            _library: None,
        })
    }

    /// The process-wide table, loaded on first use from
    /// [`LoaderConfig::from_env`].
    pub fn global() -> Result<&'static GLib> {
        if let Some(lib) = GLOBAL.get() {
            return Ok(lib);
        }
        let lib = Self::load(&LoaderConfig::from_env()?)?;
        // A concurrent caller may have won the race; its table is kept and
        // ours is dropped, which only lowers the loader's own refcount.
        Ok(GLOBAL.get_or_init(|| lib))
    }

    /// Promote this table to `'static`. The library is never unloaded.
    pub fn leak(self) -> &'static GLib {
        Box::leak(Box::new(self))
    }

    /// Where the entry points came from.
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

impl Deref for GLib {
    type Target = Api;

    fn deref(&self) -> &Api {
        &self.api
    }
}

impl std::fmt::Debug for GLib {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GLib").field("origin", &self.origin).finish()
    }
}
