//! Loader configuration.
//!
//! Decides which shared object provides the native entry points. Values come
//! from built-in per-platform defaults, JSON, a JSON file, or the
//! environment.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Explicit path to the shared object. Wins over every candidate.
pub const LIBRARY_PATH_ENV: &str = "GBIND_GLIB_PATH";
/// Inline JSON configuration, parsed with [`LoaderConfig::from_json`].
pub const CONFIG_ENV: &str = "GBIND_CONFIG";

/// Where to find the native library.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoaderConfig {
    /// Explicit path to the shared object.
    #[serde(default)]
    pub library_path: Option<PathBuf>,
    /// Library names handed to the system loader, tried in order.
    #[serde(default = "default_candidates")]
    pub candidates: Vec<String>,
}

fn default_candidates() -> Vec<String> {
    let names: &[&str] = if cfg!(target_os = "macos") {
        &["libglib-2.0.0.dylib", "libglib-2.0.dylib"]
    } else if cfg!(windows) {
        &["glib-2.0-0.dll", "libglib-2.0-0.dll"]
    } else {
        &["libglib-2.0.so.0", "libglib-2.0.so"]
    };
    names.iter().map(|s| s.to_string()).collect()
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            library_path: None,
            candidates: default_candidates(),
        }
    }
}

impl LoaderConfig {
    /// Parse a configuration from JSON.
    ///
    /// ```json
    /// { "library_path": "/opt/glib/lib/libglib-2.0.so.0" }
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Build a configuration from the environment.
    ///
    /// `GBIND_CONFIG` (JSON) is parsed first, then `GBIND_GLIB_PATH`
    /// overrides `library_path`. The path is taken as-is, UTF-8 or not.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let json = lookup(CONFIG_ENV).and_then(|value| match value.into_string() {
            Ok(json) => Some(json),
            Err(_) => {
                log::warn!("ignoring {CONFIG_ENV}: not valid UTF-8");
                None
            }
        });
        let mut config = match json {
            Some(json) if !json.trim().is_empty() => Self::from_json(&json)?,
            _ => Self::default(),
        };
        if let Some(path) = lookup(LIBRARY_PATH_ENV).filter(|p| !p.is_empty()) {
            config.library_path = Some(PathBuf::from(path));
        }
        Ok(config)
    }

    /// Everything the loader will try, in order.
    pub fn search_order(&self) -> Vec<PathBuf> {
        self.library_path
            .iter()
            .cloned()
            .chain(self.candidates.iter().map(PathBuf::from))
            .collect()
    }
}
