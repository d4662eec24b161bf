//! Key/value configuration for contexts and facades.
//!
//! Reads config from ~/.config/urivfs/config.toml when asked; a `Config`
//! attached to a facade is an immutable overlay on top of the context's
//! base config.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, VfsError};

/// Chunk size used by `VfsFile` buffered copies when `vfs.io.chunk_size`
/// is not set (64KB).
pub const DEFAULT_CHUNK_SIZE: u64 = 64 * 1024;

/// Flat key/value configuration.
///
/// Keys are dotted strings (`vfs.file.root`, `vfs.io.chunk_size`); values are
/// strings with typed getters on top. Unknown keys are kept and ignored so
/// backend-specific settings can ride along.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    params: BTreeMap<String, String>,
}

impl Config {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, returning `self` for chaining.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Get a parameter as a string.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Get a parameter as an unsigned integer.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    /// Get a parameter as a boolean (`true`/`false`).
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    /// Overlay `other` on top of this config; `other`'s values win.
    pub fn merge(&self, other: &Self) -> Self {
        let mut params = self.params.clone();
        params.extend(other.params.clone());
        Self { params }
    }

    /// Iterate over all parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Default config path: `<config dir>/urivfs/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("urivfs")
            .join("config.toml")
    }

    /// Load from a TOML file. Tables flatten into dotted keys, so
    /// `[vfs.io] chunk_size = "65536"` becomes `vfs.io.chunk_size`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| VfsError::backend("config load", path.display().to_string(), e))?;
        let table: toml::Table = content.parse().map_err(|e: toml::de::Error| {
            VfsError::backend(
                "config parse",
                path.display().to_string(),
                std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()),
            )
        })?;

        let mut config = Self::new();
        flatten_table(&mut config.params, "", &table);
        Ok(config)
    }

    /// Load from the default path, falling back to an empty config.
    pub fn load() -> Self {
        Self::from_file(&Self::default_path()).unwrap_or_default()
    }
}

fn flatten_table(params: &mut BTreeMap<String, String>, prefix: &str, table: &toml::Table) {
    for (key, value) in table {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::Table(inner) => flatten_table(params, &full, inner),
            toml::Value::String(s) => {
                params.insert(full, s.clone());
            }
            other => {
                params.insert(full, other.to_string());
            }
        }
    }
}
