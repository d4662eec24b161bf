//! Shared execution context: base configuration plus the backend registry.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::backend::VfsBackend;
use crate::config::Config;
use crate::error::{Result, VfsError};
use crate::local::LocalFs;
use crate::memory::MemoryFs;

struct ContextInner {
    config: Config,
    /// Registered backends, scheme → backend
    backends: RwLock<HashMap<String, Arc<dyn VfsBackend>>>,
}

/// Shared configuration/execution handle required by every VFS operation.
///
/// Cheap to clone (`Arc` inner). Facades and file handles hold clones, so a
/// context always outlives the objects built from it. A fresh context
/// registers the two built-in backends: `file://` (local filesystem, rooted
/// at `/` unless `vfs.file.root` is set) and `mem://` (ephemeral, per
/// context).
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Create a context with an empty base config.
    pub fn new() -> Self {
        Self::with_config(Config::new())
    }

    /// Create a context with the given base config.
    pub fn with_config(config: Config) -> Self {
        let local_root = config.get("vfs.file.root").unwrap_or("/").to_string();

        let ctx = Self {
            inner: Arc::new(ContextInner {
                config,
                backends: RwLock::new(HashMap::new()),
            }),
        };
        ctx.register_backend("file", Arc::new(LocalFs::new(local_root)));
        ctx.register_backend("mem", Arc::new(MemoryFs::new()));
        ctx
    }

    /// The context's base configuration.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Register (or replace) a backend for a URI scheme.
    pub fn register_backend(&self, scheme: impl Into<String>, backend: Arc<dyn VfsBackend>) {
        let scheme = scheme.into();
        tracing::debug!(scheme = %scheme, "registering VFS backend");
        self.inner
            .backends
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(scheme, backend);
    }

    /// Look up the backend for a scheme.
    pub fn backend(&self, scheme: &str) -> Result<Arc<dyn VfsBackend>> {
        self.inner
            .backends
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(scheme)
            .cloned()
            .ok_or_else(|| VfsError::UnsupportedScheme {
                scheme: scheme.to_string(),
            })
    }

    /// True if a backend is registered for `scheme`.
    pub fn supports(&self, scheme: &str) -> bool {
        self.inner
            .backends
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .contains_key(scheme)
    }

    /// List registered schemes, sorted.
    pub fn schemes(&self) -> Vec<String> {
        let mut schemes: Vec<String> = self
            .inner
            .backends
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        schemes.sort();
        schemes
    }
}
