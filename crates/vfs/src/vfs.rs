//! The VFS facade: one host-callable method per backend primitive.
//!
//! Stateless dispatcher. Every call parses the URI, looks the backend up by
//! scheme and forwards — no retries, no caching, no session state. Failures
//! come back as [`VfsError`](crate::VfsError) values carrying the operation,
//! the URI and the backend's own message.

use std::sync::Arc;

use tracing::trace;

use crate::backend::{Mode, VfsBackend};
use crate::config::Config;
use crate::context::Context;
use crate::error::{Result, VfsError};
use crate::handle::FileHandle;
use crate::uri::Uri;

/// Filesystem-management dispatcher bound to a [`Context`].
///
/// Construction is cheap and a facade is freely clonable; clones share the
/// context. An optional [`Config`] overlays the context's base config and is
/// immutable once attached.
#[derive(Clone)]
pub struct Vfs {
    ctx: Context,
    config: Config,
}

impl Vfs {
    /// Create a facade using the context's base config.
    pub fn new(ctx: &Context) -> Self {
        Self {
            ctx: ctx.clone(),
            config: ctx.config().clone(),
        }
    }

    /// Create a facade with `config` overlaid on the context's base config.
    pub fn with_config(ctx: &Context, config: &Config) -> Self {
        Self {
            ctx: ctx.clone(),
            config: ctx.config().merge(config),
        }
    }

    /// The bound context.
    pub fn ctx(&self) -> &Context {
        &self.ctx
    }

    /// The effective (merged) config.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// True if a backend is registered for the given URI scheme.
    pub fn supports(&self, scheme: &str) -> bool {
        self.ctx.supports(scheme)
    }

    /// Open a file handle at `uri` in `mode`.
    pub fn open(&self, uri: &str, mode: Mode) -> Result<FileHandle> {
        FileHandle::new(&self.ctx, self, uri, mode)
    }

    fn route(&self, op: &'static str, uri: &str) -> Result<(Uri, Arc<dyn VfsBackend>)> {
        let uri = Uri::parse(uri)?;
        trace!(op, uri = %uri, "vfs dispatch");
        let backend = self.ctx.backend(uri.scheme())?;
        Ok((uri, backend))
    }

    /// Parse both URIs of a move/copy and require a common backend.
    fn route_pair(
        &self,
        op: &'static str,
        src: &str,
        dst: &str,
    ) -> Result<(Uri, Uri, Arc<dyn VfsBackend>)> {
        let (src, backend) = self.route(op, src)?;
        let dst = Uri::parse(dst)?;
        if src.scheme() != dst.scheme() {
            return Err(VfsError::InvalidUri {
                uri: dst.to_string(),
                reason: "source and destination schemes differ",
            });
        }
        Ok((src, dst, backend))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Bucket operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a bucket at `uri`.
    pub fn create_bucket(&self, uri: &str) -> Result<()> {
        let (uri, backend) = self.route("create_bucket", uri)?;
        backend
            .create_bucket(uri.path())
            .map_err(|e| VfsError::backend("create_bucket", uri.to_string(), e))
    }

    /// Remove the bucket at `uri` and its contents.
    pub fn remove_bucket(&self, uri: &str) -> Result<()> {
        let (uri, backend) = self.route("remove_bucket", uri)?;
        backend
            .remove_bucket(uri.path())
            .map_err(|e| VfsError::backend("remove_bucket", uri.to_string(), e))
    }

    /// True if a bucket exists at `uri`.
    pub fn is_bucket(&self, uri: &str) -> Result<bool> {
        let (uri, backend) = self.route("is_bucket", uri)?;
        backend
            .is_bucket(uri.path())
            .map_err(|e| VfsError::backend("is_bucket", uri.to_string(), e))
    }

    /// Remove every object in the bucket at `uri`, keeping the bucket.
    pub fn empty_bucket(&self, uri: &str) -> Result<()> {
        let (uri, backend) = self.route("empty_bucket", uri)?;
        backend
            .empty_bucket(uri.path())
            .map_err(|e| VfsError::backend("empty_bucket", uri.to_string(), e))
    }

    /// True if the bucket at `uri` holds no objects.
    pub fn is_empty_bucket(&self, uri: &str) -> Result<bool> {
        let (uri, backend) = self.route("is_empty_bucket", uri)?;
        backend
            .is_empty_bucket(uri.path())
            .map_err(|e| VfsError::backend("is_empty_bucket", uri.to_string(), e))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Directory operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a directory at `uri`.
    pub fn create_dir(&self, uri: &str) -> Result<()> {
        let (uri, backend) = self.route("create_dir", uri)?;
        backend
            .create_dir(uri.path())
            .map_err(|e| VfsError::backend("create_dir", uri.to_string(), e))
    }

    /// True if a directory exists at `uri`.
    pub fn is_dir(&self, uri: &str) -> Result<bool> {
        let (uri, backend) = self.route("is_dir", uri)?;
        backend
            .is_dir(uri.path())
            .map_err(|e| VfsError::backend("is_dir", uri.to_string(), e))
    }

    /// Remove the directory at `uri` and everything under it.
    pub fn remove_dir(&self, uri: &str) -> Result<()> {
        let (uri, backend) = self.route("remove_dir", uri)?;
        backend
            .remove_dir(uri.path())
            .map_err(|e| VfsError::backend("remove_dir", uri.to_string(), e))
    }

    /// Total bytes stored under the directory at `uri`, recursively.
    pub fn dir_size(&self, uri: &str) -> Result<u64> {
        let (uri, backend) = self.route("dir_size", uri)?;
        backend
            .dir_size(uri.path())
            .map_err(|e| VfsError::backend("dir_size", uri.to_string(), e))
    }

    /// Move a directory. Fails if the destination exists.
    pub fn move_dir(&self, src: &str, dst: &str) -> Result<()> {
        let (src, dst, backend) = self.route_pair("move_dir", src, dst)?;
        backend
            .move_dir(src.path(), dst.path())
            .map_err(|e| VfsError::backend("move_dir", src.to_string(), e))
    }

    /// Copy a directory recursively. Fails if the destination exists.
    pub fn copy_dir(&self, src: &str, dst: &str) -> Result<()> {
        let (src, dst, backend) = self.route_pair("copy_dir", src, dst)?;
        backend
            .copy_dir(src.path(), dst.path())
            .map_err(|e| VfsError::backend("copy_dir", src.to_string(), e))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // File operations
    // ─────────────────────────────────────────────────────────────────────────

    /// True if a file exists at `uri`.
    pub fn is_file(&self, uri: &str) -> Result<bool> {
        let (uri, backend) = self.route("is_file", uri)?;
        backend
            .is_file(uri.path())
            .map_err(|e| VfsError::backend("is_file", uri.to_string(), e))
    }

    /// Remove the file at `uri`.
    pub fn remove_file(&self, uri: &str) -> Result<()> {
        let (uri, backend) = self.route("remove_file", uri)?;
        backend
            .remove_file(uri.path())
            .map_err(|e| VfsError::backend("remove_file", uri.to_string(), e))
    }

    /// Size of the file at `uri` in bytes.
    pub fn file_size(&self, uri: &str) -> Result<u64> {
        let (uri, backend) = self.route("file_size", uri)?;
        backend
            .file_size(uri.path())
            .map_err(|e| VfsError::backend("file_size", uri.to_string(), e))
    }

    /// Move a file. Fails if the destination exists.
    pub fn move_file(&self, src: &str, dst: &str) -> Result<()> {
        let (src, dst, backend) = self.route_pair("move_file", src, dst)?;
        backend
            .move_file(src.path(), dst.path())
            .map_err(|e| VfsError::backend("move_file", src.to_string(), e))
    }

    /// Copy a file. Fails if the destination exists.
    pub fn copy_file(&self, src: &str, dst: &str) -> Result<()> {
        let (src, dst, backend) = self.route_pair("copy_file", src, dst)?;
        backend
            .copy_file(src.path(), dst.path())
            .map_err(|e| VfsError::backend("copy_file", src.to_string(), e))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Listing and touch
    // ─────────────────────────────────────────────────────────────────────────

    /// List child URIs of `uri`. Ordering and depth are backend-defined; the
    /// built-in backends return direct children, sorted.
    pub fn ls(&self, uri: &str) -> Result<Vec<String>> {
        let (uri, backend) = self.route("ls", uri)?;
        let children = backend
            .ls(uri.path())
            .map_err(|e| VfsError::backend("ls", uri.to_string(), e))?;
        Ok(children
            .iter()
            .map(|child| uri.sibling(child))
            .collect())
    }

    /// Create an empty file at `uri` if absent; no-op if one exists.
    pub fn touch(&self, uri: &str) -> Result<()> {
        let (uri, backend) = self.route("touch", uri)?;
        backend
            .touch(uri.path())
            .map_err(|e| VfsError::backend("touch", uri.to_string(), e))
    }
}
