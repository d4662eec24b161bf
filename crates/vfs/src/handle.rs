//! File handles: one open backend file stream and its lifecycle.

use tracing::debug;

use crate::backend::{Mode, RawFile};
use crate::context::Context;
use crate::error::{Result, VfsError};
use crate::uri::Uri;
use crate::vfs::Vfs;

/// One open file stream.
///
/// Construction performs the backend open and fails if the target cannot be
/// opened in the requested mode. The handle moves one way, `Open → Closed`;
/// after [`close`](Self::close) every operation except `close` and
/// [`closed`](Self::closed) fails.
///
/// The handle keeps its [`Context`] and [`Vfs`] alive for as long as it
/// lives. There is no implicit close on drop for durability purposes —
/// callers close explicitly on every exit path; unflushed writes on a
/// dropped handle may be lost by the backend.
pub struct FileHandle {
    ctx: Context,
    vfs: Vfs,
    uri: String,
    mode: Mode,
    /// `None` once closed.
    raw: Option<Box<dyn RawFile>>,
}

impl std::fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileHandle")
            .field("uri", &self.uri)
            .field("mode", &self.mode)
            .field("closed", &self.raw.is_none())
            .finish_non_exhaustive()
    }
}

impl FileHandle {
    /// Open `uri` in `mode` against the backend registered for its scheme.
    pub fn new(ctx: &Context, vfs: &Vfs, uri: &str, mode: Mode) -> Result<Self> {
        let parsed = Uri::parse(uri)?;
        let backend = ctx.backend(parsed.scheme())?;
        let raw = backend.open(parsed.path(), mode).map_err(|e| VfsError::Open {
            uri: parsed.to_string(),
            mode,
            source: e,
        })?;
        debug!(uri = %parsed, %mode, "opened file handle");
        Ok(Self {
            ctx: ctx.clone(),
            vfs: vfs.clone(),
            uri: parsed.to_string(),
            mode,
            raw: Some(raw),
        })
    }

    /// The context this handle is bound to.
    pub fn ctx(&self) -> &Context {
        &self.ctx
    }

    /// The facade this handle was opened through.
    pub fn vfs(&self) -> &Vfs {
        &self.vfs
    }

    /// The handle's URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The mode the handle was opened in.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    fn raw(&mut self, op: &'static str) -> Result<&mut Box<dyn RawFile>> {
        self.raw.as_mut().ok_or_else(|| VfsError::HandleClosed {
            op,
            uri: self.uri.clone(),
        })
    }

    /// Read exactly `nbytes` bytes starting at `offset`.
    ///
    /// Short reads are an error: reading past the end of the file fails
    /// rather than returning fewer bytes (both built-in backends pin this).
    pub fn read(&mut self, offset: u64, nbytes: u64) -> Result<Vec<u8>> {
        let uri = self.uri.clone();
        let raw = self.raw("read")?;
        let len = usize::try_from(nbytes).map_err(|_| VfsError::Read {
            uri: uri.clone(),
            offset,
            nbytes,
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "requested length exceeds addressable memory",
            ),
        })?;
        let mut buf = vec![0u8; len];
        raw.read_at(offset, &mut buf).map_err(|e| VfsError::Read {
            uri,
            offset,
            nbytes,
            source: e,
        })?;
        Ok(buf)
    }

    /// Write the full extent of `buf` to the stream.
    pub fn write(&mut self, buf: &[u8]) -> Result<()> {
        let uri = self.uri.clone();
        let raw = self.raw("write")?;
        raw.write(buf).map_err(|e| VfsError::Write {
            uri,
            nbytes: buf.len() as u64,
            source: e,
        })
    }

    /// Durably persist outstanding writes.
    pub fn flush(&mut self) -> Result<()> {
        let uri = self.uri.clone();
        let raw = self.raw("flush")?;
        raw.sync().map_err(|e| VfsError::Flush { uri, source: e })
    }

    /// Close the handle, flushing outstanding writes first.
    ///
    /// Idempotent: closing an already-closed handle is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut raw) = self.raw.take() {
            if self.mode != Mode::Read {
                raw.sync().map_err(|e| VfsError::Flush {
                    uri: self.uri.clone(),
                    source: e,
                })?;
            }
            debug!(uri = %self.uri, "closed file handle");
        }
        Ok(())
    }

    /// Current state; always safe to call.
    pub fn closed(&self) -> bool {
        self.raw.is_none()
    }
}
