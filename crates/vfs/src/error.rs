//! Error types surfaced by the facade and file handles.
//!
//! Backends speak `std::io::Error`; the facade wraps every failure with the
//! operation name and URI so callers see which call failed and the backend's
//! own message. No retries, no recovery — every failure is fatal to the
//! calling operation.

use std::io;

use thiserror::Error;

use crate::backend::Mode;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, VfsError>;

/// Errors produced by VFS operations.
#[derive(Debug, Error)]
pub enum VfsError {
    /// Opening a file handle failed.
    #[error("cannot open `{uri}` in {mode} mode: {source}")]
    Open {
        uri: String,
        mode: Mode,
        #[source]
        source: io::Error,
    },

    /// A handle read failed (including short reads — the handle requests an
    /// exact byte count).
    #[error("read of {nbytes} bytes at offset {offset} from `{uri}` failed: {source}")]
    Read {
        uri: String,
        offset: u64,
        nbytes: u64,
        #[source]
        source: io::Error,
    },

    /// A handle write failed.
    #[error("write of {nbytes} bytes to `{uri}` failed: {source}")]
    Write {
        uri: String,
        nbytes: u64,
        #[source]
        source: io::Error,
    },

    /// Syncing outstanding writes failed.
    #[error("flush of `{uri}` failed: {source}")]
    Flush {
        uri: String,
        #[source]
        source: io::Error,
    },

    /// A bucket/directory/file management operation failed in the backend.
    #[error("{op} on `{uri}` failed: {source}")]
    Backend {
        op: &'static str,
        uri: String,
        #[source]
        source: io::Error,
    },

    /// The URI could not be parsed.
    #[error("invalid URI `{uri}`: {reason}")]
    InvalidUri { uri: String, reason: &'static str },

    /// No backend is registered for the URI's scheme.
    #[error("no backend registered for scheme `{scheme}://`")]
    UnsupportedScheme { scheme: String },

    /// Operation attempted on a closed file handle.
    #[error("{op} on closed handle for `{uri}`")]
    HandleClosed { op: &'static str, uri: String },
}

impl VfsError {
    /// Wrap a backend `io::Error` for a management operation.
    pub(crate) fn backend(op: &'static str, uri: impl Into<String>, source: io::Error) -> Self {
        Self::Backend {
            op,
            uri: uri.into(),
            source,
        }
    }
}

/// Backend helper for operations a backend does not implement.
///
/// Default trait bodies return this so partial backends can be registered
/// without stubbing every operation.
pub(crate) fn unsupported(op: &'static str) -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        format!("{op} not supported by this backend"),
    )
}
