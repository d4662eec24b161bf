//! The backend seam: the traits a storage backend implements.
//!
//! Backends speak plain `io::Result`; the facade attaches operation and URI
//! context when surfacing failures. Every call is synchronous and blocks the
//! caller until the backend round-trip completes — there is no queuing and
//! no retry at this layer.
//!
//! Default implementations return "not supported" for optional operations,
//! allowing backends to implement only what they support (bucket operations
//! only make sense for object-store-like backends, for example).

use std::fmt;
use std::io;

use crate::error::unsupported;

/// Open mode for a file handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Open an existing file for reading.
    Read,
    /// Create or truncate, then write.
    Write,
    /// Create if absent, writes go to the end.
    Append,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
            Self::Append => write!(f, "append"),
        }
    }
}

/// One open file inside a backend.
///
/// `FileHandle` owns exactly one of these and forwards read/write/flush to
/// it. Dropping the object releases the backend resource; buffered writes
/// that were never flushed may be lost, so callers should close handles
/// explicitly.
pub trait RawFile: Send {
    /// Fill `buf` exactly, starting at `offset`.
    ///
    /// A short read is an error: reading past the end of the file fails with
    /// `UnexpectedEof` rather than returning fewer bytes.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()>;

    /// Append `buf` to the write stream in full.
    fn write(&mut self, buf: &[u8]) -> io::Result<()>;

    /// Durably persist outstanding writes.
    fn sync(&mut self) -> io::Result<()>;
}

impl fmt::Debug for dyn VfsBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VfsBackend")
    }
}

/// VFS backend trait - all storage operations go through this.
///
/// Paths are backend-interpreted, always with a leading `/` (the facade
/// strips the `scheme://` prefix before dispatch). `ls` returns full child
/// paths in the backend namespace; the facade turns them back into URIs.
pub trait VfsBackend: Send + Sync {
    /// True if a file exists at `path`.
    fn is_file(&self, path: &str) -> io::Result<bool>;

    /// True if a directory exists at `path`.
    fn is_dir(&self, path: &str) -> io::Result<bool>;

    /// Size of the file at `path` in bytes.
    fn file_size(&self, path: &str) -> io::Result<u64>;

    /// Remove the file at `path`.
    fn remove_file(&self, path: &str) -> io::Result<()>;

    /// Create a directory (and parents if the backend needs them).
    fn create_dir(&self, path: &str) -> io::Result<()>;

    /// Remove the directory at `path` and everything under it.
    fn remove_dir(&self, path: &str) -> io::Result<()>;

    /// List child paths of `path` (full backend paths, one level deep).
    fn ls(&self, path: &str) -> io::Result<Vec<String>>;

    /// Create an empty file at `path` if absent; no-op if present.
    fn touch(&self, path: &str) -> io::Result<()>;

    /// Open a file at `path` in `mode`.
    fn open(&self, path: &str, mode: Mode) -> io::Result<Box<dyn RawFile>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Optional operations with default implementations
    // ─────────────────────────────────────────────────────────────────────────

    /// Total bytes stored under the directory at `path`, recursively.
    fn dir_size(&self, _path: &str) -> io::Result<u64> {
        Err(unsupported("dir_size"))
    }

    /// Move (rename) a directory. Fails if the destination exists.
    fn move_dir(&self, _src: &str, _dst: &str) -> io::Result<()> {
        Err(unsupported("move_dir"))
    }

    /// Copy a directory recursively. Fails if the destination exists.
    fn copy_dir(&self, _src: &str, _dst: &str) -> io::Result<()> {
        Err(unsupported("copy_dir"))
    }

    /// Move (rename) a file. Fails if the destination exists.
    fn move_file(&self, _src: &str, _dst: &str) -> io::Result<()> {
        Err(unsupported("move_file"))
    }

    /// Copy a file. Fails if the destination exists.
    fn copy_file(&self, _src: &str, _dst: &str) -> io::Result<()> {
        Err(unsupported("copy_file"))
    }

    // Bucket operations. Backends without a bucket concept may map buckets
    // to top-level directories or leave these unsupported.

    /// Create a bucket.
    fn create_bucket(&self, _path: &str) -> io::Result<()> {
        Err(unsupported("create_bucket"))
    }

    /// Remove a bucket and its contents.
    fn remove_bucket(&self, _path: &str) -> io::Result<()> {
        Err(unsupported("remove_bucket"))
    }

    /// True if a bucket exists at `path`.
    fn is_bucket(&self, _path: &str) -> io::Result<bool> {
        Err(unsupported("is_bucket"))
    }

    /// Remove all objects in a bucket, keeping the bucket itself.
    fn empty_bucket(&self, _path: &str) -> io::Result<()> {
        Err(unsupported("empty_bucket"))
    }

    /// True if the bucket at `path` holds no objects.
    fn is_empty_bucket(&self, _path: &str) -> io::Result<bool> {
        Err(unsupported("is_empty_bucket"))
    }
}
