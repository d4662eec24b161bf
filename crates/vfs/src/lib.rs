//! urivfs: a URI-routed virtual filesystem facade.
//!
//! A [`Context`] holds configuration and a scheme → backend registry
//! (`file://` and `mem://` are built in). A [`Vfs`] facade dispatches
//! bucket-, directory- and file-level operations to the backend named by
//! each URI's scheme; a [`FileHandle`] is one open file stream with
//! read/write/flush/close forwarding. Everything is synchronous and
//! blocking, and every backend failure surfaces as a [`VfsError`] carrying
//! the backend's own message.
//!
//! ```
//! use urivfs::{Context, Mode, Vfs};
//!
//! let ctx = Context::new();
//! let vfs = Vfs::new(&ctx);
//!
//! vfs.create_dir("mem://scratch").unwrap();
//! let mut fh = vfs.open("mem://scratch/hello.txt", Mode::Write).unwrap();
//! fh.write(b"hello").unwrap();
//! fh.flush().unwrap();
//! fh.close().unwrap();
//!
//! assert_eq!(vfs.file_size("mem://scratch/hello.txt").unwrap(), 5);
//! ```

pub mod backend;
pub mod config;
pub mod context;
pub mod error;
pub mod handle;
pub mod io;
pub mod local;
pub mod memory;
pub mod uri;
pub mod vfs;

pub use backend::{Mode, RawFile, VfsBackend};
pub use config::Config;
pub use context::Context;
pub use error::{Result, VfsError};
pub use handle::FileHandle;
pub use io::VfsFile;
pub use local::LocalFs;
pub use memory::MemoryFs;
pub use uri::Uri;
pub use vfs::Vfs;
