//! `std::io` adapter over a [`FileHandle`].
//!
//! [`VfsFile`] tracks a cursor and the known file length so VFS files plug
//! into anything that takes `Read`/`Write`/`Seek`. Reads clamp to the end of
//! the file instead of erroring (the raw handle's exact-read contract stays
//! available through [`FileHandle::read`]).

use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::backend::Mode;
use crate::config::DEFAULT_CHUNK_SIZE;
use crate::error::Result;
use crate::handle::FileHandle;
use crate::vfs::Vfs;

/// Buffered cursor-style file over a [`FileHandle`].
pub struct VfsFile {
    handle: FileHandle,
    offset: u64,
    nbytes: u64,
    /// Upper bound on a single backend read round-trip
    /// (`vfs.io.chunk_size`).
    chunk_size: u64,
}

fn to_io(e: crate::error::VfsError) -> io::Error {
    io::Error::other(e)
}

impl VfsFile {
    /// Open `uri` through `vfs` in `mode`.
    ///
    /// Read and Append modes pick up the current file size so seeks and
    /// relative reads know where the end is.
    pub fn open(vfs: &Vfs, uri: &str, mode: Mode) -> Result<Self> {
        let handle = vfs.open(uri, mode)?;
        let nbytes = match mode {
            Mode::Read => vfs.file_size(uri)?,
            Mode::Append => vfs.file_size(uri).unwrap_or(0),
            Mode::Write => 0,
        };
        let chunk_size = vfs
            .config()
            .get_u64("vfs.io.chunk_size")
            .unwrap_or(DEFAULT_CHUNK_SIZE)
            .max(1);
        let offset = if mode == Mode::Append { nbytes } else { 0 };
        Ok(Self {
            handle,
            offset,
            nbytes,
            chunk_size,
        })
    }

    /// True if the file was opened for reading.
    pub fn readable(&self) -> bool {
        self.handle.mode() == Mode::Read
    }

    /// True if the file was opened for writing or appending.
    pub fn writable(&self) -> bool {
        self.handle.mode() != Mode::Read
    }

    /// Known length of the file in bytes.
    pub fn len(&self) -> u64 {
        self.nbytes
    }

    /// True if the file is empty.
    pub fn is_empty(&self) -> bool {
        self.nbytes == 0
    }

    /// Current cursor position.
    pub fn tell(&self) -> u64 {
        self.offset
    }

    /// Close the underlying handle (idempotent).
    pub fn close(&mut self) -> Result<()> {
        self.handle.close()
    }

    /// True once the underlying handle is closed.
    pub fn closed(&self) -> bool {
        self.handle.closed()
    }

    /// The underlying handle.
    pub fn handle(&self) -> &FileHandle {
        &self.handle
    }
}

impl Read for VfsFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.readable() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "cannot read from write-only VFS file",
            ));
        }
        let remaining = self.nbytes.saturating_sub(self.offset);
        let n = (buf.len() as u64).min(remaining).min(self.chunk_size);
        if n == 0 {
            return Ok(0);
        }
        let data = self.handle.read(self.offset, n).map_err(to_io)?;
        let n = data.len();
        buf[..n].copy_from_slice(&data);
        self.offset += n as u64;
        Ok(n)
    }
}

impl Write for VfsFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.writable() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "cannot write to read-only VFS file",
            ));
        }
        self.handle.write(buf).map_err(to_io)?;
        self.offset += buf.len() as u64;
        self.nbytes = self.nbytes.max(self.offset);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.handle.flush().map_err(to_io)
    }
}

impl Seek for VfsFile {
    /// Seeks clamp to `[0, len]` — the backend has no sparse-file story, so
    /// a cursor past the end would only manufacture read errors.
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => i128::from(offset),
            SeekFrom::Current(delta) => i128::from(self.offset) + i128::from(delta),
            SeekFrom::End(delta) => i128::from(self.nbytes) + i128::from(delta),
        };
        let clamped = target.clamp(0, i128::from(self.nbytes));
        // The clamp guarantees the value fits
        self.offset = u64::try_from(clamped).unwrap_or(0);
        Ok(self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;

    fn memory_vfs() -> Vfs {
        Vfs::new(&Context::new())
    }

    #[test]
    fn write_then_read_with_cursor() {
        let vfs = memory_vfs();

        let mut f = VfsFile::open(&vfs, "mem://d/f.bin", Mode::Write).unwrap();
        f.write_all(b"hello world").unwrap();
        f.flush().unwrap();
        assert_eq!(f.len(), 11);
        f.close().unwrap();

        let mut f = VfsFile::open(&vfs, "mem://d/f.bin", Mode::Read).unwrap();
        let mut out = String::new();
        f.read_to_string(&mut out).unwrap();
        assert_eq!(out, "hello world");
        assert_eq!(f.tell(), 11);
    }

    #[test]
    fn seek_clamps_to_extent() {
        let vfs = memory_vfs();
        let mut f = VfsFile::open(&vfs, "mem://s.bin", Mode::Write).unwrap();
        f.write_all(b"0123456789").unwrap();
        f.flush().unwrap();
        f.close().unwrap();

        let mut f = VfsFile::open(&vfs, "mem://s.bin", Mode::Read).unwrap();
        assert_eq!(f.seek(SeekFrom::End(-4)).unwrap(), 6);
        let mut tail = String::new();
        f.read_to_string(&mut tail).unwrap();
        assert_eq!(tail, "6789");

        // Past either end clamps rather than erroring
        assert_eq!(f.seek(SeekFrom::Current(-100)).unwrap(), 0);
        assert_eq!(f.seek(SeekFrom::Start(1000)).unwrap(), 10);
    }

    #[test]
    fn append_positions_cursor_at_end() {
        let vfs = memory_vfs();
        let mut f = VfsFile::open(&vfs, "mem://log", Mode::Write).unwrap();
        f.write_all(b"one").unwrap();
        f.flush().unwrap();
        f.close().unwrap();

        let mut f = VfsFile::open(&vfs, "mem://log", Mode::Append).unwrap();
        assert_eq!(f.tell(), 3);
        f.write_all(b"two").unwrap();
        f.flush().unwrap();
        f.close().unwrap();

        assert_eq!(vfs.file_size("mem://log").unwrap(), 6);
    }

    #[test]
    fn read_on_write_handle_refused() {
        let vfs = memory_vfs();
        let mut f = VfsFile::open(&vfs, "mem://w", Mode::Write).unwrap();
        let mut buf = [0u8; 4];
        assert!(f.read(&mut buf).is_err());
    }

    #[test]
    fn chunk_size_caps_round_trips() {
        let ctx = Context::new();
        let config = crate::config::Config::new().set("vfs.io.chunk_size", "4");
        let vfs = Vfs::with_config(&ctx, &config);

        let mut f = VfsFile::open(&vfs, "mem://big", Mode::Write).unwrap();
        f.write_all(b"abcdefghij").unwrap();
        f.flush().unwrap();
        f.close().unwrap();

        let mut f = VfsFile::open(&vfs, "mem://big", Mode::Read).unwrap();
        let mut buf = [0u8; 10];
        // One read call returns at most the configured chunk
        assert_eq!(f.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf[..4], b"abcd");
    }
}
