//! In-memory filesystem backend for testing
//!
//! Provides a fast, ephemeral backend that exists only in memory. Useful for
//! exercising the facade and file handles without disk I/O. All data is lost
//! when the last handle to the backend is dropped.

use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, RwLock};

use crate::backend::{Mode, RawFile, VfsBackend};

/// In-memory entry
#[derive(Clone, Debug)]
enum MemoryEntry {
    File(Vec<u8>),
    Directory,
}

type Entries = Arc<RwLock<BTreeMap<String, MemoryEntry>>>;

/// In-memory filesystem backend
///
/// Thread-safe via internal RwLock. Buckets are directories; `touch` creates
/// empty files; writes through a raw file buffer locally and commit to the
/// shared map on sync.
pub struct MemoryFs {
    entries: Entries,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> io::Error {
    io::Error::other("lock poisoned")
}

fn not_found(path: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("not found: {path}"))
}

impl MemoryFs {
    /// Create a new empty in-memory filesystem
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        // Root always exists
        entries.insert("/".to_string(), MemoryEntry::Directory);
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// Normalize path (ensure leading /, no trailing /)
    fn normalize(path: &str) -> String {
        let path = path.trim();
        if path.is_empty() || path == "/" {
            return "/".to_string();
        }
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        path.trim_end_matches('/').to_string()
    }

    /// Insert missing ancestor directories of `path`.
    fn ensure_parents(entries: &mut BTreeMap<String, MemoryEntry>, path: &str) {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut current = String::new();
        for part in &parts[..parts.len().saturating_sub(1)] {
            current = format!("{current}/{part}");
            entries
                .entry(current.clone())
                .or_insert(MemoryEntry::Directory);
        }
    }

    fn child_prefix(path: &str) -> String {
        if path == "/" {
            "/".to_string()
        } else {
            format!("{path}/")
        }
    }

    fn commit(entries: &Entries, path: &str, data: Vec<u8>) -> io::Result<()> {
        let mut entries = entries.write().map_err(|_| poisoned())?;
        Self::ensure_parents(&mut entries, path);
        entries.insert(path.to_string(), MemoryEntry::File(data));
        Ok(())
    }
}

impl VfsBackend for MemoryFs {
    fn is_file(&self, path: &str) -> io::Result<bool> {
        let path = Self::normalize(path);
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(matches!(entries.get(&path), Some(MemoryEntry::File(_))))
    }

    fn is_dir(&self, path: &str) -> io::Result<bool> {
        let path = Self::normalize(path);
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(matches!(entries.get(&path), Some(MemoryEntry::Directory)))
    }

    fn file_size(&self, path: &str) -> io::Result<u64> {
        let path = Self::normalize(path);
        let entries = self.entries.read().map_err(|_| poisoned())?;
        match entries.get(&path) {
            Some(MemoryEntry::File(data)) => Ok(data.len() as u64),
            Some(MemoryEntry::Directory) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a file: {path}"),
            )),
            None => Err(not_found(&path)),
        }
    }

    fn remove_file(&self, path: &str) -> io::Result<()> {
        let path = Self::normalize(path);
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        match entries.get(&path) {
            Some(MemoryEntry::File(_)) => {
                entries.remove(&path);
                Ok(())
            }
            Some(MemoryEntry::Directory) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a file: {path}"),
            )),
            None => Err(not_found(&path)),
        }
    }

    fn create_dir(&self, path: &str) -> io::Result<()> {
        let path = Self::normalize(path);
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        if let Some(MemoryEntry::File(_)) = entries.get(&path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("a file exists at {path}"),
            ));
        }
        Self::ensure_parents(&mut entries, &path);
        entries.insert(path, MemoryEntry::Directory);
        Ok(())
    }

    fn remove_dir(&self, path: &str) -> io::Result<()> {
        let path = Self::normalize(path);
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        match entries.get(&path) {
            Some(MemoryEntry::Directory) => {}
            Some(MemoryEntry::File(_)) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("not a directory: {path}"),
                ))
            }
            None => return Err(not_found(&path)),
        }
        let prefix = Self::child_prefix(&path);
        entries.retain(|key, _| key != &path && !key.starts_with(&prefix));
        Ok(())
    }

    fn ls(&self, path: &str) -> io::Result<Vec<String>> {
        let path = Self::normalize(path);
        let entries = self.entries.read().map_err(|_| poisoned())?;
        match entries.get(&path) {
            Some(MemoryEntry::Directory) => {}
            Some(MemoryEntry::File(_)) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("not a directory: {path}"),
                ))
            }
            None => return Err(not_found(&path)),
        }

        let prefix = Self::child_prefix(&path);
        let mut children = Vec::new();
        for key in entries.keys() {
            if let Some(remainder) = key.strip_prefix(&prefix) {
                // Only direct children (no / in remainder)
                if !remainder.is_empty() && !remainder.contains('/') {
                    children.push(key.clone());
                }
            }
        }
        Ok(children)
    }

    fn touch(&self, path: &str) -> io::Result<()> {
        let path = Self::normalize(path);
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        if let Some(MemoryEntry::Directory) = entries.get(&path) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("a directory exists at {path}"),
            ));
        }
        Self::ensure_parents(&mut entries, &path);
        entries.entry(path).or_insert(MemoryEntry::File(Vec::new()));
        Ok(())
    }

    fn open(&self, path: &str, mode: Mode) -> io::Result<Box<dyn RawFile>> {
        let path = Self::normalize(path);
        let entries = self.entries.read().map_err(|_| poisoned())?;
        let existing = match entries.get(&path) {
            Some(MemoryEntry::File(data)) => Some(data.clone()),
            Some(MemoryEntry::Directory) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("cannot open directory: {path}"),
                ))
            }
            None => None,
        };
        drop(entries);

        let data = match (mode, existing) {
            (Mode::Read, Some(data)) => data,
            (Mode::Read, None) => return Err(not_found(&path)),
            (Mode::Write, _) => Vec::new(),
            (Mode::Append, existing) => existing.unwrap_or_default(),
        };

        // Write/Append handles materialize the entry immediately so the file
        // becomes visible at open, matching the local backend
        if mode != Mode::Read {
            Self::commit(&self.entries, &path, data.clone())?;
        }

        Ok(Box::new(MemoryRawFile {
            path,
            entries: self.entries.clone(),
            data,
            mode,
            dirty: false,
        }))
    }

    fn dir_size(&self, path: &str) -> io::Result<u64> {
        let path = Self::normalize(path);
        let entries = self.entries.read().map_err(|_| poisoned())?;
        if !matches!(entries.get(&path), Some(MemoryEntry::Directory)) {
            return Err(not_found(&path));
        }
        let prefix = Self::child_prefix(&path);
        let total = entries
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .map(|(_, entry)| match entry {
                MemoryEntry::File(data) => data.len() as u64,
                MemoryEntry::Directory => 0,
            })
            .sum();
        Ok(total)
    }

    fn move_dir(&self, src: &str, dst: &str) -> io::Result<()> {
        self.relocate(src, dst, true, true)
    }

    fn copy_dir(&self, src: &str, dst: &str) -> io::Result<()> {
        self.relocate(src, dst, true, false)
    }

    fn move_file(&self, src: &str, dst: &str) -> io::Result<()> {
        self.relocate(src, dst, false, true)
    }

    fn copy_file(&self, src: &str, dst: &str) -> io::Result<()> {
        self.relocate(src, dst, false, false)
    }

    fn create_bucket(&self, path: &str) -> io::Result<()> {
        self.create_dir(path)
    }

    fn remove_bucket(&self, path: &str) -> io::Result<()> {
        self.remove_dir(path)
    }

    fn is_bucket(&self, path: &str) -> io::Result<bool> {
        self.is_dir(path)
    }

    fn empty_bucket(&self, path: &str) -> io::Result<()> {
        let path = Self::normalize(path);
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        if !matches!(entries.get(&path), Some(MemoryEntry::Directory)) {
            return Err(not_found(&path));
        }
        let prefix = Self::child_prefix(&path);
        entries.retain(|key, _| !key.starts_with(&prefix));
        Ok(())
    }

    fn is_empty_bucket(&self, path: &str) -> io::Result<bool> {
        Ok(self.ls(path)?.is_empty())
    }
}

impl MemoryFs {
    /// Shared body of move/copy for files and directories.
    fn relocate(&self, src: &str, dst: &str, dir: bool, remove_src: bool) -> io::Result<()> {
        let src = Self::normalize(src);
        let dst = Self::normalize(dst);
        let mut entries = self.entries.write().map_err(|_| poisoned())?;

        match (entries.get(&src), dir) {
            (Some(MemoryEntry::Directory), true) | (Some(MemoryEntry::File(_)), false) => {}
            (Some(_), _) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("wrong entry kind: {src}"),
                ))
            }
            (None, _) => return Err(not_found(&src)),
        }
        if entries.contains_key(&dst) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("destination already exists: {dst}"),
            ));
        }

        let src_prefix = Self::child_prefix(&src);
        let moved: Vec<(String, MemoryEntry)> = entries
            .iter()
            .filter(|(key, _)| *key == &src || key.starts_with(&src_prefix))
            .map(|(key, entry)| {
                let suffix = &key[src.len()..];
                (format!("{dst}{suffix}"), entry.clone())
            })
            .collect();

        if remove_src {
            entries.retain(|key, _| key != &src && !key.starts_with(&src_prefix));
        }
        Self::ensure_parents(&mut entries, &dst);
        entries.extend(moved);
        Ok(())
    }
}

/// Open in-memory file. Reads serve from a snapshot taken at open; writes
/// buffer locally and commit to the shared map on sync.
struct MemoryRawFile {
    path: String,
    entries: Entries,
    data: Vec<u8>,
    mode: Mode,
    dirty: bool,
}

impl RawFile for MemoryRawFile {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        let start = usize::try_from(offset)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "offset out of range"))?;
        let end = start.checked_add(buf.len()).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "read range out of range")
        })?;
        if end > self.data.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "read past end of file: {} of {} bytes",
                    end,
                    self.data.len()
                ),
            ));
        }
        buf.copy_from_slice(&self.data[start..end]);
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<()> {
        if self.mode == Mode::Read {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "handle not opened for writing",
            ));
        }
        self.data.extend_from_slice(buf);
        self.dirty = true;
        Ok(())
    }

    fn sync(&mut self) -> io::Result<()> {
        if self.dirty {
            MemoryFs::commit(&self.entries, &self.path, self.data.clone())?;
            self.dirty = false;
        }
        Ok(())
    }
}
