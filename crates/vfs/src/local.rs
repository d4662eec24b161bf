//! Local filesystem backend - maps `file://` URIs to the real filesystem.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Component, Path, PathBuf};

use crate::backend::{Mode, RawFile, VfsBackend};

/// Local filesystem backend, rooted at a directory.
///
/// Backend paths resolve relative to the root. Buckets map to plain
/// directories. The default `file://` backend is rooted at `/`, so URIs name
/// absolute paths; tests root it at a tempdir.
pub struct LocalFs {
    root: PathBuf,
}

impl LocalFs {
    /// Create new local FS backend with specified root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root_path = root.into();
        // Ensure root exists and canonicalize it
        let _ = fs::create_dir_all(&root_path);
        Self {
            root: root_path.canonicalize().unwrap_or(root_path),
        }
    }

    /// Resolve a backend path to an absolute filesystem path.
    ///
    /// SECURITY: `..` components are rejected outright, so the lexical join
    /// cannot escape the sandbox root.
    fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        let rel = path.trim_start_matches('/');
        let has_parent_component = Path::new(rel)
            .components()
            .any(|c| matches!(c, Component::ParentDir));
        if has_parent_component {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!(
                    "path traversal blocked: {path} escapes sandbox {}",
                    self.root.display()
                ),
            ));
        }
        Ok(self.root.join(rel))
    }

    /// Backend path (leading `/`, root-relative) for a resolved child entry.
    fn backend_path(&self, abs: &Path) -> String {
        let rel = abs.strip_prefix(&self.root).unwrap_or(abs);
        format!("/{}", rel.display())
    }

    fn walk_size(dir: &Path) -> io::Result<u64> {
        let mut total = 0;
        let mut stack = vec![dir.to_path_buf()];
        while let Some(current) = stack.pop() {
            for entry in fs::read_dir(&current)? {
                let entry = entry?;
                let meta = entry.metadata()?;
                if meta.is_dir() {
                    stack.push(entry.path());
                } else {
                    total += meta.len();
                }
            }
        }
        Ok(total)
    }

    fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
        fs::create_dir_all(dst)?;
        for entry in fs::read_dir(src)? {
            let entry = entry?;
            let target = dst.join(entry.file_name());
            if entry.metadata()?.is_dir() {
                Self::copy_tree(&entry.path(), &target)?;
            } else {
                fs::copy(entry.path(), target)?;
            }
        }
        Ok(())
    }

    fn check_dest_free(dst: &Path) -> io::Result<()> {
        if dst.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("destination already exists: {}", dst.display()),
            ));
        }
        Ok(())
    }
}

impl VfsBackend for LocalFs {
    fn is_file(&self, path: &str) -> io::Result<bool> {
        Ok(self.resolve(path)?.is_file())
    }

    fn is_dir(&self, path: &str) -> io::Result<bool> {
        Ok(self.resolve(path)?.is_dir())
    }

    fn file_size(&self, path: &str) -> io::Result<u64> {
        let meta = fs::metadata(self.resolve(path)?)?;
        if !meta.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a file: {path}"),
            ));
        }
        Ok(meta.len())
    }

    fn remove_file(&self, path: &str) -> io::Result<()> {
        fs::remove_file(self.resolve(path)?)
    }

    fn create_dir(&self, path: &str) -> io::Result<()> {
        fs::create_dir_all(self.resolve(path)?)
    }

    fn remove_dir(&self, path: &str) -> io::Result<()> {
        fs::remove_dir_all(self.resolve(path)?)
    }

    fn ls(&self, path: &str) -> io::Result<Vec<String>> {
        let resolved = self.resolve(path)?;
        let mut children = Vec::new();
        for entry in fs::read_dir(resolved)? {
            let entry = entry?;
            children.push(self.backend_path(&entry.path()));
        }
        children.sort();
        Ok(children)
    }

    fn touch(&self, path: &str) -> io::Result<()> {
        // Append mode: creates if absent, leaves existing contents alone
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.resolve(path)?)?;
        Ok(())
    }

    fn open(&self, path: &str, mode: Mode) -> io::Result<Box<dyn RawFile>> {
        let resolved = self.resolve(path)?;
        let file = match mode {
            Mode::Read => File::open(resolved)?,
            Mode::Write => OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(resolved)?,
            Mode::Append => OpenOptions::new().create(true).append(true).open(resolved)?,
        };
        Ok(Box::new(LocalRawFile { file }))
    }

    fn dir_size(&self, path: &str) -> io::Result<u64> {
        Self::walk_size(&self.resolve(path)?)
    }

    fn move_dir(&self, src: &str, dst: &str) -> io::Result<()> {
        let dst = self.resolve(dst)?;
        Self::check_dest_free(&dst)?;
        fs::rename(self.resolve(src)?, dst)
    }

    fn copy_dir(&self, src: &str, dst: &str) -> io::Result<()> {
        let dst = self.resolve(dst)?;
        Self::check_dest_free(&dst)?;
        Self::copy_tree(&self.resolve(src)?, &dst)
    }

    fn move_file(&self, src: &str, dst: &str) -> io::Result<()> {
        let dst = self.resolve(dst)?;
        Self::check_dest_free(&dst)?;
        fs::rename(self.resolve(src)?, dst)
    }

    fn copy_file(&self, src: &str, dst: &str) -> io::Result<()> {
        let dst = self.resolve(dst)?;
        Self::check_dest_free(&dst)?;
        fs::copy(self.resolve(src)?, dst)?;
        Ok(())
    }

    // Buckets are plain directories on a local filesystem

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
        let resolved = self.resolve(path)?;
        for entry in fs::read_dir(resolved)? {
            let entry = entry?;
            if entry.metadata()?.is_dir() {
                fs::remove_dir_all(entry.path())?;
            } else {
                fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }

    fn is_empty_bucket(&self, path: &str) -> io::Result<bool> {
        Ok(fs::read_dir(self.resolve(path)?)?.next().is_none())
    }
}

/// Open local file behind a `FileHandle`.
struct LocalRawFile {
    file: File,
}

impl RawFile for LocalRawFile {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<()> {
        self.file.write_all(buf)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.file.sync_all()
    }
}
