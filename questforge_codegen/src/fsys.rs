//! File-system seam used by the orchestrator.
//!
//! [`RealFs`] is the production implementation. [`MemoryFs`] keeps everything
//! in maps so cleanup and retry behavior can be tested without touching disk.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use walkdir::WalkDir;

/// The file operations a generation run needs.
pub trait FileSystem {
    fn is_file(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
    fn remove_file(&self, path: &Path) -> io::Result<()>;
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64>;

    /// Files directly inside `dir` (not recursive) with the given extension.
    /// A missing directory yields an empty list.
    fn list_files(&self, dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>>;

    /// Best-effort canonical form, used to detect copies onto themselves.
    fn canonical(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

/// The host file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl FileSystem for RealFs {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        fs::copy(from, to)
    }

    fn list_files(&self, dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(io::Error::other)?;
            if entry.file_type().is_file() && has_extension(entry.path(), extension) {
                out.push(entry.into_path());
            }
        }
        Ok(out)
    }

    fn canonical(&self, path: &Path) -> PathBuf {
        fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    }
}

/// In-memory file system with failure injection for copies.
#[derive(Debug, Default)]
pub struct MemoryFs {
    files: RefCell<BTreeMap<PathBuf, Vec<u8>>>,
    dirs: RefCell<BTreeSet<PathBuf>>,
    copy_failures: RefCell<HashMap<PathBuf, usize>>,
    writes: RefCell<Vec<PathBuf>>,
    sleeps: RefCell<Vec<Duration>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file (and its parent directories) without recording a write.
    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        let path = path.into();
        self.add_parents(&path);
        self.files.borrow_mut().insert(path, contents.into());
    }

    /// Make the next `times` copies onto `dest` fail with a sharing violation.
    pub fn fail_copies_to(&self, dest: impl Into<PathBuf>, times: usize) {
        self.copy_failures.borrow_mut().insert(dest.into(), times);
    }

    pub fn contents(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.borrow().get(path).cloned()
    }

    pub fn text(&self, path: &Path) -> Option<String> {
        self.contents(path).and_then(|b| String::from_utf8(b).ok())
    }

    /// Every path written through [`FileSystem::write`] or [`FileSystem::copy`], in order.
    pub fn writes(&self) -> Vec<PathBuf> {
        self.writes.borrow().clone()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }

    fn add_parents(&self, path: &Path) {
        let mut dirs = self.dirs.borrow_mut();
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            dirs.insert(ancestor.to_path_buf());
        }
    }
}

impl FileSystem for MemoryFs {
    fn is_file(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.dirs.borrow_mut().insert(path.to_path_buf());
        self.add_parents(path);
        Ok(())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display())))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.add_parents(path);
        self.files.borrow_mut().insert(path.to_path_buf(), contents.to_vec());
        self.writes.borrow_mut().push(path.to_path_buf());
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.files
            .borrow_mut()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display())))
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        if let Some(remaining) = self.copy_failures.borrow_mut().get_mut(to)
            && *remaining > 0
        {
            *remaining -= 1;
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is locked by another process", to.display()),
            ));
        }
        let data = self.read(from)?;
        let len = data.len() as u64;
        self.write(to, &data)?;
        Ok(len)
    }

    fn list_files(&self, dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
        Ok(self
            .files
            .borrow()
            .keys()
            .filter(|p| p.parent() == Some(dir) && has_extension(p, extension))
            .cloned()
            .collect())
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }
}
