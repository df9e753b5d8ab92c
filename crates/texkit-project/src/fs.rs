//! File system seam.
//!
//! Scaffolding only needs four primitives: create a directory, resolve it
//! afterwards, create a file and overwrite a file. They sit behind the
//! [`FileSystem`] trait so tests can simulate a stale view or an unwritable
//! path without touching permissions on the real disk.

use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A directory that has been resolved on the file system.
///
/// Callers get one from [`FileSystem::find_dir`]. Holding one means the
/// directory existed when it was looked up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DirHandle {
    path: PathBuf,
}

impl DirHandle {
    /// Builds a handle for an already resolved path.
    ///
    /// Meant for implementations of [`FileSystem::find_dir`], after they have
    /// confirmed the directory exists. Nothing checks `path` here.
    pub fn resolved(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub trait FileSystem: Send + Sync + std::fmt::Debug {
    /// Creates `path` and any missing parents. Succeeds if it already exists.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Refreshes the view of `path` and resolves it to a directory handle.
    /// Returns `None` if it cannot be found.
    fn find_dir(&self, path: &Path) -> Option<DirHandle>;

    /// Creates an empty file at `path` unless one already exists.
    fn create_file(&self, path: &Path) -> io::Result<()>;

    /// Replaces the whole content of `path` with `contents`.
    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn find_dir(&self, path: &Path) -> Option<DirHandle> {
        let resolved = std::fs::canonicalize(path).ok()?;
        resolved.is_dir().then(|| DirHandle::resolved(resolved))
    }

    fn create_file(&self, path: &Path) -> io::Result<()> {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map(drop)
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        // The handle is closed when it drops, on success and on error alike.
        let mut file = File::create(path)?;
        file.write_all(contents)?;
        file.flush()
    }
}
