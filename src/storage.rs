//! File storage backend trait and the stock filesystem implementation.
//!
//! The [`StorageBackend`] trait is the seam between the crop lifecycle and
//! wherever derived files actually live. The registry and the image backend
//! only ever talk to storage through it, so tests run against an in-memory
//! mock and applications can plug in object stores without touching crop
//! logic.
//!
//! [`FsStorage`] is the shipped implementation: storage-relative paths are
//! resolved under a root directory, URLs against a base URL. Parent
//! directories are created on write; deleting a file that is already gone
//! succeeds, which keeps delete idempotent for retry paths.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("file not found in storage: {0}")]
    NotFound(String),
}

/// Backend for reading, writing and resolving storage-relative paths.
///
/// Paths use `/` separators and never start with one; the backend decides
/// what they resolve to on its medium.
pub trait StorageBackend: Send + Sync {
    /// Read the full contents of a stored file.
    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Write `bytes` to `path`, replacing any existing file.
    fn write(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Remove a stored file. Removing a missing file is not an error.
    fn delete(&self, path: &str) -> Result<(), StorageError>;

    /// Whether a file exists at `path`.
    fn exists(&self, path: &str) -> bool;

    /// Resolve `path` to a location on the backend's medium.
    fn path(&self, path: &str) -> PathBuf;

    /// Resolve `path` to a publicly addressable URL.
    fn url(&self, path: &str) -> String;
}

/// Local-filesystem storage rooted at a directory.
pub struct FsStorage {
    root: PathBuf,
    base_url: String,
}

impl FsStorage {
    /// `root` is where storage-relative paths land on disk; `base_url` is
    /// prepended (with a single `/`) for URL resolution.
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            root: root.into(),
            base_url,
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl StorageBackend for FsStorage {
    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        match std::fs::read(self.resolve(path)) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(full, bytes)?;
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.resolve(path)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }

    fn path(&self, path: &str) -> PathBuf {
        self.resolve(path)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}
