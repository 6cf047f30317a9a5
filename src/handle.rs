//! Per-crop derived-file handle.
//!
//! A [`CropFile`] is bound to exactly one generated file and resolves its
//! path, URL and existence through the storage backend it was created with.
//! Handles are owned by the registry — one per crop name, always in step
//! with the metadata mapping.
//!
//! Deleting through a handle removes only that crop's file. It cannot touch
//! sibling crops or the metadata mapping, which lives in the registry;
//! callers should normally go through
//! [`CropRegistry::delete`](crate::registry::CropRegistry::delete), which
//! also removes the metadata entry and optionally persists the record.

use crate::geometry::Rectangle;
use crate::storage::{StorageBackend, StorageError};
use crate::types::CropMetadata;
use std::path::PathBuf;
use std::sync::Arc;

/// Accessor for one crop's generated file.
#[derive(Clone)]
pub struct CropFile {
    name: String,
    meta: CropMetadata,
    storage: Arc<dyn StorageBackend>,
}

impl CropFile {
    pub(crate) fn new(
        name: String,
        meta: CropMetadata,
        storage: Arc<dyn StorageBackend>,
    ) -> Self {
        Self {
            name,
            meta,
            storage,
        }
    }

    /// The crop's registry name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The source rectangle this crop was extracted from.
    pub fn region(&self) -> Rectangle {
        self.meta.region
    }

    /// Storage-relative path of the generated file.
    pub fn filename(&self) -> &str {
        &self.meta.filename
    }

    pub(crate) fn metadata(&self) -> &CropMetadata {
        &self.meta
    }

    /// Whether the generated file currently exists in storage.
    pub fn exists(&self) -> bool {
        self.storage.exists(&self.meta.filename)
    }

    /// Resolve the file's location on the storage medium.
    ///
    /// Fails with [`StorageError::NotFound`] when storage reports the file
    /// absent.
    pub fn path(&self) -> Result<PathBuf, StorageError> {
        if !self.exists() {
            return Err(StorageError::NotFound(self.meta.filename.clone()));
        }
        Ok(self.storage.path(&self.meta.filename))
    }

    /// Resolve the file's public URL.
    ///
    /// Fails with [`StorageError::NotFound`] when storage reports the file
    /// absent.
    pub fn url(&self) -> Result<String, StorageError> {
        if !self.exists() {
            return Err(StorageError::NotFound(self.meta.filename.clone()));
        }
        Ok(self.storage.url(&self.meta.filename))
    }

    /// Remove the generated file from storage.
    ///
    /// Removes only this crop's file; idempotent when the file is already
    /// gone. Low-level: prefer
    /// [`CropRegistry::delete`](crate::registry::CropRegistry::delete).
    pub fn delete(&self) -> Result<(), StorageError> {
        self.storage.delete(&self.meta.filename)
    }
}

impl std::fmt::Debug for CropFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CropFile")
            .field("name", &self.name)
            .field("region", &self.meta.region)
            .field("filename", &self.meta.filename)
            .finish()
    }
}
