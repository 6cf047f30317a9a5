//! The owning record's persistence hook.
//!
//! The crop machinery never talks to a database itself. When a registry
//! operation runs with `persist: true`, it hands the current crop mapping to
//! the [`RecordStore`] the registry was bound with; the implementation
//! encodes it (see [`codec`](crate::codec)) and saves the owning record's
//! row however the application persists things.
//!
//! Receiving the mapping as an argument keeps the record free of any
//! back-reference to the registry — there is no circular ownership, and
//! tests can count saves with a plain in-memory implementation.

use crate::types::CropMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("record save failed: {0}")]
    Failed(String),
}

/// Save hook for the record that owns a crop field.
pub trait RecordStore: Send + Sync {
    /// Persist the owning record with `data` as its current crop mapping.
    fn save(&self, data: &CropMap) -> Result<(), PersistError>;
}
