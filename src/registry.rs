//! The crop lifecycle core: per-record registry of named crops.
//!
//! A [`CropRegistry`] holds the full `name → metadata` mapping for one
//! owning record plus one [`CropFile`] handle per entry, and is the only
//! component allowed to mutate either. The two maps are in 1:1
//! correspondence at every call boundary; operations restore the invariant
//! before returning.
//!
//! Mutations go through [`create`](CropRegistry::create),
//! [`delete`](CropRegistry::delete) and [`clear`](CropRegistry::clear).
//! Each takes a `persist` flag; when set, the registry hands the updated
//! mapping to the owning record's [`RecordStore`] after the files are in
//! place. All collaborators arrive through an explicit [`CropConfig`] at
//! construction — there is no process-global storage instance.
//!
//! Crop names are normalized ([`normalize_crop_name`]) and checked against
//! a static reserved-name list, so a crop can never shadow a registry
//! operation. Lookup is explicit ([`get`](CropRegistry::get)) rather than
//! attribute injection.

use crate::codec::CodecError;
use crate::geometry::{Rectangle, RegionError, ResizeTarget};
use crate::handle::CropFile;
use crate::imaging::{BackendError, GenerateParams, ImageBackend};
use crate::naming::{NamingFn, default_crop_path, normalize_crop_name};
use crate::record::{PersistError, RecordStore};
use crate::storage::{StorageBackend, StorageError};
use crate::types::{CropMap, CropMetadata};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Names a crop may never take: the registry's own operations.
///
/// Checked against the normalized name. A static list, not reflection —
/// extend it when the registry grows a new public operation.
const RESERVED_NAMES: &[&str] = &[
    "create", "delete", "clear", "data", "set_data", "get", "iter", "len", "is_empty", "source",
    "record_key",
];

#[derive(Error, Debug)]
pub enum CropError {
    #[error("'{0}' is not usable as a crop name: reserved, or empty after normalization")]
    NameConflict(String),
    #[error("no crop named '{0}'")]
    NotFound(String),
    #[error(transparent)]
    InvalidRegion(#[from] RegionError),
    #[error("crop generation failed: {0}")]
    GenerationFailed(#[source] BackendError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Collaborators for a crop registry, passed explicitly at construction.
///
/// Cloning is cheap — the storage and imaging backends are shared behind
/// `Arc`, so every registry built from the same config talks to the same
/// backends.
#[derive(Clone)]
pub struct CropConfig {
    storage: Arc<dyn StorageBackend>,
    imaging: Arc<dyn ImageBackend>,
    naming: NamingFn,
}

impl CropConfig {
    /// Config with the stock `crops/{basename}-{crop_name}{ext}` naming.
    pub fn new(storage: Arc<dyn StorageBackend>, imaging: Arc<dyn ImageBackend>) -> Self {
        Self {
            storage,
            imaging,
            naming: Arc::new(|record_key, source, crop_name| {
                default_crop_path(record_key, source, crop_name)
            }),
        }
    }

    /// Replace the derived-file path policy.
    pub fn with_naming(mut self, naming: NamingFn) -> Self {
        self.naming = naming;
        self
    }

    pub fn storage(&self) -> &Arc<dyn StorageBackend> {
        &self.storage
    }
}

/// Registry of all crops for one owning record's crop field.
pub struct CropRegistry {
    config: CropConfig,
    record: Arc<dyn RecordStore>,
    record_key: String,
    source: String,
    data: CropMap,
    files: BTreeMap<String, CropFile>,
}

impl CropRegistry {
    /// An empty registry for a record with no stored crops yet.
    pub fn new(
        config: CropConfig,
        record: Arc<dyn RecordStore>,
        record_key: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            config,
            record,
            record_key: record_key.into(),
            source: source.into(),
            data: CropMap::new(),
            files: BTreeMap::new(),
        }
    }

    /// Build a registry from a decoded metadata mapping.
    ///
    /// Every persisted name is re-validated, so a hand-edited column fails
    /// here rather than on first use.
    pub fn from_data(
        config: CropConfig,
        record: Arc<dyn RecordStore>,
        record_key: impl Into<String>,
        source: impl Into<String>,
        data: CropMap,
    ) -> Result<Self, CropError> {
        let mut registry = Self::new(config, record, record_key, source);
        registry.set_data(data)?;
        Ok(registry)
    }

    /// Storage-relative path of the source image this registry crops.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Identity of the owning record, as given to the naming function.
    pub fn record_key(&self) -> &str {
        &self.record_key
    }

    /// Create (or overwrite) a named crop.
    ///
    /// Validates the name and region, generates the derived file, then
    /// inserts the metadata entry and binds its handle. An existing crop
    /// with the same name is deleted first — last write wins, and because
    /// the naming function is deterministic the new file lands at the same
    /// storage location. A generation failure leaves the mapping without a
    /// new entry; no metadata is recorded for a file that was never
    /// written.
    ///
    /// With `persist`, the owning record is saved after the entry is in
    /// place. Returns the bound handle.
    pub fn create(
        &mut self,
        name: &str,
        region: Rectangle,
        resize: Option<ResizeTarget>,
        persist: bool,
    ) -> Result<&CropFile, CropError> {
        let name = checked_name(name)?;

        region.validate()?;
        if let Some(target) = resize {
            target.validate()?;
        }
        let bounds = self
            .config
            .imaging
            .identify(self.config.storage.as_ref(), &self.source)
            .map_err(CropError::GenerationFailed)?;
        region.fit_within(bounds)?;

        let filename = (self.config.naming)(&self.record_key, &self.source, &name);

        if self.data.contains_key(&name) {
            self.remove_entry(&name)?;
        }

        self.config
            .imaging
            .generate(
                self.config.storage.as_ref(),
                &GenerateParams {
                    source: self.source.clone(),
                    output: filename.clone(),
                    region,
                    resize,
                },
            )
            .map_err(CropError::GenerationFailed)?;

        debug!(crop = %name, file = %filename, region = %region, "crop generated");

        let meta = CropMetadata { region, filename };
        self.files.insert(
            name.clone(),
            CropFile::new(name.clone(), meta.clone(), Arc::clone(&self.config.storage)),
        );
        self.data.insert(name.clone(), meta);

        if persist {
            self.record.save(&self.data)?;
        }

        Ok(self
            .files
            .get(&name)
            .expect("handle bound for freshly created crop"))
    }

    /// Delete a named crop: its handle, its metadata entry and its file.
    ///
    /// Other entries are untouched. The file is removed even when `persist`
    /// is false, so storage never accumulates orphans from in-memory-only
    /// deletes; note that reloading the record before the persisting save
    /// resurrects the metadata while the file is already gone.
    pub fn delete(&mut self, name: &str, persist: bool) -> Result<(), CropError> {
        let name = normalize_crop_name(name);
        if !self.data.contains_key(&name) {
            return Err(CropError::NotFound(name));
        }
        self.remove_entry(&name)?;
        debug!(crop = %name, "crop deleted");

        if persist {
            self.record.save(&self.data)?;
        }
        Ok(())
    }

    /// Delete every crop on this field.
    ///
    /// Best-effort: a failing file deletion is logged and does not stop the
    /// remaining entries from being removed; the first error is returned
    /// once all entries are processed. Persists at most once, at the end.
    pub fn clear(&mut self, persist: bool) -> Result<(), CropError> {
        let names: Vec<String> = self.data.keys().cloned().collect();
        let mut first_error: Option<CropError> = None;

        for name in names {
            if let Err(e) = self.remove_entry(&name) {
                warn!(crop = %name, error = %e, "crop file deletion failed, continuing");
                first_error.get_or_insert(e);
            }
        }

        if persist {
            self.record.save(&self.data)?;
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Look up a crop's handle by name.
    pub fn get(&self, name: &str) -> Option<&CropFile> {
        self.files.get(&normalize_crop_name(name))
    }

    /// The full `name → metadata` mapping.
    pub fn data(&self) -> &CropMap {
        &self.data
    }

    /// Replace the full mapping, as happens when a record is (re)loaded.
    ///
    /// Re-validates every name. Handles for unchanged entries are kept;
    /// entries whose metadata changed are rebound, new names get fresh
    /// handles, and handles for names absent from the new mapping are
    /// dropped. No files are generated or deleted here — this synchronizes
    /// accessors with metadata, nothing more.
    pub fn set_data(&mut self, data: CropMap) -> Result<(), CropError> {
        let mut named = CropMap::new();
        for (raw, meta) in data {
            named.insert(checked_name(&raw)?, meta);
        }

        self.files
            .retain(|name, file| named.get(name).is_some_and(|meta| file.metadata() == meta));
        for (name, meta) in &named {
            if !self.files.contains_key(name) {
                self.files.insert(
                    name.clone(),
                    CropFile::new(name.clone(), meta.clone(), Arc::clone(&self.config.storage)),
                );
            }
        }

        self.data = named;
        Ok(())
    }

    /// Iterate over the attached handles, one per crop name.
    ///
    /// Restartable; order is stable for a given mapping snapshot.
    pub fn iter(&self) -> impl Iterator<Item = &CropFile> {
        self.files.values()
    }

    /// Number of crops on this field.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Remove one entry's handle, metadata and file, without persisting.
    ///
    /// Metadata goes first so a failing file deletion cannot leave an entry
    /// pointing at a half-removed file.
    fn remove_entry(&mut self, name: &str) -> Result<(), CropError> {
        let file = self.files.remove(name);
        self.data.remove(name);
        if let Some(file) = file {
            file.delete()?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a CropRegistry {
    type Item = &'a CropFile;
    type IntoIter = std::collections::btree_map::Values<'a, String, CropFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.values()
    }
}

impl std::fmt::Debug for CropRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CropRegistry")
            .field("record_key", &self.record_key)
            .field("source", &self.source)
            .field("crops", &self.data.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Normalize a requested crop name and reject unusable ones.
fn checked_name(raw: &str) -> Result<String, CropError> {
    let name = normalize_crop_name(raw);
    if name.is_empty() || RESERVED_NAMES.contains(&name.as_str()) {
        return Err(CropError::NameConflict(raw.to_string()));
    }
    Ok(name)
}
