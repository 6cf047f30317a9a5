//! # Cropfield
//!
//! Named rectangular crops of a single source image, each generated as its
//! own derived file and persisted as JSON metadata alongside the owning
//! record. Applications declare crops — a name, a rectangle, an optional
//! resize — and get back an addressable handle; the library owns file
//! naming, regeneration, overwrite and cleanup.
//!
//! # Architecture: Registry Between Column and Storage
//!
//! One record's crop field moves through three representations:
//!
//! ```text
//! 1. Column    JSON text      →  CropMap          (codec)
//! 2. Registry  CropMap        →  live handles     (create/delete/clear)
//! 3. Storage   handles        →  derived files    (ImageBackend + StorageBackend)
//! ```
//!
//! The [`field::CropField`] binding decodes the persisted column lazily and
//! caches the resulting [`registry::CropRegistry`]; the registry is the only
//! component that mutates crop state, and it keeps its metadata mapping and
//! its per-crop [`handle::CropFile`] handles in 1:1 correspondence. On save,
//! the binding re-encodes the mapping for the record's column.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`geometry`] | `Rectangle` / `ResizeTarget` value types and pre-I/O validation |
//! | [`naming`] | Crop-name normalization and the `crops/{basename}-{name}{ext}` path policy |
//! | [`types`] | The persisted metadata shape (`CropMetadata`, `CropMap`) |
//! | [`codec`] | Column text ↔ crop mapping, exact round-trip |
//! | [`storage`] | `StorageBackend` trait + local-filesystem implementation |
//! | [`imaging`] | `ImageBackend` trait + pure-Rust crop/resize backend |
//! | [`record`] | `RecordStore` — the owning record's save hook |
//! | [`handle`] | `CropFile` — path/URL/existence/deletion for one derived file |
//! | [`registry`] | `CropRegistry` — the crop lifecycle core |
//! | [`field`] | `CropField` — lazy binding between column and registry |
//!
//! # Design Decisions
//!
//! ## Explicit Collaborators
//!
//! Storage, image processing and the record save hook are traits passed in
//! a [`registry::CropConfig`] at construction. There is no process-global
//! default storage instance; two records never share mutable defaults, and
//! tests swap in recording mocks without touching crop logic.
//!
//! ## Deterministic Naming
//!
//! Derived-file paths come from a pure function of
//! `(record key, source filename, crop name)`. Creating the same crop twice
//! targets the same storage location, which is what makes overwrite
//! last-write-wins instead of additive.
//!
//! ## Reject, Don't Clamp
//!
//! A rectangle that leaves the source bounds is an error
//! ([`geometry::RegionError::OutOfBounds`]), raised before any file is
//! written. Silently clamping would persist metadata that disagrees with
//! the pixels.
//!
//! ## Explicit Lookup Over Attribute Magic
//!
//! Crops are addressed with [`registry::CropRegistry::get`] and iteration.
//! A static reserved-name list keeps crop names from colliding with the
//! registry's own operations — no reflection involved.
//!
//! # Example
//!
//! ```no_run
//! use cropfield::{CropConfig, CropField, Rectangle, ResizeTarget, FsStorage, RustBackend};
//! use std::sync::Arc;
//! # use cropfield::{CropMap, PersistError, RecordStore};
//! # struct Row;
//! # impl RecordStore for Row {
//! #     fn save(&self, _: &CropMap) -> Result<(), PersistError> { Ok(()) }
//! # }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CropConfig::new(
//!     Arc::new(FsStorage::new("/var/media", "https://media.example.com")),
//!     Arc::new(RustBackend::new()),
//! );
//! let record = Arc::new(Row);
//!
//! // Bind the field for record 7, whose source image is uploads/beach.jpg.
//! let mut field = CropField::bind(config, record, "7", "uploads/beach.jpg", "");
//! let crops = field.registry()?;
//!
//! let thumb = crops.create(
//!     "thumbnail",
//!     Rectangle::new(0, 0, 300, 300),
//!     Some(ResizeTarget::new(100, 100)),
//!     true,
//! )?;
//! println!("serving {}", thumb.url()?);
//!
//! let column = field.encode()?; // what the record persists
//! # let _ = column;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod field;
pub mod geometry;
pub mod handle;
pub mod imaging;
pub mod naming;
pub mod record;
pub mod registry;
pub mod storage;
pub mod types;

pub use codec::CodecError;
pub use field::CropField;
pub use geometry::{Dimensions, Rectangle, RegionError, ResizeTarget};
pub use handle::CropFile;
pub use imaging::{BackendError, GenerateParams, ImageBackend, RustBackend};
pub use naming::{NamingFn, default_crop_path, normalize_crop_name};
pub use record::{PersistError, RecordStore};
pub use registry::{CropConfig, CropError, CropRegistry};
pub use storage::{FsStorage, StorageBackend, StorageError};
pub use types::{CropMap, CropMetadata};
