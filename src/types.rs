//! Shared types persisted in the crop metadata column.
//!
//! These are the serialized shape of the crop field: what [`codec`](crate::codec)
//! reads and writes, and what [`CropRegistry`](crate::registry::CropRegistry)
//! keeps in memory. The JSON layout of one entry is fixed:
//!
//! ```json
//! {"x": 0, "y": 0, "width": 100, "height": 100, "filename": "crops/beach-square.jpg"}
//! ```

use crate::geometry::Rectangle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Persisted record for one crop: the source rectangle plus the derived
/// file's storage-relative path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropMetadata {
    #[serde(flatten)]
    pub region: Rectangle,
    pub filename: String,
}

/// Full `name → metadata` mapping for one record's crop field.
///
/// A `BTreeMap` keeps iteration order stable for a given snapshot, so
/// repeated encodes of the same mapping produce identical column values.
pub type CropMap = BTreeMap<String, CropMetadata>;
