//! Field-level binding between a persisted column and a live registry.
//!
//! A [`CropField`] sits where the owning record keeps its crop column. The
//! raw column text is held as-is until the field is first accessed; at that
//! point it is decoded and a [`CropRegistry`] is built and cached, so every
//! later access sees the same registry instance. Saving goes the other way:
//! [`encode`](CropField::encode) serializes the registry's current mapping
//! back into column form.
//!
//! The binding itself never mutates crop data — all mutation goes through
//! the registry's operations.

use crate::codec::{self, CodecError};
use crate::record::RecordStore;
use crate::registry::{CropConfig, CropError, CropRegistry};
use std::sync::Arc;

/// Lazy accessor for one record's crop column.
pub struct CropField {
    config: CropConfig,
    record: Arc<dyn RecordStore>,
    record_key: String,
    source: String,
    raw: String,
    registry: Option<CropRegistry>,
}

impl CropField {
    /// Bind a crop field to its owning record.
    ///
    /// `record_key` identifies the record for the naming policy, `source`
    /// is the storage-relative path of the record's source image, and
    /// `raw` is the persisted column value (empty for a fresh record).
    pub fn bind(
        config: CropConfig,
        record: Arc<dyn RecordStore>,
        record_key: impl Into<String>,
        source: impl Into<String>,
        raw: impl Into<String>,
    ) -> Self {
        Self {
            config,
            record,
            record_key: record_key.into(),
            source: source.into(),
            raw: raw.into(),
            registry: None,
        }
    }

    /// The live registry for this field.
    ///
    /// The first call decodes the column and builds the registry; later
    /// calls return the same instance. Decoding a malformed column or a
    /// mapping with unusable names fails here.
    pub fn registry(&mut self) -> Result<&mut CropRegistry, CropError> {
        if self.registry.is_none() {
            let data = codec::decode(&self.raw)?;
            let registry = CropRegistry::from_data(
                self.config.clone(),
                Arc::clone(&self.record),
                self.record_key.clone(),
                self.source.clone(),
                data,
            )?;
            self.registry = Some(registry);
        }
        Ok(self
            .registry
            .as_mut()
            .expect("registry bound just above"))
    }

    /// Whether the column has been decoded into a live registry yet.
    pub fn is_bound(&self) -> bool {
        self.registry.is_some()
    }

    /// Serialize the field back to its persisted column form.
    ///
    /// Reads the registry's mapping when the field is bound; an untouched
    /// field passes the stored column through unchanged.
    pub fn encode(&self) -> Result<String, CodecError> {
        match &self.registry {
            Some(registry) => codec::encode(registry.data()),
            None => Ok(self.raw.clone()),
        }
    }

    /// Replace the column value, discarding any cached registry.
    ///
    /// The next [`registry`](CropField::registry) call decodes the new
    /// value from scratch.
    pub fn assign(&mut self, raw: impl Into<String>) {
        self.raw = raw.into();
        self.registry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rectangle;
    use crate::imaging::ImageBackend;
    use crate::imaging::backend::tests::MockBackend;
    use crate::record::tests::MemoryRecord;
    use crate::storage::StorageBackend;
    use crate::storage::tests::MockStorage;

    fn field_with(raw: &str) -> CropField {
        let storage = Arc::new(MockStorage::new().with_file("uploads/beach.jpg", b"source"));
        let backend = Arc::new(MockBackend::new());
        let record = Arc::new(MemoryRecord::new());
        CropField::bind(
            CropConfig::new(
                storage as Arc<dyn StorageBackend>,
                backend as Arc<dyn ImageBackend>,
            ),
            record as Arc<dyn RecordStore>,
            "7",
            "uploads/beach.jpg",
            raw,
        )
    }

    const COLUMN: &str = r#"{"square":{"x":0,"y":0,"width":100,"height":100,"filename":"crops/beach-square.jpg"}}"#;

    #[test]
    fn first_access_decodes_the_column() {
        let mut field = field_with(COLUMN);
        assert!(!field.is_bound());

        let registry = field.registry().unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("square").unwrap().region(),
            Rectangle::new(0, 0, 100, 100)
        );
        assert!(field.is_bound());
    }

    #[test]
    fn repeated_access_reuses_the_registry() {
        let mut field = field_with("");

        field
            .registry()
            .unwrap()
            .create("square", Rectangle::new(0, 0, 100, 100), None, false)
            .unwrap();
        // The unpersisted crop is still there on the next access.
        assert_eq!(field.registry().unwrap().len(), 1);
    }

    #[test]
    fn empty_column_binds_an_empty_registry() {
        let mut field = field_with("");
        assert!(field.registry().unwrap().is_empty());
    }

    #[test]
    fn encode_roundtrips_the_mapping() {
        let mut field = field_with(COLUMN);
        field.registry().unwrap();

        let encoded = field.encode().unwrap();
        assert_eq!(
            codec::decode(&encoded).unwrap(),
            codec::decode(COLUMN).unwrap()
        );
    }

    #[test]
    fn encode_of_unbound_field_passes_column_through() {
        let field = field_with(COLUMN);
        assert_eq!(field.encode().unwrap(), COLUMN);
    }

    #[test]
    fn encode_reflects_registry_mutations() {
        let mut field = field_with("");
        field
            .registry()
            .unwrap()
            .create("square", Rectangle::new(0, 0, 100, 100), None, false)
            .unwrap();

        let map = codec::decode(&field.encode().unwrap()).unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("square"));
    }

    #[test]
    fn assign_discards_the_cached_registry() {
        let mut field = field_with("");
        field
            .registry()
            .unwrap()
            .create("square", Rectangle::new(0, 0, 100, 100), None, false)
            .unwrap();

        field.assign(COLUMN.to_string());
        assert!(!field.is_bound());

        // Decoded anew from the assigned column, not the old registry.
        let registry = field.registry().unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("square").is_some());
    }

    #[test]
    fn malformed_column_errors_on_first_access() {
        let mut field = field_with("{broken");
        assert!(matches!(field.registry(), Err(CropError::Codec(_))));
    }

    #[test]
    fn reserved_name_in_column_errors_on_first_access() {
        let mut field = field_with(
            r#"{"data":{"x":0,"y":0,"width":10,"height":10,"filename":"crops/x.jpg"}}"#,
        );
        assert!(matches!(field.registry(), Err(CropError::NameConflict(_))));
    }
}
