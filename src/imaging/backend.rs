//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the crop registry
//! needs: identify (source dimensions, for bounds validation) and generate
//! (extract a region, optionally resize, store the derived file).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) — pure Rust on the
//! `image` crate. Tests use the recording `MockBackend` below.

use crate::geometry::{Dimensions, Rectangle, ResizeTarget};
use crate::storage::{StorageBackend, StorageError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },
    #[error("failed to encode {path}: {reason}")]
    Encode { path: String, reason: String },
}

/// Full specification of one derived-file generation.
///
/// `source` and `output` are storage-relative paths; the backend reads the
/// source through the given storage and writes the result back through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateParams {
    pub source: String,
    pub output: String,
    pub region: Rectangle,
    pub resize: Option<ResizeTarget>,
}

/// Trait for image processing backends.
///
/// Callers validate the region against `identify` before calling `generate`;
/// backends may assume the region lies within the source bounds.
pub trait ImageBackend: Send + Sync {
    /// Get source image dimensions.
    fn identify(
        &self,
        storage: &dyn StorageBackend,
        path: &str,
    ) -> Result<Dimensions, BackendError>;

    /// Extract `params.region` from the source, apply the optional resize,
    /// and write the encoded result to `params.output`.
    fn generate(
        &self,
        storage: &dyn StorageBackend,
        params: &GenerateParams,
    ) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock backend that records operations without doing pixel work.
    ///
    /// `generate` writes a small marker file through the given storage so
    /// existence checks behave as they would with a real backend. Identify
    /// serves a fixed dimension value; `fail_generate` injects a failure
    /// for exercising the no-partial-metadata guarantee.
    pub struct MockBackend {
        pub dimensions: Mutex<Dimensions>,
        pub operations: Mutex<Vec<RecordedOp>>,
        pub fail_generate: Mutex<bool>,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum RecordedOp {
        Identify(String),
        Generate(GenerateParams),
    }

    impl Default for MockBackend {
        fn default() -> Self {
            Self::with_dimensions(Dimensions {
                width: 1024,
                height: 768,
            })
        }
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dimensions(dimensions: Dimensions) -> Self {
            Self {
                dimensions: Mutex::new(dimensions),
                operations: Mutex::new(Vec::new()),
                fail_generate: Mutex::new(false),
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        /// The `Generate` operations only, in call order.
        pub fn generations(&self) -> Vec<GenerateParams> {
            self.get_operations()
                .into_iter()
                .filter_map(|op| match op {
                    RecordedOp::Generate(p) => Some(p),
                    _ => None,
                })
                .collect()
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(
            &self,
            _storage: &dyn StorageBackend,
            path: &str,
        ) -> Result<Dimensions, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(path.to_string()));
            Ok(*self.dimensions.lock().unwrap())
        }

        fn generate(
            &self,
            storage: &dyn StorageBackend,
            params: &GenerateParams,
        ) -> Result<(), BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Generate(params.clone()));
            if *self.fail_generate.lock().unwrap() {
                return Err(BackendError::Decode {
                    path: params.source.clone(),
                    reason: "injected generate failure".to_string(),
                });
            }
            storage.write(&params.output, b"derived")?;
            Ok(())
        }
    }

    #[test]
    fn mock_records_identify() {
        let storage = crate::storage::tests::MockStorage::new();
        let backend = MockBackend::with_dimensions(Dimensions {
            width: 800,
            height: 600,
        });

        let dims = backend.identify(&storage, "photo.jpg").unwrap();
        assert_eq!(dims.width, 800);
        assert_eq!(dims.height, 600);

        let ops = backend.get_operations();
        assert_eq!(ops, vec![RecordedOp::Identify("photo.jpg".to_string())]);
    }

    #[test]
    fn mock_generate_stores_marker_file() {
        let storage = crate::storage::tests::MockStorage::new();
        let backend = MockBackend::new();

        backend
            .generate(
                &storage,
                &GenerateParams {
                    source: "photo.jpg".to_string(),
                    output: "crops/photo-square.jpg".to_string(),
                    region: Rectangle::new(0, 0, 100, 100),
                    resize: None,
                },
            )
            .unwrap();

        assert!(storage.exists("crops/photo-square.jpg"));
        assert_eq!(backend.generations().len(), 1);
    }

    #[test]
    fn mock_injected_failure_writes_nothing() {
        let storage = crate::storage::tests::MockStorage::new();
        let backend = MockBackend::new();
        *backend.fail_generate.lock().unwrap() = true;

        let result = backend.generate(
            &storage,
            &GenerateParams {
                source: "photo.jpg".to_string(),
                output: "crops/photo-square.jpg".to_string(),
                region: Rectangle::new(0, 0, 100, 100),
                resize: None,
            },
        );

        assert!(matches!(result, Err(BackendError::Decode { .. })));
        assert!(!storage.exists("crops/photo-square.jpg"));
    }
}
