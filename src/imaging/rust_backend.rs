//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | Identify | `ImageReader::into_dimensions` (header read, no full decode) |
//! | Extract | `DynamicImage::crop_imm` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode | `DynamicImage::write_to`, format from the output extension |
//!
//! The target dimensions of a resize are honored exactly — no aspect
//! correction. Lanczos3 keeps repeated generations deterministic.

use super::backend::{BackendError, GenerateParams, ImageBackend};
use crate::geometry::Dimensions;
use crate::storage::StorageBackend;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode(bytes: &[u8], path: &str) -> Result<DynamicImage, BackendError> {
    image::load_from_memory(bytes).map_err(|e| BackendError::Decode {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

/// Pick the output encoder from the file extension.
fn output_format(path: &str) -> Result<ImageFormat, BackendError> {
    let ext = path.rsplit('.').next().unwrap_or("");
    ImageFormat::from_extension(ext).ok_or_else(|| BackendError::Encode {
        path: path.to_string(),
        reason: format!("unsupported output format '{ext}'"),
    })
}

impl ImageBackend for RustBackend {
    fn identify(
        &self,
        storage: &dyn StorageBackend,
        path: &str,
    ) -> Result<Dimensions, BackendError> {
        let bytes = storage.read(path)?;
        let reader = ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .map_err(|e| BackendError::Decode {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        let (width, height) = reader.into_dimensions().map_err(|e| BackendError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Dimensions { width, height })
    }

    fn generate(
        &self,
        storage: &dyn StorageBackend,
        params: &GenerateParams,
    ) -> Result<(), BackendError> {
        let format = output_format(&params.output)?;

        let bytes = storage.read(&params.source)?;
        let img = decode(&bytes, &params.source)?;

        let r = params.region;
        let mut derived = img.crop_imm(r.x, r.y, r.width, r.height);

        if let Some(target) = params.resize {
            derived = derived.resize_exact(target.width, target.height, FilterType::Lanczos3);
        }

        let mut buf = Cursor::new(Vec::new());
        derived
            .write_to(&mut buf, format)
            .map_err(|e| BackendError::Encode {
                path: params.output.clone(),
                reason: e.to_string(),
            })?;

        storage.write(&params.output, buf.get_ref())?;
        Ok(())
    }
}
