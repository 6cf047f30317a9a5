//! Image processing — crop extraction and resize, pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Extract** | `image::DynamicImage::crop_imm` |
//! | **Resize** | `image::imageops::resize_exact` with `Lanczos3` |
//! | **Encode** | by output extension (JPEG, PNG, TIFF, WebP) |
//!
//! The module is split into:
//! - **Backend**: [`ImageBackend`] trait + [`GenerateParams`] — the seam
//!   the registry drives, mockable for tests
//! - **RustBackend**: the production implementation on the `image` crate
//!
//! Backends read source bytes from and write derived files to a
//! [`StorageBackend`](crate::storage::StorageBackend); they never touch the
//! filesystem directly.

pub mod backend;
pub mod rust_backend;

pub use backend::{BackendError, GenerateParams, ImageBackend};
pub use rust_backend::RustBackend;
