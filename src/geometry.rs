//! Crop geometry value types.
//!
//! A [`Rectangle`] names the pixel region `[x, x+width) × [y, y+height)` of a
//! source image; a [`ResizeTarget`] optionally scales the extracted region to
//! exact dimensions afterwards. Both are plain `Copy` values validated before
//! any I/O happens:
//!
//! - zero-sized regions and targets are rejected ([`RegionError::Empty`],
//!   [`RegionError::EmptyTarget`]);
//! - regions extending outside the source bounds are rejected
//!   ([`RegionError::OutOfBounds`]) — out-of-range requests fail loudly
//!   instead of being clamped.
//!
//! Coordinates are `u32`, so negative values are unrepresentable.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegionError {
    #[error("crop region has zero width or height")]
    Empty,
    #[error("resize target has zero width or height")]
    EmptyTarget,
    #[error("crop region {region} extends outside the {bounds} source")]
    OutOfBounds {
        region: Rectangle,
        bounds: Dimensions,
    },
}

/// A rectangular region of a source image.
///
/// Serializes to `{"x":…,"y":…,"width":…,"height":…}` — the geometry half of
/// a persisted crop metadata entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Reject zero-sized regions. Runs before any image is opened.
    pub fn validate(&self) -> Result<(), RegionError> {
        if self.width == 0 || self.height == 0 {
            return Err(RegionError::Empty);
        }
        Ok(())
    }

    /// Reject regions that extend outside `bounds`.
    ///
    /// The comparison is done in `u64` so `x + width` cannot wrap.
    pub fn fit_within(&self, bounds: Dimensions) -> Result<(), RegionError> {
        self.validate()?;
        let right = u64::from(self.x) + u64::from(self.width);
        let bottom = u64::from(self.y) + u64::from(self.height);
        if right > u64::from(bounds.width) || bottom > u64::from(bounds.height) {
            return Err(RegionError::OutOfBounds {
                region: *self,
                bounds,
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for Rectangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{}+{}+{}",
            self.width, self.height, self.x, self.y
        )
    }
}

/// Exact output dimensions applied after extraction.
///
/// Aspect-ratio preservation is the caller's responsibility; the resize is a
/// plain scale to these dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeTarget {
    pub width: u32,
    pub height: u32,
}

impl ResizeTarget {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> Result<(), RegionError> {
        if self.width == 0 || self.height == 0 {
            return Err(RegionError::EmptyTarget);
        }
        Ok(())
    }
}

/// Pixel dimensions of a source image, as reported by an identify call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
