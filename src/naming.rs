//! Crop naming: name normalization and derived-file path policy.
//!
//! Two deterministic functions live here:
//!
//! - [`normalize_crop_name`] turns a user-supplied crop name into the
//!   storage-safe key the registry uses (`"Top Banner!"` → `"top_banner"`).
//!   The same input always yields the same key, so repeated calls address
//!   the same crop.
//! - [`default_crop_path`] is the stock filename policy for derived files:
//!   `crops/{basename}-{crop_name}{ext}`. Because it is pure, creating the
//!   same crop twice targets the same storage location and overwrites
//!   rather than accumulating files.
//!
//! Applications can swap the path policy by passing their own [`NamingFn`]
//! at registry construction; normalization is not swappable — registry keys
//! must stay storage-safe.

use std::sync::Arc;

/// Filename policy: `(record_key, source_filename, crop_name) -> path`.
///
/// Must be pure and deterministic for a given input triple. The record key
/// lets policies shard by record (e.g. `crops/{key}/...`); the default
/// policy ignores it.
pub type NamingFn = Arc<dyn Fn(&str, &str, &str) -> String + Send + Sync>;

/// Normalize a crop name into a storage-safe key.
///
/// Lowercases, replaces every run of non-alphanumeric characters with a
/// single `_`, and trims leading/trailing `_`:
///
/// - `"Top Banner!"` → `"top_banner"`
/// - `"square"` → `"square"`
/// - `"--wide--"` → `"wide"`
///
/// Returns an empty string when nothing survives; the registry rejects
/// those.
pub fn normalize_crop_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_sep = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            prev_sep = false;
        } else if !prev_sep {
            out.push('_');
            prev_sep = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Stock derived-file path policy: `crops/{basename}-{crop_name}{ext}`.
///
/// The basename is the source filename with any directory part stripped;
/// the extension (including the dot) is carried over so the derived file
/// keeps the source format.
pub fn default_crop_path(_record_key: &str, source_filename: &str, crop_name: &str) -> String {
    let basename = source_filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(source_filename);
    let (stem, ext) = split_extension(basename);
    format!("crops/{stem}-{crop_name}{ext}")
}

/// Split `photo.jpg` into `("photo", ".jpg")`. A leading dot is part of the
/// stem (`.hidden` has no extension), matching `os.path.splitext`.
fn split_extension(basename: &str) -> (&str, &str) {
    match basename.rfind('.') {
        Some(idx) if idx > 0 => basename.split_at(idx),
        _ => (basename, ""),
    }
}
