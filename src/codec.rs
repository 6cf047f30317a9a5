//! Metadata codec: crop mapping ↔ persisted JSON column.
//!
//! The persisted representation is one JSON object per crop field:
//!
//! ```json
//! {"square": {"x": 0, "y": 0, "width": 100, "height": 100, "filename": "crops/beach-square.jpg"}}
//! ```
//!
//! `decode` is lenient about the empty column states a fresh record can
//! carry — `""`, whitespace and `"null"` all decode to an empty mapping.
//! Everything else must parse exactly; `encode(decode(column))` round-trips
//! every valid mapping.

use crate::types::CropMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("invalid crop metadata: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode a persisted column value into the crop mapping.
pub fn decode(raw: &str) -> Result<CropMap, CodecError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(CropMap::new());
    }
    Ok(serde_json::from_str(trimmed)?)
}

/// Encode the crop mapping back to its persisted representation.
pub fn encode(data: &CropMap) -> Result<String, CodecError> {
    Ok(serde_json::to_string(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rectangle;
    use crate::types::CropMetadata;

    fn sample() -> CropMap {
        let mut map = CropMap::new();
        map.insert(
            "square".to_string(),
            CropMetadata {
                region: Rectangle::new(0, 0, 100, 100),
                filename: "crops/beach-square.jpg".to_string(),
            },
        );
        map.insert(
            "wide".to_string(),
            CropMetadata {
                region: Rectangle::new(100, 100, 200, 100),
                filename: "crops/beach-wide.jpg".to_string(),
            },
        );
        map
    }

    #[test]
    fn empty_column_decodes_to_empty_map() {
        assert_eq!(decode("").unwrap(), CropMap::new());
        assert_eq!(decode("   ").unwrap(), CropMap::new());
        assert_eq!(decode("null").unwrap(), CropMap::new());
        assert_eq!(decode("{}").unwrap(), CropMap::new());
    }

    #[test]
    fn roundtrip_is_exact() {
        let map = sample();
        let encoded = encode(&map).unwrap();
        assert_eq!(decode(&encoded).unwrap(), map);
    }

    #[test]
    fn decodes_persisted_layout() {
        let map = decode(
            r#"{"square": {"x": 0, "y": 0, "width": 100, "height": 100, "filename": "crops/beach-square.jpg"}}"#,
        )
        .unwrap();
        assert_eq!(map.len(), 1);
        let meta = &map["square"];
        assert_eq!(meta.region, Rectangle::new(0, 0, 100, 100));
        assert_eq!(meta.filename, "crops/beach-square.jpg");
    }

    #[test]
    fn encoding_is_stable_across_calls() {
        let map = sample();
        assert_eq!(encode(&map).unwrap(), encode(&map).unwrap());
    }

    #[test]
    fn malformed_column_is_an_error() {
        assert!(decode("{not json").is_err());
        assert!(decode(r#"{"square": {"x": 0}}"#).is_err());
        assert!(decode("[1, 2, 3]").is_err());
    }
}
