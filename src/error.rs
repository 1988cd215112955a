use std::io;
use std::path::PathBuf;

use serde_json::error::Category;
use thiserror::Error;

use crate::tileset::{Size, TileId};

/// Error type for the tileset loader.
///
/// Every variant is terminal for the load that produced it: the loader stops at
/// the first problem and never hands out a partial catalog.
#[derive(Debug, Error)]
pub enum TileSetError {
    /// The descriptor file could not be read
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        /// Path of the descriptor
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// A descriptor reader failed before yielding the whole document
    #[error("I/O error reading tileset: {0}")]
    Read(#[source] io::Error),

    /// Descriptor file has an extension other than `.json` / `.tsj`
    #[error("Unsupported tileset format: {0}")]
    UnsupportedFormat(String),

    /// The descriptor is not well-formed JSON
    #[error("JSON parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// A required attribute is missing, mistyped or out of range
    #[error("Invalid tileset: {0}")]
    Schema(String),

    /// Two tile entries share an id
    #[error("Duplicate tile id {0}")]
    DuplicateId(TileId),

    /// A tile image is not the size of the tileset grid
    #[error("Tile {id} image is {found}, tileset grid is {expected}")]
    DimensionMismatch {
        /// Offending tile
        id: TileId,
        /// Grid size declared by the tileset
        expected: Size,
        /// Image size declared by the tile
        found: Size,
    },

    /// Two tiles share a type and [`TypePolicy::Deny`](crate::TypePolicy::Deny) is in effect
    #[error("Tile type '{kind}' is used by tiles {first} and {second}")]
    DuplicateType {
        /// The shared type label
        kind: String,
        /// First tile using the label
        first: TileId,
        /// Next tile using it
        second: TileId,
    },

    /// A custom property declares a type the loader does not know
    #[error("Property '{name}' has unsupported type '{kind}'")]
    UnsupportedPropertyType {
        /// Property name
        name: String,
        /// Declared type
        kind: String,
    },
}

impl From<serde_json::Error> for TileSetError {
    /// Syntax errors are parse errors; well-formed JSON of the wrong shape is a
    /// schema error.
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => TileSetError::Schema(err.to_string()),
            Category::Syntax | Category::Eof | Category::Io => TileSetError::Parse(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_errors_classify_as_parse() {
        let err = serde_json::from_str::<serde_json::Value>("{ not json").unwrap_err();
        assert!(matches!(TileSetError::from(err), TileSetError::Parse(_)));
    }

    #[test]
    fn shape_errors_classify_as_schema() {
        let err = serde_json::from_str::<u32>("\"text\"").unwrap_err();
        assert!(matches!(TileSetError::from(err), TileSetError::Schema(_)));
    }

    #[test]
    fn dimension_mismatch_message_names_tile() {
        let err = TileSetError::DimensionMismatch {
            id: TileId(4),
            expected: Size::new(32, 32),
            found: Size::new(16, 32),
        };
        assert_eq!(err.to_string(), "Tile 4 image is 16x32, tileset grid is 32x32");
    }
}
