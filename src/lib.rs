#![warn(missing_docs)]

//! Loader & validator for Tiled JSON tileset descriptors.
//!
//! A descriptor maps tile ids to an image and a semantic type label. Loading
//! one yields an immutable [`TileSet`] that renderers and level loaders index by
//! id; nothing here touches the referenced images.
//!
//! ```no_run
//! use tiled_tileset::{load_tileset, Source};
//!
//! let tiles = load_tileset(Source::Path("levels/MrMatt.tsj".as_ref()))?;
//! let hero = tiles.tile_by_type("hero").expect("hero tile");
//! println!("hero is drawn with {}", hero.image.source);
//! # Ok::<(), tiled_tileset::TileSetError>(())
//! ```

mod config;
mod error;
pub mod gid;
mod loader {
    pub mod json_loader;
}
mod properties;
mod raw {
    pub mod descriptor;
}
mod tileset;

use std::path::{Path, PathBuf};

pub use config::{LoadOptions, TypePolicy};
pub use error::TileSetError;
pub use gid::Gid;
pub use properties::{Properties, PropertyValue};
pub use tileset::{Grid, Orientation, Size, Tile, TileId, TileImage, TileSet};

use loader::json_loader::{decode_tileset_file, decode_tileset_slice};

/// Where a descriptor comes from.
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    /// A `.json` / `.tsj` file on disk
    Path(&'a Path),
    /// JSON text already in memory
    Str(&'a str),
    /// JSON bytes already in memory
    Bytes(&'a [u8]),
}

impl<'a> From<&'a Path> for Source<'a> {
    fn from(path: &'a Path) -> Self {
        Source::Path(path)
    }
}

impl<'a> From<&'a PathBuf> for Source<'a> {
    fn from(path: &'a PathBuf) -> Self {
        Source::Path(path.as_path())
    }
}

impl<'a> From<&'a [u8]> for Source<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Source::Bytes(bytes)
    }
}

/// Load and validate a tileset with default [`LoadOptions`].
///
/// The only I/O performed is reading the descriptor itself; the same input
/// always gives the same tileset or the same error.
pub fn load_tileset<'a>(source: impl Into<Source<'a>>) -> Result<TileSet, TileSetError> {
    load_tileset_with(source, &LoadOptions::default())
}

/// Load and validate a tileset with explicit options.
pub fn load_tileset_with<'a>(
    source: impl Into<Source<'a>>,
    opts: &LoadOptions,
) -> Result<TileSet, TileSetError> {
    match source.into() {
        Source::Path(path) => decode_tileset_file(path, opts),
        Source::Str(json) => decode_tileset_slice(json.as_bytes(), opts),
        Source::Bytes(bytes) => decode_tileset_slice(bytes, opts),
    }
}
