use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::ops::Index;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::LoadOptions;
use crate::error::TileSetError;
use crate::gid::Gid;
use crate::loader::json_loader::{decode_tileset_file, decode_tileset_slice, encode_tileset};
use crate::properties::Properties;

/// Local id of a tile inside its tileset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u32);

impl TileId {
    /// The id as a plain integer.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for TileId {
    fn from(id: u32) -> Self {
        TileId(id)
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Size {
    /// Build a size from width and height.
    pub const fn new(width: u32, height: u32) -> Self {
        Size { width, height }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Image asset referenced by a tile. The path is relative to the descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileImage {
    /// Relative path of the image file
    pub source: String,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl TileImage {
    /// Image dimensions.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// One entry of the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// Stable key into the tileset
    pub id: TileId,
    /// Semantic role, e.g. `"grass"` or `"hero"`
    pub kind: String,
    /// Image used to draw the tile
    pub image: TileImage,
    /// Custom properties attached to the tile
    pub properties: Properties,
}

/// Orientation of the editor grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Square grid
    #[default]
    Orthogonal,
    /// Diamond grid
    Isometric,
}

/// Editor grid settings carried by image-collection tilesets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    /// Grid orientation
    pub orientation: Orientation,
    /// Cell width
    pub width: u32,
    /// Cell height
    pub height: u32,
}

/// An immutable, validated catalog of tiles sharing one grid size.
///
/// Build it with [`load_tileset`](crate::load_tileset) or one of the
/// `load_from_*` constructors; every instance upholds these invariants:
/// * ids are unique (they key the catalog),
/// * every tile image is `tile_width` x `tile_height`,
/// * every tile type is non-empty and every image source is a non-empty relative path.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSet {
    pub(crate) name: String,
    pub(crate) tile_size: Size,
    pub(crate) columns: u32,
    pub(crate) grid: Option<Grid>,
    pub(crate) properties: Properties,
    pub(crate) tiles: BTreeMap<TileId, Tile>,
}

impl TileSet {
    /// Parse and validate a JSON descriptor held in memory.
    pub fn load_from_str(json: &str) -> Result<Self, TileSetError> {
        decode_tileset_slice(json.as_bytes(), &LoadOptions::default())
    }

    /// Load a descriptor from disk. Only `.json` and `.tsj` files are supported.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, TileSetError> {
        decode_tileset_file(path.as_ref(), &LoadOptions::default())
    }

    /// Read a descriptor from any reader, e.g. an embedded asset bundle.
    pub fn load_from_reader<R: Read>(mut reader: R) -> Result<Self, TileSetError> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).map_err(TileSetError::Read)?;
        decode_tileset_slice(&buf, &LoadOptions::default())
    }

    /// Serialize back to a pretty-printed Tiled JSON descriptor.
    pub fn to_json_string(&self) -> Result<String, TileSetError> {
        Ok(serde_json::to_string_pretty(&encode_tileset(self))?)
    }

    /// Name of the set.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width of every tile in pixels.
    pub fn tile_width(&self) -> u32 {
        self.tile_size.width
    }

    /// Height of every tile in pixels.
    pub fn tile_height(&self) -> u32 {
        self.tile_size.height
    }

    /// Grid size shared by every tile.
    pub fn tile_size(&self) -> Size {
        self.tile_size
    }

    /// Atlas columns; 0 for image-collection tilesets.
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Editor grid, when the descriptor has one.
    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    /// Custom properties of the set.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// True when the set defines no tiles.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// True when a tile with this id exists.
    pub fn contains(&self, id: impl Into<TileId>) -> bool {
        self.tiles.contains_key(&id.into())
    }

    /// Look a tile up by id.
    pub fn tile(&self, id: impl Into<TileId>) -> Option<&Tile> {
        self.tiles.get(&id.into())
    }

    /// Tiles in ascending id order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.tiles.values()
    }

    /// Ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.keys().copied()
    }

    /// Lowest-id tile with the given type.
    pub fn tile_by_type(&self, kind: &str) -> Option<&Tile> {
        self.tiles.values().find(|t| t.kind == kind)
    }

    /// All tiles with the given type, in ascending id order.
    pub fn tiles_of_type<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Tile> + 'a {
        self.tiles.values().filter(move |t| t.kind == kind)
    }

    /// Resolve a map-layer gid for this set placed at `first_gid`.
    ///
    /// Flip flags are ignored; gid 0 (no tile) and gids outside the set give `None`.
    pub fn tile_for_gid(&self, gid: Gid, first_gid: u32) -> Option<&Tile> {
        gid.local_id(first_gid).and_then(|id| self.tiles.get(&id))
    }

    /// Path of a tile's image, joined onto the directory the descriptor lives in.
    /// Pure path arithmetic: the file is not checked.
    pub fn image_path(&self, id: impl Into<TileId>, base_dir: &Path) -> Option<PathBuf> {
        self.tile(id).map(|t| base_dir.join(&t.image.source))
    }
}

impl Index<TileId> for TileSet {
    type Output = Tile;

    /// # Panics
    ///
    /// Panics if the id is not in the set.
    fn index(&self, id: TileId) -> &Tile {
        match self.tiles.get(&id) {
            Some(tile) => tile,
            None => panic!("tile id {id} not in tileset '{}'", self.name),
        }
    }
}

impl Index<u32> for TileSet {
    type Output = Tile;

    fn index(&self, id: u32) -> &Tile {
        &self[TileId(id)]
    }
}
