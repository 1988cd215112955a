//! Global tile ids as they appear in Tiled map layer data.

use crate::tileset::TileId;

/// Horizontal flip flag
pub const FLIP_H: u32 = 0x8000_0000; // bit 31
/// Vertical flip flag
pub const FLIP_V: u32 = 0x4000_0000; // bit 30
/// Anti-diagonal flip flag
pub const FLIP_D: u32 = 0x2000_0000; // bit 29
/// Bits holding the id itself
pub const GID_MASK: u32 = 0x1FFF_FFFF; // keep lower 29 bits (bit 28 is free)

/// Global tile id as stored in Tiled map layers: `first_gid + local id`, with
/// flip flags in the top bits. 0 means "no tile".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Gid(pub u32);

impl Gid {
    /// Stored value, flags included.
    #[inline] pub fn raw(self) -> u32 { self.0 }
    /// Id with the flip flags stripped.
    #[inline] pub fn clean(self) -> u32 { self.0 & GID_MASK }
    /// Flipped horizontally.
    #[inline] pub fn flip_h(self) -> bool { (self.0 & FLIP_H) != 0 }
    /// Flipped vertically.
    #[inline] pub fn flip_v(self) -> bool { (self.0 & FLIP_V) != 0 }
    /// Flipped along the anti-diagonal.
    #[inline] pub fn flip_d(self) -> bool { (self.0 & FLIP_D) != 0 }

    /// Local id within a tileset starting at `first_gid`.
    pub fn local_id(self, first_gid: u32) -> Option<TileId> {
        let clean = self.clean();
        if clean == 0 || clean < first_gid {
            return None;
        }
        Some(TileId(clean - first_gid))
    }
}
