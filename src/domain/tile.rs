/// Tile categories and their properties.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.

use serde::{Deserialize, Serialize};

/// Grid coordinate of an on-grid tile. Pixel position is `grid * tile_size`.
pub type GridPos = (i32, i32);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    Grass,    // Solid + autotiled
    Stone,    // Solid + autotiled
    Goal,     // Level exit marker
    Spikes,   // Lethal; variants 0-3 static, 4-7 moving-spike seeds
    Spawners, // Player spawn marker; variant 1 spawns facing left
}

impl TileKind {
    /// Does this tile participate in solid-body collision?
    pub fn is_solid(self) -> bool {
        matches!(self, TileKind::Grass | TileKind::Stone)
    }

    /// Does the autotiler rewrite this tile's variant?
    pub fn is_autotile(self) -> bool {
        matches!(self, TileKind::Grass | TileKind::Stone)
    }

    /// Is this a lethal spike tile?
    pub fn is_spike(self) -> bool {
        matches!(self, TileKind::Spikes)
    }

    /// Is this the level exit?
    pub fn is_goal(self) -> bool {
        matches!(self, TileKind::Goal)
    }

    /// Is this a player spawn marker?
    pub fn is_spawner(self) -> bool {
        matches!(self, TileKind::Spawners)
    }
}

/// An on-grid tile. Its grid position is the map key it is stored under.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Tile {
    pub kind: TileKind,
    pub variant: u8,
}

/// A free-floating decorative tile with an absolute pixel position.
/// Not part of the grid; never collides.
#[derive(Clone, PartialEq, Debug)]
pub struct OffgridTile {
    pub kind: TileKind,
    pub variant: u8,
    pub pos: (f32, f32),
}

/// A tile pulled out of the map by the extraction protocol.
/// Position is always in pixels, including for on-grid matches.
#[derive(Clone, PartialEq, Debug)]
pub struct ExtractedTile {
    pub kind: TileKind,
    pub variant: u8,
    pub pos: (f32, f32),
}
