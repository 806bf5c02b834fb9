/// Sparse tilemap: on-grid tiles keyed by integer grid coordinate plus an
/// ordered list of off-grid decorative tiles.
///
/// ## Spatial queries
///
/// The sole spatial primitive is the 9-cell neighborhood around a pixel
/// position (`tiles_around`). Per-frame collision only ever needs the
/// tiles adjacent to the actor, so no broader index exists.
///
/// ## Autotiling
///
/// `autotile()` derives each tile's shape variant from which orthogonal
/// neighbors share its kind, via a fixed 9-entry pattern table. It is a
/// pure, idempotent transform over the whole map and is invoked explicitly
/// so authoring tools can batch edits before re-deriving shapes.

use std::collections::HashMap;

use crate::domain::geometry::Rect;
use crate::domain::tile::{ExtractedTile, GridPos, OffgridTile, Tile, TileKind};

/// Scan order of the 3×3 neighborhood. Fixed: collision tie-breaks
/// reproduce across runs.
const NEIGHBOR_OFFSETS: [(i32, i32); 9] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0), (0, 0), (1, 0),
    (-1, 1), (0, 1), (1, 1),
];

/// Orthogonal-neighbor patterns (canonically sorted) → shape variant.
/// Patterns not listed leave the tile's variant unchanged.
const AUTOTILE_RULES: [(&[(i32, i32)], u8); 9] = [
    (&[(0, 1), (1, 0)], 0),
    (&[(-1, 0), (0, 1), (1, 0)], 1),
    (&[(-1, 0), (0, 1)], 2),
    (&[(0, -1), (0, 1), (1, 0)], 3),
    (&[(-1, 0), (0, -1), (0, 1), (1, 0)], 4),
    (&[(-1, 0), (0, -1), (0, 1)], 5),
    (&[(0, -1), (1, 0)], 6),
    (&[(-1, 0), (0, -1), (1, 0)], 7),
    (&[(-1, 0), (0, -1)], 8),
];

#[derive(Debug)]
pub struct Tilemap {
    /// On-grid store. The integer-pair key is the canonical `"x;y"` key of
    /// the file format; uniqueness holds by construction.
    tiles: HashMap<GridPos, Tile>,
    /// Off-grid decorative tiles. Order matters: render z-order and
    /// deterministic removal.
    offgrid: Vec<OffgridTile>,
    tile_size: u32,
}

impl Tilemap {
    pub fn new(tile_size: u32) -> Self {
        Tilemap {
            tiles: HashMap::new(),
            offgrid: Vec::new(),
            tile_size,
        }
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn tile_at(&self, pos: GridPos) -> Option<&Tile> {
        self.tiles.get(&pos)
    }

    /// Place (or replace) an on-grid tile.
    pub fn set_tile(&mut self, pos: GridPos, kind: TileKind, variant: u8) {
        self.tiles.insert(pos, Tile { kind, variant });
    }

    pub fn remove_tile(&mut self, pos: GridPos) -> Option<Tile> {
        self.tiles.remove(&pos)
    }

    pub fn push_offgrid(&mut self, tile: OffgridTile) {
        self.offgrid.push(tile);
    }

    pub fn ongrid_iter(&self) -> impl Iterator<Item = (&GridPos, &Tile)> {
        self.tiles.iter()
    }

    pub fn offgrid_iter(&self) -> impl Iterator<Item = &OffgridTile> {
        self.offgrid.iter()
    }

    pub fn ongrid_len(&self) -> usize {
        self.tiles.len()
    }

    /// Grid cell containing a pixel position.
    pub fn cell_of(&self, pixel: (f32, f32)) -> GridPos {
        let ts = self.tile_size as f32;
        ((pixel.0 / ts).floor() as i32, (pixel.1 / ts).floor() as i32)
    }

    /// Pixel-space rect of the tile at a grid position.
    pub fn rect_of(&self, pos: GridPos) -> Rect {
        let ts = self.tile_size as f32;
        Rect::new(pos.0 as f32 * ts, pos.1 as f32 * ts, ts, ts)
    }

    // ── Neighborhood queries ──

    /// The on-grid tiles in the 3×3 neighborhood of a pixel position, in
    /// fixed scan order, skipping absent cells.
    pub fn tiles_around(&self, pixel: (f32, f32)) -> Vec<(GridPos, Tile)> {
        let (cx, cy) = self.cell_of(pixel);
        let mut out = Vec::new();
        for (dx, dy) in NEIGHBOR_OFFSETS {
            let pos = (cx + dx, cy + dy);
            if let Some(tile) = self.tiles.get(&pos) {
                out.push((pos, *tile));
            }
        }
        out
    }

    /// Solid-tile rects in the 3×3 neighborhood.
    pub fn solid_rects_around(&self, pixel: (f32, f32)) -> Vec<Rect> {
        self.tiles_around(pixel)
            .into_iter()
            .filter(|(_, tile)| tile.kind.is_solid())
            .map(|(pos, _)| self.rect_of(pos))
            .collect()
    }

    /// Spike-tile rects in the 3×3 neighborhood, with their direction
    /// variant.
    pub fn spike_rects_around(&self, pixel: (f32, f32)) -> Vec<(u8, Rect)> {
        self.tiles_around(pixel)
            .into_iter()
            .filter(|(_, tile)| tile.kind.is_spike())
            .map(|(pos, tile)| (tile.variant, self.rect_of(pos)))
            .collect()
    }

    // ── Extraction protocol ──

    /// Pull out every tile whose (kind, variant) matches one of `id_pairs`.
    ///
    /// Off-grid matches come first, in sequence order; on-grid matches
    /// follow in sorted grid order with their position converted to
    /// pixels. With `keep` the map is untouched (idempotent); otherwise
    /// matches are removed, so a second identical call returns nothing.
    /// Matching runs on a snapshot of the stores: tiles removed by this
    /// call are never re-visited within it.
    pub fn extract(&mut self, id_pairs: &[(TileKind, u8)], keep: bool) -> Vec<ExtractedTile> {
        let hit = |kind: TileKind, variant: u8| id_pairs.contains(&(kind, variant));
        let mut matches = Vec::new();

        for tile in &self.offgrid {
            if hit(tile.kind, tile.variant) {
                matches.push(ExtractedTile {
                    kind: tile.kind,
                    variant: tile.variant,
                    pos: tile.pos,
                });
            }
        }
        if !keep {
            self.offgrid.retain(|t| !hit(t.kind, t.variant));
        }

        let mut ongrid: Vec<GridPos> = self
            .tiles
            .iter()
            .filter(|(_, tile)| hit(tile.kind, tile.variant))
            .map(|(pos, _)| *pos)
            .collect();
        ongrid.sort_unstable();

        let ts = self.tile_size as f32;
        for pos in ongrid {
            let tile = self.tiles[&pos];
            matches.push(ExtractedTile {
                kind: tile.kind,
                variant: tile.variant,
                pos: (pos.0 as f32 * ts, pos.1 as f32 * ts),
            });
            if !keep {
                self.tiles.remove(&pos);
            }
        }

        matches
    }

    // ── Autotiler ──

    /// Re-derive shape variants for every autotile-kind tile from its
    /// orthogonal same-kind neighbors. Pure and idempotent; running it
    /// twice yields the same map.
    pub fn autotile(&mut self) {
        let mut updates: Vec<(GridPos, u8)> = Vec::new();

        for (&pos, tile) in &self.tiles {
            if !tile.kind.is_autotile() {
                continue;
            }
            let mut neighbors: Vec<(i32, i32)> = Vec::with_capacity(4);
            for shift in [(1, 0), (-1, 0), (0, -1), (0, 1)] {
                let check = (pos.0 + shift.0, pos.1 + shift.1);
                if self.tiles.get(&check).map(|t| t.kind) == Some(tile.kind) {
                    neighbors.push(shift);
                }
            }
            neighbors.sort_unstable();
            if let Some(&(_, variant)) = AUTOTILE_RULES
                .iter()
                .find(|(pattern, _)| *pattern == neighbors.as_slice())
            {
                updates.push((pos, variant));
            }
        }

        for (pos, variant) in updates {
            if let Some(tile) = self.tiles.get_mut(&pos) {
                tile.variant = variant;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_with(tiles: &[(i32, i32, TileKind, u8)]) -> Tilemap {
        let mut tm = Tilemap::new(16);
        for &(x, y, kind, variant) in tiles {
            tm.set_tile((x, y), kind, variant);
        }
        tm
    }

    // ── Neighborhood ──

    #[test]
    fn tiles_around_covers_the_nine_cells() {
        let mut tm = Tilemap::new(16);
        for x in -1..=1 {
            for y in -1..=1 {
                tm.set_tile((x, y), TileKind::Grass, 0);
            }
        }
        tm.set_tile((2, 0), TileKind::Grass, 0); // outside the 3×3
        let around = tm.tiles_around((4.0, 4.0)); // cell (0, 0)
        assert_eq!(around.len(), 9);
        assert!(!around.iter().any(|(pos, _)| *pos == (2, 0)));
    }

    #[test]
    fn tiles_around_skips_absent_cells() {
        let tm = map_with(&[(0, 1, TileKind::Grass, 0)]);
        let around = tm.tiles_around((3.0, 3.0));
        assert_eq!(around.len(), 1);
        assert_eq!(around[0].0, (0, 1));
    }

    #[test]
    fn negative_pixel_positions_floor_to_their_cell() {
        let tm = Tilemap::new(16);
        assert_eq!(tm.cell_of((-1.0, -17.0)), (-1, -2));
        assert_eq!(tm.cell_of((0.0, 15.9)), (0, 0));
    }

    #[test]
    fn solid_rects_filter_by_physics_kind() {
        let tm = map_with(&[
            (0, 1, TileKind::Grass, 0),
            (1, 1, TileKind::Stone, 0),
            (0, 0, TileKind::Spikes, 0),
            (1, 0, TileKind::Goal, 0),
        ]);
        let rects = tm.solid_rects_around((8.0, 8.0));
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0], Rect::new(0.0, 16.0, 16.0, 16.0));
    }

    #[test]
    fn spike_rects_carry_their_variant() {
        let tm = map_with(&[(1, 0, TileKind::Spikes, 2)]);
        let spikes = tm.spike_rects_around((8.0, 8.0));
        assert_eq!(spikes, vec![(2, Rect::new(16.0, 0.0, 16.0, 16.0))]);
    }

    #[test]
    fn offgrid_tiles_are_invisible_to_grid_queries() {
        let mut tm = Tilemap::new(16);
        tm.push_offgrid(OffgridTile {
            kind: TileKind::Grass,
            variant: 0,
            pos: (4.0, 4.0),
        });
        assert!(tm.tiles_around((4.0, 4.0)).is_empty());
        assert!(tm.solid_rects_around((4.0, 4.0)).is_empty());
    }

    // ── Extraction ──

    #[test]
    fn extract_removes_and_converts_to_pixels() {
        let mut tm = map_with(&[
            (3, 4, TileKind::Spawners, 0),
            (0, 0, TileKind::Grass, 0),
        ]);
        let out = tm.extract(&[(TileKind::Spawners, 0)], false);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].pos, (48.0, 64.0));
        assert_eq!(tm.ongrid_len(), 1);
        // Second identical call finds nothing.
        assert!(tm.extract(&[(TileKind::Spawners, 0)], false).is_empty());
    }

    #[test]
    fn extract_with_keep_is_idempotent() {
        let mut tm = map_with(&[(1, 1, TileKind::Spikes, 5)]);
        let first = tm.extract(&[(TileKind::Spikes, 5)], true);
        let second = tm.extract(&[(TileKind::Spikes, 5)], true);
        assert_eq!(first, second);
        assert_eq!(tm.ongrid_len(), 1);
    }

    #[test]
    fn extract_offgrid_preserves_sequence_order() {
        let mut tm = Tilemap::new(16);
        for (i, x) in [30.0, 10.0, 20.0].iter().enumerate() {
            tm.push_offgrid(OffgridTile {
                kind: TileKind::Spawners,
                variant: i as u8 % 2,
                pos: (*x, 0.0),
            });
        }
        let out = tm.extract(&[(TileKind::Spawners, 0)], false);
        // Sequence order, not position order.
        assert_eq!(out[0].pos.0, 30.0);
        assert_eq!(out[1].pos.0, 20.0);
        assert_eq!(tm.offgrid_iter().count(), 1);
    }

    #[test]
    fn extract_matches_exact_pairs_only() {
        let mut tm = map_with(&[
            (0, 0, TileKind::Spikes, 4),
            (1, 0, TileKind::Spikes, 1),
        ]);
        let out = tm.extract(&[(TileKind::Spikes, 4)], false);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].variant, 4);
        assert!(tm.tile_at((1, 0)).is_some());
    }

    // ── Autotiler ──

    #[test]
    fn autotile_assigns_known_patterns() {
        // Horizontal strip: left end, middle, right end.
        let mut tm = map_with(&[
            (0, 0, TileKind::Grass, 0),
            (1, 0, TileKind::Grass, 0),
            (2, 0, TileKind::Grass, 0),
        ]);
        tm.autotile();
        // Left end: neighbor at (1,0) only → not in the table, unchanged.
        assert_eq!(tm.tile_at((0, 0)).unwrap().variant, 0);
        // Middle: left+right neighbors → pattern [(-1,0),(1,0)] not in the
        // table either; a full cross is.
        let mut cross = map_with(&[
            (0, 0, TileKind::Grass, 9),
            (1, 0, TileKind::Grass, 9),
            (-1, 0, TileKind::Grass, 9),
            (0, -1, TileKind::Grass, 9),
            (0, 1, TileKind::Grass, 9),
        ]);
        cross.autotile();
        assert_eq!(cross.tile_at((0, 0)).unwrap().variant, 4);
    }

    #[test]
    fn autotile_top_left_corner_shape() {
        // Neighbors right + below → variant 0 (top-left corner).
        let mut tm = map_with(&[
            (0, 0, TileKind::Grass, 7),
            (1, 0, TileKind::Grass, 7),
            (0, 1, TileKind::Grass, 7),
        ]);
        tm.autotile();
        assert_eq!(tm.tile_at((0, 0)).unwrap().variant, 0);
        // Mirror: neighbors left + below → variant 2.
        let mut tm = map_with(&[
            (0, 0, TileKind::Grass, 7),
            (-1, 0, TileKind::Grass, 7),
            (0, 1, TileKind::Grass, 7),
        ]);
        tm.autotile();
        assert_eq!(tm.tile_at((0, 0)).unwrap().variant, 2);
    }

    #[test]
    fn autotile_ignores_other_kinds_as_neighbors() {
        let mut tm = map_with(&[
            (0, 0, TileKind::Grass, 3),
            (1, 0, TileKind::Stone, 0),
            (0, 1, TileKind::Grass, 0),
            (-1, 0, TileKind::Grass, 0),
        ]);
        tm.autotile();
        // Stone neighbor does not count: pattern is [(-1,0),(0,1)] → 2.
        assert_eq!(tm.tile_at((0, 0)).unwrap().variant, 2);
    }

    #[test]
    fn autotile_leaves_non_autotile_kinds_alone() {
        let mut tm = map_with(&[
            (0, 0, TileKind::Spikes, 1),
            (1, 0, TileKind::Spikes, 1),
            (0, 1, TileKind::Spikes, 1),
        ]);
        tm.autotile();
        assert_eq!(tm.tile_at((0, 0)).unwrap().variant, 1);
    }

    #[test]
    fn autotile_is_idempotent() {
        let mut tm = Tilemap::new(16);
        for x in 0..5 {
            for y in 0..3 {
                tm.set_tile((x, y), TileKind::Stone, 0);
            }
        }
        tm.autotile();
        let snapshot: Vec<(GridPos, Tile)> = {
            let mut v: Vec<_> = tm.ongrid_iter().map(|(p, t)| (*p, *t)).collect();
            v.sort_unstable_by_key(|(p, _)| *p);
            v
        };
        tm.autotile();
        let mut again: Vec<_> = tm.ongrid_iter().map(|(p, t)| (*p, *t)).collect();
        again.sort_unstable_by_key(|(p, _)| *p);
        assert_eq!(snapshot, again);
    }
}
