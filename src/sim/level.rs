/// Level loading: map file -> live world state.
///
/// A saved map carries everything as tiles. Loading runs the extraction
/// protocol in a fixed order to peel the meta tiles out of the map:
/// spawners place the player, moving-spike seeds become `Spike` traps,
/// disappearing-block variants become `Block` traps. What remains in the
/// tilemap is real level geometry.

use std::path::Path;

use log::{debug, warn};

use crate::config::GameConfig;
use crate::domain::entity::Player;
use crate::domain::tile::TileKind;
use crate::domain::tilemap::Tilemap;
use crate::domain::traps::{Block, Spike, SpikeDir};
use crate::sim::save::{load_map, MapError};
use crate::sim::world::{World, PLAYER_SIZE};

/// Spawner markers. Variant 0 spawns facing right, variant 1 facing left.
pub const SPAWNER_IDS: [(TileKind, u8); 2] = [(TileKind::Spawners, 0), (TileKind::Spawners, 1)];

/// Moving-spike seeds. Variant minus 4 encodes the dash direction.
pub const MOVING_SPIKE_IDS: [(TileKind, u8); 4] = [
    (TileKind::Spikes, 4),
    (TileKind::Spikes, 5),
    (TileKind::Spikes, 6),
    (TileKind::Spikes, 7),
];

/// Disappearing-block variants. Grass and stone variants 9 through 17
/// look like the solid variants 0 through 8 but vanish on approach.
pub const DISAPPEARING_BLOCK_IDS: [(TileKind, u8); 18] = [
    (TileKind::Grass, 9),
    (TileKind::Grass, 10),
    (TileKind::Grass, 11),
    (TileKind::Grass, 12),
    (TileKind::Grass, 13),
    (TileKind::Grass, 14),
    (TileKind::Grass, 15),
    (TileKind::Grass, 16),
    (TileKind::Grass, 17),
    (TileKind::Stone, 9),
    (TileKind::Stone, 10),
    (TileKind::Stone, 11),
    (TileKind::Stone, 12),
    (TileKind::Stone, 13),
    (TileKind::Stone, 14),
    (TileKind::Stone, 15),
    (TileKind::Stone, 16),
    (TileKind::Stone, 17),
];

/// Load level number `id` from the configured maps directory.
pub fn load_level(world: &mut World, id: usize, config: &GameConfig) -> Result<(), MapError> {
    let path = config.maps_dir.join(format!("{id}.json"));
    load_level_from(world, &path)
}

/// Load a level from an explicit map file path.
///
/// A missing or unreadable-as-a-file map is recoverable: the error is
/// logged and the world restarts with an empty map, so a broken maps
/// directory degrades instead of crashing the session. Malformed content
/// and hard I/O failures propagate.
pub fn load_level_from(world: &mut World, path: &Path) -> Result<(), MapError> {
    let tilemap = match load_map(path) {
        Ok(map) => map,
        Err(err) if err.is_recoverable() => {
            warn!("map {} unavailable, starting empty: {err}", path.display());
            Tilemap::new(16)
        }
        Err(err) => return Err(err),
    };
    world.tilemap = tilemap;
    apply_extractions(world);
    world.level_up = false;
    debug!(
        "loaded {}: {} tiles, {} spikes, {} blocks",
        path.display(),
        world.tilemap.ongrid_len(),
        world.traps.spikes.len(),
        world.traps.blocks.len()
    );
    Ok(())
}

/// Run the extraction passes over a freshly assigned tilemap and rebuild
/// the player and trap state from what they yield.
fn apply_extractions(world: &mut World) {
    let tile_size = world.tilemap.tile_size();

    world.player = Player::new((0.0, 0.0), PLAYER_SIZE);
    world.spawn = (0.0, 0.0);
    for spawner in world.tilemap.extract(&SPAWNER_IDS, false) {
        world.player.transform.pos = spawner.pos;
        world.spawn = spawner.pos;
        if spawner.variant == 1 {
            world.player.transform.flip = true;
        }
    }

    world.traps.clear();
    for seed in world.tilemap.extract(&MOVING_SPIKE_IDS, false) {
        world.traps.spikes.push(Spike::new(
            seed.pos,
            SpikeDir::from_variant(seed.variant % 4),
            world.physics.spike_speed,
            tile_size,
        ));
    }
    for block in world.tilemap.extract(&DISAPPEARING_BLOCK_IDS, false) {
        world.traps.blocks.push(Block::new(
            block.pos,
            block.kind,
            block.variant % 9,
            tile_size,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mask::MaskTable;
    use crate::domain::tile::OffgridTile;
    use crate::sim::save::save_map;

    fn world() -> World {
        let config = GameConfig::default();
        World::new(&config, MaskTable::solid((13, 16), 16))
    }

    fn sample_map() -> Tilemap {
        let mut map = Tilemap::new(16);
        // Geometry.
        map.set_tile((0, 5), TileKind::Grass, 0);
        map.set_tile((1, 5), TileKind::Grass, 0);
        map.set_tile((2, 5), TileKind::Stone, 0);
        // Spawner facing left.
        map.set_tile((1, 4), TileKind::Spawners, 1);
        // Moving-spike seed dashing left (variant 7 -> dir 3).
        map.set_tile((6, 2), TileKind::Spikes, 7);
        // Disappearing stone block, renders as variant 2.
        map.set_tile((4, 5), TileKind::Stone, 11);
        // Decorative off-grid tile stays behind.
        map.push_offgrid(OffgridTile {
            kind: TileKind::Grass,
            variant: 3,
            pos: (10.0, 10.0),
        });
        map
    }

    #[test]
    fn load_splits_meta_tiles_from_geometry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("0.json");
        save_map(&sample_map(), &path).unwrap();

        let mut w = world();
        w.level_up = true;
        load_level_from(&mut w, &path).unwrap();

        assert!(!w.level_up);
        assert_eq!(w.player.transform.pos, (16.0, 64.0));
        assert_eq!(w.spawn, (16.0, 64.0));
        assert!(w.player.transform.flip);

        assert_eq!(w.traps.spikes.len(), 1);
        assert_eq!(w.traps.spikes[0].pos, (96.0, 32.0));
        assert_eq!(w.traps.spikes[0].dir, SpikeDir::Left);
        assert!(!w.traps.spikes[0].dashing);

        assert_eq!(w.traps.blocks.len(), 1);
        assert_eq!(w.traps.blocks[0].pos, (64.0, 80.0));
        assert_eq!(w.traps.blocks[0].kind, TileKind::Stone);
        assert_eq!(w.traps.blocks[0].variant, 2);

        // Only the geometry tiles remain on-grid.
        assert_eq!(w.tilemap.ongrid_len(), 3);
        assert!(w.tilemap.tile_at((1, 4)).is_none());
        assert!(w.tilemap.tile_at((6, 2)).is_none());
        assert!(w.tilemap.tile_at((4, 5)).is_none());
        assert_eq!(w.tilemap.offgrid_iter().count(), 1);
    }

    #[test]
    fn missing_map_degrades_to_empty_world() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("99.json");

        let mut w = world();
        w.traps.spikes.push(Spike::new(
            (0.0, 0.0),
            SpikeDir::Up,
            7.0,
            16,
        ));
        load_level_from(&mut w, &path).unwrap();

        assert_eq!(w.tilemap.ongrid_len(), 0);
        assert!(w.traps.spikes.is_empty());
        assert!(w.traps.blocks.is_empty());
        assert_eq!(w.player.transform.pos, (0.0, 0.0));
    }

    #[test]
    fn directory_path_degrades_to_empty_world() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = world();
        w.tilemap.set_tile((0, 0), TileKind::Grass, 0);
        load_level_from(&mut w, dir.path()).unwrap();
        assert_eq!(w.tilemap.ongrid_len(), 0);
    }

    #[test]
    fn malformed_map_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("0.json");
        std::fs::write(&path, "{ not json").unwrap();

        let mut w = world();
        let err = load_level_from(&mut w, &path).unwrap_err();
        assert!(matches!(err, MapError::Malformed { .. }));
    }

    #[test]
    fn load_level_resolves_path_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("3.json");
        save_map(&sample_map(), &path).unwrap();

        let mut config = GameConfig::default();
        config.maps_dir = dir.path().to_path_buf();

        let mut w = world();
        load_level(&mut w, 3, &config).unwrap();
        assert_eq!(w.player.transform.pos, (16.0, 64.0));
    }
}
