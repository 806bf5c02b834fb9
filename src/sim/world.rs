/// World: the complete state of a running level.
///
/// Owns the tilemap, the player, the live traps, the sprite-mask tables
/// and the tuning constants. Exclusively mutated by the single simulation
/// thread: one `sim::step::step` call advances exactly one logical frame,
/// and the extraction protocol (`sim::level`) only runs between frames,
/// at level load.
///
/// Outbound signals are observable fields, never callbacks: the
/// surrounding game loop polls `level_up` and `player.dead` once per
/// frame and decides screen transitions itself.

use crate::config::{GameConfig, PhysicsConfig};
use crate::domain::entity::Player;
use crate::domain::mask::MaskTable;
use crate::domain::tilemap::Tilemap;
use crate::domain::traps::Traps;

/// Actor bounding-box size in pixels, matched to the player sprite.
pub const PLAYER_SIZE: (f32, f32) = (13.0, 16.0);

pub struct World {
    pub tilemap: Tilemap,
    pub player: Player,
    pub traps: Traps,
    /// Read-only sprite opacity, injected at construction: the core
    /// never touches image data or a display.
    pub masks: MaskTable,
    pub physics: PhysicsConfig,
    /// Visible playfield size in pixels.
    pub bounds: (f32, f32),
    /// Pixel position the player spawned at this level.
    pub spawn: (f32, f32),
    /// Set when the player's rect covers the goal tile's center.
    /// Polled by the caller; cleared on level load.
    pub level_up: bool,
}

impl World {
    pub fn new(config: &GameConfig, masks: MaskTable) -> Self {
        World {
            tilemap: Tilemap::new(16),
            player: Player::new((0.0, 0.0), PLAYER_SIZE),
            traps: Traps::default(),
            masks,
            physics: config.physics.clone(),
            bounds: (config.playfield.width, config.playfield.height),
            spawn: (0.0, 0.0),
            level_up: false,
        }
    }

    /// Jump command from the input layer. Ignored while dead or during
    /// the level-complete transition.
    pub fn jump(&mut self) -> bool {
        if self.player.dead || self.level_up {
            return false;
        }
        self.player.jump(&self.physics)
    }

    /// Put the player back at the level's spawn point with fresh state.
    pub fn respawn(&mut self) {
        self.player = Player::new(self.spawn, PLAYER_SIZE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        let config = GameConfig::default();
        World::new(&config, MaskTable::solid((13, 16), 16))
    }

    #[test]
    fn jump_is_gated_by_death_and_transition() {
        let mut w = world();
        assert!(w.jump());
        w.player.dead = true;
        assert!(!w.jump());
        w.player.dead = false;
        w.level_up = true;
        assert!(!w.jump());
    }

    #[test]
    fn respawn_resets_player_at_spawn() {
        let mut w = world();
        w.spawn = (64.0, 32.0);
        w.player.dead = true;
        w.player.jumps = 0;
        w.respawn();
        assert!(!w.player.dead);
        assert_eq!(w.player.jumps, 2);
        assert_eq!(w.player.transform.pos, (64.0, 32.0));
    }
}
