/// Traps: directional dash spikes and proximity-vanish blocks.
///
/// Both are spawned from seed tiles by the level loader and live outside
/// the tilemap from then on. The actor only ever reads their geometry;
/// each trap advances its own lifecycle against the actor's position.
///
/// Removal during the per-frame pass is two-phase: doomed indices are
/// collected while reading, then compacted in reverse so survivors keep
/// their relative order and no element is skipped or visited twice.

use crate::domain::geometry::Rect;
use crate::domain::tile::TileKind;

/// Dash direction of a spike, from its seed tile variant modulo 4.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SpikeDir {
    Up,
    Right,
    Down,
    Left,
}

impl SpikeDir {
    pub fn from_variant(variant: u8) -> Self {
        match variant % 4 {
            0 => SpikeDir::Up,
            1 => SpikeDir::Right,
            2 => SpikeDir::Down,
            _ => SpikeDir::Left,
        }
    }

    /// Mask / sprite variant index for this direction.
    pub fn variant(self) -> u8 {
        match self {
            SpikeDir::Up => 0,
            SpikeDir::Right => 1,
            SpikeDir::Down => 2,
            SpikeDir::Left => 3,
        }
    }

    /// Unit step of the dash.
    fn step(self) -> (f32, f32) {
        match self {
            SpikeDir::Up => (0.0, -1.0),
            SpikeDir::Right => (1.0, 0.0),
            SpikeDir::Down => (0.0, 1.0),
            SpikeDir::Left => (-1.0, 0.0),
        }
    }

    fn is_vertical(self) -> bool {
        matches!(self, SpikeDir::Up | SpikeDir::Down)
    }
}

/// A dash spike. `dashing` is a one-way latch: once the proximity
/// predicate fires the spike moves every frame along its direction and
/// never re-evaluates the predicate.
#[derive(Clone, Debug)]
pub struct Spike {
    pub pos: (f32, f32),
    pub dir: SpikeDir,
    pub dashing: bool,
    speed: f32,
    tile_size: f32,
}

impl Spike {
    pub fn new(pos: (f32, f32), dir: SpikeDir, speed: f32, tile_size: u32) -> Self {
        Spike {
            pos,
            dir,
            dashing: false,
            speed,
            tile_size: tile_size as f32,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.0, self.pos.1, self.tile_size, self.tile_size)
    }

    /// Arm when the actor crosses the firing corridor, then dash.
    pub fn update(&mut self, player_pos: (f32, f32), player_size: (f32, f32)) {
        if !self.dashing {
            if self.sees(player_pos, player_size) {
                self.dashing = true;
            }
            return;
        }
        let (dx, dy) = self.dir.step();
        self.pos.0 += dx * self.speed;
        self.pos.1 += dy * self.speed;
    }

    /// Direction-specific proximity predicate over the two centers.
    ///
    /// The corridor reaches 5 tile lengths ahead of the spike (with a
    /// quarter-tile tolerance behind, so an actor level with the spike
    /// still triggers it). Laterally: half the combined widths for
    /// vertical dashers, three-quarters of a tile plus half the actor's
    /// height for horizontal ones.
    fn sees(&self, player_pos: (f32, f32), player_size: (f32, f32)) -> bool {
        let ts = self.tile_size;
        let pc = (
            player_pos.0 + player_size.0 / 2.0,
            player_pos.1 + player_size.1 / 2.0,
        );
        let sc = (self.pos.0 + ts / 2.0, self.pos.1 + ts / 2.0);

        let (ahead, lateral, lateral_tol) = if self.dir.is_vertical() {
            let sign = if self.dir == SpikeDir::Up { -1.0 } else { 1.0 };
            (
                sign * (pc.1 - sc.1),
                (pc.0 - sc.0).abs(),
                ts / 2.0 + player_size.0 / 2.0,
            )
        } else {
            let sign = if self.dir == SpikeDir::Right { 1.0 } else { -1.0 };
            (
                sign * (pc.0 - sc.0),
                (pc.1 - sc.1).abs(),
                ts * 3.0 / 4.0 + player_size.1 / 2.0,
            )
        };

        lateral < lateral_tol && ahead >= -ts / 4.0 && ahead < 5.0 * ts
    }

    /// Gone once outside the playfield extended by one tile edge.
    fn out_of_bounds(&self, bounds: (f32, f32)) -> bool {
        self.pos.0 < -self.tile_size
            || self.pos.1 < -self.tile_size
            || self.pos.0 > bounds.0 + self.tile_size
            || self.pos.1 > bounds.1 + self.tile_size
    }
}

/// A disappearing block. No state beyond identity: present until the
/// actor gets close, then removed. Kind and variant are render-only.
#[derive(Clone, Debug)]
pub struct Block {
    pub pos: (f32, f32),
    pub kind: TileKind,
    pub variant: u8,
    tile_size: f32,
}

impl Block {
    pub fn new(pos: (f32, f32), kind: TileKind, variant: u8, tile_size: u32) -> Self {
        Block {
            pos,
            kind,
            variant,
            tile_size: tile_size as f32,
        }
    }

    /// True when the block should vanish this frame: actor center
    /// strictly within 1.2 tile lengths of the block center.
    pub fn should_vanish(
        &self,
        player_pos: (f32, f32),
        player_size: (f32, f32),
        vanish_radius: f32,
    ) -> bool {
        let pc = (
            player_pos.0 + player_size.0 / 2.0,
            player_pos.1 + player_size.1 / 2.0,
        );
        let bc = (
            self.pos.0 + self.tile_size / 2.0,
            self.pos.1 + self.tile_size / 2.0,
        );
        let dist = (pc.0 - bc.0).hypot(pc.1 - bc.1);
        dist < vanish_radius * self.tile_size
    }
}

/// All live traps of the current level. Two independent ordered
/// collections; entries are appended at extraction time and removed here.
#[derive(Clone, Debug, Default)]
pub struct Traps {
    pub spikes: Vec<Spike>,
    pub blocks: Vec<Block>,
}

impl Traps {
    pub fn clear(&mut self) {
        self.spikes.clear();
        self.blocks.clear();
    }

    /// Advance every trap one frame against the actor's current position,
    /// then compact out-of-bounds spikes and triggered blocks.
    pub fn update(
        &mut self,
        player_pos: (f32, f32),
        player_size: (f32, f32),
        bounds: (f32, f32),
        vanish_radius: f32,
    ) {
        let mut doomed: Vec<usize> = Vec::new();
        for (i, spike) in self.spikes.iter_mut().enumerate() {
            spike.update(player_pos, player_size);
            if spike.out_of_bounds(bounds) {
                doomed.push(i);
            }
        }
        for &i in doomed.iter().rev() {
            self.spikes.remove(i);
        }

        let mut doomed: Vec<usize> = Vec::new();
        for (i, block) in self.blocks.iter().enumerate() {
            if block.should_vanish(player_pos, player_size, vanish_radius) {
                doomed.push(i);
            }
        }
        for &i in doomed.iter().rev() {
            self.blocks.remove(i);
        }
    }
}
