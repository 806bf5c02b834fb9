/// Actor state: transform, per-frame collision flags, player extension.
/// Plain data with small constructors; the per-frame behavior lives in
/// `domain::physics` and `sim::step`.

use crate::config::PhysicsConfig;
use crate::domain::geometry::Rect;

/// Position and movement state shared by anything with physics.
#[derive(Clone, Debug)]
pub struct Transform {
    /// Top-left corner, sub-pixel.
    pub pos: (f32, f32),
    pub size: (f32, f32),
    pub velocity: (f32, f32),
    /// Facing: false = right, true = left.
    pub flip: bool,
}

impl Transform {
    pub fn new(pos: (f32, f32), size: (f32, f32)) -> Self {
        Transform {
            pos,
            size,
            velocity: (0.0, 0.0),
            flip: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.0, self.pos.1, self.size.0, self.size.1)
    }

    pub fn center(&self) -> (f32, f32) {
        (
            self.pos.0 + self.size.0 / 2.0,
            self.pos.1 + self.size.1 / 2.0,
        )
    }
}

/// Which sides hit a solid this frame. Reset before every resolution pass;
/// each flag is set at most once per frame.
#[derive(Clone, Copy, Default, Debug)]
pub struct CollisionState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Animation-facing action, derived from physics state each frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Idle,
    Walk,
    Jump,
}

/// Horizontal movement intent for one frame. Held keys, not edges.
#[derive(Clone, Copy, Default, Debug)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
}

impl FrameInput {
    /// Intent as a unit in {-1, 0, 1}.
    pub fn intent_x(&self) -> f32 {
        (self.right as i32 - self.left as i32) as f32
    }
}

/// The player: a physics record plus jump/air bookkeeping.
#[derive(Clone, Debug)]
pub struct Player {
    pub transform: Transform,
    pub collision: CollisionState,
    /// Frames since last ground contact.
    pub air_time: u32,
    /// Remaining jumps; refilled to 2 on the frame the actor rests on ground.
    pub jumps: u32,
    pub dead: bool,
    pub action: Action,
}

impl Player {
    pub fn new(pos: (f32, f32), size: (f32, f32)) -> Self {
        Player {
            transform: Transform::new(pos, size),
            collision: CollisionState::default(),
            air_time: 0,
            jumps: 2,
            dead: false,
            action: Action::Idle,
        }
    }

    pub fn rect(&self) -> Rect {
        self.transform.rect()
    }

    /// Jump command (external trigger). No-op with no jumps left.
    /// Air time is forced past the jump-animation threshold immediately.
    pub fn jump(&mut self, physics: &PhysicsConfig) -> bool {
        if self.jumps == 0 {
            return false;
        }
        self.transform.velocity.1 = physics.jump_velocity;
        self.jumps -= 1;
        self.air_time = 5;
        true
    }

    /// Air-time bookkeeping: runs once per frame, after collision flags
    /// are final. Ground contact resets the counter and refills jumps.
    pub fn update_air_state(&mut self) {
        self.air_time += 1;
        if self.collision.down {
            self.air_time = 0;
            self.jumps = 2;
        }
    }

    /// Derive the animation action from air time and intent.
    pub fn update_action(&mut self, intent_x: f32) {
        self.action = if self.air_time > 4 {
            Action::Jump
        } else if intent_x != 0.0 {
            Action::Walk
        } else {
            Action::Idle
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn physics() -> PhysicsConfig {
        PhysicsConfig::default()
    }

    #[test]
    fn jump_spends_one_jump_and_launches() {
        let mut p = Player::new((0.0, 0.0), (13.0, 16.0));
        assert!(p.jump(&physics()));
        assert!(p.transform.velocity.1 < 0.0);
        assert_eq!(p.jumps, 1);
        assert_eq!(p.air_time, 5);
    }

    #[test]
    fn third_jump_is_a_no_op() {
        let mut p = Player::new((0.0, 0.0), (13.0, 16.0));
        assert!(p.jump(&physics()));
        assert!(p.jump(&physics()));
        let vel = p.transform.velocity.1;
        assert!(!p.jump(&physics()));
        assert_eq!(p.transform.velocity.1, vel);
        assert_eq!(p.jumps, 0);
    }

    #[test]
    fn ground_contact_refills_jumps() {
        let mut p = Player::new((0.0, 0.0), (13.0, 16.0));
        p.jumps = 0;
        p.air_time = 30;
        p.collision.down = true;
        p.update_air_state();
        assert_eq!(p.air_time, 0);
        assert_eq!(p.jumps, 2);
    }

    #[test]
    fn action_follows_air_time_then_intent() {
        let mut p = Player::new((0.0, 0.0), (13.0, 16.0));
        p.air_time = 5;
        p.update_action(0.0);
        assert_eq!(p.action, Action::Jump);
        p.air_time = 0;
        p.update_action(1.0);
        assert_eq!(p.action, Action::Walk);
        p.update_action(0.0);
        assert_eq!(p.action, Action::Idle);
    }

    #[test]
    fn intent_is_a_unit() {
        assert_eq!(FrameInput { left: true, right: false }.intent_x(), -1.0);
        assert_eq!(FrameInput { left: true, right: true }.intent_x(), 0.0);
        assert_eq!(FrameInput { left: false, right: true }.intent_x(), 1.0);
    }
}
