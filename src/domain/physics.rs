/// Axis-separated collision resolution and gravity integration.
///
/// ## Per-frame order
///
///   1. Gravity: velocity.y climbs toward terminal speed. Integrated
///      before the displacement so a grounded actor presses into the
///      floor every frame and the `down` flag holds steady while resting.
///   2. Horizontal step: displacement.x × run scale, clamp into the
///      playfield, push out of solids along X only.
///   3. Vertical step: displacement.y, fall-out death check, push out of
///      solids along Y only.
///   4. Facing from intent (velocity-only drift never flips the sprite).
///   5. Any vertical contact this frame zeroes vertical momentum.
///
/// Horizontal resolution MUST complete (including the clamp) before the
/// vertical step begins: diagonal penetration is resolved as two
/// independent axis sweeps. That accepts tunneling only when a frame's
/// displacement exceeds one tile edge, which the fixed speed scale rules
/// out at this tile size.
///
/// Collision flags are set at most once per direction per frame; the first
/// overlapping rect in the fixed 9-neighbor scan order wins.

use crate::config::PhysicsConfig;
use crate::domain::entity::{CollisionState, Transform};
use crate::domain::tilemap::Tilemap;

/// One full physics update. Returns true if the actor fell past the bottom
/// of the playfield (terminal for the current life).
pub fn update_entity(
    transform: &mut Transform,
    collision: &mut CollisionState,
    intent_x: f32,
    map: &Tilemap,
    bounds: (f32, f32),
    physics: &PhysicsConfig,
) -> bool {
    *collision = CollisionState::default();

    transform.velocity.1 = physics
        .max_fall_speed
        .min(transform.velocity.1 + physics.gravity);

    let frame = (intent_x + transform.velocity.0, transform.velocity.1);

    resolve_horizontal(transform, collision, frame.0, map, bounds.0, physics);
    let fell_out = resolve_vertical(transform, collision, frame.1, map, bounds.1);
    update_facing(transform, intent_x);

    // Ground or ceiling contact cancels vertical momentum.
    if collision.down || collision.up {
        transform.velocity.1 = 0.0;
    }

    fell_out
}

/// Horizontal sweep: scaled displacement, playfield clamp, X push-out.
pub fn resolve_horizontal(
    transform: &mut Transform,
    collision: &mut CollisionState,
    dx: f32,
    map: &Tilemap,
    bound_w: f32,
    physics: &PhysicsConfig,
) {
    transform.pos.0 += dx * physics.run_speed;
    clip_horizontal(transform, bound_w);

    let mut rect = transform.rect();
    for solid in map.solid_rects_around(transform.pos) {
        if !rect.overlaps(&solid) {
            continue;
        }
        if dx > 0.0 && !collision.right {
            rect.set_right(solid.left());
            collision.right = true;
        }
        if dx < 0.0 && !collision.left {
            rect.set_left(solid.right());
            collision.left = true;
        }
        transform.pos.0 = rect.x;
    }
}

/// Vertical sweep: displacement, fall-out check, Y push-out.
/// Returns true if the actor left the playfield through the bottom.
pub fn resolve_vertical(
    transform: &mut Transform,
    collision: &mut CollisionState,
    dy: f32,
    map: &Tilemap,
    bound_h: f32,
) -> bool {
    transform.pos.1 += dy;

    let fell_out = transform.pos.1 > bound_h;

    let mut rect = transform.rect();
    for solid in map.solid_rects_around(transform.pos) {
        if !rect.overlaps(&solid) {
            continue;
        }
        if dy > 0.0 && !collision.down {
            rect.set_bottom(solid.top());
            collision.down = true;
        }
        if dy < 0.0 && !collision.up {
            rect.set_top(solid.bottom());
            collision.up = true;
        }
        transform.pos.1 = rect.y;
    }

    fell_out
}

/// Keep the actor's rect inside the visible playfield width.
fn clip_horizontal(transform: &mut Transform, bound_w: f32) {
    if transform.pos.0 < 0.0 {
        transform.pos.0 = 0.0;
    }
    if transform.pos.0 + transform.size.0 > bound_w {
        transform.pos.0 = bound_w - transform.size.0;
    }
}

/// Facing follows intent only. Inertia with zero intent keeps the sprite
/// facing where it was.
pub fn update_facing(transform: &mut Transform, intent_x: f32) {
    if intent_x > 0.0 {
        transform.flip = false;
    } else if intent_x < 0.0 {
        transform.flip = true;
    }
}
