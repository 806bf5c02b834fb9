/// One logical frame of the simulation.
///
/// Fixed phase order per frame:
///   1. traps advance against the actor's position from last frame,
///   2. actor physics (gravity, horizontal then vertical sweep),
///   3. outcome checks at the settled position (goal, static spikes,
///      dashing spikes),
///   4. air-state and action bookkeeping.
///
/// A frame in which the player dies or completes the level still runs to
/// the end; subsequent frames are no-ops until the caller reloads or
/// respawns.

use crate::domain::entity::{FrameInput, Player};
use crate::domain::mask::MaskTable;
use crate::domain::physics::update_entity;
use crate::domain::tilemap::Tilemap;
use crate::domain::traps::Traps;
use crate::sim::world::World;

pub fn step(world: &mut World, input: FrameInput) {
    if world.player.dead || world.level_up {
        return;
    }

    let World {
        tilemap,
        player,
        traps,
        masks,
        physics,
        bounds,
        ..
    } = world;

    traps.update(
        player.transform.pos,
        player.transform.size,
        *bounds,
        physics.block_vanish_radius,
    );

    let intent = input.intent_x();
    let fell_out = update_entity(
        &mut player.transform,
        &mut player.collision,
        intent,
        tilemap,
        *bounds,
        physics,
    );
    if fell_out {
        player.dead = true;
    }

    if check_goal(player, tilemap) {
        world.level_up = true;
    } else {
        if check_static_spikes(player, tilemap, masks) || check_dynamic_spikes(player, traps, masks)
        {
            player.dead = true;
        }
        player.update_air_state();
        player.update_action(intent);
    }
}

/// The goal fires when the tile under the player's center is a goal tile
/// and the player's rect covers that tile's center point.
fn check_goal(player: &Player, map: &Tilemap) -> bool {
    let cell = map.cell_of(player.transform.center());
    match map.tile_at(cell) {
        Some(tile) if tile.kind.is_goal() => {
            let goal_center = map.rect_of(cell).center();
            player.rect().contains_point(goal_center)
        }
        _ => false,
    }
}

/// Pixel-exact death test against the static spike tiles near the player.
/// Bounding boxes filter first, masks decide.
fn check_static_spikes(player: &Player, map: &Tilemap, masks: &MaskTable) -> bool {
    let rect = player.rect();
    for (variant, spike_rect) in map.spike_rects_around(player.transform.pos) {
        if !rect.overlaps(&spike_rect) {
            continue;
        }
        let offset = (
            spike_rect.x - player.transform.pos.0,
            spike_rect.y - player.transform.pos.1,
        );
        if masks.actor.overlap(masks.spike(variant), offset) {
            return true;
        }
    }
    false
}

/// Same test against moving spikes. Armed but still spikes are harmless;
/// only a dashing spike kills.
fn check_dynamic_spikes(player: &Player, traps: &Traps, masks: &MaskTable) -> bool {
    let rect = player.rect();
    for spike in &traps.spikes {
        if !spike.dashing {
            continue;
        }
        let spike_rect = spike.rect();
        if !rect.overlaps(&spike_rect) {
            continue;
        }
        let offset = (
            spike_rect.x - player.transform.pos.0,
            spike_rect.y - player.transform.pos.1,
        );
        if masks.actor.overlap(masks.spike(spike.dir.variant()), offset) {
            return true;
        }
    }
    false
}

// ════════════════════════════════════════════════════════════════════════
// tests
// ════════════════════════════════════════════════════════════════════════
