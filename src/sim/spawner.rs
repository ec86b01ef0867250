//! Target spawning
//!
//! Targets enter just above the top edge at a random column, gated by the
//! live-target cap.

use glam::Vec2;

use super::rng::{RandomSource, random_color};
use super::state::{GameState, Target};

/// Add one target if the field is below its cap. Returns the new target's id.
pub fn spawn_target<R: RandomSource>(state: &mut GameState<R>) -> Option<u32> {
    if state.targets.len() >= state.settings.max_targets {
        return None;
    }

    let size = Vec2::new(state.settings.target_width, state.settings.target_height);
    let span = (state.field.x - size.x).max(0.0);
    let x = state.rng.next_unit() * span;
    let color = random_color(&mut state.rng);

    let id = state.next_entity_id();
    state.targets.add(Target {
        id,
        pos: Vec2::new(x, -size.y),
        size,
        speed: state.settings.target_speed,
        hit_points: state.settings.target_hit_points,
        color,
    });
    log::debug!("Spawned target {} at x={:.1} ({})", id, x, color.to_hex());
    Some(id)
}

/// Spawn until the live-target cap is reached. Returns how many were added.
pub fn populate_targets<R: RandomSource>(state: &mut GameState<R>) -> usize {
    let mut spawned = 0;
    while spawn_target(state).is_some() {
        spawned += 1;
    }
    spawned
}
