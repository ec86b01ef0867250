//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Each tick:
//! apply input, advance timers, drain queued events, move entities, resolve
//! collisions, then run the game-over countdown.

use super::collision::resolve_collisions;
use super::rng::RandomSource;
use super::spawner::spawn_target;
use super::state::{GamePhase, GameState, SimEvent};
use crate::consts::MAX_TICK_DT;

/// Slack for summed-`dt` drift when a countdown reaches zero
const COUNTDOWN_EPSILON: f32 = 1.0e-4;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer x in field coordinates (player centers under it)
    pub pointer_x: Option<f32>,
    /// Trigger held
    pub firing: bool,
    /// New field size after a window resize
    pub resize: Option<(f32, f32)>,
}

/// Advance the game state by one fixed timestep of `dt` seconds.
///
/// `dt` is clamped to `[0, MAX_TICK_DT]` (NaN counts as zero); a stalled
/// caller catches up over several ticks instead of one.
pub fn tick<R: RandomSource>(state: &mut GameState<R>, input: &TickInput, dt: f32) {
    let dt = if dt.is_nan() { 0.0 } else { dt.clamp(0.0, MAX_TICK_DT) };
    state.time_ticks += 1;
    // The countdown starts on the tick after game over is entered
    let counting_down = state.phase == GamePhase::GameOver;

    if let Some((width, height)) = input.resize {
        state.resize(width, height);
    }
    if let Some(x) = input.pointer_x {
        state.player.follow_pointer(x, state.field.x);
    }

    state
        .timers
        .advance(dt, input.firing, &mut state.events);

    let simulate = match state.phase {
        GamePhase::Playing => true,
        GamePhase::GameOver => state.settings.game_over_policy.simulates_during_game_over(),
    };

    while let Some(event) = state.events.pop_front() {
        if !simulate {
            continue;
        }
        match event {
            SimEvent::Fire => {
                state.fire();
            }
            SimEvent::SpawnTarget => {
                spawn_target(state);
            }
        }
    }

    if simulate {
        advance_projectiles(state);
        advance_targets(state);
        resolve_hits(state);
    }

    if counting_down {
        run_countdown(state, dt);
    }
}

/// Move projectiles up and drop the ones that left the top edge
fn advance_projectiles<R>(state: &mut GameState<R>) {
    for projectile in state.projectiles.iter_mut() {
        projectile.advance();
    }
    state.projectiles.retain(|p| !p.is_off_field());
}

/// Move targets down and count the ones that slipped past the bottom edge
fn advance_targets<R: RandomSource>(state: &mut GameState<R>) {
    for target in state.targets.iter_mut() {
        target.advance();
    }

    let field_height = state.field.y;
    let before = state.targets.len();
    state.targets.retain(|t| !t.is_past_bottom(field_height));
    let missed = before - state.targets.len();

    for _ in 0..missed {
        register_miss(state);
    }
}

fn register_miss<R: RandomSource>(state: &mut GameState<R>) {
    state.session.misses += 1;
    log::debug!(
        "Target missed ({}/{})",
        state.session.misses,
        state.session.miss_threshold
    );

    if !state.session.threshold_reached() {
        spawn_target(state);
    } else if state.phase == GamePhase::Playing {
        enter_game_over(state);
    }
}

/// Apply this tick's projectile hits, then refill destroyed targets
fn resolve_hits<R: RandomSource>(state: &mut GameState<R>) {
    let hits = resolve_collisions(state.projectiles.as_slice(), state.targets.as_mut_slice());
    if hits.is_empty() {
        return;
    }

    let mut destroyed = 0;
    for hit in &hits {
        state.projectiles.remove(hit.projectile_id);
        if hit.destroyed && state.targets.remove(hit.target_id).is_some() {
            state.session.hits += 1;
            destroyed += 1;
            log::debug!("Target {} destroyed (hits: {})", hit.target_id, state.session.hits);
        }
    }

    for _ in 0..destroyed {
        spawn_target(state);
    }
}

fn enter_game_over<R>(state: &mut GameState<R>) {
    let secs = state.settings.game_over_secs;
    state.phase = GamePhase::GameOver;
    state.session.game_over_remaining = secs;
    state.session.reset_in = Some(secs);
    log::info!(
        "Game over after {} hits, resetting in {:.1}s",
        state.session.hits,
        secs
    );
}

/// Decay the banner and perform the scheduled reset when it comes due
fn run_countdown<R: RandomSource>(state: &mut GameState<R>, dt: f32) {
    if state.session.game_over_remaining > 0.0 {
        state.session.game_over_remaining = (state.session.game_over_remaining - dt).max(0.0);
    }

    if let Some(remaining) = state.session.reset_in {
        let remaining = remaining - dt;
        if remaining <= COUNTDOWN_EPSILON {
            state.reset();
        } else {
            state.session.reset_in = Some(remaining);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::{GameOverPolicy, Settings};
    use crate::sim::rng::ScriptedRandom;

    /// Targets pinned to the left edge, away from the player's line of fire
    fn left_lane_state(settings: Settings) -> GameState<ScriptedRandom> {
        GameState::with_rng(settings, ScriptedRandom::constant(0.0))
    }

    /// Targets centered over the player's starting position
    fn center_lane_state(settings: Settings) -> GameState<ScriptedRandom> {
        GameState::with_rng(settings, ScriptedRandom::constant(0.5))
    }

    fn run_until<R: RandomSource>(
        state: &mut GameState<R>,
        input: &TickInput,
        max_ticks: u32,
        mut done: impl FnMut(&GameState<R>) -> bool,
    ) -> Option<u32> {
        for n in 1..=max_ticks {
            tick(state, input, SIM_DT);
            if done(state) {
                return Some(n);
            }
        }
        None
    }

    #[test]
    fn test_fire_and_leave_top_edge() {
        let mut state = left_lane_state(Settings::default());
        assert_eq!(state.field().x, 800.0);
        assert_eq!(state.targets().len(), 3);

        state.push_event(SimEvent::Fire);
        let input = TickInput::default();
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.projectiles().len(), 1);

        let ticks = run_until(&mut state, &input, 200, |s| s.projectiles().is_empty());
        assert!(ticks.is_some(), "projectile never left the field");
        assert_eq!(state.session().hits, 0);
    }

    #[test]
    fn test_one_hit_destroys_target_and_refills() {
        let mut state = center_lane_state(Settings::default());
        let original: Vec<u32> = state.targets().iter().map(|t| t.id).collect();

        state.push_event(SimEvent::Fire);
        let input = TickInput::default();
        let ticks = run_until(&mut state, &input, 200, |s| s.session().hits > 0);
        assert!(ticks.is_some());

        assert_eq!(state.session().hits, 1);
        assert!(state.projectiles().is_empty());
        // First target in store order took the hit and was replaced
        assert!(!state.targets().contains(original[0]));
        assert!(state.targets().contains(original[1]));
        assert!(state.targets().contains(original[2]));
        assert_eq!(state.targets().len(), 3);
        assert_eq!(state.session().misses, 0);
    }

    #[test]
    fn test_miss_counts_once_per_target() {
        let mut state = left_lane_state(Settings {
            max_targets: 1,
            miss_threshold: 5,
            ..Default::default()
        });
        let input = TickInput::default();

        let mut last_misses = 0;
        for _ in 0..2000 {
            tick(&mut state, &input, SIM_DT);
            let misses = state.session().misses;
            assert!(misses == last_misses || misses == last_misses + 1);
            last_misses = misses;
            if misses == 2 {
                break;
            }
        }
        assert_eq!(last_misses, 2);
        assert_eq!(state.phase(), GamePhase::Playing);
        // Replacement keeps the field populated
        assert_eq!(state.targets().len(), 1);
    }

    #[test]
    fn test_game_over_and_reset_cycle() {
        let mut state = left_lane_state(Settings::default());
        let input = TickInput::default();

        let ticks = run_until(&mut state, &input, 1000, |s| s.phase() == GamePhase::GameOver);
        assert!(ticks.is_some());
        assert_eq!(state.session().misses, 3);
        // Two misses were refilled, the third was not
        assert_eq!(state.targets().len(), state.settings().max_targets - 1);
        assert_eq!(state.session().game_over_remaining, 3.0);
        assert_eq!(state.session().reset_in, Some(3.0));

        // Still showing the banner well before the 3 s mark
        for _ in 0..150 {
            tick(&mut state, &input, SIM_DT);
        }
        assert_eq!(state.phase(), GamePhase::GameOver);

        let ticks = run_until(&mut state, &input, 60, |s| s.phase() == GamePhase::Playing);
        assert_eq!(ticks, Some(30), "reset should land exactly 3 s after game over");

        assert!(state.projectiles().is_empty());
        assert_eq!(state.targets().len(), state.settings().max_targets);
        assert!(state.targets().iter().all(|t| t.pos.y == -t.size.y));
        assert_eq!(state.session().hits, 0);
        assert_eq!(state.session().misses, 0);
        assert_eq!(state.session().game_over_remaining, 0.0);
        assert_eq!(state.session().reset_in, None);
    }

    #[test]
    fn test_misses_past_threshold_are_not_refilled() {
        let mut state = left_lane_state(Settings {
            miss_threshold: 1,
            ..Default::default()
        });
        let input = TickInput::default();

        // All three targets share a column and leave in the same tick
        let ticks = run_until(&mut state, &input, 1000, |s| s.phase() == GamePhase::GameOver);
        assert!(ticks.is_some());
        assert_eq!(state.session().misses, 3);
        assert!(state.targets().is_empty());
        assert_eq!(state.session().reset_in, Some(3.0));
    }

    #[test]
    fn test_huge_dt_is_clamped() {
        let mut state = left_lane_state(Settings::default());
        let input = TickInput {
            firing: true,
            ..Default::default()
        };
        tick(&mut state, &input, 1.0e7);

        assert_eq!(state.time_ticks(), 1);
        assert!(state.projectiles().len() <= 3);
        assert_eq!(state.targets().len(), 3);
        assert_eq!(state.pending_events(), 0);
    }

    #[test]
    fn test_keep_running_policy_moves_under_banner() {
        let mut state = left_lane_state(Settings::default());
        let input = TickInput::default();
        run_until(&mut state, &input, 1000, |s| s.phase() == GamePhase::GameOver);

        let before: Vec<f32> = state.targets().iter().map(|t| t.pos.y).collect();
        assert!(!before.is_empty());
        tick(&mut state, &input, SIM_DT);
        let after: Vec<f32> = state.targets().iter().map(|t| t.pos.y).collect();
        assert_eq!(before.len(), after.len());
        assert!(before.iter().zip(&after).all(|(b, a)| a > b));
    }

    #[test]
    fn test_freeze_policy_holds_entities() {
        let mut state = left_lane_state(Settings {
            game_over_policy: GameOverPolicy::Freeze,
            ..Default::default()
        });
        let input = TickInput::default();
        run_until(&mut state, &input, 1000, |s| s.phase() == GamePhase::GameOver);

        let before: Vec<f32> = state.targets().iter().map(|t| t.pos.y).collect();
        state.push_event(SimEvent::Fire);
        state.push_event(SimEvent::SpawnTarget);
        let remaining = state.session().game_over_remaining;
        tick(&mut state, &input, SIM_DT);

        let after: Vec<f32> = state.targets().iter().map(|t| t.pos.y).collect();
        assert_eq!(before, after);
        assert!(state.projectiles().is_empty());
        assert_eq!(state.pending_events(), 0);
        assert!(state.session().game_over_remaining < remaining);
    }

    #[test]
    fn test_target_cap_holds_every_tick() {
        let mut state = GameState::new(
            Settings {
                max_targets: 4,
                ..Default::default()
            },
            2024,
        );

        for n in 0..5000u32 {
            let input = TickInput {
                pointer_x: Some((n as f32 * 3.7) % 800.0),
                firing: n % 300 < 200,
                resize: None,
            };
            tick(&mut state, &input, SIM_DT);
            assert!(state.targets().len() <= 4);
        }
    }

    #[test]
    fn test_held_trigger_fires_on_interval() {
        let mut state = left_lane_state(Settings::default());
        let input = TickInput {
            firing: true,
            ..Default::default()
        };
        // 0.5 s at 100 ms per shot
        for _ in 0..30 {
            tick(&mut state, &input, SIM_DT);
        }
        let fired = state.next_entity_id() - 1 - 3;
        assert!((4..=5).contains(&fired), "fired {fired}");
    }

    #[test]
    fn test_pointer_and_resize_input() {
        let mut state = left_lane_state(Settings::default());
        let input = TickInput {
            pointer_x: Some(10_000.0),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.player().pos.x, 750.0);

        let input = TickInput {
            resize: Some((400.0, 300.0)),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.player().pos.x, 175.0);
        assert_eq!(state.player().pos.y, 280.0);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(Settings::default(), 99999);
        let mut state2 = GameState::new(Settings::default(), 99999);

        for n in 0..600u32 {
            let input = TickInput {
                pointer_x: Some(400.0 + (n as f32 * 0.1).sin() * 300.0),
                firing: true,
                resize: None,
            };
            tick(&mut state1, &input, SIM_DT);
            tick(&mut state2, &input, SIM_DT);
        }

        assert_eq!(state1.time_ticks(), state2.time_ticks());
        assert_eq!(state1.session(), state2.session());
        assert_eq!(state1.targets().as_slice(), state2.targets().as_slice());
        assert_eq!(state1.projectiles().as_slice(), state2.projectiles().as_slice());
    }
}
