//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Injected randomness only
//! - Stable iteration order (store order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod rng;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timers;

pub use collision::{Hit, Rect, overlaps, resolve_collisions};
pub use rng::{RandomSource, Rgb, ScriptedRandom, random_color};
pub use spawner::{populate_targets, spawn_target};
pub use state::{
    Entity, EntityStore, GamePhase, GameState, Player, Projectile, SimEvent, Session, Target,
};
pub use tick::{TickInput, tick};
pub use timers::{IntervalTimer, Timers};
