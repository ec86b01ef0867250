//! Sky Shooter - a single-screen arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entity stores, spawning, collisions, game state)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Input adapter between pointer events and the simulation
//! - `hud`: Overlay text model (hit counter, game over banner)
//! - `settings`: Data-driven game tuning

pub mod hud;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use hud::HudView;
pub use settings::{GameOverPolicy, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest step a single tick will simulate
    pub const MAX_TICK_DT: f32 = 0.25;

    /// Default play-field size (replaced by the canvas size at runtime)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Player paddle
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 20.0;

    /// Projectiles (pixels per tick, upward)
    pub const PROJECTILE_WIDTH: f32 = 5.0;
    pub const PROJECTILE_HEIGHT: f32 = 10.0;
    pub const PROJECTILE_SPEED: f32 = 7.0;

    /// Targets (pixels per tick, downward)
    pub const TARGET_WIDTH: f32 = 50.0;
    pub const TARGET_HEIGHT: f32 = 20.0;
    pub const TARGET_SPEED: f32 = 2.0;
    pub const TARGET_HIT_POINTS: i32 = 1;

    /// Live target cap and misses allowed before game over
    pub const MAX_TARGETS: usize = 3;
    pub const MISS_THRESHOLD: u32 = 3;

    /// Timers
    pub const FIRE_INTERVAL_MS: u32 = 100;
    pub const SPAWN_INTERVAL_MS: u32 = 2000;
    pub const GAME_OVER_SECS: f32 = 3.0;
}
