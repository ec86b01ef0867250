//! Game settings and tuning
//!
//! Every gameplay constant can be overridden from JSON. Missing fields fall
//! back to the defaults in [`crate::consts`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// What the simulation does while the "Game Over" banner is up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameOverPolicy {
    /// Targets keep falling and projectiles keep flying under the banner
    #[default]
    KeepRunning,
    /// Only the countdown advances until the reset
    Freeze,
}

impl GameOverPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameOverPolicy::KeepRunning => "keep_running",
            GameOverPolicy::Freeze => "freeze",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "keep_running" | "keep-running" | "run" => Some(GameOverPolicy::KeepRunning),
            "freeze" | "frozen" => Some(GameOverPolicy::Freeze),
            _ => None,
        }
    }

    /// Whether entities advance while in game over
    pub fn simulates_during_game_over(&self) -> bool {
        matches!(self, GameOverPolicy::KeepRunning)
    }
}

/// Errors from loading settings
#[derive(Debug)]
pub enum SettingsError {
    /// The JSON could not be parsed
    Parse(serde_json::Error),
    /// A value parsed but is out of range
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Parse(e) => write!(f, "failed to parse settings: {e}"),
            SettingsError::Invalid { field, reason } => {
                write!(f, "invalid setting `{field}`: {reason}")
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Parse(e) => Some(e),
            SettingsError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}

/// Game tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Entities ===
    pub player_width: f32,
    pub player_height: f32,
    pub projectile_width: f32,
    pub projectile_height: f32,
    /// Pixels per tick
    pub projectile_speed: f32,
    pub target_width: f32,
    pub target_height: f32,
    /// Pixels per tick
    pub target_speed: f32,
    pub target_hit_points: i32,

    // === Rules ===
    pub max_targets: usize,
    pub miss_threshold: u32,
    pub game_over_policy: GameOverPolicy,

    // === Timers ===
    pub fire_interval_ms: u32,
    pub spawn_interval_ms: u32,
    pub game_over_secs: f32,

    /// Fixed RNG seed (random per session when absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            projectile_width: PROJECTILE_WIDTH,
            projectile_height: PROJECTILE_HEIGHT,
            projectile_speed: PROJECTILE_SPEED,
            target_width: TARGET_WIDTH,
            target_height: TARGET_HEIGHT,
            target_speed: TARGET_SPEED,
            target_hit_points: TARGET_HIT_POINTS,

            max_targets: MAX_TARGETS,
            miss_threshold: MISS_THRESHOLD,
            game_over_policy: GameOverPolicy::KeepRunning,

            fire_interval_ms: FIRE_INTERVAL_MS,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            game_over_secs: GAME_OVER_SECS,

            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check that every value is usable by the simulation
    pub fn validate(&self) -> Result<(), SettingsError> {
        fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(SettingsError::Invalid {
                    field,
                    reason: "must be a positive number",
                })
            }
        }

        positive("field_width", self.field_width)?;
        positive("field_height", self.field_height)?;
        positive("player_width", self.player_width)?;
        positive("player_height", self.player_height)?;
        positive("projectile_width", self.projectile_width)?;
        positive("projectile_height", self.projectile_height)?;
        positive("projectile_speed", self.projectile_speed)?;
        positive("target_width", self.target_width)?;
        positive("target_height", self.target_height)?;
        positive("target_speed", self.target_speed)?;
        positive("game_over_secs", self.game_over_secs)?;

        if self.target_hit_points < 1 {
            return Err(SettingsError::Invalid {
                field: "target_hit_points",
                reason: "must be at least 1",
            });
        }
        if self.max_targets == 0 {
            return Err(SettingsError::Invalid {
                field: "max_targets",
                reason: "must be at least 1",
            });
        }
        if self.miss_threshold == 0 {
            return Err(SettingsError::Invalid {
                field: "miss_threshold",
                reason: "must be at least 1",
            });
        }
        if self.fire_interval_ms == 0 {
            return Err(SettingsError::Invalid {
                field: "fire_interval_ms",
                reason: "must be non-zero",
            });
        }
        if self.spawn_interval_ms == 0 {
            return Err(SettingsError::Invalid {
                field: "spawn_interval_ms",
                reason: "must be non-zero",
            });
        }
        Ok(())
    }

    /// Fire interval in seconds
    pub fn fire_interval_secs(&self) -> f32 {
        self.fire_interval_ms as f32 / 1000.0
    }

    /// Spawn interval in seconds
    pub fn spawn_interval_secs(&self) -> f32 {
        self.spawn_interval_ms as f32 / 1000.0
    }
}
