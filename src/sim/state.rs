//! Game state and core simulation types
//!
//! `GameState` is the single owner of every entity. Rendering and the HUD only
//! borrow it; all mutation goes through the tick.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::rng::{RandomSource, Rgb};
use super::spawner::populate_targets;
use super::timers::Timers;
use crate::platform::input::clamp_player_x;
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Miss threshold reached; banner is up until the reset
    GameOver,
}

/// Events queued for the next tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    /// Launch a projectile from the player
    Fire,
    /// Try to add a target (subject to the live cap)
    SpawnTarget,
}

/// Anything stored in an [`EntityStore`]
pub trait Entity {
    fn id(&self) -> u32;
}

/// Ordered entity collection with removal by id
#[derive(Debug, Clone)]
pub struct EntityStore<T> {
    items: Vec<T>,
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> EntityStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the end of the store
    pub fn add(&mut self, item: T) {
        self.items.push(item);
    }

    /// Remove the first entity with this id
    pub fn remove(&mut self, id: u32) -> Option<T> {
        let index = self.items.iter().position(|e| e.id() == id)?;
        Some(self.items.remove(index))
    }

    pub fn get(&self, id: u32) -> Option<&T> {
        self.items.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.items.retain(keep);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<'a, T: Entity> IntoIterator for &'a EntityStore<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Player {
    pub fn new(size: Vec2, field: Vec2) -> Self {
        let mut player = Self {
            pos: Vec2::ZERO,
            size,
        };
        player.ground(field);
        player
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Center horizontally and sit on the bottom edge
    pub fn ground(&mut self, field: Vec2) {
        self.pos.x = field.x / 2.0 - self.size.x / 2.0;
        self.pos.y = field.y - self.size.y;
    }

    /// Center under the pointer, kept inside the field
    pub fn follow_pointer(&mut self, pointer_x: f32, field_width: f32) {
        self.pos.x = clamp_player_x(pointer_x, field_width, self.size.x);
    }

    /// Muzzle position for a projectile of the given size
    pub fn muzzle(&self, projectile_size: Vec2) -> Vec2 {
        Vec2::new(
            self.pos.x + self.size.x / 2.0 - projectile_size.x / 2.0,
            self.pos.y - projectile_size.y,
        )
    }
}

/// A projectile moving straight up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per tick
    pub speed: f32,
}

impl Entity for Projectile {
    fn id(&self) -> u32 {
        self.id
    }
}

impl Projectile {
    pub fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    pub fn advance(&mut self) {
        self.pos.y -= self.speed;
    }

    /// Fully above the top edge
    pub fn is_off_field(&self) -> bool {
        self.pos.y + self.size.y < 0.0
    }
}

/// A descending target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per tick
    pub speed: f32,
    pub hit_points: i32,
    pub color: Rgb,
}

impl Entity for Target {
    fn id(&self) -> u32 {
        self.id
    }
}

impl Target {
    pub fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    pub fn advance(&mut self) {
        self.pos.y += self.speed;
    }

    pub fn is_alive(&self) -> bool {
        self.hit_points > 0
    }

    /// Past the bottom edge of a field this tall
    pub fn is_past_bottom(&self, field_height: f32) -> bool {
        self.pos.y > field_height
    }
}

/// Score and game-over bookkeeping for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub hits: u32,
    pub misses: u32,
    pub miss_threshold: u32,
    /// Seconds the "Game Over" banner stays up (0 when hidden)
    pub game_over_remaining: f32,
    /// Seconds until the scheduled reset, if one is pending
    pub reset_in: Option<f32>,
}

impl Session {
    pub fn new(miss_threshold: u32) -> Self {
        Self {
            miss_threshold,
            ..Default::default()
        }
    }

    pub fn threshold_reached(&self) -> bool {
        self.misses >= self.miss_threshold
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState<R = Pcg32> {
    pub(crate) settings: Settings,
    /// Current play-field size in pixels
    pub(crate) field: Vec2,
    pub(crate) phase: GamePhase,
    pub(crate) player: Player,
    pub(crate) projectiles: EntityStore<Projectile>,
    pub(crate) targets: EntityStore<Target>,
    pub(crate) session: Session,
    /// Simulation tick counter
    pub(crate) time_ticks: u64,
    pub(crate) events: VecDeque<SimEvent>,
    pub(crate) timers: Timers,
    pub(crate) rng: R,
    next_id: u32,
}

impl GameState<Pcg32> {
    /// Create a new session using a seeded PCG stream
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self::with_rng(settings, Pcg32::seed_from_u64(seed))
    }
}

impl<R: RandomSource> GameState<R> {
    /// Create a new session with the given randomness source and fill the
    /// field with targets
    pub fn with_rng(settings: Settings, rng: R) -> Self {
        let field = Vec2::new(settings.field_width, settings.field_height);
        let player = Player::new(
            Vec2::new(settings.player_width, settings.player_height),
            field,
        );
        let mut state = Self {
            field,
            phase: GamePhase::Playing,
            player,
            projectiles: EntityStore::new(),
            targets: EntityStore::new(),
            session: Session::new(settings.miss_threshold),
            time_ticks: 0,
            events: VecDeque::new(),
            timers: Timers::new(&settings),
            rng,
            next_id: 1,
            settings,
        };

        populate_targets(&mut state);
        log::info!(
            "Session started: field {}x{}, {} targets",
            state.field.x,
            state.field.y,
            state.targets.len()
        );
        state
    }

    /// Clear the field and start a fresh session
    pub fn reset(&mut self) {
        self.projectiles.clear();
        self.targets.clear();
        self.events.clear();
        self.session = Session::new(self.settings.miss_threshold);
        self.phase = GamePhase::Playing;
        self.player.ground(self.field);
        populate_targets(self);
        log::info!("Session reset with {} targets", self.targets.len());
    }
}

impl<R> GameState<R> {
    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Queue an event for the next tick
    pub fn push_event(&mut self, event: SimEvent) {
        self.events.push_back(event);
    }

    /// Launch a projectile from the player's muzzle
    pub fn fire(&mut self) -> u32 {
        let size = Vec2::new(
            self.settings.projectile_width,
            self.settings.projectile_height,
        );
        let id = self.next_entity_id();
        self.projectiles.add(Projectile {
            id,
            pos: self.player.muzzle(size),
            size,
            speed: self.settings.projectile_speed,
        });
        id
    }

    /// Resize the play-field, keeping the player grounded and centered
    pub fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            log::warn!("Ignoring resize to {}x{}", width, height);
            return;
        }
        self.field = Vec2::new(width, height);
        self.player.ground(self.field);
        log::info!("Field resized to {}x{}", width, height);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn field(&self) -> Vec2 {
        self.field
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn projectiles(&self) -> &EntityStore<Projectile> {
        &self.projectiles
    }

    pub fn targets(&self) -> &EntityStore<Target> {
        &self.targets
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Events waiting for the next tick
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }
}
