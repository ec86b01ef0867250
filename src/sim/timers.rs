//! Interval timers that feed the event queue
//!
//! Timers run on elapsed simulation seconds, so the outcome depends only on
//! the `dt` sequence fed to the tick and not on frame rate.

use std::collections::VecDeque;

use super::state::SimEvent;
use crate::settings::Settings;

/// Repeating timer that reports how many periods elapsed
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period: f32,
    elapsed: f32,
}

impl IntervalTimer {
    pub fn new(period: f32) -> Self {
        Self {
            period: period.max(f32::EPSILON),
            elapsed: 0.0,
        }
    }

    /// Advance by `dt` seconds, returning the number of completed periods
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.elapsed += dt.max(0.0);
        if self.elapsed < self.period {
            return 0;
        }
        let periods = (self.elapsed / self.period).floor();
        self.elapsed = (self.elapsed - periods * self.period).clamp(0.0, self.period);
        if self.elapsed >= self.period {
            self.elapsed = 0.0;
        }
        // Float-to-int casts saturate
        periods as u32
    }

    pub fn period(&self) -> f32 {
        self.period
    }
}

/// The fire and spawn clocks
#[derive(Debug, Clone)]
pub struct Timers {
    fire: IntervalTimer,
    spawn: IntervalTimer,
}

impl Timers {
    pub fn new(settings: &Settings) -> Self {
        Self {
            fire: IntervalTimer::new(settings.fire_interval_secs()),
            spawn: IntervalTimer::new(settings.spawn_interval_secs()),
        }
    }

    /// Advance both clocks and queue the events they produce. The fire clock
    /// always runs; it only emits while the trigger is held.
    pub fn advance(&mut self, dt: f32, firing: bool, queue: &mut VecDeque<SimEvent>) {
        let shots = self.fire.advance(dt);
        if firing {
            queue.extend(std::iter::repeat_n(SimEvent::Fire, shots as usize));
        }

        let spawns = self.spawn.advance(dt);
        queue.extend(std::iter::repeat_n(SimEvent::SpawnTarget, spawns as usize));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_fires_on_period() {
        let mut timer = IntervalTimer::new(0.5);
        assert_eq!(timer.advance(0.25), 0);
        assert_eq!(timer.advance(0.25), 1);
        assert_eq!(timer.advance(1.0), 2);
        assert_eq!(timer.advance(-3.0), 0);
    }

    #[test]
    fn test_interval_huge_step_is_closed_form() {
        let mut timer = IntervalTimer::new(0.1);
        let fired = timer.advance(1.0e7);
        assert!(fired >= 99_000_000, "fired {fired}");
        assert!(timer.elapsed >= 0.0 && timer.elapsed < timer.period());

        // Still ticks normally afterwards
        let mut timer = IntervalTimer::new(0.5);
        assert_eq!(timer.advance(f32::MAX), u32::MAX);
        assert!(timer.elapsed < timer.period());
        assert_eq!(timer.advance(0.25), 0);
        assert_eq!(timer.advance(0.25), 1);
    }

    #[test]
    fn test_fire_only_while_held() {
        let settings = Settings::default();
        let mut timers = Timers::new(&settings);
        let mut queue = VecDeque::new();

        timers.advance(0.1, false, &mut queue);
        assert!(queue.is_empty());

        timers.advance(0.1, true, &mut queue);
        assert_eq!(queue.iter().filter(|e| **e == SimEvent::Fire).count(), 1);
    }

    #[test]
    fn test_spawn_every_two_seconds() {
        let settings = Settings::default();
        let mut timers = Timers::new(&settings);
        let mut queue = VecDeque::new();

        // 1.5 s of 60 Hz ticks, then another second
        for _ in 0..90 {
            timers.advance(1.0 / 60.0, false, &mut queue);
        }
        assert!(queue.is_empty());
        for _ in 0..60 {
            timers.advance(1.0 / 60.0, false, &mut queue);
        }
        assert_eq!(queue.iter().collect::<Vec<_>>(), vec![&SimEvent::SpawnTarget]);
    }
}
