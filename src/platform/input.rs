//! Pointer input adapter
//!
//! Browser callbacks record into an [`InputAdapter`]; the frame loop drains it
//! into a [`TickInput`] once per tick.

use crate::sim::TickInput;

/// Left edge of a player centered under `pointer_x`, kept inside the field
#[inline]
pub fn clamp_player_x(pointer_x: f32, field_width: f32, player_width: f32) -> f32 {
    (pointer_x - player_width / 2.0)
        .min(field_width - player_width)
        .max(0.0)
}

/// Accumulates pointer and window events between ticks
#[derive(Debug, Clone, Default)]
pub struct InputAdapter {
    pointer_x: Option<f32>,
    firing: bool,
    resize: Option<(f32, f32)>,
}

impl InputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer moved to `x` in field coordinates
    pub fn pointer_moved(&mut self, x: f32) {
        self.pointer_x = Some(x);
    }

    pub fn pointer_down(&mut self) {
        self.firing = true;
    }

    pub fn pointer_up(&mut self) {
        self.firing = false;
    }

    /// Window resized; the latest size wins
    pub fn resized(&mut self, width: f32, height: f32) {
        self.resize = Some((width, height));
    }

    pub fn is_firing(&self) -> bool {
        self.firing
    }

    /// Input for the next tick. Pointer and resize are consumed; the trigger
    /// stays held until released.
    pub fn next_input(&mut self) -> TickInput {
        TickInput {
            pointer_x: self.pointer_x.take(),
            firing: self.firing,
            resize: self.resize.take(),
        }
    }
}
