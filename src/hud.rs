//! HUD overlay model
//!
//! The frontend writes these strings into DOM elements over the canvas.

use crate::sim::GameState;

/// Everything the overlay shows for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct HudView {
    /// Top-right hit counter
    pub hits_label: String,
    /// Centered "Game Over" banner
    pub game_over_visible: bool,
    pub game_over_remaining: f32,
}

impl HudView {
    pub const GAME_OVER_TEXT: &'static str = "Game Over";

    pub fn from_state<R>(state: &GameState<R>) -> Self {
        let session = state.session();
        Self {
            hits_label: format!("Hit Enemies: {}", session.hits),
            game_over_visible: session.game_over_remaining > 0.0,
            game_over_remaining: session.game_over_remaining,
        }
    }
}
