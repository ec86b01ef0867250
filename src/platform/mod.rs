//! Platform abstraction layer
//!
//! Turns raw pointer and window events into per-tick simulation input.

pub mod input;

pub use input::{InputAdapter, clamp_player_x};
