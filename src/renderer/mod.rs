//! WebGPU rendering module
//!
//! Every entity is a flat-colored rectangle; the scene is rebuilt from the
//! game state each frame.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::{rect, scene};
pub use vertex::{Vertex, field_to_ndc};
