//! Shape generation for 2D primitives

use super::vertex::{Vertex, colors};
use crate::sim::{GameState, Rect};

/// Generate vertices for a filled axis-aligned rectangle (two triangles)
pub fn rect(bounds: &Rect, color: [f32; 4]) -> [Vertex; 6] {
    let (l, r, t, b) = (bounds.left(), bounds.right(), bounds.top(), bounds.bottom());
    [
        Vertex::new(l, t, color),
        Vertex::new(l, b, color),
        Vertex::new(r, t, color),
        Vertex::new(r, t, color),
        Vertex::new(l, b, color),
        Vertex::new(r, b, color),
    ]
}

/// Build the whole scene in field coordinates: player, projectiles, targets
pub fn scene<R>(state: &GameState<R>) -> Vec<Vertex> {
    let count = 1 + state.projectiles().len() + state.targets().len();
    let mut vertices = Vec::with_capacity(count * 6);

    vertices.extend(rect(&state.player().bounds(), colors::PLAYER));
    for projectile in state.projectiles() {
        vertices.extend(rect(&projectile.bounds(), colors::PROJECTILE));
    }
    for target in state.targets() {
        vertices.extend(rect(&target.bounds(), target.color.to_rgba()));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{ScriptedRandom, SimEvent, TickInput, tick};

    #[test]
    fn test_rect_covers_bounds() {
        let verts = rect(&Rect::new(10.0, 20.0, 30.0, 40.0), [1.0; 4]);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 60.0);
    }

    #[test]
    fn test_scene_has_one_quad_per_entity() {
        let mut state = GameState::with_rng(Settings::default(), ScriptedRandom::constant(0.0));
        state.push_event(SimEvent::Fire);
        tick(&mut state, &TickInput::default(), crate::consts::SIM_DT);

        let verts = scene(&state);
        assert_eq!(verts.len(), (1 + 1 + 3) * 6);
        assert_eq!(verts[0].color, colors::PLAYER);
        assert_eq!(verts[6].color, colors::PROJECTILE);
    }
}
