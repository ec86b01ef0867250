//! Axis-aligned collision detection and projectile/target resolution
//!
//! Resolution never changes store membership while scanning. It reports what
//! happened and the caller compacts the stores afterwards.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Projectile, Target};

/// Axis-aligned rectangle, origin at the top-left corner (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// Strict AABB overlap test. Rectangles that only share an edge do not overlap.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// One projectile striking one target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub projectile_id: u32,
    pub target_id: u32,
    /// The strike took the target's last hit point
    pub destroyed: bool,
}

/// Resolve every projectile against the targets for this tick
///
/// Projectiles are the outer loop and targets the inner loop, both in store
/// order. A projectile is spent on the first live target it overlaps, which
/// loses one hit point. Targets brought to zero are skipped by every later
/// projectile in the same pass.
pub fn resolve_collisions(projectiles: &[Projectile], targets: &mut [Target]) -> Vec<Hit> {
    let mut hits = Vec::new();

    for projectile in projectiles {
        let bounds = projectile.bounds();
        let struck = targets
            .iter_mut()
            .find(|t| t.is_alive() && overlaps(&bounds, &t.bounds()));

        if let Some(target) = struck {
            target.hit_points -= 1;
            hits.push(Hit {
                projectile_id: projectile.id,
                target_id: target.id,
                destroyed: !target.is_alive(),
            });
        }
    }

    hits
}
