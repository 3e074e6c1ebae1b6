//! Collision detection for rectangles, the player's circular hitbox and beams
//!
//! Every rectangle is an axis-aligned box given by its top-left corner and
//! size. Each side may carry a hitbox scale that inflates it about its own
//! center before testing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle with an optional hitbox inflation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Multiplier applied about the center (1.0 = visual size)
    pub scale: f32,
}

impl Hitbox {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            scale: 1.0,
        }
    }

    pub fn scaled(pos: Vec2, size: Vec2, scale: f32) -> Self {
        Self { pos, size, scale }
    }

    /// The rectangle after applying the hitbox scale: (min corner, max corner)
    #[inline]
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let scaled = self.size * self.scale;
        let min = self.pos - (scaled - self.size) / 2.0;
        (min, min + scaled)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// Strict overlap of two (scaled) rectangles. Touching edges do not count.
pub fn rects_overlap(a: &Hitbox, b: &Hitbox) -> bool {
    let (a_min, a_max) = a.bounds();
    let (b_min, b_max) = b.bounds();
    a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
}

/// Circle vs (scaled) rectangle.
///
/// True iff the squared distance from the circle center to the closest point
/// of the rectangle is less than the squared radius.
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Hitbox) -> bool {
    let (min, max) = rect.bounds();
    let closest = center.clamp(min, max);
    center.distance_squared(closest) < radius * radius
}

/// Closest point to `p` on the segment `start..end`
pub fn closest_point_on_segment(p: Vec2, start: Vec2, end: Vec2) -> Vec2 {
    let seg = end - start;
    let len_sq = seg.length_squared();
    if len_sq == 0.0 {
        return start; // Degenerate segment
    }
    let t = ((p - start).dot(seg) / len_sq).clamp(0.0, 1.0);
    start + seg * t
}

/// Beam vs circle: does a beam of `beam_width` along `start..end` touch the circle?
pub fn beam_hits_circle(
    start: Vec2,
    end: Vec2,
    beam_width: f32,
    center: Vec2,
    radius: f32,
) -> bool {
    let closest = closest_point_on_segment(center, start, end);
    center.distance(closest) < radius + beam_width / 2.0
}
