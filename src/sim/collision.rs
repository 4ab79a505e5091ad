//! Collision detection helpers
//!
//! Everything in both games is a circle, a line segment (beams and the ray
//! gun), or the rectangular arena. These are the only tests the tick loops
//! need.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Circle-circle overlap: `distance(centers) < r1 + r2`
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a.distance_squared(b) < reach * reach
}

/// Closest point to `p` on the segment `start..end`
pub fn closest_point_on_segment(p: Vec2, start: Vec2, end: Vec2) -> Vec2 {
    let line_vec = end - start;
    let line_len_sq = line_vec.length_squared();

    if line_len_sq < 0.0001 {
        return start; // Degenerate segment
    }

    let t = ((p - start).dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
    start + line_vec * t
}

/// Distance from `p` to the segment `start..end`
#[inline]
pub fn point_segment_distance(p: Vec2, start: Vec2, end: Vec2) -> f32 {
    (p - closest_point_on_segment(p, start, end)).length()
}

/// Segment vs. circle: returns the contact point on the segment when the
/// circle center lies closer than `reach` to it
pub fn segment_hits_circle(start: Vec2, end: Vec2, center: Vec2, reach: f32) -> Option<Vec2> {
    let closest = closest_point_on_segment(center, start, end);
    if (closest - center).length() < reach {
        Some(closest)
    } else {
        None
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Axis-aligned arena rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Whether `p` lies strictly inside the rectangle grown by `margin`
    pub fn contains_with_margin(&self, p: Vec2, margin: f32) -> bool {
        p.x > self.min.x - margin
            && p.x < self.max.x + margin
            && p.y > self.min.y - margin
            && p.y < self.max.y + margin
    }

    /// Clamp a circle so it stays `inset` inside the walls
    pub fn clamp_circle(&self, p: Vec2, inset: f32) -> Vec2 {
        let lo = self.min + Vec2::splat(inset);
        let hi = (self.max - Vec2::splat(inset)).max(lo);
        p.clamp(lo, hi)
    }

    /// Reflect `vel` off any wall `pos` touches while heading outward.
    ///
    /// Returns the number of walls contacted (0, 1, or 2 in a corner). A
    /// point already heading back inside is not reflected again, so one
    /// contact counts once.
    pub fn bounce(&self, pos: Vec2, vel: &mut Vec2) -> u32 {
        let mut contacts = 0;
        if (pos.x <= self.min.x && vel.x < 0.0) || (pos.x >= self.max.x && vel.x > 0.0) {
            *vel = reflect_velocity(*vel, Vec2::X);
            contacts += 1;
        }
        if (pos.y <= self.min.y && vel.y < 0.0) || (pos.y >= self.max.y && vel.y > 0.0) {
            *vel = reflect_velocity(*vel, Vec2::Y);
            contacts += 1;
        }
        contacts
    }
}
