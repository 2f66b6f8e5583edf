//! Attack Geometry & Collision
//!
//! Shape representations for the four attack variants plus the intersection
//! checks used at the strike instant. All collision happens on the 2D arena
//! plane; fighters are circles with an axis-aligned bounding square.

use bevy::math::{Rect, Vec2};
use std::f32::consts::{PI, TAU};

/// The collision shape of an attack at a given instant.
///
/// Telegraphed variants rebuild their geometry every tick while growing;
/// the variant locked in at the strike instant is what collision uses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttackGeometry {
    /// Line segment from attacker toward (but short of) the target center.
    Segment { start: Vec2, end: Vec2 },
    /// Oriented rectangle extending `length` along `angle` from `origin`,
    /// `width` across.
    Sweep {
        origin: Vec2,
        angle: f32,
        length: f32,
        width: f32,
    },
    /// Circle centered on the attacker (pulse) or pre-placed (zone).
    Circle { center: Vec2, radius: f32 },
}

impl AttackGeometry {
    /// Does this shape touch a fighter standing at `position` with `radius`?
    pub fn touches_fighter(&self, position: Vec2, radius: f32) -> bool {
        match *self {
            AttackGeometry::Segment { start, end } => {
                segment_intersects_circle(start, end, position, radius)
            }
            AttackGeometry::Sweep {
                origin,
                angle,
                length,
                width,
            } => {
                let bounds = Rect::from_center_half_size(position, Vec2::splat(radius));
                sweep_overlaps_rect(origin, angle, length, width, bounds)
            }
            AttackGeometry::Circle { center, radius: r } => {
                circles_overlap(center, r, position, radius)
            }
        }
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Angle in radians from `a` to `b`, in `[-PI, PI]`.
pub fn angle_between(a: Vec2, b: Vec2) -> f32 {
    let delta = b - a;
    delta.y.atan2(delta.x)
}

/// Wrap an angle to `[-PI, PI]`.
pub fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Move `current` toward `target` along the shortest angular path by
/// `factor` of the remaining difference. Never overshoots; result is
/// wrapped to `[-PI, PI]`.
pub fn approach_angle(current: f32, target: f32, factor: f32) -> f32 {
    let diff = wrap_angle(target - current);
    wrap_angle(current + diff * factor.clamp(0.0, 1.0))
}

/// True if the segment `a`-`b` passes within `radius` of `center`.
pub fn segment_intersects_circle(a: Vec2, b: Vec2, center: Vec2, radius: f32) -> bool {
    let ab = b - a;
    let len_sq = ab.length_squared();
    // Degenerate segment: treat as a point check
    if len_sq <= f32::EPSILON {
        return distance(a, center) <= radius;
    }
    let t = ((center - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;
    distance(closest, center) <= radius
}

/// True if two circles overlap (touching counts).
pub fn circles_overlap(center_a: Vec2, radius_a: f32, center_b: Vec2, radius_b: f32) -> bool {
    distance(center_a, center_b) <= radius_a + radius_b
}

/// True if an oriented sweep rectangle overlaps an axis-aligned rect.
///
/// The sweep extends `length` along `angle` from `origin` and is `width`
/// across. Separating axis test over the four candidate axes (two from
/// each rectangle).
pub fn sweep_overlaps_rect(origin: Vec2, angle: f32, length: f32, width: f32, rect: Rect) -> bool {
    let dir = Vec2::new(angle.cos(), angle.sin());
    let perp = Vec2::new(-dir.y, dir.x);
    let half_width = width * 0.5;

    let sweep_corners = [
        origin + perp * half_width,
        origin - perp * half_width,
        origin + dir * length - perp * half_width,
        origin + dir * length + perp * half_width,
    ];
    let rect_corners = [
        rect.min,
        Vec2::new(rect.max.x, rect.min.y),
        rect.max,
        Vec2::new(rect.min.x, rect.max.y),
    ];

    let axes = [Vec2::X, Vec2::Y, dir, perp];
    for axis in axes {
        let (a_min, a_max) = project(&sweep_corners, axis);
        let (b_min, b_max) = project(&rect_corners, axis);
        if a_max < b_min || b_max < a_min {
            return false;
        }
    }
    true
}

fn project(corners: &[Vec2; 4], axis: Vec2) -> (f32, f32) {
    let mut min = f32::MAX;
    let mut max = f32::MIN;
    for corner in corners {
        let d = corner.dot(axis);
        min = min.min(d);
        max = max.max(d);
    }
    (min, max)
}
