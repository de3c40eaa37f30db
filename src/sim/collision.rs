//! Circle collision tests
//!
//! Everything in this game is a circle, so the whole collision model is a
//! distance check against a radius (or a radius sum).

use glam::Vec2;

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Point inside or on the circle boundary
#[inline]
pub fn circle_contains_point(center: Vec2, radius: f32, point: Vec2) -> bool {
    sd_circle(point, center, radius) <= 0.0
}

/// Two circles touch or overlap (distance <= radius sum)
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    sd_circle(a, b, b_radius) <= a_radius
}

/// Whether a circle center at `y` has left `[radius, height - radius]`
#[inline]
pub fn outside_vertical_band(y: f32, radius: f32, height: f32) -> bool {
    y < radius || y > height - radius
}

/// Whether `x` has left `[0, width]`
#[inline]
pub fn outside_horizontal_span(x: f32, width: f32) -> bool {
    x < 0.0 || x > width
}
