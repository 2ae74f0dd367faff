/*
 * Torus Module
 *
 * The world wraps on both axes. The boid wrap step and the spatial grid both
 * go through these helpers so the seam is handled the same way everywhere.
 */

use glam::Vec2;

/// Fold `value` into `[0, extent)`.
#[inline]
pub fn wrap_coordinate(value: f32, extent: f32) -> f32 {
    let wrapped = value.rem_euclid(extent);
    // rem_euclid rounds tiny negatives up to `extent` itself
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

#[inline]
pub fn wrap_position(position: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        wrap_coordinate(position.x, width),
        wrap_coordinate(position.y, height),
    )
}

// Shortest signed distance along one axis of a ring of length `extent`.
#[inline]
fn shortest_axis(delta: f32, extent: f32) -> f32 {
    delta - extent * (delta / extent).round()
}

/// Shortest vector from `from` to `to` when both edges wrap.
#[inline]
pub fn toroidal_delta(from: Vec2, to: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        shortest_axis(to.x - from.x, width),
        shortest_axis(to.y - from.y, height),
    )
}
