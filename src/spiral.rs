//! Galaxy-spiral view transform.
//!
//! When enabled, each star's (x, y) is rotated by an angle that grows with
//! elapsed time and shrinks with distance from the axis, so the inner field
//! winds faster than the rim.  The transform is applied to a *copy* of the
//! position just before projection; stored positions are never mutated, so
//! the twist is fully determined by the elapsed time and never compounds.

use crate::constants::SPIRAL_EPSILON;
use bevy::prelude::*;

/// Rotate `position`'s (x, y) around the z axis by
/// `rate × elapsed / (radius + ε)`.  Identity when disabled.
pub fn apply_spiral(position: Vec3, elapsed: f32, enabled: bool, rate: f32) -> Vec3 {
    if !enabled || rate == 0.0 {
        return position;
    }
    let radius = position.truncate().length();
    let angle = rate * elapsed / (radius + SPIRAL_EPSILON);
    let (sin, cos) = angle.sin_cos();
    Vec3::new(
        position.x * cos - position.y * sin,
        position.x * sin + position.y * cos,
        position.z,
    )
}
