//! Perspective projection and the flight camera.
//!
//! The camera sits at the origin looking down +z.  Steering does not rotate
//! it: the projected field is shifted in screen space instead, which is the
//! cheap tilt approximation this effect has always used.  Screen coordinates
//! are viewport-centred (`(0, 0)` is the middle of the window), matching
//! Bevy's `Camera2d` world space so projected points can be written straight
//! into a `Transform`.

use crate::config::StarfieldConfig;
use bevy::prelude::*;

/// Virtual flight camera state, mutated once per frame by the input
/// pipeline in [`crate::control`] and read by the star update pass.
#[derive(Resource, Debug, Default)]
pub struct FlightCamera {
    /// Screen-space shift applied to every projected star (px), clamped to
    /// the configured max per axis.
    pub steer_offset: Vec2,
    /// Whether the boost key is held this frame.
    pub boosting: bool,
}

/// Project a world-space position into viewport-centred screen space.
///
/// Returns the screen point plus the perspective scale `focal / z`, which
/// doubles as the size/brightness factor (closer = larger).  Returns `None`
/// when the position is at or behind the near plane, or when the projected
/// point lands outside the viewport bounds plus the configured margin —
/// the caller treats either as "recycle this star", not as an error.
pub fn project(
    position: Vec3,
    steer_offset: Vec2,
    config: &StarfieldConfig,
) -> Option<(Vec2, f32)> {
    if position.z <= config.near_plane {
        return None;
    }
    let scale = config.focal_length / position.z;
    let screen = position.truncate() * scale + steer_offset;

    let max_x = config.viewport_width / 2.0 + config.offscreen_margin;
    let max_y = config.viewport_height / 2.0 + config.offscreen_margin;
    if screen.x.abs() > max_x || screen.y.abs() > max_y {
        return None;
    }
    Some((screen, scale))
}

/// Rendered point radius for a star: perspective scale times the per-star
/// base size, clamped to the configured pixel range.
pub fn point_size(scale: f32, base_size: f32, config: &StarfieldConfig) -> f32 {
    (scale * base_size).clamp(config.min_point_size, config.max_point_size)
}
