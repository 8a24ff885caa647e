//! Centralised simulation and rendering constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! `src/config.rs` mirrors every constant into a runtime-loadable
//! [`crate::config::StarfieldConfig`]; this file remains the authoritative
//! default source.

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Window / projection width in pixels.
pub const VIEWPORT_WIDTH: f32 = 1000.0;

/// Window / projection height in pixels.
pub const VIEWPORT_HEIGHT: f32 = 700.0;

/// How far outside the viewport a projected star may drift before it is
/// recycled.  A generous margin keeps steering from visibly "popping" stars
/// at the screen edge.
pub const OFFSCREEN_MARGIN: f32 = 60.0;

// ── Star field ────────────────────────────────────────────────────────────────

/// Number of stars in the fixed pool.  The pool is allocated once at startup;
/// stars are recycled in place, never added or removed.
///
/// Tested range: 300–800.  Above ~2000 the per-frame gizmo trail drawing
/// starts to dominate frame time.
pub const STAR_COUNT: usize = 700;

/// Depth of the near clipping plane.  Stars crossing it are recycled.
pub const NEAR_PLANE: f32 = 1.0;

/// Depth of the far plane.  Recycled stars reappear here.
pub const FAR_PLANE: f32 = 1000.0;

/// Perspective focal length: screen offset = world (x, y) × focal / z.
pub const FOCAL_LENGTH: f32 = 500.0;

/// Radius of the disc (world units, at the far plane) into which recycled
/// stars are respawned.
///
/// Must satisfy `SPAWN_RADIUS × FOCAL_LENGTH / FAR_PLANE < half-viewport +
/// OFFSCREEN_MARGIN`, otherwise a freshly recycled star can immediately
/// project off-screen and recycle again forever.  `validate()` enforces this.
pub const SPAWN_RADIUS: f32 = 400.0;

/// Per-star approach speed range (world units/s), drawn once per spawn.
pub const BASE_SPEED_MIN: f32 = 60.0;
pub const BASE_SPEED_MAX: f32 = 240.0;

/// Per-star point radius range (pixels at projection scale 1.0), drawn once
/// per spawn.
pub const BASE_SIZE_MIN: f32 = 0.8;
pub const BASE_SIZE_MAX: f32 = 3.2;

/// Per-star brightness range, drawn once per spawn.  Scales the colour-ramp
/// input so not every near star saturates to the hot end of the gradient.
pub const BRIGHTNESS_MIN: f32 = 0.6;
pub const BRIGHTNESS_MAX: f32 = 1.0;

/// Rendered point radius clamp (pixels).
pub const MIN_POINT_SIZE: f32 = 0.5;
pub const MAX_POINT_SIZE: f32 = 6.0;

// ── Trails ────────────────────────────────────────────────────────────────────

/// Number of past projected positions kept per star for streak rendering.
/// Oldest point is evicted on insert once the buffer is full.
pub const TRAIL_LENGTH: usize = 6;

// ── Steering ──────────────────────────────────────────────────────────────────

/// Horizontal / vertical steering offset growth rate (px/s at full input).
pub const STEER_RATE_X: f32 = 250.0;
pub const STEER_RATE_Y: f32 = 150.0;

/// Exponential decay rate (1/s) applied to the steering offset when the
/// input is released, easing the field back to centre.
pub const STEER_DECAY: f32 = 8.0;

/// Maximum screen-space steering offset (px) per axis.  This is the "max
/// tilt" of the camera approximation.
pub const MAX_STEER_OFFSET: f32 = 200.0;

// ── Speed modifiers ───────────────────────────────────────────────────────────

/// Speed multiplier while SPACE is held.
pub const BOOST_MULTIPLIER: f32 = 3.5;

/// Spiral wind rate.  Per-star twist angle = rate × elapsed / (radius + ε),
/// so stars near the axis wind faster than outer ones.
pub const SPIRAL_RATE: f32 = 40.0;

/// Guard added to the radius in the spiral angle division so stars on the
/// axis don't spin unboundedly fast.
pub const SPIRAL_EPSILON: f32 = 1.0;

// ── Shooting stars ────────────────────────────────────────────────────────────

/// Per-star, per-frame probability of a Normal star being promoted to a
/// shooting star.  0.002 at 60 fps and 700 stars produces a streak roughly
/// every frame-or-two of wall time; lower it for rarer streaks.
pub const SHOOTING_STAR_PROB: f32 = 0.002;

/// Speed multiplier applied while a star is a shooting star.
/// Tested range: 6.0–10.0.
pub const SHOOTING_SPEED_MULT: f32 = 8.0;

/// Shooting-star lifetime range in frames; the star reverts to Normal on
/// expiry (or earlier, if it recycles first).
pub const SHOOTING_LIFETIME_MIN: u32 = 80;
pub const SHOOTING_LIFETIME_MAX: u32 = 160;

/// Fraction of the depth range above the near plane a star must keep clear
/// of to be eligible for promotion — a star about to recycle would streak
/// for only a frame or two.
pub const SHOOTING_MIN_DEPTH_FRACTION: f32 = 0.1;

// ── Audio reactivity ──────────────────────────────────────────────────────────

/// How strongly the smoothed audio level scales star speed:
/// factor = 1 + level × AUDIO_GAIN.
pub const AUDIO_GAIN: f32 = 0.9;

/// Exponential-moving-average coefficient for the audio envelope, in (0, 1].
/// 1.0 disables smoothing (the raw level passes straight through).
pub const AUDIO_SMOOTHING: f32 = 0.25;

// ── HUD ───────────────────────────────────────────────────────────────────────

pub const HUD_FONT_SIZE: f32 = 16.0;
