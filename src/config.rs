//! Runtime configuration loaded from `assets/starfield.toml`.
//!
//! [`StarfieldConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`StarfieldConfig::load_or_default`]
//! reads `assets/starfield.toml` and overwrites the defaults with any values
//! present in the file.  Missing keys fall back to the compile-time defaults,
//! so a minimal TOML can override just the values you care about.
//!
//! The loaded config is validated once with [`StarfieldConfig::validate`]
//! before the app loop starts and is immutable afterwards.

use crate::constants::*;
use crate::error::{
    validate_multiplier, validate_positive, validate_probability, validate_smoothing, SimError,
    SimResult,
};
use bevy::prelude::*;
use serde::Deserialize;

/// Runtime-tunable starfield configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset by setting the value in
/// `assets/starfield.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    // ── Viewport ─────────────────────────────────────────────────────────────
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub offscreen_margin: f32,

    // ── Star field ───────────────────────────────────────────────────────────
    pub star_count: usize,
    pub near_plane: f32,
    pub far_plane: f32,
    pub focal_length: f32,
    pub spawn_radius: f32,
    pub base_speed_min: f32,
    pub base_speed_max: f32,
    pub base_size_min: f32,
    pub base_size_max: f32,
    pub brightness_min: f32,
    pub brightness_max: f32,
    pub min_point_size: f32,
    pub max_point_size: f32,

    // ── Trails ───────────────────────────────────────────────────────────────
    pub trail_length: usize,

    // ── Steering ─────────────────────────────────────────────────────────────
    pub steer_rate_x: f32,
    pub steer_rate_y: f32,
    pub steer_decay: f32,
    pub max_steer_offset: f32,

    // ── Speed modifiers ──────────────────────────────────────────────────────
    pub boost_multiplier: f32,
    pub spiral_rate: f32,

    // ── Shooting stars ───────────────────────────────────────────────────────
    pub shooting_star_prob: f32,
    pub shooting_speed_mult: f32,
    pub shooting_lifetime_min: u32,
    pub shooting_lifetime_max: u32,

    // ── Audio reactivity ─────────────────────────────────────────────────────
    pub audio_gain: f32,
    pub audio_smoothing: f32,

    // ── HUD ──────────────────────────────────────────────────────────────────
    pub hud_font_size: f32,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            // Viewport
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            offscreen_margin: OFFSCREEN_MARGIN,
            // Star field
            star_count: STAR_COUNT,
            near_plane: NEAR_PLANE,
            far_plane: FAR_PLANE,
            focal_length: FOCAL_LENGTH,
            spawn_radius: SPAWN_RADIUS,
            base_speed_min: BASE_SPEED_MIN,
            base_speed_max: BASE_SPEED_MAX,
            base_size_min: BASE_SIZE_MIN,
            base_size_max: BASE_SIZE_MAX,
            brightness_min: BRIGHTNESS_MIN,
            brightness_max: BRIGHTNESS_MAX,
            min_point_size: MIN_POINT_SIZE,
            max_point_size: MAX_POINT_SIZE,
            // Trails
            trail_length: TRAIL_LENGTH,
            // Steering
            steer_rate_x: STEER_RATE_X,
            steer_rate_y: STEER_RATE_Y,
            steer_decay: STEER_DECAY,
            max_steer_offset: MAX_STEER_OFFSET,
            // Speed modifiers
            boost_multiplier: BOOST_MULTIPLIER,
            spiral_rate: SPIRAL_RATE,
            // Shooting stars
            shooting_star_prob: SHOOTING_STAR_PROB,
            shooting_speed_mult: SHOOTING_SPEED_MULT,
            shooting_lifetime_min: SHOOTING_LIFETIME_MIN,
            shooting_lifetime_max: SHOOTING_LIFETIME_MAX,
            // Audio reactivity
            audio_gain: AUDIO_GAIN,
            audio_smoothing: AUDIO_SMOOTHING,
            // HUD
            hud_font_size: HUD_FONT_SIZE,
        }
    }
}

impl StarfieldConfig {
    /// Attempt to load the config file at `path`, falling back to compiled
    /// defaults.
    ///
    /// Missing keys retain their compiled defaults.  TOML parse errors are
    /// printed to stderr but do not abort — the defaults are known-good.  A
    /// missing file is silently fine.
    pub fn load_or_default(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<StarfieldConfig>(&contents) {
                Ok(loaded) => {
                    println!("✓ Loaded starfield config from {path}");
                    loaded
                }
                Err(e) => {
                    eprintln!("⚠ Failed to parse {path}: {e}; using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                println!("ℹ No {path} found; using compiled defaults");
                Self::default()
            }
        }
    }

    /// Validate every configured value once, before the app loop starts.
    ///
    /// Returns the first violation found; the caller is expected to log it
    /// and exit rather than run with a broken configuration.
    pub fn validate(&self) -> SimResult<()> {
        if self.star_count == 0 {
            return Err(SimError::EmptyStarPool);
        }
        if !(self.near_plane > 0.0 && self.near_plane < self.far_plane) {
            return Err(SimError::PlaneOrdering {
                near: self.near_plane,
                far: self.far_plane,
            });
        }
        validate_positive("focal_length", self.focal_length)?;
        validate_positive("viewport_width", self.viewport_width)?;
        validate_positive("viewport_height", self.viewport_height)?;
        validate_positive("spawn_radius", self.spawn_radius)?;
        validate_positive("base_speed_min", self.base_speed_min)?;
        validate_positive("trail_length", self.trail_length as f32)?;
        validate_multiplier("boost_multiplier", self.boost_multiplier)?;
        validate_multiplier("shooting_speed_mult", self.shooting_speed_mult)?;
        validate_probability("shooting_star_prob", self.shooting_star_prob)?;
        validate_smoothing("audio_smoothing", self.audio_smoothing)?;
        if self.base_speed_max < self.base_speed_min {
            return Err(SimError::UnsafeConstant {
                name: "base_speed_max",
                value: self.base_speed_max,
                safe_range: "[base_speed_min, ∞)",
            });
        }
        if self.shooting_lifetime_max < self.shooting_lifetime_min {
            return Err(SimError::UnsafeConstant {
                name: "shooting_lifetime_max",
                value: self.shooting_lifetime_max as f32,
                safe_range: "[shooting_lifetime_min, ∞)",
            });
        }
        // Recycled stars reappear inside the spawn disc at the far plane;
        // their first projection must land inside the viewport margin or
        // they would recycle again immediately.
        let projected = self.spawn_radius * self.focal_length / self.far_plane;
        let limit = self.viewport_width.min(self.viewport_height) / 2.0 + self.offscreen_margin;
        if projected >= limit {
            return Err(SimError::SpawnDiscTooWide { projected, limit });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(StarfieldConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_star_count_is_rejected() {
        let config = StarfieldConfig {
            star_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimError::EmptyStarPool)
        ));
    }

    #[test]
    fn inverted_planes_are_rejected() {
        let config = StarfieldConfig {
            near_plane: 100.0,
            far_plane: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimError::PlaneOrdering { .. })
        ));
    }

    #[test]
    fn nonpositive_focal_length_is_rejected() {
        let config = StarfieldConfig {
            focal_length: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_spawn_disc_is_rejected() {
        // Projects 1000 px from centre at the far plane — far beyond the
        // 410 px half-viewport + margin of the default 1000×700 window.
        let config = StarfieldConfig {
            spawn_radius: 2000.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimError::SpawnDiscTooWide { .. })
        ));
    }

    #[test]
    fn probability_above_one_is_rejected() {
        let config = StarfieldConfig {
            shooting_star_prob: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn minimal_toml_overrides_only_named_keys() {
        let config: StarfieldConfig =
            toml::from_str("star_count = 42\nboost_multiplier = 2.0").unwrap();
        assert_eq!(config.star_count, 42);
        assert_eq!(config.boost_multiplier, 2.0);
        assert_eq!(config.far_plane, FAR_PLANE);
    }
}
