//! Star data and the per-tick advance step.
//!
//! A [`Star`] is a plain-data ECS component: world position, per-spawn
//! random attributes, a kind tag, and a bounded ring of past projected
//! positions for streak rendering.  Behaviour lives in methods driven by
//! [`crate::simulation::star_update_system`] — there is no polymorphism
//! across kinds, just a tagged variant with a different speed multiplier.
//!
//! Nothing here can fail: a star that crosses the near plane or drifts out
//! of view is recycled in place, reusing its slot in the fixed pool.

use crate::config::StarfieldConfig;
use crate::constants::SHOOTING_MIN_DEPTH_FRACTION;
use crate::projection;
use crate::spiral;
use bevy::prelude::*;
use rand::Rng;
use std::collections::VecDeque;
use std::f32::consts::TAU;

/// Star variant tag.  Shooting stars move at a multiplied speed for a
/// finite number of frames, then revert to Normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarKind {
    Normal,
    Shooting {
        /// Frames left before the star reverts to Normal.
        remaining: u32,
    },
}

/// What a single advance step did with the star.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved forward and appended to the trail.
    Advanced,
    /// Crossed the near plane or left the view; recycled in place.
    Recycled,
}

/// Controls sampled once per frame and applied uniformly to every star.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameControls {
    /// Screen-space steering shift (px), already smoothed and clamped.
    pub steer_offset: Vec2,
    /// Boost key held.
    pub boosting: bool,
    /// Spiral transform toggle.
    pub spiral_enabled: bool,
    /// Smoothed audio level, `0.0` when reactivity is off or unavailable.
    pub audio_intensity: f32,
}

/// A single star in the fixed pool.
#[derive(Component)]
pub struct Star {
    /// World position; z stays within (near, far] while alive.
    pub position: Vec3,
    /// Approach speed (world units/s), drawn per spawn.
    pub base_speed: f32,
    /// Point radius at projection scale 1.0, drawn per spawn.
    pub base_size: f32,
    /// Colour-ramp input scale in `[brightness_min, brightness_max]`.
    pub brightness: f32,
    pub kind: StarKind,
    /// Recent projected positions, oldest first, newest last.  Bounded by
    /// the configured trail length; oldest evicted on insert.
    pub trail: VecDeque<Vec2>,
    /// Handle to this star's `ColorMaterial`, written by the renderer's
    /// attach pass one frame after spawn.  `None` in headless runs.
    pub material: Option<Handle<ColorMaterial>>,
}

/// Uniform sample from a disc of the given radius.
fn sample_disc(rng: &mut impl Rng, radius: f32) -> Vec2 {
    let r = radius * rng.gen_range(0.0_f32..1.0).sqrt();
    let theta = rng.gen_range(0.0_f32..TAU);
    Vec2::new(r * theta.cos(), r * theta.sin())
}

impl Star {
    /// Spawn a star at a randomised initial depth.
    ///
    /// The lateral disc is shrunk in proportion to the depth so the opening
    /// frame is already a filled perspective cone rather than a burst of
    /// immediate recycles.
    pub fn spawn(rng: &mut impl Rng, config: &StarfieldConfig) -> Self {
        let z = rng.gen_range(config.far_plane * 0.1..=config.far_plane);
        let xy = sample_disc(rng, config.spawn_radius * (z / config.far_plane));
        Self {
            position: xy.extend(z),
            base_speed: rng.gen_range(config.base_speed_min..=config.base_speed_max),
            base_size: rng.gen_range(config.base_size_min..=config.base_size_max),
            brightness: rng.gen_range(config.brightness_min..=config.brightness_max),
            kind: StarKind::Normal,
            trail: VecDeque::with_capacity(config.trail_length),
            material: None,
        }
    }

    /// Recycle this star in place: fresh lateral position at the far plane,
    /// per-spawn attributes redrawn, trail cleared, kind reset to Normal.
    pub fn respawn(&mut self, rng: &mut impl Rng, config: &StarfieldConfig) {
        let xy = sample_disc(rng, config.spawn_radius);
        self.position = xy.extend(config.far_plane);
        self.base_speed = rng.gen_range(config.base_speed_min..=config.base_speed_max);
        self.base_size = rng.gen_range(config.base_size_min..=config.base_size_max);
        self.brightness = rng.gen_range(config.brightness_min..=config.brightness_max);
        self.kind = StarKind::Normal;
        self.trail.clear();
    }

    /// Approach speed for this frame:
    /// `base × boost × (1 + audio × gain) × kind multiplier`.
    pub fn effective_speed(
        &self,
        boosting: bool,
        audio_intensity: f32,
        config: &StarfieldConfig,
    ) -> f32 {
        let boost = if boosting {
            config.boost_multiplier
        } else {
            1.0
        };
        let audio = 1.0 + audio_intensity.max(0.0) * config.audio_gain;
        let kind = match self.kind {
            StarKind::Normal => 1.0,
            StarKind::Shooting { .. } => config.shooting_speed_mult,
        };
        self.base_speed * boost * audio * kind
    }

    /// Advance one tick: move toward the camera, apply the spiral view
    /// transform, project, and either append to the trail or recycle.
    pub fn advance(
        &mut self,
        dt: f32,
        elapsed: f32,
        controls: &FrameControls,
        config: &StarfieldConfig,
        rng: &mut impl Rng,
    ) -> StepOutcome {
        let speed = self.effective_speed(controls.boosting, controls.audio_intensity, config);
        self.position.z -= speed * dt;

        let viewed = spiral::apply_spiral(
            self.position,
            elapsed,
            controls.spiral_enabled,
            config.spiral_rate,
        );
        match projection::project(viewed, controls.steer_offset, config) {
            Some((screen, _scale)) => {
                while self.trail.len() >= config.trail_length {
                    self.trail.pop_front();
                }
                self.trail.push_back(screen);
                if let StarKind::Shooting { remaining } = &mut self.kind {
                    *remaining = remaining.saturating_sub(1);
                    if *remaining == 0 {
                        self.kind = StarKind::Normal;
                    }
                }
                StepOutcome::Advanced
            }
            None => {
                self.respawn(rng, config);
                StepOutcome::Recycled
            }
        }
    }

    /// Roll the per-frame promotion chance.  Only Normal stars that are not
    /// already close to the near plane are eligible.
    pub fn maybe_promote(&mut self, rng: &mut impl Rng, config: &StarfieldConfig) {
        if self.kind != StarKind::Normal || config.shooting_star_prob <= 0.0 {
            return;
        }
        let depth_floor = config.near_plane
            + (config.far_plane - config.near_plane) * SHOOTING_MIN_DEPTH_FRACTION;
        if self.position.z <= depth_floor {
            return;
        }
        if rng.gen_bool(f64::from(config.shooting_star_prob.min(1.0))) {
            self.kind = StarKind::Shooting {
                remaining: rng
                    .gen_range(config.shooting_lifetime_min..=config.shooting_lifetime_max),
            };
        }
    }
}
