//! Starfield plugin and the per-frame advance system.
//!
//! One ordered `Update` chain owns the whole tick: clear input → read
//! keyboard → apply toggles → steer camera → fold audio level → advance
//! every star.  Rendering runs after (see [`crate::rendering`]), so a frame
//! is always advance-then-draw with no suspension in between.

use crate::audio::{audio_envelope_system, AudioEnvelope, AudioLevel, AudioSupport};
use crate::config::StarfieldConfig;
use crate::control::{
    apply_intent_to_camera_system, intent_clear_system, keyboard_to_intent_system,
    toggle_keys_system, FlightIntent, VisualToggles,
};
use crate::projection::FlightCamera;
use crate::star::{FrameControls, Star};
use bevy::prelude::*;

pub struct StarfieldPlugin;

impl Plugin for StarfieldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FlightIntent>()
            .init_resource::<VisualToggles>()
            .init_resource::<FlightCamera>()
            .init_resource::<AudioLevel>()
            .init_resource::<AudioSupport>()
            .add_systems(Startup, (init_audio_envelope, spawn_starfield))
            .add_systems(
                Update,
                (
                    intent_clear_system,
                    keyboard_to_intent_system,
                    toggle_keys_system,
                    apply_intent_to_camera_system,
                    audio_envelope_system,
                    star_update_system,
                )
                    .chain(),
            );
    }
}

// ── Startup systems ───────────────────────────────────────────────────────────

/// Create the audio envelope with the configured smoothing coefficient.
fn init_audio_envelope(mut commands: Commands, config: Res<StarfieldConfig>) {
    commands.insert_resource(AudioEnvelope::new(config.audio_smoothing));
}

/// Spawn the fixed star pool.
///
/// Every star entity created here lives for the whole process; the update
/// system recycles them in place, so the per-frame path never allocates or
/// despawns.
pub fn spawn_starfield(mut commands: Commands, config: Res<StarfieldConfig>) {
    let mut rng = rand::thread_rng();
    for _ in 0..config.star_count {
        commands.spawn((
            Star::spawn(&mut rng, &config),
            Transform::default(),
            Visibility::Hidden,
        ));
    }
    info!("spawned {} stars", config.star_count);
}

// ── Update system ─────────────────────────────────────────────────────────────

/// Advance every star by one tick under this frame's controls.
///
/// Cannot fail: stars that cross the near plane or leave the view are
/// recycled inside [`Star::advance`].  Shooting-star promotion is rolled
/// here, before the move, so a freshly promoted star streaks on the same
/// frame.
pub fn star_update_system(
    time: Res<Time>,
    config: Res<StarfieldConfig>,
    camera: Res<FlightCamera>,
    toggles: Res<VisualToggles>,
    envelope: Res<AudioEnvelope>,
    mut stars: Query<&mut Star>,
) {
    let dt = time.delta_secs();
    let elapsed = time.elapsed_secs();
    let controls = FrameControls {
        steer_offset: camera.steer_offset,
        boosting: camera.boosting,
        spiral_enabled: toggles.spiral,
        audio_intensity: if toggles.audio { envelope.level() } else { 0.0 },
    };

    let mut rng = rand::thread_rng();
    for mut star in stars.iter_mut() {
        star.maybe_promote(&mut rng, &config);
        star.advance(dt, elapsed, &controls, &config, &mut rng);
    }
}
