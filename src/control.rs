//! Keyboard input and camera steering.
//!
//! ## Pipeline (runs in order every `Update` frame)
//!
//! 1. [`intent_clear_system`] — resets [`FlightIntent`] to zero.
//! 2. [`keyboard_to_intent_system`] — translates arrow keys / SPACE into intent.
//! 3. [`toggle_keys_system`] — edge-triggered mode toggles and quit.
//! 4. [`apply_intent_to_camera_system`] — integrates intent into the
//!    [`FlightCamera`] steering offset with decay and clamping.
//!
//! The **input abstraction layer** (`FlightIntent`) makes the steering logic
//! fully testable: tests populate the resource directly and run only the
//! apply step.

use crate::audio::AudioSupport;
use crate::config::StarfieldConfig;
use crate::projection::FlightCamera;
use crate::star::Star;
use bevy::input::ButtonInput;
use bevy::prelude::*;

// ── Resources ─────────────────────────────────────────────────────────────────

/// Per-frame flight input, rebuilt from scratch each tick.
#[derive(Resource, Debug, Clone, Default)]
pub struct FlightIntent {
    /// Horizontal steering in `[-1, 1]`; positive shifts the field right.
    pub steer_x: f32,
    /// Vertical steering in `[-1, 1]`; positive shifts the field up.
    pub steer_y: f32,
    /// Boost key held.
    pub boost: bool,
}

/// Latched visual modes flipped by the toggle keys.
#[derive(Resource, Debug, Clone)]
pub struct VisualToggles {
    pub trails: bool,
    pub color: bool,
    pub spiral: bool,
    pub audio: bool,
}

impl Default for VisualToggles {
    fn default() -> Self {
        Self {
            trails: true,
            color: true,
            spiral: false,
            audio: false,
        }
    }
}

// ── Step 1: Clear ─────────────────────────────────────────────────────────────

/// Reset [`FlightIntent`] at the start of every frame.  Must run before any
/// system that writes to it.
pub fn intent_clear_system(mut intent: ResMut<FlightIntent>) {
    *intent = FlightIntent::default();
}

// ── Step 2: Keyboard → Intent ─────────────────────────────────────────────────

/// Translate held keys into [`FlightIntent`].
///
/// - **Arrow keys** → steering axes
/// - **SPACE** → boost
pub fn keyboard_to_intent_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut intent: ResMut<FlightIntent>,
) {
    if keys.pressed(KeyCode::ArrowLeft) {
        intent.steer_x -= 1.0;
    }
    if keys.pressed(KeyCode::ArrowRight) {
        intent.steer_x += 1.0;
    }
    if keys.pressed(KeyCode::ArrowDown) {
        intent.steer_y -= 1.0;
    }
    if keys.pressed(KeyCode::ArrowUp) {
        intent.steer_y += 1.0;
    }
    intent.boost = keys.pressed(KeyCode::Space);
}

// ── Step 3: Mode toggles ──────────────────────────────────────────────────────

/// Edge-triggered toggles:
///
/// - **S** → spiral motion
/// - **T** → trails (clears every trail buffer when turning off)
/// - **C** → colour gradient vs monochrome
/// - **A** → audio reactivity (warns when no capture backend is available)
/// - **Q / ESC** → quit
pub fn toggle_keys_system(
    keys: Res<ButtonInput<KeyCode>>,
    audio_support: Res<AudioSupport>,
    mut toggles: ResMut<VisualToggles>,
    mut stars: Query<&mut Star>,
    mut exit: MessageWriter<AppExit>,
) {
    if keys.just_pressed(KeyCode::KeyS) {
        toggles.spiral = !toggles.spiral;
        info!("spiral: {}", toggles.spiral);
    }
    if keys.just_pressed(KeyCode::KeyT) {
        toggles.trails = !toggles.trails;
        if !toggles.trails {
            for mut star in stars.iter_mut() {
                star.trail.clear();
            }
        }
        info!("trails: {}", toggles.trails);
    }
    if keys.just_pressed(KeyCode::KeyC) {
        toggles.color = !toggles.color;
        info!("colour mode: {}", toggles.color);
    }
    if keys.just_pressed(KeyCode::KeyA) {
        if audio_support.available {
            toggles.audio = !toggles.audio;
            info!("audio reactivity: {}", toggles.audio);
        } else {
            warn!("audio reactivity unavailable — build with `--features audio` and a working input device");
        }
    }
    if keys.just_pressed(KeyCode::KeyQ) || keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}

// ── Step 4: Intent → Camera ───────────────────────────────────────────────────

/// Integrate steering input into the camera's screen-space offset.
///
/// The offset grows at the configured rate while a key is held and decays
/// exponentially once released, easing the field back to centre.  Each axis
/// is clamped to the configured max tilt.
pub fn apply_intent_to_camera_system(
    time: Res<Time>,
    intent: Res<FlightIntent>,
    config: Res<StarfieldConfig>,
    mut camera: ResMut<FlightCamera>,
) {
    let dt = time.delta_secs();
    camera.steer_offset.x += intent.steer_x.clamp(-1.0, 1.0) * config.steer_rate_x * dt;
    camera.steer_offset.y += intent.steer_y.clamp(-1.0, 1.0) * config.steer_rate_y * dt;
    camera.steer_offset *= (1.0 - config.steer_decay * dt).max(0.0);

    let max = Vec2::splat(config.max_steer_offset);
    camera.steer_offset = camera.steer_offset.clamp(-max, max);
    camera.boosting = intent.boost;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a minimal Bevy `App` with just the resources needed to test the
    /// FlightIntent → camera step, without windowing or rendering.
    fn build_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(StarfieldConfig::default());
        app.init_resource::<FlightIntent>();
        app.init_resource::<FlightCamera>();
        app.add_systems(Update, apply_intent_to_camera_system);
        app
    }

    /// Run a handful of frames with the given intent held.
    fn run_frames(app: &mut App, intent: FlightIntent, frames: usize) {
        app.insert_resource(intent);
        for _ in 0..frames {
            app.update();
            // Real time between headless updates is tiny; give the decay
            // integration something to chew on.
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
    }

    #[test]
    fn steering_right_builds_positive_offset() {
        let mut app = build_test_app();
        run_frames(
            &mut app,
            FlightIntent {
                steer_x: 1.0,
                ..Default::default()
            },
            20,
        );
        let camera = app.world().resource::<FlightCamera>();
        assert!(
            camera.steer_offset.x > 0.0,
            "expected positive x offset, got {:?}",
            camera.steer_offset
        );
        assert_eq!(camera.steer_offset.y, 0.0);
    }

    #[test]
    fn released_steering_decays_toward_center() {
        let mut app = build_test_app();
        run_frames(
            &mut app,
            FlightIntent {
                steer_x: 1.0,
                ..Default::default()
            },
            20,
        );
        let held = app.world().resource::<FlightCamera>().steer_offset.x;
        run_frames(&mut app, FlightIntent::default(), 40);
        let released = app.world().resource::<FlightCamera>().steer_offset.x;
        assert!(
            released < held,
            "offset should decay once input is released ({held} → {released})"
        );
    }

    #[test]
    fn offset_never_exceeds_max_tilt() {
        let mut app = build_test_app();
        run_frames(
            &mut app,
            FlightIntent {
                steer_x: 1.0,
                steer_y: 1.0,
                ..Default::default()
            },
            200,
        );
        let config = StarfieldConfig::default();
        let camera = app.world().resource::<FlightCamera>();
        assert!(camera.steer_offset.x.abs() <= config.max_steer_offset);
        assert!(camera.steer_offset.y.abs() <= config.max_steer_offset);
    }

    #[test]
    fn boost_flag_follows_intent() {
        let mut app = build_test_app();
        run_frames(
            &mut app,
            FlightIntent {
                boost: true,
                ..Default::default()
            },
            2,
        );
        assert!(app.world().resource::<FlightCamera>().boosting);
        run_frames(&mut app, FlightIntent::default(), 2);
        assert!(!app.world().resource::<FlightCamera>().boosting);
    }

    #[test]
    fn out_of_range_intent_axes_are_clamped() {
        let mut app = build_test_app();
        run_frames(
            &mut app,
            FlightIntent {
                steer_x: 50.0,
                ..Default::default()
            },
            200,
        );
        let config = StarfieldConfig::default();
        let camera = app.world().resource::<FlightCamera>();
        assert!(camera.steer_offset.x <= config.max_steer_offset);
    }
}
