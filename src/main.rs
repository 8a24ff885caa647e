use bevy::prelude::*;
use bevy::window::WindowResolution;

use warpfield::audio::{AudioLevel, AudioSupport};
use warpfield::config::StarfieldConfig;
use warpfield::graphics;
use warpfield::rendering::StarfieldRenderPlugin;
use warpfield::simulation::StarfieldPlugin;

const CONFIG_PATH: &str = "assets/starfield.toml";

fn main() {
    // Load + validate before anything spins up: a broken config aborts here,
    // never mid-flight.
    let config = StarfieldConfig::load_or_default(CONFIG_PATH);
    if let Err(e) = config.validate() {
        eprintln!("✗ Invalid starfield configuration: {e}");
        std::process::exit(1);
    }

    let level = AudioLevel::default();

    // Start microphone capture when built with the `audio` feature.  The
    // stream handle must outlive `app.run()`; dropping it stops capture.
    #[cfg(feature = "audio")]
    let _capture = match warpfield::audio::capture::start(level.clone()) {
        Ok(stream) => Some(stream),
        Err(e) => {
            eprintln!("⚠ {e}; running without audio reactivity");
            None
        }
    };
    #[cfg(feature = "audio")]
    let audio_available = _capture.is_some();
    #[cfg(not(feature = "audio"))]
    let audio_available = false;

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Warpfield".into(),
            resolution: WindowResolution::new(
                config.viewport_width as u32,
                config.viewport_height as u32,
            ),
            ..Default::default()
        }),
        ..Default::default()
    }))
    // Deep-space blue-black backdrop.
    .insert_resource(ClearColor(Color::srgb_u8(4, 4, 12)))
    .insert_resource(config)
    .insert_resource(level)
    .insert_resource(AudioSupport {
        available: audio_available,
    })
    .add_plugins(StarfieldPlugin)
    .add_plugins(StarfieldRenderPlugin)
    .add_systems(Startup, graphics::setup_camera);

    app.run();
}
