use bevy::prelude::*;

/// Setup camera for 2D rendering.
///
/// The default `Camera2d` maps world units 1:1 to pixels with the origin at
/// the window centre, which is exactly the coordinate space the projector
/// emits.
pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
    eprintln!("[SETUP] Camera spawned");
}
