//! Rendering systems: star points, trail streaks, and the HUD.
//!
//! ## Layer Model
//!
//! | Layer          | Technology   | Controlled by        |
//! |----------------|--------------|----------------------|
//! | Star points    | `Mesh2d`     | always               |
//! | Trail streaks  | Gizmos       | `toggles.trails`     |
//! | Shooting heads | Gizmos       | always               |
//! | Status HUD     | Bevy UI      | always               |
//!
//! Star points reuse a single shared circle mesh; each star carries its own
//! `ColorMaterial` so colour can be written per star per frame.  Trails are
//! immediate-mode gizmo lines with alpha fading from newest to oldest.

use crate::color;
use crate::config::StarfieldConfig;
use crate::control::VisualToggles;
use crate::projection::{self, FlightCamera};
use crate::simulation::star_update_system;
use crate::star::{Star, StarKind};
use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};

pub struct StarfieldRenderPlugin;

impl Plugin for StarfieldRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (init_star_mesh, setup_hud)).add_systems(
            Update,
            (
                attach_star_material_system,
                star_render_system,
                trail_render_system,
                hud_display_system,
            )
                .chain()
                .after(star_update_system),
        );
    }
}

// ── Resources & markers ───────────────────────────────────────────────────────

/// Shared unit-circle mesh used by every star (created once at startup);
/// per-star size is applied through `Transform::scale`.
#[derive(Resource)]
pub struct StarMesh(pub Handle<Mesh>);

/// Marker for the HUD status text line.
#[derive(Component)]
pub struct HudStatusText;

// ── Startup systems ───────────────────────────────────────────────────────────

/// Create the shared circle mesh and store it as a [`StarMesh`] resource.
fn init_star_mesh(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    let handle = meshes.add(circle_mesh(1.0, 8));
    commands.insert_resource(StarMesh(handle));
}

/// Spawn the top-left HUD: a live status line plus a static controls line.
pub fn setup_hud(mut commands: Commands, config: Res<StarfieldConfig>) {
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            left: Val::Px(8.0),
            top: Val::Px(8.0),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(4.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: config.hud_font_size,
                    ..default()
                },
                TextColor(Color::srgb(0.78, 0.78, 0.78)),
                HudStatusText,
            ));
            parent.spawn((
                Text::new(
                    "Arrows: steer  SPACE: boost  S: spiral  T: trails  C: colour  A: audio  Q: quit",
                ),
                TextFont {
                    font_size: config.hud_font_size * 0.85,
                    ..default()
                },
                TextColor(Color::srgb(0.5, 0.5, 0.55)),
            ));
        });
}

// ── Update systems ────────────────────────────────────────────────────────────

/// Attach `Mesh2d` + `MeshMaterial2d` to every newly-spawned [`Star`].
///
/// Uses [`Added<Star>`] so it only runs for the pool's single spawn wave —
/// zero overhead afterwards.
pub fn attach_star_material_system(
    mut commands: Commands,
    star_mesh: Res<StarMesh>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut query: Query<(Entity, &mut Star), Added<Star>>,
) {
    for (entity, mut star) in query.iter_mut() {
        let mat_handle = materials.add(ColorMaterial::from_color(Color::srgba(
            1.0, 1.0, 1.0, 0.0,
        )));
        star.material = Some(mat_handle.clone());
        commands
            .entity(entity)
            .insert((Mesh2d(star_mesh.0.clone()), MeshMaterial2d(mat_handle)));
    }
}

/// Position, size, and colour every star point from its latest projection.
///
/// Stars with an empty trail (recycled this frame, not yet re-projected)
/// are hidden for the one frame it takes them to reappear at the far plane.
pub fn star_render_system(
    config: Res<StarfieldConfig>,
    toggles: Res<VisualToggles>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut query: Query<(&Star, &mut Transform, &mut Visibility)>,
) {
    let depth_range = config.far_plane - config.near_plane;
    for (star, mut transform, mut visibility) in query.iter_mut() {
        let Some(screen) = star.trail.back().copied() else {
            *visibility = Visibility::Hidden;
            continue;
        };
        *visibility = Visibility::Visible;

        let scale = config.focal_length / star.position.z;
        let size = projection::point_size(scale, star.base_size, &config);
        transform.translation = screen.extend(0.5);
        transform.scale = Vec3::splat(size);

        if let Some(handle) = &star.material {
            if let Some(material) = materials.get_mut(handle) {
                material.color = star_color(star, depth_range, &config, &toggles);
            }
        }
    }
}

/// Draw fading trail streaks and shooting-star heads with gizmo lines.
pub fn trail_render_system(
    mut gizmos: Gizmos,
    config: Res<StarfieldConfig>,
    toggles: Res<VisualToggles>,
    query: Query<&Star>,
) {
    let depth_range = config.far_plane - config.near_plane;
    for star in &query {
        if matches!(star.kind, StarKind::Shooting { .. }) {
            if let Some(head) = star.trail.back() {
                gizmos.circle_2d(*head, 3.0, Color::WHITE);
            }
        }
        if !toggles.trails || star.trail.len() < 2 {
            continue;
        }
        let base = star_color(star, depth_range, &config, &toggles).to_srgba();
        let n = star.trail.len() as f32;
        for (i, (a, b)) in star
            .trail
            .iter()
            .zip(star.trail.iter().skip(1))
            .enumerate()
        {
            // Newest segments sit at the back of the deque; fade toward the
            // oldest.
            let fade = (i + 1) as f32 / n;
            gizmos.line_2d(
                *a,
                *b,
                Color::srgba(base.red, base.green, base.blue, 0.7 * fade),
            );
        }
    }
}

/// Refresh the HUD status line each frame.
pub fn hud_display_system(
    toggles: Res<VisualToggles>,
    camera: Res<FlightCamera>,
    stars: Query<&Star>,
    mut text_query: Query<&mut Text, With<HudStatusText>>,
) {
    let Ok(mut text) = text_query.single_mut() else {
        return;
    };
    let on = |b: bool| if b { "ON" } else { "OFF" };
    *text = Text::new(format!(
        "Stars: {}  Trails: {}  Colour: {}  Spiral: {}  Audio: {}  Boost: {}",
        stars.iter().count(),
        on(toggles.trails),
        on(toggles.color),
        on(toggles.spiral),
        on(toggles.audio),
        on(camera.boosting),
    ));
}

// ── Colour helper ─────────────────────────────────────────────────────────────

/// Colour for a star this frame: depth-and-brightness driven gradient,
/// monochrome fallback when colour mode is off, warm white for shooting
/// stars.
fn star_color(
    star: &Star,
    depth_range: f32,
    config: &StarfieldConfig,
    toggles: &VisualToggles,
) -> Color {
    if matches!(star.kind, StarKind::Shooting { .. }) {
        return Color::srgb(1.0, 0.86, 0.70);
    }
    let depth_norm = ((config.far_plane - star.position.z) / depth_range).clamp(0.0, 1.0);
    let t = depth_norm * star.brightness;
    if toggles.color {
        color::color_for(t)
    } else {
        color::mono_for(t)
    }
}

// ── Mesh helper ───────────────────────────────────────────────────────────────

/// Build a filled circle mesh approximated by an `n`-sided regular polygon.
///
/// Uses a triangle fan from the centre: `(0, i, i+1 mod n)`.
fn circle_mesh(radius: f32, sides: u32) -> Mesh {
    let n = sides as usize;
    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(n + 1);

    // Centre vertex.
    positions.push([0.0, 0.0, 0.0]);
    normals.push([0.0, 0.0, 1.0]);
    uvs.push([0.5, 0.5]);

    for i in 0..n {
        let angle = std::f32::consts::TAU * i as f32 / n as f32;
        let x = radius * angle.cos();
        let y = radius * angle.sin();
        positions.push([x, y, 0.0]);
        normals.push([0.0, 0.0, 1.0]);
        uvs.push([x / (2.0 * radius) + 0.5, y / (2.0 * radius) + 0.5]);
    }

    let mut indices: Vec<u32> = Vec::with_capacity(n * 3);
    for i in 0..n as u32 {
        let v1 = i + 1;
        let v2 = (i + 1) % n as u32 + 1;
        indices.extend_from_slice(&[0, v1, v2]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}
