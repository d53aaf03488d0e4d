//! Demonstrates the off-screen indicator driving an edge-clamped arrow marker.
//!
//! - A cube orbits the scene and periodically leaves the camera's view
//! - While it is off screen, the arrow slides along the viewport margin band
//!   pointing toward it
//! - Press 'A' to stop/resume tracking the cube
//! - Press 'D' to toggle debug visualization of the indicator ray

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;
use bevy_offscreen_indicator::IndicatorGizmo;
use bevy_offscreen_indicator::IndicatorVisualizationPlugin;
use bevy_offscreen_indicator::OffscreenIndicatorPlugin;
use bevy_offscreen_indicator::prelude::*;

const ANCHOR_ORBIT_RADIUS: f32 = 12.0;
const ANCHOR_ORBIT_SPEED: f32 = 0.4;
const ANCHOR_HEIGHT: f32 = 1.0;
const MARKER_DEPTH: f32 = 2.0;

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins,
            OffscreenIndicatorPlugin,
            IndicatorVisualizationPlugin,
        ))
        .insert_resource(IndicatorConfig {
            margin:       EdgeMargin::new(120.0, 100.0),
            marker_depth: MARKER_DEPTH,
        })
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (orbit_anchor, toggle_tracking, toggle_debug_visualization),
        )
        .add_observer(log_marker_shown)
        .add_observer(log_marker_hidden)
        .run();
}

/// The cube the indicator keeps pointing at
#[derive(Component)]
struct OrbitingCube;

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 4.0, 14.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(6.0, 10.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(40.0, 40.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.3))),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(1.0, 1.0, 1.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.8, 0.2, 0.2))),
        Transform::from_xyz(ANCHOR_ORBIT_RADIUS, ANCHOR_HEIGHT, 0.0),
        AnchorPoint,
        OrbitingCube,
    ));

    // The marker is spawned once, hidden; the indicator drives it from then
    // on. Rest forward is +Z, matching the placement rotation convention.
    commands
        .spawn((Transform::default(), Visibility::Hidden, IndicatorMarker))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(meshes.add(Cone {
                    radius: 0.12,
                    height: 0.3,
                })),
                MeshMaterial3d(materials.add(Color::srgb(1.0, 0.9, 0.1))),
                // Cone apex points +Y at rest; pitch it onto +Z.
                Transform::from_rotation(Quat::from_rotation_x(FRAC_PI_2)),
            ));
        });
}

fn orbit_anchor(time: Res<Time>, mut cube_query: Query<&mut Transform, With<OrbitingCube>>) {
    let angle = time.elapsed_secs() * ANCHOR_ORBIT_SPEED;
    for mut transform in &mut cube_query {
        transform.translation = Vec3::new(
            angle.cos() * ANCHOR_ORBIT_RADIUS,
            ANCHOR_HEIGHT,
            angle.sin() * ANCHOR_ORBIT_RADIUS,
        );
    }
}

/// Press 'A' to stop or resume tracking the cube
fn toggle_tracking(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut commands: Commands,
    tracked_query: Query<Entity, (With<OrbitingCube>, With<AnchorPoint>)>,
    untracked_query: Query<Entity, (With<OrbitingCube>, Without<AnchorPoint>)>,
) {
    if !keyboard.just_pressed(KeyCode::KeyA) {
        return;
    }

    if let Ok(entity) = tracked_query.single() {
        commands.entity(entity).remove::<AnchorPoint>();
        info!("tracking stopped");
    } else if let Ok(entity) = untracked_query.single() {
        commands.entity(entity).insert(AnchorPoint);
        info!("tracking resumed");
    }
}

/// Press 'D' to toggle the indicator ray gizmo
fn toggle_debug_visualization(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut config_store: ResMut<GizmoConfigStore>,
) {
    if keyboard.just_pressed(KeyCode::KeyD) {
        let (config, _) = config_store.config_mut::<IndicatorGizmo>();
        config.enabled = !config.enabled;
        info!("indicator visualization: {}", config.enabled);
    }
}

fn log_marker_shown(shown: On<MarkerShown>) {
    info!(
        "marker shown for anchor {:?} (anchor off screen)",
        shown.anchor_entity
    );
}

fn log_marker_hidden(hidden: On<MarkerHidden>) {
    info!("marker {:?} hidden (anchor visible)", hidden.marker_entity);
}
