//! Debug visualization for the off-screen indicator
//!
//! Draws a gizmo ray from the marker toward the active anchor, a sphere at
//! the anchor, and a camera-distance label next to the marker. Uses Bevy's
//! GizmoConfigGroup pattern, disabled by default.

use bevy::prelude::*;

use crate::indicator::ActiveAnchor;
use crate::indicator::AnchorPoint;
use crate::indicator::IndicatorMarker;

/// Gizmo config group for indicator visualization.
/// Toggle via `GizmoConfigStore::config_mut::<IndicatorGizmo>().enabled`
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct IndicatorGizmo {}

const LABEL_FONT_SIZE: f32 = 14.0;
const LABEL_SCREEN_OFFSET: f32 = 18.0;

/// Configuration for indicator visualization colors and appearance
#[derive(Resource, Reflect, Debug, Clone)]
#[reflect(Resource)]
pub struct IndicatorVisualizationConfig {
    pub ray_color:     Color,
    pub anchor_color:  Color,
    pub line_width:    f32,
    pub anchor_radius: f32,
}

impl Default for IndicatorVisualizationConfig {
    fn default() -> Self {
        Self {
            ray_color:     Color::srgb(1.0, 1.0, 0.0), // Yellow
            anchor_color:  Color::srgb(0.0, 1.0, 0.0), // Green
            line_width:    2.0,
            anchor_radius: 0.25,
        }
    }
}

/// Component marking the camera-distance label
#[derive(Component, Reflect)]
#[reflect(Component)]
struct DistanceLabel;

/// Plugin that adds indicator visualization functionality
pub struct IndicatorVisualizationPlugin;

impl Plugin for IndicatorVisualizationPlugin {
    fn build(&self, app: &mut App) {
        app.init_gizmo_group::<IndicatorGizmo>()
            .init_resource::<IndicatorVisualizationConfig>()
            .add_systems(Startup, init_indicator_gizmo)
            .add_systems(Update, (draw_indicator_ray, cleanup_label_when_hidden));
    }
}

/// Initialize the indicator gizmo config (disabled by default)
fn init_indicator_gizmo(
    mut config_store: ResMut<GizmoConfigStore>,
    viz_config: Res<IndicatorVisualizationConfig>,
) {
    let (config, _) = config_store.config_mut::<IndicatorGizmo>();
    config.enabled = false;
    config.line.width = viz_config.line_width;
}

/// Draws the marker-to-anchor ray and updates the distance label while the
/// marker is shown
fn draw_indicator_ray(
    mut commands: Commands,
    mut gizmos: Gizmos<IndicatorGizmo>,
    config: Res<IndicatorVisualizationConfig>,
    config_store: Res<GizmoConfigStore>,
    active: Res<ActiveAnchor>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    anchor_query: Query<&GlobalTransform, With<AnchorPoint>>,
    marker_query: Query<(&GlobalTransform, &Visibility), With<IndicatorMarker>>,
    mut label_query: Query<(&mut Text, &mut Node), With<DistanceLabel>>,
) {
    let (gizmo_config, _) = config_store.config::<IndicatorGizmo>();
    if !gizmo_config.enabled {
        return;
    }

    let Some(anchor_entity) = active.0 else {
        return;
    };
    let Ok(anchor_global) = anchor_query.get(anchor_entity) else {
        return;
    };
    let Ok((marker_global, visibility)) = marker_query.single() else {
        return;
    };
    if *visibility != Visibility::Visible {
        return;
    }

    let anchor_pos = anchor_global.translation();
    let marker_pos = marker_global.translation();

    gizmos.line(marker_pos, anchor_pos, config.ray_color);
    gizmos.sphere(
        Isometry3d::from_translation(anchor_pos),
        config.anchor_radius,
        config.anchor_color,
    );

    let Ok((camera, cam_global)) = camera_query.single() else {
        return;
    };
    let distance = (anchor_pos - cam_global.translation()).length();

    let Ok(label_pos) = camera.world_to_viewport(cam_global, marker_pos) else {
        return;
    };

    update_or_create_label(
        &mut commands,
        &mut label_query,
        format!("{distance:.1}m"),
        label_pos,
    );
}

/// Updates the existing distance label or creates it on first use
fn update_or_create_label(
    commands: &mut Commands,
    label_query: &mut Query<(&mut Text, &mut Node), With<DistanceLabel>>,
    text: String,
    label_pos: Vec2,
) {
    if let Ok((mut label_text, mut node)) = label_query.single_mut() {
        **label_text = text;
        node.left = Val::Px(label_pos.x + LABEL_SCREEN_OFFSET);
        node.top = Val::Px(label_pos.y + LABEL_SCREEN_OFFSET);
        return;
    }

    commands.spawn((
        Text::new(text),
        TextFont {
            font_size: LABEL_FONT_SIZE,
            ..default()
        },
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(label_pos.x + LABEL_SCREEN_OFFSET),
            top: Val::Px(label_pos.y + LABEL_SCREEN_OFFSET),
            ..default()
        },
        DistanceLabel,
    ));
}

/// Removes the label when visualization is disabled or the marker hides
fn cleanup_label_when_hidden(
    mut commands: Commands,
    config_store: Res<GizmoConfigStore>,
    marker_query: Query<&Visibility, With<IndicatorMarker>>,
    label_query: Query<Entity, With<DistanceLabel>>,
) {
    let (config, _) = config_store.config::<IndicatorGizmo>();
    let marker_shown = marker_query
        .single()
        .is_ok_and(|visibility| *visibility == Visibility::Visible);

    if config.enabled && marker_shown {
        return;
    }

    for entity in &label_query {
        commands.entity(entity).despawn();
    }
}
