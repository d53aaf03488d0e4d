//! Per-frame driver that repositions a persistent marker entity.
//!
//! The application spawns the marker once and tags candidate anchors; the
//! driver selects one anchor, hides the marker while that anchor is on
//! screen, and otherwise parks the marker on the viewport margin band facing
//! the anchor's direction.

use bevy::prelude::*;

use crate::events::MarkerHidden;
use crate::events::MarkerShown;
use crate::placement::EdgeMargin;
use crate::placement::MarginError;
use crate::placement::compute_placement;
use crate::projection::ViewportCamera;
use crate::visibility::is_visible;

/// Tags an entity as a candidate anchor for the indicator.
#[derive(Component, Reflect, Debug)]
#[reflect(Component)]
pub struct AnchorPoint;

/// Tags the single persistent marker entity driven by the indicator.
/// Spawned once by the application, then only repositioned and shown/hidden.
#[derive(Component, Reflect, Debug)]
#[reflect(Component)]
pub struct IndicatorMarker;

/// Currently selected anchor. The most recently added anchor wins; when it
/// goes away, selection falls back to any remaining anchor.
#[derive(Resource, Reflect, Debug, Default)]
#[reflect(Resource)]
pub struct ActiveAnchor(pub Option<Entity>);

/// Configuration for indicator placement
#[derive(Resource, Reflect, Debug, Clone)]
#[reflect(Resource)]
pub struct IndicatorConfig {
    /// Inset from the viewport edges within which the marker may not be placed
    pub margin:       EdgeMargin,
    /// View-space depth at which the marker hovers in front of the camera.
    /// Raised to the near plane distance when it would fall inside it.
    pub marker_depth: f32,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            margin:       EdgeMargin::new(100.0, 100.0),
            marker_depth: 1.0,
        }
    }
}

/// Observer that hands selection to a newly added anchor
pub fn select_anchor_on_add(add: On<Add, AnchorPoint>, mut active: ResMut<ActiveAnchor>) {
    active.0 = Some(add.entity);
}

/// Observer that reassigns selection when the active anchor goes away.
/// Runs before the removal completes, so the departing entity still matches
/// the query and is filtered out explicitly.
pub fn select_anchor_on_remove(
    remove: On<Remove, AnchorPoint>,
    mut active: ResMut<ActiveAnchor>,
    anchor_query: Query<Entity, With<AnchorPoint>>,
) {
    if active.0 != Some(remove.entity) {
        return;
    }

    active.0 = anchor_query.iter().find(|entity| *entity != remove.entity);
}

/// System that drives the marker from the active anchor once per frame.
///
/// Anchor on screen: marker hidden. Anchor off screen or behind the camera:
/// marker placed on the margin band, facing the anchor's ground-plane
/// direction. Missing collaborators (camera, viewport, marker, anchor) are
/// quiet no-ops; a rejected margin configuration suspends the indicator and
/// is reported once per distinct error.
pub fn update_indicator_marker(
    mut commands: Commands,
    config: Res<IndicatorConfig>,
    active: Res<ActiveAnchor>,
    mut rejected: Local<Option<MarginError>>,
    camera_query: Query<(&Camera, &GlobalTransform, &Projection)>,
    anchor_query: Query<&GlobalTransform, With<AnchorPoint>>,
    mut marker_query: Query<(Entity, &mut Transform, &mut Visibility), With<IndicatorMarker>>,
) {
    let Ok((camera, cam_global, projection)) = camera_query.single() else {
        return;
    };
    let Projection::Perspective(perspective) = projection else {
        return;
    };
    let Some(viewport) = camera.logical_viewport_size() else {
        return;
    };
    let Ok((marker_entity, mut marker_transform, mut marker_visibility)) =
        marker_query.single_mut()
    else {
        return;
    };

    if let Err(err) = config.margin.validate(viewport) {
        if rejected.as_ref() != Some(&err) {
            error!("indicator margin configuration rejected: {err}");
            *rejected = Some(err);
        }
        return;
    }
    *rejected = None;

    let Some(anchor_entity) = active.0 else {
        debug!("no anchor to indicate");
        if marker_visibility.set_if_neq(Visibility::Hidden) {
            commands.trigger(MarkerHidden { marker_entity });
        }
        return;
    };
    let Ok(anchor_global) = anchor_query.get(anchor_entity) else {
        return;
    };

    let view = ViewportCamera::from_parts(cam_global, perspective, viewport);
    let anchor_world = anchor_global.translation();

    if is_visible(anchor_world, &view) {
        if marker_visibility.set_if_neq(Visibility::Hidden) {
            commands.trigger(MarkerHidden { marker_entity });
        }
        return;
    }

    let placement = compute_placement(anchor_world, &view, config.margin);
    let depth = config.marker_depth.max(view.near);
    let world_position = view.screen_to_world(placement.screen_position.extend(depth));

    marker_transform.translation = world_position;
    marker_transform.rotation = Quat::from_rotation_y(placement.rotation_degrees.to_radians());

    if marker_visibility.set_if_neq(Visibility::Visible) {
        debug!(
            "marker shown at {:?} facing {:.1} degrees",
            placement.screen_position, placement.rotation_degrees
        );
        commands.trigger(MarkerShown {
            marker_entity,
            anchor_entity,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection_app() -> App {
        let mut app = App::new();
        app.init_resource::<ActiveAnchor>();
        app.add_observer(select_anchor_on_add);
        app.add_observer(select_anchor_on_remove);
        app
    }

    fn active(app: &App) -> Option<Entity> { app.world().resource::<ActiveAnchor>().0 }

    #[test]
    fn newest_anchor_wins() {
        let mut app = selection_app();

        let first = app.world_mut().spawn(AnchorPoint).id();
        assert_eq!(active(&app), Some(first));

        let second = app.world_mut().spawn(AnchorPoint).id();
        assert_eq!(active(&app), Some(second));
    }

    #[test]
    fn removing_the_active_anchor_falls_back_to_a_survivor() {
        let mut app = selection_app();

        let first = app.world_mut().spawn(AnchorPoint).id();
        let second = app.world_mut().spawn(AnchorPoint).id();

        app.world_mut().entity_mut(second).despawn();
        assert_eq!(active(&app), Some(first));
    }

    #[test]
    fn removing_an_inactive_anchor_keeps_the_selection() {
        let mut app = selection_app();

        let first = app.world_mut().spawn(AnchorPoint).id();
        let second = app.world_mut().spawn(AnchorPoint).id();

        app.world_mut().entity_mut(first).despawn();
        assert_eq!(active(&app), Some(second));
    }

    #[test]
    fn selection_clears_when_the_last_anchor_goes_away() {
        let mut app = selection_app();

        let only = app.world_mut().spawn(AnchorPoint).id();
        app.world_mut().entity_mut(only).despawn();
        assert_eq!(active(&app), None);
    }
}
