//! Lifecycle events for marker visibility transitions.

use bevy::prelude::*;

/// Fired when the marker becomes visible because the active anchor left the
/// viewport.
#[derive(EntityEvent, Reflect)]
#[reflect(Event, FromReflect)]
pub struct MarkerShown {
    #[event_target]
    pub marker_entity: Entity,
    pub anchor_entity: Entity,
}

/// Fired when the marker is hidden again, either because the active anchor is
/// back on screen or because no anchor remains.
#[derive(EntityEvent, Reflect)]
#[reflect(Event, FromReflect)]
pub struct MarkerHidden {
    #[event_target]
    pub marker_entity: Entity,
}
