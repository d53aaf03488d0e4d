// bevy_offscreen_indicator
// Off-screen anchor indicator for Bevy providing:
// - Screen-space visibility classification for a tracked world point
// - Edge-clamped marker placement with directional rotation
// - A per-frame driver for a persistent, user-spawned marker entity

use bevy::prelude::*;

mod events;
mod indicator;
mod placement;
pub mod prelude;
mod projection;
mod visibility;
#[cfg(feature = "visualization")]
mod visualization;

// Public API - Events
pub use events::MarkerHidden;
pub use events::MarkerShown;

// Public API - Components (for tagging anchors and the marker)
pub use indicator::AnchorPoint;
pub use indicator::IndicatorMarker;

// Public API - Configuration resources
pub use indicator::ActiveAnchor;
pub use indicator::IndicatorConfig;

// Public API - Geometry types
pub use placement::EdgeMargin;
pub use placement::EdgePlacement;
pub use placement::MarginError;
pub use projection::ViewportCamera;

// Public API - Geometry functions
pub use placement::compute_placement;
pub use placement::facing_angle_degrees;
pub use visibility::is_visible;

// Public API - Visualization
#[cfg(feature = "visualization")]
pub use visualization::IndicatorGizmo;
#[cfg(feature = "visualization")]
pub use visualization::IndicatorVisualizationConfig;
#[cfg(feature = "visualization")]
pub use visualization::IndicatorVisualizationPlugin;

// Internal - used by plugin, not for external use
use indicator::select_anchor_on_add;
use indicator::select_anchor_on_remove;
use indicator::update_indicator_marker;

/// Plugin that adds the off-screen indicator driver
pub struct OffscreenIndicatorPlugin;

impl Plugin for OffscreenIndicatorPlugin {
    fn build(&self, app: &mut App) {
        app
            // Register observers for anchor selection
            .add_observer(select_anchor_on_add)
            .add_observer(select_anchor_on_remove)
            // Add systems
            .add_systems(Update, update_indicator_marker)
            // Initialize resources
            .init_resource::<ActiveAnchor>()
            .init_resource::<IndicatorConfig>();
    }
}
