//! Convenient re-exports for common types and traits

pub use crate::OffscreenIndicatorPlugin;
pub use crate::events::MarkerHidden;
pub use crate::events::MarkerShown;
pub use crate::indicator::AnchorPoint;
pub use crate::indicator::IndicatorConfig;
pub use crate::indicator::IndicatorMarker;
pub use crate::placement::EdgeMargin;
pub use crate::placement::EdgePlacement;
pub use crate::placement::compute_placement;
pub use crate::projection::ViewportCamera;
pub use crate::visibility::is_visible;
