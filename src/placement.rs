//! Edge-clamped marker placement for anchors that are not currently visible.
//!
//! Given the projected anchor position, computes where on the viewport margin
//! band the marker should sit and which way it should face. Handles the
//! mirrored projection of behind-camera anchors and the degenerate ratios of
//! anchors sitting exactly on a screen center line.

use bevy::prelude::*;
use thiserror::Error;

use crate::projection::ViewportCamera;

/// Inset from the viewport edges within which the marker may not be placed.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct EdgeMargin {
    /// Horizontal inset in pixels
    pub x: f32,
    /// Vertical inset in pixels
    pub y: f32,
}

/// Rejected margin/viewport configuration. Validation runs once at setup, not
/// per placement call.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MarginError {
    #[error("viewport must have positive dimensions, got {width}x{height}")]
    DegenerateViewport { width: f32, height: f32 },
    #[error("margin {margin} must lie in [0, {limit}) to leave a clamp band on its axis")]
    MarginOutOfRange { margin: f32, limit: f32 },
}

impl EdgeMargin {
    pub const fn new(x: f32, y: f32) -> Self { Self { x, y } }

    /// Checks the margin against a viewport. Each margin must leave a
    /// non-empty clamp band: `0 <= margin < half extent`.
    pub fn validate(&self, viewport: Vec2) -> Result<(), MarginError> {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return Err(MarginError::DegenerateViewport {
                width:  viewport.x,
                height: viewport.y,
            });
        }

        for (margin, limit) in [(self.x, viewport.x * 0.5), (self.y, viewport.y * 0.5)] {
            if !(0.0..limit).contains(&margin) {
                return Err(MarginError::MarginOutOfRange { margin, limit });
            }
        }

        Ok(())
    }
}

/// Result of the placement solver: a screen-space position inside the margin
/// band, and the marker's facing rotation about +Y in degrees.
///
/// The position is left in screen space; converting it to a world transform
/// (at whatever depth the marker should hover) stays with the camera owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgePlacement {
    pub screen_position:  Vec2,
    pub rotation_degrees: f32,
}

/// Ground-plane facing angle for the marker, about +Y, in degrees.
///
/// Only the x/z components of the camera-to-anchor direction participate; the
/// up axis is irrelevant to facing. 0 degrees faces an anchor due +Z of the
/// camera — the -90 offset calibrates the angle to a marker mesh whose rest
/// forward points that way. The underlying atan2 wraps where the direction
/// crosses the +X axis.
pub fn facing_angle_degrees(to_anchor: Vec3) -> f32 {
    to_anchor.z.atan2(-to_anchor.x).to_degrees() - 90.0
}

/// Computes the clamped marker position and facing rotation for an anchor that
/// is not currently visible. Pure; call gating is the driver's concern. The
/// margin must satisfy [`EdgeMargin::validate`] for the camera's viewport.
pub fn compute_placement(
    anchor_world: Vec3,
    camera: &ViewportCamera,
    margin: EdgeMargin,
) -> EdgePlacement {
    let rotation_degrees = facing_angle_degrees(anchor_world - camera.position);

    let screen = camera.world_to_screen(anchor_world);
    let center = camera.viewport * 0.5;

    let dist_to_edge = center - Vec2::new(margin.x, margin.y);
    let dist_to_anchor = screen.truncate() - center;

    let ratio_x = edge_ratio(dist_to_edge.x, dist_to_anchor.x);
    let ratio_y = edge_ratio(dist_to_edge.y, dist_to_anchor.y);

    // A behind-camera projection is mirrored through the screen center. When
    // the mirrored point still lies inside the clamp band on an axis, flip
    // that axis's displacement so the marker points along the true direction.
    let behind = screen.z < 0.0;
    let inv_x = if behind && dist_to_anchor.x.abs() < dist_to_edge.x {
        -1.0
    } else {
        1.0
    };
    let inv_y = if behind && dist_to_anchor.y.abs() < dist_to_edge.y {
        -1.0
    } else {
        1.0
    };

    // Each axis is scaled by the opposite axis's ratio, landing the point on
    // the viewport boundary nearest the anchor's direction from screen center.
    let screen_x = clamp_to_band(
        center.x + dist_to_anchor.x * inv_x * ratio_y,
        center.x,
        margin.x,
        camera.viewport.x - margin.x,
    );
    let screen_y = clamp_to_band(
        center.y + dist_to_anchor.y * inv_y * ratio_x,
        center.y,
        margin.y,
        camera.viewport.y - margin.y,
    );

    EdgePlacement {
        screen_position: Vec2::new(screen_x, screen_y),
        rotation_degrees,
    }
}

/// Ratio that rescales the opposite axis's displacement onto the margin band.
/// Falls back to a neutral 1.0 when the anchor projects onto the center line
/// and the quotient is not finite.
fn edge_ratio(dist_to_edge: f32, dist_to_anchor: f32) -> f32 {
    let ratio = (dist_to_edge / dist_to_anchor).abs();
    if ratio.is_finite() { ratio } else { 1.0 }
}

/// Clamps onto the margin band. Infinite intermediates resolve to the nearer
/// bound; NaN (anchor projected from the camera position itself) resolves to
/// the center line.
fn clamp_to_band(value: f32, fallback: f32, lo: f32, hi: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const MARGIN: EdgeMargin = EdgeMargin::new(150.0, 180.0);

    fn test_camera() -> ViewportCamera {
        ViewportCamera {
            position:      Vec3::ZERO,
            rotation:      Quat::IDENTITY,
            viewport:      Vec2::new(1000.0, 800.0),
            half_tan_vfov: 1.0,
            half_tan_hfov: 1.25,
            near:          0.1,
        }
    }

    fn in_band(placement: &EdgePlacement, camera: &ViewportCamera) -> bool {
        let pos = placement.screen_position;
        pos.x >= MARGIN.x
            && pos.x <= camera.viewport.x - MARGIN.x
            && pos.y >= MARGIN.y
            && pos.y <= camera.viewport.y - MARGIN.y
    }

    #[test]
    fn off_screen_anchor_lands_on_the_nearer_edge() {
        let camera = test_camera();

        // Far right of the frustum, dead center vertically: projects to
        // (1700, 400), so the x displacement runs straight to the right edge.
        let placement = compute_placement(Vec3::new(30.0, 0.0, -10.0), &camera, MARGIN);

        assert_relative_eq!(placement.screen_position.x, 850.0, epsilon = 1e-3);
        assert_relative_eq!(placement.screen_position.y, 400.0, epsilon = 1e-3);
    }

    #[test]
    fn dominant_axis_pins_to_its_edge_and_scales_the_other() {
        let camera = test_camera();

        // Projects to (-700, 1200): above and to the left, with the vertical
        // displacement dominating. y pins to the top of the band while x is
        // scaled back by the vertical ratio.
        let placement = compute_placement(Vec3::new(-30.0, 20.0, -10.0), &camera, MARGIN);

        assert_relative_eq!(placement.screen_position.x, 170.0, epsilon = 1e-2);
        assert_relative_eq!(placement.screen_position.y, 620.0, epsilon = 1e-2);
    }

    #[test]
    fn behind_camera_flips_the_mirrored_displacement() {
        let camera = test_camera();

        // Behind and to the right; the mirrored projection (300, 400) points
        // left. The flip must carry the marker right of center instead.
        let placement = compute_placement(Vec3::new(5.0, 0.0, 10.0), &camera, MARGIN);

        assert!(placement.screen_position.x > camera.viewport.x * 0.5);
        assert_relative_eq!(placement.screen_position.x, 700.0, epsilon = 1e-3);
        assert_relative_eq!(placement.screen_position.y, 400.0, epsilon = 1e-3);
    }

    #[test]
    fn behind_camera_with_steep_ratio_lands_on_the_flipped_edge() {
        let camera = test_camera();

        // Slightly off the vertical center line, so the vertical ratio is
        // steep and drives the flipped x displacement all the way to the
        // right edge of the band — not the left edge the raw mirror points at.
        let placement = compute_placement(Vec3::new(5.0, 0.001, 10.0), &camera, MARGIN);

        assert_relative_eq!(placement.screen_position.x, 850.0, epsilon = 1e-3);
        assert!(in_band(&placement, &camera));
    }

    #[test]
    fn center_line_anchor_uses_neutral_ratio_without_nan() {
        let camera = test_camera();

        // Exactly on the optical axis: both denominators are zero.
        let placement = compute_placement(Vec3::new(0.0, 0.0, 5.0), &camera, MARGIN);

        assert!(placement.screen_position.x.is_finite());
        assert!(placement.screen_position.y.is_finite());
        assert_relative_eq!(placement.screen_position.x, 500.0, epsilon = 1e-3);
        assert_relative_eq!(placement.screen_position.y, 400.0, epsilon = 1e-3);
    }

    #[test]
    fn clamp_invariant_holds_across_anchor_positions() {
        let camera = test_camera();

        // Sweep anchors all around the camera, including behind it, far off
        // axis, and degenerate (at the camera position itself).
        let mut anchors = vec![Vec3::ZERO];
        for x in [-50.0, -5.0, 0.0, 5.0, 50.0] {
            for y in [-40.0, 0.0, 40.0] {
                for z in [-100.0, -10.0, -0.01, 0.01, 10.0, 100.0] {
                    anchors.push(Vec3::new(x, y, z));
                }
            }
        }

        for anchor in anchors {
            let placement = compute_placement(anchor, &camera, MARGIN);
            assert!(
                in_band(&placement, &camera),
                "anchor {anchor:?} escaped the margin band: {placement:?}"
            );
        }
    }

    #[test]
    fn facing_rotation_matches_the_documented_convention() {
        assert_relative_eq!(
            facing_angle_degrees(Vec3::new(0.0, 0.0, 10.0)),
            0.0,
            epsilon = 1e-4
        );
        assert_relative_eq!(
            facing_angle_degrees(Vec3::new(-10.0, 0.0, 0.0)),
            -90.0,
            epsilon = 1e-4
        );
        assert_relative_eq!(
            facing_angle_degrees(Vec3::new(0.0, 0.0, -10.0)),
            -180.0,
            epsilon = 1e-4
        );
        // The up component is irrelevant to facing.
        assert_relative_eq!(
            facing_angle_degrees(Vec3::new(0.0, 25.0, 10.0)),
            0.0,
            epsilon = 1e-4
        );
    }

    #[test]
    fn facing_rotation_is_continuous_under_small_perturbation() {
        let anchor = Vec3::new(3.0, 0.0, 7.0);
        let nudged = anchor + Vec3::new(0.001, 0.0, 0.001);

        let delta = facing_angle_degrees(anchor) - facing_angle_degrees(nudged);
        assert!(delta.abs() < 0.1, "rotation jumped by {delta} degrees");
    }

    #[test]
    fn margin_validation_accepts_sane_configuration() {
        assert_eq!(MARGIN.validate(Vec2::new(1000.0, 800.0)), Ok(()));
    }

    #[test]
    fn margin_validation_rejects_bad_configuration() {
        let viewport = Vec2::new(1000.0, 800.0);

        assert_eq!(
            EdgeMargin::new(150.0, 180.0).validate(Vec2::new(0.0, 800.0)),
            Err(MarginError::DegenerateViewport {
                width:  0.0,
                height: 800.0,
            })
        );
        assert_eq!(
            EdgeMargin::new(500.0, 180.0).validate(viewport),
            Err(MarginError::MarginOutOfRange {
                margin: 500.0,
                limit:  500.0,
            })
        );
        assert_eq!(
            EdgeMargin::new(150.0, -1.0).validate(viewport),
            Err(MarginError::MarginOutOfRange {
                margin: -1.0,
                limit:  400.0,
            })
        );
    }
}
