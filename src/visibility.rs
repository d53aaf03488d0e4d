//! Screen-space visibility classification for tracked world points.

use bevy::prelude::*;

use crate::projection::ViewportCamera;

/// Returns true if the world point currently projects inside the viewport.
///
/// The depth sign is checked first and dominates: a point behind the camera
/// plane is never visible, even though its mirrored projection can land
/// numerically inside the viewport rectangle. The bounds check itself is
/// inclusive at the edges.
pub fn is_visible(world_point: Vec3, camera: &ViewportCamera) -> bool {
    let screen = camera.world_to_screen(world_point);

    if screen.z < 0.0 {
        return false;
    }

    screen.x >= 0.0
        && screen.x <= camera.viewport.x
        && screen.y >= 0.0
        && screen.y <= camera.viewport.y
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn in_front_and_inside_bounds_is_visible() {
        let camera = test_camera();
        // Projects to (700, 400) at depth 10.
        assert!(is_visible(Vec3::new(5.0, 0.0, -10.0), &camera));
    }

    #[test]
    fn behind_camera_dominates_bounds_check() {
        let camera = test_camera();

        // Mirrored projections land inside the viewport rectangle, but the
        // negative depth must win.
        assert!(!is_visible(Vec3::new(0.0, 0.0, 5.0), &camera));
        assert!(!is_visible(Vec3::new(5.0, 0.0, 10.0), &camera));
        assert!(!is_visible(Vec3::new(-2.0, 1.0, 8.0), &camera));
    }

    #[test]
    fn bounds_are_inclusive_at_the_edges() {
        let camera = test_camera();

        // At depth 10 the horizontal frustum edge sits at |x| = 12.5 and the
        // vertical edge at |y| = 10.0, projecting to exactly 0 / width / height.
        assert!(is_visible(Vec3::new(-12.5, 0.0, -10.0), &camera));
        assert!(is_visible(Vec3::new(12.5, 0.0, -10.0), &camera));
        assert!(is_visible(Vec3::new(0.0, 10.0, -10.0), &camera));
        assert!(is_visible(Vec3::new(0.0, -10.0, -10.0), &camera));

        // Just past either bound is out.
        assert!(!is_visible(Vec3::new(-12.51, 0.0, -10.0), &camera));
        assert!(!is_visible(Vec3::new(12.51, 0.0, -10.0), &camera));
        assert!(!is_visible(Vec3::new(0.0, 10.01, -10.0), &camera));
        assert!(!is_visible(Vec3::new(0.0, -10.01, -10.0), &camera));
    }
}
