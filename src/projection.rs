//! Pure pinhole camera model used by the visibility and placement math.
//!
//! Captures the camera pose and projection extents once per frame so the
//! geometry below it stays free of ECS queries and render state.

use bevy::prelude::*;

/// Snapshot of a perspective camera, in the units the placement math works in:
/// pixel-space viewport coordinates plus view-space depth.
#[derive(Debug, Clone, Copy)]
pub struct ViewportCamera {
    /// World-space camera position
    pub position:      Vec3,
    /// World-space camera orientation (forward is -Z)
    pub rotation:      Quat,
    /// Logical viewport size in pixels
    pub viewport:      Vec2,
    /// Half tangent of the vertical field of view
    pub half_tan_vfov: f32,
    /// Half tangent of the horizontal field of view (vfov * aspect ratio)
    pub half_tan_hfov: f32,
    /// Near plane distance
    pub near:          f32,
}

impl ViewportCamera {
    /// Builds the snapshot from the externally owned camera components.
    pub fn from_parts(
        cam_global: &GlobalTransform,
        perspective: &PerspectiveProjection,
        viewport: Vec2,
    ) -> Self {
        let half_tan_vfov = (perspective.fov * 0.5).tan();
        let half_tan_hfov = half_tan_vfov * (viewport.x / viewport.y);

        Self {
            position: cam_global.translation(),
            rotation: cam_global.rotation(),
            viewport,
            half_tan_vfov,
            half_tan_hfov,
            near: perspective.near,
        }
    }

    /// Projects a world point to pixel coordinates plus view-space depth.
    ///
    /// `x`/`y` map `[0, viewport]` across the frustum, `y` increasing upward.
    /// `z` is the signed view-space depth: negative means the point is behind
    /// the camera plane, and the perspective divide by that negative depth
    /// mirrors `x`/`y`. The placement solver relies on seeing that mirrored
    /// result rather than a clipped one.
    pub fn world_to_screen(&self, world: Vec3) -> Vec3 {
        let forward = self.rotation * Vec3::NEG_Z;
        let right = self.rotation * Vec3::X;
        let up = self.rotation * Vec3::Y;

        let relative = world - self.position;
        let depth = relative.dot(forward);

        let norm_x = relative.dot(right) / depth;
        let norm_y = relative.dot(up) / depth;

        Vec3::new(
            (norm_x / self.half_tan_hfov + 1.0) * 0.5 * self.viewport.x,
            (norm_y / self.half_tan_vfov + 1.0) * 0.5 * self.viewport.y,
            depth,
        )
    }

    /// Inverse of [`world_to_screen`](Self::world_to_screen): places a pixel
    /// coordinate at the view-space depth given in `screen.z`.
    pub fn screen_to_world(&self, screen: Vec3) -> Vec3 {
        let forward = self.rotation * Vec3::NEG_Z;
        let right = self.rotation * Vec3::X;
        let up = self.rotation * Vec3::Y;

        let depth = screen.z;
        let norm_x = (screen.x / self.viewport.x * 2.0 - 1.0) * self.half_tan_hfov;
        let norm_y = (screen.y / self.viewport.y * 2.0 - 1.0) * self.half_tan_vfov;

        self.position + right * (norm_x * depth) + up * (norm_y * depth) + forward * depth
    }
}
