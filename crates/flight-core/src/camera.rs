//! Camera pose types shared with the frontends.
//!
//! These types avoid referencing platform-specific APIs. The core owns the
//! single [`Pose`] and hands out copies; a frontend turns a copy into matrices
//! through [`Camera`] or copies it into its own renderer's camera object.

use glam::{Mat4, Vec3};

use crate::constants::{vec3, FOV_REST, OVERVIEW_ARRIVAL};

/// Camera position plus vertical field of view in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub field_of_view: f32,
}

impl Pose {
    pub const fn new(position: Vec3, field_of_view: f32) -> Self {
        Self {
            position,
            field_of_view,
        }
    }

    pub fn distance_to(&self, other: &Pose) -> f32 {
        self.position.distance(other.position)
    }
}

impl Default for Pose {
    /// The landing overview the page opens on.
    fn default() -> Self {
        Self::new(vec3(OVERVIEW_ARRIVAL), FOV_REST)
    }
}

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Build a camera from a pose, looking at `target` (origin when `None`).
    pub fn from_pose(pose: &Pose, target: Option<Vec3>, aspect: f32) -> Self {
        Self {
            eye: pose.position,
            target: target.unwrap_or(Vec3::ZERO),
            up: Vec3::Y,
            aspect: aspect.max(1e-6),
            fovy_radians: pose.field_of_view.to_radians(),
            znear: 0.1,
            zfar: 1000.0,
        }
    }
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_looks_at_origin_from_pose() {
        let pose = Pose::default();
        let cam = Camera::from_pose(&pose, None, 16.0 / 9.0);
        let origin_view = cam.view_matrix().transform_point3(Vec3::ZERO);
        // origin sits straight ahead on -Z in view space
        assert!(origin_view.x.abs() < 1e-4);
        assert!(origin_view.y.abs() < 1e-4);
        assert!(origin_view.z < 0.0);
        assert!((cam.fovy_radians - 60f32.to_radians()).abs() < 1e-6);
    }
}
