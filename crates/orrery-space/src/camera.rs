//! The viewing camera: a position and orientation in AU space.
//!
//! The camera looks down its local -Z axis with +Y up, so moving "forward"
//! is a negative local Z translation.

use glam::{DMat3, DQuat, DVec3};
use orrery_config::{CameraConfig, SizeScale};

/// Perspective camera state. The renderer reads it; flight modes write it.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: DVec3,
    pub rotation: DQuat,
    /// Vertical field of view in degrees.
    pub fov_deg: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl Camera {
    /// A camera at the configured initial position, looking at the origin.
    pub fn from_config(config: &CameraConfig) -> Self {
        let position = DVec3::from_array(config.initial_position);
        Self {
            position,
            rotation: look_at_rotation(position, DVec3::ZERO, DVec3::Y),
            fov_deg: config.fov_deg,
            near: config.near,
            far: config.far,
        }
    }

    /// World-space forward direction (local -Z).
    pub fn forward(&self) -> DVec3 {
        self.rotation * DVec3::NEG_Z
    }

    /// Move along the local Z axis. Negative values move forward.
    pub fn translate_z(&mut self, distance: f64) {
        self.position += self.rotation * DVec3::new(0.0, 0.0, distance);
    }

    /// Move by a vector given in camera-local coordinates.
    pub fn translate_local(&mut self, local: DVec3) {
        self.position += self.rotation * local;
    }

    /// Rotate about a camera-local axis.
    pub fn rotate_local(&mut self, axis: DVec3, angle: f64) {
        if let Some(axis) = axis.try_normalize() {
            self.rotation = (self.rotation * DQuat::from_axis_angle(axis, angle)).normalize();
        }
    }

    /// Orientation that would make this camera face `target`.
    pub fn rotation_towards(&self, target: DVec3) -> DQuat {
        look_at_rotation(self.position, target, DVec3::Y)
    }

    /// Turn to face `target` immediately.
    pub fn look_at(&mut self, target: DVec3) {
        self.rotation = self.rotation_towards(target);
    }

    /// Derive the near plane from the body size scale.
    pub fn apply_size_scale(&mut self, scale: SizeScale) {
        self.near = scale.near_plane();
    }
}

/// Rotation for an object at `eye` whose -Z axis points at `target`.
///
/// Degenerate inputs (eye on target, or looking straight along `up`) fall
/// back to a perpendicular up vector, then to identity.
pub fn look_at_rotation(eye: DVec3, target: DVec3, up: DVec3) -> DQuat {
    let Some(z) = (eye - target).try_normalize() else {
        return DQuat::IDENTITY;
    };
    let x = up
        .cross(z)
        .try_normalize()
        .or_else(|| z.any_orthogonal_vector().cross(z).try_normalize());
    let Some(x) = x else {
        return DQuat::IDENTITY;
    };
    let y = z.cross(x);
    DQuat::from_mat3(&DMat3::from_cols(x, y, z)).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_default_camera_faces_origin() {
        let camera = Camera::default();
        assert_eq!(camera.position, DVec3::new(0.0, 0.0, -5.0));
        let forward = camera.forward();
        assert!((forward - DVec3::Z).length() < EPSILON);
    }

    #[test]
    fn test_look_at_points_forward_at_target() {
        let eye = DVec3::new(3.0, -2.0, 7.5);
        let target = DVec3::new(-1.0, 4.0, 0.25);
        let rotation = look_at_rotation(eye, target, DVec3::Y);
        let expected = (target - eye).normalize();
        assert!((rotation * DVec3::NEG_Z - expected).length() < EPSILON);
        // Right stays horizontal.
        assert!((rotation * DVec3::X).dot(DVec3::Y).abs() < EPSILON);
    }

    #[test]
    fn test_look_at_straight_up_is_finite() {
        let rotation = look_at_rotation(DVec3::ZERO, DVec3::new(0.0, 10.0, 0.0), DVec3::Y);
        assert!(rotation.is_finite());
        assert!((rotation * DVec3::NEG_Z - DVec3::Y).length() < EPSILON);
    }

    #[test]
    fn test_look_at_self_is_identity() {
        let p = DVec3::new(1.0, 2.0, 3.0);
        assert_eq!(look_at_rotation(p, p, DVec3::Y), DQuat::IDENTITY);
    }

    #[test]
    fn test_translate_z_negative_moves_forward() {
        let mut camera = Camera::default();
        let start = camera.position;
        camera.translate_z(-2.0);
        assert!((camera.position - (start + camera.forward() * 2.0)).length() < EPSILON);
    }

    #[test]
    fn test_near_plane_follows_size_scale() {
        let mut camera = Camera::default();
        camera.apply_size_scale(SizeScale::Large);
        assert_eq!(camera.near, 0.01);
        camera.apply_size_scale(SizeScale::Factor(100.0));
        assert!((camera.near - 0.001).abs() < EPSILON);
    }
}
