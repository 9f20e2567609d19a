//! Orbit camera: rotate around and zoom toward a fixed target point.

use glam::{DVec2, DVec3};
use orrery_space::{Camera, look_at_rotation};

/// Drag and scroll input since the last frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrbitInput {
    /// Pointer drag in pixels.
    pub rotate: DVec2,
    /// Scroll steps; positive zooms in.
    pub zoom: f64,
}

/// Keeps the camera on a sphere around `target`, looking at it.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitControls {
    pub enabled: bool,
    pub target: DVec3,
    pub min_distance: f64,
    pub max_distance: f64,
    /// Radians per pixel of drag.
    pub rotate_speed: f64,
    /// Fraction of the current distance covered per zoom step.
    pub zoom_speed: f64,
    /// Elevation limit in radians, both above and below the target.
    pub max_pitch: f64,
    input: OrbitInput,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enabled: false,
            target: DVec3::ZERO,
            min_distance: 0.0,
            max_distance: f64::INFINITY,
            rotate_speed: 0.005,
            zoom_speed: 0.05,
            max_pitch: 89.0_f64.to_radians(),
            input: OrbitInput::default(),
        }
    }
}

impl OrbitControls {
    /// Accumulate input until the next update.
    pub fn push_input(&mut self, input: OrbitInput) {
        self.input.rotate += input.rotate;
        self.input.zoom += input.zoom;
    }

    /// Apply pending input and place the camera. Does nothing while disabled.
    pub fn update(&mut self, camera: &mut Camera) {
        if !self.enabled {
            return;
        }
        let input = std::mem::take(&mut self.input);

        let offset = camera.position - self.target;
        let mut distance = offset.length();
        let (mut yaw, mut pitch) = if distance > 0.0 {
            (offset.x.atan2(offset.z), (offset.y / distance).clamp(-1.0, 1.0).asin())
        } else {
            (0.0, 0.0)
        };

        yaw -= input.rotate.x * self.rotate_speed;
        pitch = (pitch + input.rotate.y * self.rotate_speed).clamp(-self.max_pitch, self.max_pitch);
        distance *= (1.0 - self.zoom_speed).powf(input.zoom);
        distance = distance.clamp(self.min_distance, self.max_distance.max(self.min_distance));

        let offset = DVec3::new(
            distance * pitch.cos() * yaw.sin(),
            distance * pitch.sin(),
            distance * pitch.cos() * yaw.cos(),
        );
        camera.position = self.target + offset;
        camera.rotation = look_at_rotation(camera.position, self.target, DVec3::Y);
    }
}
