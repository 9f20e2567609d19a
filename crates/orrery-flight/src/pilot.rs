//! Keyboard and mouse piloting for free flight.

use glam::{DVec2, DVec3};
use orrery_config::ControlsConfig;
use orrery_space::Camera;

/// Held movement keys and accumulated mouse motion.
///
/// Axes are in `-1.0..=1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PilotInput {
    pub forward: f64,
    pub right: f64,
    pub up: f64,
    /// Positive rolls counter-clockwise.
    pub roll: f64,
    /// Mouse motion since the last frame, in pixels.
    pub look: DVec2,
}

/// Moves and turns the camera from [`PilotInput`]. Inactive until pointer
/// capture is granted.
#[derive(Clone, Debug, PartialEq)]
pub struct PilotControls {
    pub enabled: bool,
    pub z_speed: f64,
    pub strafe_speed: f64,
    pub roll_speed: f64,
    pub look_speed: f64,
    input: PilotInput,
}

impl PilotControls {
    pub fn from_config(config: &ControlsConfig) -> Self {
        let mut controls = Self {
            enabled: false,
            z_speed: 0.0,
            strafe_speed: 0.0,
            roll_speed: 0.0,
            look_speed: 0.0,
            input: PilotInput::default(),
        };
        controls.apply_config(config);
        controls
    }

    /// Pick up changed speeds.
    pub fn apply_config(&mut self, config: &ControlsConfig) {
        self.z_speed = config.z_speed();
        self.strafe_speed = config.strafe_speed();
        self.roll_speed = config.roll_speed();
        self.look_speed = config.look_speed;
    }

    pub fn input(&self) -> PilotInput {
        self.input
    }

    pub fn set_input(&mut self, input: PilotInput) {
        self.input = input;
    }

    /// Direction of travel in camera space, unscaled. Zero when no
    /// movement key is held.
    pub fn local_translation_vector(&self) -> DVec3 {
        DVec3::new(self.input.right, self.input.up, -self.input.forward)
    }

    fn scaled_translation(&self) -> DVec3 {
        self.local_translation_vector() * DVec3::new(self.strafe_speed, self.strafe_speed, self.z_speed)
    }

    /// Apply one frame of input. Returns the resulting speed in AU per
    /// second. Mouse motion is consumed.
    pub fn move_camera(&mut self, camera: &mut Camera, delta: f64, multiplier: f64) -> f64 {
        if !self.enabled {
            return 0.0;
        }

        let velocity = self.scaled_translation() * multiplier;
        camera.translate_local(velocity * delta);

        let look = std::mem::take(&mut self.input.look);
        camera.rotate_local(DVec3::Y, -look.x * self.look_speed);
        camera.rotate_local(DVec3::X, -look.y * self.look_speed);
        camera.rotate_local(DVec3::Z, self.input.roll * self.roll_speed);

        velocity.length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls() -> PilotControls {
        let mut controls = PilotControls::from_config(&ControlsConfig::default());
        controls.enabled = true;
        controls
    }

    #[test]
    fn test_disabled_controls_do_nothing() {
        let mut controls = controls();
        controls.enabled = false;
        controls.set_input(PilotInput {
            forward: 1.0,
            ..Default::default()
        });
        let mut camera = Camera::default();
        let before = camera.clone();
        assert_eq!(controls.move_camera(&mut camera, 1.0, 1.0), 0.0);
        assert_eq!(camera, before);
    }

    #[test]
    fn test_forward_moves_along_view() {
        let mut controls = controls();
        controls.set_input(PilotInput {
            forward: 1.0,
            ..Default::default()
        });
        let mut camera = Camera::default();
        let start = camera.position;
        let speed = controls.move_camera(&mut camera, 0.5, 2.0);

        // z_speed 1 * multiplier 2 for half a second.
        assert!((speed - 2.0).abs() < 1e-12);
        assert!((camera.position - (start + camera.forward())).length() < 1e-12);
    }

    #[test]
    fn test_strafe_uses_strafe_speed() {
        let mut controls = controls();
        controls.set_input(PilotInput {
            right: 1.0,
            up: 1.0,
            ..Default::default()
        });
        let mut camera = Camera::default();
        let speed = controls.move_camera(&mut camera, 1.0, 1.0);
        assert!((speed - 0.5 * 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_look_is_consumed() {
        let mut controls = controls();
        controls.set_input(PilotInput {
            look: DVec2::new(100.0, 0.0),
            ..Default::default()
        });
        let mut camera = Camera::default();
        let before = camera.rotation;
        controls.move_camera(&mut camera, 0.016, 1.0);
        assert_ne!(camera.rotation, before);
        assert_eq!(controls.input().look, DVec2::ZERO);
    }

    #[test]
    fn test_multiplier_setting_scales_speeds() {
        let mut config = ControlsConfig::default();
        config.keyboard_speed_multiplier = 4.0;
        let mut controls = controls();
        controls.apply_config(&config);
        assert_eq!(controls.z_speed, 4.0);
        assert_eq!(controls.strafe_speed, 2.0);
        assert!((controls.roll_speed - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_idle_translation_vector_is_zero() {
        assert_eq!(controls().local_translation_vector(), DVec3::ZERO);
    }
}
