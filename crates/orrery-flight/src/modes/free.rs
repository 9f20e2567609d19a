//! User-piloted flight with collision checks.

use std::any::Any;

use orrery_space::Ray;

use crate::context::SpaceContext;
use crate::error::FlightError;
use crate::mode::{FlightMode, ModeState, StepResult};

#[derive(Debug, Default)]
pub struct FreeMode {
    state: ModeState,
}

impl FreeMode {
    pub const NAME: &'static str = "free";

    pub fn new() -> Self {
        Self::default()
    }

    /// Whether moving in the current input direction would bring the camera
    /// within a collideable body's collision distance.
    pub fn colliding(ctx: &SpaceContext) -> bool {
        let local = ctx.pilot.local_translation_vector();
        let Some(ray) = Ray::new(ctx.camera.position, ctx.camera.rotation * local) else {
            return false;
        };
        ctx.bodies.raycast(&ray, true).iter().any(|hit| {
            ctx.bodies
                .get(&hit.name)
                .is_ok_and(|body| hit.distance < body.collision_distance())
        })
    }
}

impl FlightMode for FreeMode {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn state(&self) -> &ModeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ModeState {
        &mut self.state
    }

    /// Controls stay off until the pointer lock is granted.
    fn enable(&mut self, ctx: &mut SpaceContext) -> Result<(), FlightError> {
        self.state.activate();
        ctx.pointer.request();
        Ok(())
    }

    fn disable(&mut self, ctx: &mut SpaceContext) {
        self.state.deactivate();
        ctx.pointer.exit();
        ctx.pilot.enabled = false;
        ctx.overlay.hide_hud();
    }

    fn step(&mut self, ctx: &mut SpaceContext, delta: f64) -> StepResult {
        if !Self::colliding(ctx) {
            let multiplier = ctx.translation_speed_multiplier(None);
            self.state.speed = ctx.pilot.move_camera(&mut ctx.camera, delta, multiplier);
        }
        ctx.update_space_time(delta)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
