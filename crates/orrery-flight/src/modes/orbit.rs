//! Orbit a target body with drag-to-rotate and scroll-to-zoom.

use std::any::Any;

use crate::context::SpaceContext;
use crate::error::FlightError;
use crate::mode::{FlightMode, ModeState, StepResult};

#[derive(Debug, Default)]
pub struct OrbitMode {
    state: ModeState,
    target: Option<String>,
}

impl OrbitMode {
    pub const NAME: &'static str = "orbit";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn target_body(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Aim the orbit controls at a snapshot of the body's position and keep
    /// the camera outside its collision distance. Must be called before
    /// enabling this mode.
    pub fn set_target_body(&mut self, ctx: &mut SpaceContext, name: &str) -> Result<(), FlightError> {
        let body = ctx.bodies.get(name)?;
        ctx.orbit_controls.target = body.position();
        ctx.orbit_controls.min_distance = body.collision_distance();
        self.target = Some(name.to_string());
        Ok(())
    }

    /// Re-apply the current target after its size changed.
    pub fn update_target_body(&mut self, ctx: &mut SpaceContext) -> Result<(), FlightError> {
        match self.target.clone() {
            Some(name) => self.set_target_body(ctx, &name),
            None => Ok(()),
        }
    }
}

impl FlightMode for OrbitMode {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn state(&self) -> &ModeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ModeState {
        &mut self.state
    }

    fn enable(&mut self, ctx: &mut SpaceContext) -> Result<(), FlightError> {
        if self.target.is_none() {
            return Err(FlightError::MissingTargetBody);
        }
        self.state.activate();
        ctx.orbit_controls.enabled = true;
        Ok(())
    }

    fn disable(&mut self, ctx: &mut SpaceContext) {
        self.state.deactivate();
        ctx.orbit_controls.enabled = false;
    }

    fn step(&mut self, ctx: &mut SpaceContext, delta: f64) -> StepResult {
        // The target moves while time runs.
        if ctx.config.space.bodies_speed > 0
            && let Some(name) = &self.target
            && let Ok(position) = ctx.body_position(name)
        {
            ctx.orbit_controls.target = position;
        }

        ctx.orbit_controls.update(&mut ctx.camera);
        ctx.update_space_time(delta)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
