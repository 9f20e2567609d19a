//! Paused: the menu is up and frame time stands still.

use std::any::Any;

use crate::context::SpaceContext;
use crate::error::FlightError;
use crate::mode::{FlightMode, ModeState, StepResult};

#[derive(Debug, Default)]
pub struct MenuMode {
    state: ModeState,
}

impl MenuMode {
    pub const NAME: &'static str = "menu";

    pub fn new() -> Self {
        Self::default()
    }
}

impl FlightMode for MenuMode {
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
        self.state.activate();
        ctx.frame_clock.stop();
        ctx.overlay.show_menu();
        Ok(())
    }

    fn disable(&mut self, ctx: &mut SpaceContext) {
        self.state.deactivate();
        ctx.overlay.hide_menu();
        ctx.frame_clock.start();
    }

    fn step(&mut self, _ctx: &mut SpaceContext, _delta: f64) -> StepResult {
        StepResult::Stop
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
