//! The contract every flight mode implements.

use std::any::Any;

use crate::context::SpaceContext;
use crate::error::FlightError;

/// Whether the render loop should keep animating the current mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepResult {
    Continue,
    Stop,
}

impl StepResult {
    pub fn is_continue(self) -> bool {
        self == StepResult::Continue
    }
}

/// Bookkeeping shared by all modes. Each mode calls [`activate`](Self::activate)
/// and [`deactivate`](Self::deactivate) from its own `enable` and `disable`
/// before doing anything mode-specific.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModeState {
    pub enabled: bool,
    /// Last computed camera speed in AU per second.
    pub speed: f64,
    pub enable_count: u64,
    pub disable_count: u64,
}

impl ModeState {
    pub fn activate(&mut self) {
        self.enabled = true;
        self.enable_count += 1;
    }

    pub fn deactivate(&mut self) {
        self.enabled = false;
        self.speed = 0.0;
        self.disable_count += 1;
    }
}

/// A camera behaviour with an enable/disable lifecycle and a per-frame step.
pub trait FlightMode: Any + 'static {
    /// Unique name the controller switches by.
    fn name(&self) -> &'static str;

    fn state(&self) -> &ModeState;

    fn state_mut(&mut self) -> &mut ModeState;

    fn enable(&mut self, _ctx: &mut SpaceContext) -> Result<(), FlightError> {
        self.state_mut().activate();
        Ok(())
    }

    fn disable(&mut self, _ctx: &mut SpaceContext) {
        self.state_mut().deactivate();
    }

    /// Advance one frame of `delta` seconds.
    fn step(&mut self, ctx: &mut SpaceContext, delta: f64) -> StepResult;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn is_enabled(&self) -> bool {
        self.state().enabled
    }

    fn speed(&self) -> f64 {
        self.state().speed
    }
}

impl dyn FlightMode {
    /// The concrete mode, if it is an `M`.
    pub fn downcast_ref<M: FlightMode>(&self) -> Option<&M> {
        self.as_any().downcast_ref::<M>()
    }

    pub fn downcast_mut<M: FlightMode>(&mut self) -> Option<&mut M> {
        self.as_any_mut().downcast_mut::<M>()
    }
}
