//! Scripted camera maneuvers: turn toward a body, then fly up to it.
//!
//! Each maneuver runs as a phase polled once per frame and reports through a
//! [`ManeuverHandle`]. Starting a new maneuver, or disabling the mode,
//! cancels whatever was outstanding.

use std::any::Any;

use glam::DQuat;

use crate::collaborators::Notice;
use crate::context::SpaceContext;
use crate::error::FlightError;
use crate::maneuver::ManeuverHandle;
use crate::mode::{FlightMode, ModeState, StepResult};

/// Interpolation increment per pan frame.
pub const PAN_STEP: f64 = 0.05;

/// What the auto mode is doing.
#[derive(Debug, Default)]
pub enum AutoPhase {
    #[default]
    Idle,
    Panning(PanManeuver),
    Translating(TranslateManeuver),
    Done,
}

#[derive(Debug)]
pub struct PanManeuver {
    body: String,
    from: DQuat,
    to: DQuat,
    t: f64,
    handle: ManeuverHandle,
    /// Set by a fly-to: translate once the pan completes.
    then_translate: Option<ManeuverHandle>,
}

#[derive(Debug)]
pub struct TranslateManeuver {
    body: String,
    handle: ManeuverHandle,
}

#[derive(Debug, Default)]
pub struct AutoMode {
    state: ModeState,
    phase: AutoPhase,
    outstanding: Vec<ManeuverHandle>,
}

impl AutoMode {
    pub const NAME: &'static str = "auto";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &AutoPhase {
        &self.phase
    }

    /// Name of the body the current maneuver heads for.
    pub fn target_body(&self) -> Option<&str> {
        match &self.phase {
            AutoPhase::Panning(pan) => Some(&pan.body),
            AutoPhase::Translating(translate) => Some(&translate.body),
            AutoPhase::Idle | AutoPhase::Done => None,
        }
    }

    /// Rotate the camera toward the body's current position over
    /// `1 / PAN_STEP` frames.
    pub fn pan_to(&mut self, ctx: &mut SpaceContext, name: &str) -> Result<ManeuverHandle, FlightError> {
        let target = ctx.body_position(name)?;
        self.cancel_outstanding();
        ctx.overlay.notice(Notice::LookingAt(name.to_string()));
        tracing::info!("Panning to {name}");

        let handle = self.track(ManeuverHandle::new());
        self.phase = AutoPhase::Panning(PanManeuver {
            body: name.to_string(),
            from: ctx.camera.rotation,
            to: ctx.camera.rotation_towards(target),
            t: 0.0,
            handle: handle.clone(),
            then_translate: None,
        });
        Ok(handle)
    }

    /// Move the camera forward until it is within the body's collision
    /// distance. Does not turn the camera.
    pub fn translate_to(
        &mut self,
        ctx: &mut SpaceContext,
        name: &str,
    ) -> Result<ManeuverHandle, FlightError> {
        ctx.bodies.get(name)?;
        self.cancel_outstanding();
        tracing::info!("Translating to {name}");

        let handle = self.track(ManeuverHandle::new());
        self.phase = AutoPhase::Translating(TranslateManeuver {
            body: name.to_string(),
            handle: handle.clone(),
        });
        Ok(handle)
    }

    /// Freeze time, pan to the body, then translate to it. The returned
    /// handle completes after the translation.
    pub fn fly_to(&mut self, ctx: &mut SpaceContext, name: &str) -> Result<ManeuverHandle, FlightError> {
        let target = ctx.body_position(name)?;
        self.cancel_outstanding();
        ctx.set_bodies_speed(0);
        ctx.overlay.notice(Notice::FlyingTo(name.to_string()));
        tracing::info!("Flying to {name}");

        let pan = self.track(ManeuverHandle::new());
        let flight = self.track(ManeuverHandle::new());
        self.phase = AutoPhase::Panning(PanManeuver {
            body: name.to_string(),
            from: ctx.camera.rotation,
            to: ctx.camera.rotation_towards(target),
            t: 0.0,
            handle: pan,
            then_translate: Some(flight.clone()),
        });
        Ok(flight)
    }

    fn track(&mut self, handle: ManeuverHandle) -> ManeuverHandle {
        self.outstanding.retain(ManeuverHandle::is_pending);
        self.outstanding.push(handle.clone());
        handle
    }

    fn cancel_outstanding(&mut self) {
        for handle in self.outstanding.drain(..) {
            if handle.cancel() {
                tracing::debug!("Cancelled an unfinished maneuver");
            }
        }
        self.phase = AutoPhase::Idle;
    }

    /// Whether someone cancelled a handle of the running maneuver.
    fn phase_cancelled(&self) -> bool {
        match &self.phase {
            AutoPhase::Panning(pan) => {
                pan.handle.is_cancelled()
                    || pan.then_translate.as_ref().is_some_and(ManeuverHandle::is_cancelled)
            }
            AutoPhase::Translating(translate) => translate.handle.is_cancelled(),
            AutoPhase::Idle | AutoPhase::Done => false,
        }
    }

    fn step_pan(pan: &mut PanManeuver, ctx: &mut SpaceContext) -> Option<AutoPhase> {
        // Accumulated steps can land just past 1; snap so the last frame
        // uses the exact target orientation.
        if pan.t > 1.0 && pan.t < 1.0 + PAN_STEP {
            pan.t = 1.0;
        }

        if pan.t <= 1.0 {
            ctx.camera.rotation = if pan.t == 1.0 {
                pan.to
            } else {
                pan.from.slerp(pan.to, pan.t)
            };
            ctx.update_body_children(false);
            pan.t += PAN_STEP;
            return None;
        }

        pan.handle.complete();
        tracing::debug!("Pan to {} complete", pan.body);
        Some(match pan.then_translate.take() {
            Some(handle) => AutoPhase::Translating(TranslateManeuver {
                body: std::mem::take(&mut pan.body),
                handle,
            }),
            None => AutoPhase::Done,
        })
    }

    fn step_translate(
        translate: &mut TranslateManeuver,
        state: &mut ModeState,
        ctx: &mut SpaceContext,
        delta: f64,
    ) -> Option<AutoPhase> {
        let Ok(colliding) = ctx.is_colliding_with(&translate.body) else {
            translate.handle.cancel();
            return Some(AutoPhase::Done);
        };

        if colliding {
            translate.handle.complete();
            state.speed = 0.0;
            tracing::debug!("Arrived at {}", translate.body);
            return Some(AutoPhase::Done);
        }

        let nearby = [translate.body.as_str()];
        let multiplier = ctx.translation_speed_multiplier(Some(&nearby[..]));
        let distance = ctx.config.controls.z_speed() * delta * multiplier;
        if delta > 0.0 {
            state.speed = distance / delta;
        }
        ctx.camera.translate_z(-distance);
        ctx.update_body_children(false);
        None
    }
}

impl FlightMode for AutoMode {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn state(&self) -> &ModeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ModeState {
        &mut self.state
    }

    fn disable(&mut self, ctx: &mut SpaceContext) {
        self.state.deactivate();
        self.cancel_outstanding();
        ctx.overlay.clear_notice();
    }

    fn step(&mut self, ctx: &mut SpaceContext, delta: f64) -> StepResult {
        if self.phase_cancelled() {
            tracing::debug!("Maneuver cancelled, camera left in place");
            self.cancel_outstanding();
            self.state.speed = 0.0;
            return StepResult::Stop;
        }

        let next = match &mut self.phase {
            AutoPhase::Idle | AutoPhase::Done => return StepResult::Stop,
            AutoPhase::Panning(pan) => Self::step_pan(pan, ctx),
            AutoPhase::Translating(translate) => {
                Self::step_translate(translate, &mut self.state, ctx, delta)
            }
        };
        if let Some(next) = next {
            self.phase = next;
        }
        StepResult::Continue
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
