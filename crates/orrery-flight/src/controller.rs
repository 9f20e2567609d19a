//! Owns the flight modes and switches between them.

use crate::collaborators::Notice;
use crate::context::SpaceContext;
use crate::error::FlightError;
use crate::mode::{FlightMode, StepResult};
use crate::modes::{AutoMode, FreeMode, MenuMode, OrbitMode};
use crate::setting::Setting;

/// Registry of flight modes with at most one current mode.
///
/// Every switch disables the previous mode before enabling the next, so each
/// mode's enable and disable counts stay paired.
pub struct FlightController {
    modes: Vec<Box<dyn FlightMode>>,
    current: Option<usize>,
}

impl Default for FlightController {
    fn default() -> Self {
        Self::new()
    }
}

impl FlightController {
    /// A controller with the menu, free, orbit and auto modes registered and
    /// none of them current.
    pub fn new() -> Self {
        let mut controller = Self::empty();
        controller.register(Box::new(MenuMode::new()));
        controller.register(Box::new(FreeMode::new()));
        controller.register(Box::new(OrbitMode::new()));
        controller.register(Box::new(AutoMode::new()));
        controller
    }

    pub fn empty() -> Self {
        Self {
            modes: Vec::new(),
            current: None,
        }
    }

    /// Add a mode. A mode with the same name replaces the old one.
    pub fn register(&mut self, mode: Box<dyn FlightMode>) {
        match self.index_of(mode.name()) {
            Some(index) => {
                tracing::warn!("Replacing flight mode '{}'", mode.name());
                if self.current == Some(index) {
                    self.current = None;
                }
                self.modes[index] = mode;
            }
            None => self.modes.push(mode),
        }
    }

    pub fn mode_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.modes.iter().map(|mode| mode.name())
    }

    pub fn current_mode(&self) -> Option<&'static str> {
        self.current.map(|index| self.modes[index].name())
    }

    pub fn mode(&self, name: &str) -> Option<&dyn FlightMode> {
        self.index_of(name).map(|index| self.modes[index].as_ref())
    }

    pub fn mode_mut(&mut self, name: &str) -> Option<&mut dyn FlightMode> {
        let index = self.index_of(name)?;
        Some(self.modes[index].as_mut())
    }

    /// The registered mode of concrete type `M`.
    pub fn mode_as<M: FlightMode>(&self) -> Option<&M> {
        self.modes.iter().find_map(|mode| mode.downcast_ref::<M>())
    }

    pub fn mode_as_mut<M: FlightMode>(&mut self) -> Option<&mut M> {
        self.modes.iter_mut().find_map(|mode| mode.downcast_mut::<M>())
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.modes.iter().position(|mode| mode.name() == name)
    }

    /// Disable the current mode and enable `name`.
    ///
    /// An unknown name is rejected before anything changes. If the new mode
    /// fails to enable, no mode is current afterwards.
    pub fn set_mode(
        &mut self,
        ctx: &mut SpaceContext,
        name: &str,
    ) -> Result<&mut dyn FlightMode, FlightError> {
        let next = self
            .index_of(name)
            .ok_or_else(|| FlightError::UnknownMode(name.to_string()))?;

        if let Some(previous) = self.current.take() {
            self.modes[previous].disable(ctx);
        }

        if let Err(err) = self.modes[next].enable(ctx) {
            tracing::warn!("Could not enable flight mode '{name}': {err}");
            return Err(err);
        }

        tracing::info!("Flight mode: {name}");
        self.current = Some(next);
        Ok(self.modes[next].as_mut())
    }

    /// Step the current mode. [`StepResult::Stop`] when there is none.
    pub fn tick(&mut self, ctx: &mut SpaceContext, delta: f64) -> StepResult {
        match self.current {
            Some(index) => self.modes[index].step(ctx, delta),
            None => StepResult::Stop,
        }
    }

    /// See [`SpaceContext::translation_speed_multiplier`].
    pub fn translation_speed_multiplier(&self, ctx: &SpaceContext, nearby: Option<&[&str]>) -> f64 {
        ctx.translation_speed_multiplier(nearby)
    }

    /// React to the pointer lock being granted or lost.
    ///
    /// Only free mode cares: a grant turns on the pilot and the HUD, a loss
    /// drops back to the menu.
    pub fn on_pointer_lock_change(
        &mut self,
        ctx: &mut SpaceContext,
        locked: bool,
    ) -> Result<(), FlightError> {
        if self.current_mode() != Some(FreeMode::NAME) {
            return Ok(());
        }
        if locked {
            ctx.pilot.enabled = true;
            ctx.overlay.show_hud();
        } else {
            self.set_mode(ctx, MenuMode::NAME)?;
        }
        Ok(())
    }

    /// The pointer lock request was refused.
    pub fn on_pointer_lock_error(&mut self, ctx: &mut SpaceContext) -> Result<(), FlightError> {
        ctx.overlay.notice(Notice::PointerLockError);
        if self.current_mode() == Some(FreeMode::NAME) {
            self.set_mode(ctx, MenuMode::NAME)?;
        }
        Ok(())
    }

    /// Store a setting and run whatever the change needs beyond that.
    pub fn apply_setting(&mut self, ctx: &mut SpaceContext, setting: Setting) -> Result<(), FlightError> {
        tracing::info!("Setting {setting}");
        match setting {
            Setting::BodiesSpeed(speed) => ctx.set_bodies_speed(speed),
            Setting::RotateBodies(rotate) => ctx.config.space.rotate_bodies = rotate,
            Setting::ShowLabels(show) => {
                ctx.config.space.show_labels = show;
                ctx.update_body_children(false);
            }
            Setting::ShowOrbits(show) => {
                ctx.config.space.show_orbits = show;
                ctx.bodies.set_orbits_visible(show);
            }
            Setting::BodiesSizeScale(scale) => {
                ctx.config.space.bodies_size_scale = scale;
                ctx.bodies.apply_size_scale(scale);
                ctx.camera.apply_size_scale(scale);
                if let Some(orbit) = self.mode_as_mut::<OrbitMode>() {
                    orbit.update_target_body(ctx)?;
                }
                ctx.update_body_children(false);
            }
            Setting::KeyboardSpeedMultiplier(multiplier) => {
                ctx.config.controls.keyboard_speed_multiplier = multiplier;
                ctx.pilot.apply_config(&ctx.config.controls);
            }
            Setting::LookSpeed(speed) => {
                ctx.config.controls.look_speed = speed;
                ctx.pilot.apply_config(&ctx.config.controls);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::{START, context};
    use crate::mode::ModeState;
    use orrery_config::SizeScale;
    use std::any::Any;

    /// Counts steps so tests can see which mode ran.
    #[derive(Default)]
    struct CountingMode {
        name: &'static str,
        state: ModeState,
        steps: usize,
    }

    impl CountingMode {
        fn named(name: &'static str) -> Box<Self> {
            Box::new(Self {
                name,
                ..Default::default()
            })
        }
    }

    impl FlightMode for CountingMode {
        fn name(&self) -> &'static str {
            self.name
        }

        fn state(&self) -> &ModeState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut ModeState {
            &mut self.state
        }

        fn step(&mut self, _ctx: &mut SpaceContext, _delta: f64) -> StepResult {
            self.steps += 1;
            StepResult::Continue
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn steps(controller: &FlightController, name: &str) -> usize {
        controller
            .mode(name)
            .and_then(|mode| mode.downcast_ref::<CountingMode>())
            .map_or(0, |mode| mode.steps)
    }

    #[test]
    fn test_default_modes() {
        let controller = FlightController::new();
        let names: Vec<_> = controller.mode_names().collect();
        assert_eq!(names, ["menu", "free", "orbit", "auto"]);
        assert_eq!(controller.current_mode(), None);
    }

    #[test]
    fn test_enable_disable_counts_pair_up() {
        let (mut ctx, _, _) = context();
        let mut controller = FlightController::new();
        controller
            .mode_as_mut::<OrbitMode>()
            .unwrap()
            .set_target_body(&mut ctx, "Earth")
            .unwrap();

        for name in ["menu", "free", "orbit", "auto"] {
            controller.set_mode(&mut ctx, name).unwrap();
            controller.set_mode(&mut ctx, name).unwrap();
        }
        controller.set_mode(&mut ctx, "menu").unwrap();

        for name in ["free", "orbit", "auto"] {
            let state = controller.mode(name).unwrap().state();
            assert_eq!(state.enable_count, 2, "{name}");
            assert_eq!(state.disable_count, 2, "{name}");
            assert!(!state.enabled);
        }
        let menu = controller.mode("menu").unwrap().state();
        assert_eq!(menu.enable_count, 3);
        assert_eq!(menu.disable_count, 2);
        assert!(menu.enabled);
    }

    #[test]
    fn test_unknown_mode_keeps_current() {
        let (mut ctx, _, _) = context();
        let mut controller = FlightController::new();
        controller.set_mode(&mut ctx, "free").unwrap();

        assert!(matches!(
            controller.set_mode(&mut ctx, "warp"),
            Err(FlightError::UnknownMode(name)) if name == "warp"
        ));
        assert_eq!(controller.current_mode(), Some("free"));
        let free = controller.mode("free").unwrap().state();
        assert_eq!(free.disable_count, 0);
        assert!(free.enabled);
    }

    #[test]
    fn test_orbit_without_target_leaves_no_mode() {
        let (mut ctx, _, _) = context();
        let mut controller = FlightController::new();
        controller.set_mode(&mut ctx, "menu").unwrap();

        assert!(matches!(
            controller.set_mode(&mut ctx, "orbit"),
            Err(FlightError::MissingTargetBody)
        ));
        assert_eq!(controller.current_mode(), None);
        assert!(!controller.mode("menu").unwrap().is_enabled());
        assert_eq!(controller.tick(&mut ctx, 0.1), StepResult::Stop);
    }

    #[test]
    fn test_tick_steps_only_current_mode() {
        let (mut ctx, _, _) = context();
        let mut controller = FlightController::empty();
        controller.register(CountingMode::named("a"));
        controller.register(CountingMode::named("b"));

        assert_eq!(controller.tick(&mut ctx, 0.1), StepResult::Stop);
        controller.set_mode(&mut ctx, "a").unwrap();
        controller.tick(&mut ctx, 0.1);
        controller.tick(&mut ctx, 0.1);
        controller.set_mode(&mut ctx, "b").unwrap();
        controller.tick(&mut ctx, 0.1);

        assert_eq!(steps(&controller, "a"), 2);
        assert_eq!(steps(&controller, "b"), 1);
    }

    #[test]
    fn test_leaving_auto_cancels_maneuvers() {
        let (mut ctx, _, _) = context();
        let mut controller = FlightController::new();
        controller.set_mode(&mut ctx, "auto").unwrap();
        let handle = controller
            .mode_as_mut::<AutoMode>()
            .unwrap()
            .fly_to(&mut ctx, "Mars")
            .unwrap();
        controller.tick(&mut ctx, 0.016);

        controller.set_mode(&mut ctx, "menu").unwrap();
        assert!(handle.is_cancelled());
    }

    #[test]
    fn test_pointer_lock_flow() {
        let (mut ctx, overlay, pointer) = context();
        let mut controller = FlightController::new();
        controller.set_mode(&mut ctx, "free").unwrap();
        assert_eq!(pointer.log().requests, 1);

        controller.on_pointer_lock_change(&mut ctx, true).unwrap();
        assert!(ctx.pilot.enabled);
        assert!(overlay.state().hud_visible);

        controller.on_pointer_lock_change(&mut ctx, false).unwrap();
        assert_eq!(controller.current_mode(), Some("menu"));
        assert!(!ctx.pilot.enabled);
        assert!(!overlay.state().hud_visible);
        assert!(overlay.state().menu_visible);
    }

    #[test]
    fn test_pointer_lock_ignored_outside_free() {
        let (mut ctx, overlay, _) = context();
        let mut controller = FlightController::new();
        controller.set_mode(&mut ctx, "menu").unwrap();
        controller.on_pointer_lock_change(&mut ctx, true).unwrap();
        assert!(!ctx.pilot.enabled);
        assert!(!overlay.state().hud_visible);
    }

    #[test]
    fn test_pointer_lock_error_returns_to_menu() {
        let (mut ctx, overlay, _) = context();
        let mut controller = FlightController::new();
        controller.set_mode(&mut ctx, "free").unwrap();
        controller.on_pointer_lock_error(&mut ctx).unwrap();
        assert_eq!(controller.current_mode(), Some("menu"));
        assert_eq!(overlay.state().notice, Some(Notice::PointerLockError));
    }

    #[test]
    fn test_size_scale_hook() {
        let (mut ctx, _, _) = context();
        let mut controller = FlightController::new();
        controller
            .mode_as_mut::<OrbitMode>()
            .unwrap()
            .set_target_body(&mut ctx, "Earth")
            .unwrap();
        let before = ctx.orbit_controls.min_distance;

        controller
            .apply_setting(&mut ctx, Setting::BodiesSizeScale(SizeScale::Factor(100.0)))
            .unwrap();

        assert!((ctx.orbit_controls.min_distance - before * 100.0).abs() < 1e-12);
        assert!((ctx.camera.near - 0.001).abs() < 1e-15);
        assert_eq!(ctx.config.space.bodies_size_scale, SizeScale::Factor(100.0));
    }

    #[test]
    fn test_speed_setting_drives_clock() {
        let (mut ctx, _, _) = context();
        let mut controller = FlightController::new();
        controller.mode_as_mut::<OrbitMode>().unwrap().set_target_body(&mut ctx, "Mars").unwrap();
        controller.set_mode(&mut ctx, "orbit").unwrap();
        controller.apply_setting(&mut ctx, Setting::BodiesSpeed(3)).unwrap();
        controller.tick(&mut ctx, 0.1);
        assert_eq!(ctx.clock.julian(), START + 3);
    }

    #[test]
    fn test_hiding_orbits_and_labels() {
        let (mut ctx, _, _) = context();
        let mut controller = FlightController::new();
        controller.apply_setting(&mut ctx, Setting::ShowOrbits(false)).unwrap();
        controller.apply_setting(&mut ctx, Setting::ShowLabels(false)).unwrap();
        let earth = ctx.bodies.get("Earth").unwrap();
        assert!(!earth.orbit.as_ref().unwrap().visible);
        assert!(!earth.label.visible);
    }

    #[test]
    fn test_look_speed_reaches_pilot() {
        let (mut ctx, _, _) = context();
        let mut controller = FlightController::new();
        controller.apply_setting(&mut ctx, Setting::LookSpeed(0.5)).unwrap();
        controller
            .apply_setting(&mut ctx, Setting::KeyboardSpeedMultiplier(4.0))
            .unwrap();
        assert_eq!(ctx.pilot.look_speed, 0.5);
        assert_eq!(ctx.pilot.z_speed, 4.0);
    }
}
