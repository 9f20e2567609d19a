//! Everything a flight mode reads or writes during a frame.

use glam::DVec3;
use orrery_config::Config;
use orrery_ephemeris::{EphemerisStore, SimClock, TimeAdvance};
use orrery_space::{BodyRegistry, Camera, ChildUpdate};

use crate::collaborators::{Notice, Overlay, PointerLock};
use crate::error::FlightError;
use crate::mode::StepResult;
use crate::orbit_controls::OrbitControls;
use crate::pilot::PilotControls;

/// Lower bound of the translation speed multiplier.
pub const MIN_SPEED_MULTIPLIER: f64 = 1e-6;

/// Wall-clock frame timing. Stopped while the menu is open.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameClock {
    running: bool,
    elapsed: f64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            running: true,
            elapsed: 0.0,
        }
    }
}

impl FrameClock {
    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds accumulated while running.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// The frame delta to simulate: `raw` while running, zero while stopped.
    pub fn delta(&mut self, raw: f64) -> f64 {
        if !self.running {
            return 0.0;
        }
        let delta = raw.max(0.0);
        self.elapsed += delta;
        delta
    }
}

/// Owns one of each component the flight modes share. Passed by reference
/// into every mode call.
pub struct SpaceContext {
    pub config: Config,
    pub camera: Camera,
    pub bodies: BodyRegistry,
    pub ephemeris: EphemerisStore,
    pub clock: SimClock,
    pub frame_clock: FrameClock,
    pub pilot: PilotControls,
    pub orbit_controls: OrbitControls,
    pub pointer: Box<dyn PointerLock>,
    pub overlay: Box<dyn Overlay>,
}

impl SpaceContext {
    /// Build a context at the configured start day. Body sizes and the camera
    /// near plane follow the configured size scale.
    pub fn new(
        config: Config,
        mut bodies: BodyRegistry,
        ephemeris: EphemerisStore,
        pointer: Box<dyn PointerLock>,
        overlay: Box<dyn Overlay>,
    ) -> Self {
        let mut camera = Camera::from_config(&config.camera);
        camera.apply_size_scale(config.space.bodies_size_scale);
        bodies.apply_size_scale(config.space.bodies_size_scale);

        let mut clock = SimClock::new(config.ephemeris.start_julian, config.ephemeris.preload_offset);
        clock.set_step(i64::from(config.space.bodies_speed));

        Self {
            pilot: PilotControls::from_config(&config.controls),
            orbit_controls: OrbitControls::default(),
            frame_clock: FrameClock::default(),
            config,
            camera,
            bodies,
            ephemeris,
            clock,
            pointer,
            overlay,
        }
    }

    /// Place every body at the current day and build orbit trails. Needs the
    /// batch for the current day to be loaded.
    pub fn ready(&mut self) {
        let julian = self.clock.julian();
        self.bodies.translate_bodies(&self.ephemeris, julian);
        self.bodies.create_orbits(
            &self.ephemeris,
            julian,
            self.config.space.orbit_line_segments,
            self.config.space.show_orbits,
        );
        self.update_body_children(false);
        tracing::info!("Space ready at julian day {julian}");
    }

    /// Store a new simulated speed and pass it to the clock.
    pub fn set_bodies_speed(&mut self, speed: u32) {
        self.config.space.bodies_speed = speed;
        self.clock.set_step(i64::from(speed));
    }

    pub fn update_body_children(&mut self, advance_trails: bool) {
        let options = ChildUpdate {
            show_labels: self.config.space.show_labels,
            advance_trails,
            orbit_segments: self.config.space.orbit_line_segments,
        };
        self.bodies
            .update_body_children(&self.camera, &self.ephemeris, self.clock.julian(), options);
    }

    /// Shared tail of every moving mode's step: advance time, move and spin
    /// the bodies, then update their labels and trails.
    ///
    /// Stops time and returns [`StepResult::Stop`] once the ephemeris runs
    /// out.
    pub fn update_space_time(&mut self, delta: f64) -> StepResult {
        let mut result = StepResult::Continue;
        let mut advanced = false;

        if self.config.space.bodies_speed > 0 {
            match self.clock.advance(&mut self.ephemeris) {
                TimeAdvance::Advanced { julian } => {
                    self.bodies.translate_bodies(&self.ephemeris, julian);
                    advanced = true;
                }
                TimeAdvance::Pending { julian } => {
                    tracing::trace!("Waiting for ephemeris day {julian}");
                }
                TimeAdvance::Failed(err) => {
                    tracing::warn!("Stopping time: {err}");
                    self.set_bodies_speed(0);
                    self.overlay.notice(Notice::EndOfTime);
                    result = StepResult::Stop;
                }
            }
        }

        if self.config.space.rotate_bodies {
            self.bodies.rotate_bodies(delta);
        }

        self.update_body_children(advanced);
        result
    }

    /// Proximity-based slowdown: the gap between the camera and the nearest
    /// collideable surface, floored at [`MIN_SPEED_MULTIPLIER`]. `nearby`
    /// restricts the bodies considered. 1.0 when nothing qualifies.
    pub fn translation_speed_multiplier(&self, nearby: Option<&[&str]>) -> f64 {
        match self
            .bodies
            .closest_surface_distance(self.camera.position, nearby)
        {
            Some(gap) if gap.is_finite() => gap.max(MIN_SPEED_MULTIPLIER),
            Some(_) | None => 1.0,
        }
    }

    /// Whether the camera is inside the named body's collision distance.
    pub fn is_colliding_with(&self, name: &str) -> Result<bool, FlightError> {
        let body = self.bodies.get(name)?;
        Ok(body.distance_to(self.camera.position) < body.collision_distance())
    }

    /// Position of the named body.
    pub fn body_position(&self, name: &str) -> Result<DVec3, FlightError> {
        Ok(self.bodies.get(name)?.position())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::collaborators::{HeadlessPointerLock, RecordingOverlay};
    use orrery_ephemeris::{Batch, MemorySource};
    use orrery_space::{Body, BodyDef, BodyKind};
    use std::sync::Arc;

    pub const START: i64 = 100;

    pub fn def(name: &'static str, index: usize) -> BodyDef {
        BodyDef {
            name,
            kind: BodyKind::Planet,
            radius_km: 6378.0,
            ephemeris_index: index,
            collideable: true,
            label_visible_distance: 50.0,
            has_bump_map: false,
            has_orbit_line: true,
            tilt_deg: 0.0,
            spin_period_hours: 24.0,
        }
    }

    /// Earth fixed at (0, 0, -1); Mars drifting +0.01 AU in x per day from
    /// (0, 0, 3). Ten days of data starting at [`START`].
    pub fn context() -> (SpaceContext, RecordingOverlay, HeadlessPointerLock) {
        let days = (0..10)
            .map(|d| vec![[0.0, 0.0, -1.0], [0.01 * d as f64, 0.0, 3.0]])
            .collect();
        let source = MemorySource::new().with_batch(Batch::new(START, days).unwrap());
        let mut store = EphemerisStore::inline(Arc::new(source), START, 10);
        store.load_blocking(START).unwrap();

        let mut bodies = BodyRegistry::new();
        bodies
            .populate([Body::from_def(&def("Earth", 0)), Body::from_def(&def("Mars", 1))])
            .unwrap();

        let mut config = Config::default();
        config.ephemeris.start_julian = START;
        config.ephemeris.preload_offset = 0;
        config.space.orbit_line_segments = 2;
        config.camera.initial_position = [0.0, 0.0, 1.0];

        let overlay = RecordingOverlay::new();
        let pointer = HeadlessPointerLock::new();
        let mut ctx = SpaceContext::new(
            config,
            bodies,
            store,
            Box::new(pointer.clone()),
            Box::new(overlay.clone()),
        );
        ctx.ready();
        (ctx, overlay, pointer)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_frame_clock_stops() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.delta(0.5), 0.5);
        clock.stop();
        assert_eq!(clock.delta(0.5), 0.0);
        clock.start();
        assert_eq!(clock.delta(0.25), 0.25);
        assert_eq!(clock.elapsed(), 0.75);
    }

    #[test]
    fn test_ready_places_bodies_and_orbits() {
        let (ctx, _, _) = context();
        let earth = ctx.bodies.get("Earth").unwrap();
        assert_eq!(earth.position(), DVec3::new(0.0, 0.0, -1.0));
        assert_eq!(earth.orbit.as_ref().unwrap().len(), 5);
    }

    #[test]
    fn test_frozen_time_does_not_advance() {
        let (mut ctx, _, _) = context();
        assert_eq!(ctx.update_space_time(0.1), StepResult::Continue);
        assert_eq!(ctx.clock.julian(), START);
    }

    #[test]
    fn test_time_moves_bodies() {
        let (mut ctx, _, _) = context();
        ctx.set_bodies_speed(2);
        assert_eq!(ctx.update_space_time(0.1), StepResult::Continue);
        assert_eq!(ctx.clock.julian(), START + 2);
        let mars = ctx.bodies.get("Mars").unwrap().position();
        assert!((mars - DVec3::new(0.02, 0.0, 3.0)).length() < 1e-12);
    }

    #[test]
    fn test_end_of_data_freezes_time() {
        let (mut ctx, overlay, _) = context();
        ctx.set_bodies_speed(15);

        // The reload for day START + 15 is requested, then fails.
        assert_eq!(ctx.update_space_time(0.1), StepResult::Continue);
        assert_eq!(ctx.update_space_time(0.1), StepResult::Stop);

        assert_eq!(ctx.config.space.bodies_speed, 0);
        assert_eq!(ctx.clock.step(), 0);
        assert_eq!(ctx.clock.julian(), START);
        assert_eq!(overlay.state().notice, Some(Notice::EndOfTime));
        assert_eq!(ctx.update_space_time(0.1), StepResult::Continue);
    }

    #[test]
    fn test_multiplier_grows_with_distance() {
        let (mut ctx, _, _) = context();
        let mut previous = 0.0;
        for z in [-0.99, -0.9, -0.5, 0.0, 1.0, 10.0, 1000.0] {
            ctx.camera.position = DVec3::new(0.0, 0.0, z);
            let m = ctx.translation_speed_multiplier(Some(&["Earth"][..]));
            assert!(m > 0.0 && m.is_finite());
            assert!(m >= previous, "multiplier fell at z = {z}");
            previous = m;
        }
    }

    #[test]
    fn test_multiplier_floor_inside_body() {
        let (mut ctx, _, _) = context();
        ctx.camera.position = DVec3::new(0.0, 0.0, -1.0);
        assert_eq!(ctx.translation_speed_multiplier(None), MIN_SPEED_MULTIPLIER);
    }

    #[test]
    fn test_multiplier_without_candidates() {
        let (ctx, _, _) = context();
        assert_eq!(ctx.translation_speed_multiplier(Some(&[][..])), 1.0);
    }
}
