//! The assembled application: context, mode controller and follow-ups.

use std::fmt;
use std::sync::Arc;

use glam::DVec3;
use orrery_config::Config;
use orrery_ephemeris::{BatchSource, DirectorySource, EphemerisStore};
use orrery_flight::{
    AutoMode, FlightController, FlightError, HeadlessPointerLock, ManeuverHandle,
    ManeuverStatus, MenuMode, OrbitInput, OrbitMode, Overlay, PilotInput, PointerLock,
    RecordingOverlay, Setting, SpaceContext, StepResult,
};
use orrery_space::{BodyDistance, BodyRegistry};

use crate::error::AppError;

/// Mode to switch to once a maneuver completes.
#[derive(Debug)]
struct FollowUp {
    handle: ManeuverHandle,
    mode: String,
}

/// One running orrery.
///
/// Starts in the menu. Drive it with [`frame`](Self::frame) once per
/// rendered frame.
pub struct Orrery {
    ctx: SpaceContext,
    controller: FlightController,
    follow_up: Option<FollowUp>,
}

impl Orrery {
    /// Load the first ephemeris batch, place the solar system at the
    /// configured start day and enter the menu.
    ///
    /// # Errors
    ///
    /// Fails if the start batch cannot be loaded, the loader thread cannot
    /// be spawned or the body catalog is malformed.
    pub fn new(
        config: Config,
        source: Arc<dyn BatchSource>,
        pointer: Box<dyn PointerLock>,
        overlay: Box<dyn Overlay>,
    ) -> Result<Self, AppError> {
        let settings = &config.ephemeris;
        let mut store = if settings.background_loading {
            EphemerisStore::with_worker(source, settings.epoch_julian, settings.batch_limit)?
        } else {
            EphemerisStore::inline(source, settings.epoch_julian, settings.batch_limit)
        };
        store.load_blocking(store.batch_start_for(settings.start_julian))?;

        let bodies = BodyRegistry::solar_system()?;
        let mut ctx = SpaceContext::new(config, bodies, store, pointer, overlay);
        ctx.ready();

        let mut controller = FlightController::new();
        controller.set_mode(&mut ctx, MenuMode::NAME)?;

        Ok(Self {
            ctx,
            controller,
            follow_up: None,
        })
    }

    /// An orrery with no real pointer device or overlay.
    pub fn headless(config: Config, source: Arc<dyn BatchSource>) -> Result<Self, AppError> {
        Self::new(
            config,
            source,
            Box::new(HeadlessPointerLock::new()),
            Box::new(RecordingOverlay::new()),
        )
    }

    /// A headless orrery reading batches from `config.ephemeris.data_dir`.
    pub fn headless_from_config(config: Config) -> Result<Self, AppError> {
        let source = DirectorySource::new(config.ephemeris.data_dir.clone());
        tracing::info!("Reading ephemeris from {}", source.dir().display());
        Self::headless(config, Arc::new(source))
    }

    pub fn context(&self) -> &SpaceContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut SpaceContext {
        &mut self.ctx
    }

    pub fn controller(&self) -> &FlightController {
        &self.controller
    }

    pub fn current_mode(&self) -> Option<&'static str> {
        self.controller.current_mode()
    }

    /// Switch modes directly. Drops any pending follow-up.
    pub fn set_mode(&mut self, name: &str) -> Result<(), AppError> {
        self.follow_up = None;
        self.controller.set_mode(&mut self.ctx, name)?;
        Ok(())
    }

    /// Advance one frame of `raw_delta` wall-clock seconds.
    ///
    /// When the current mode stops animating (end of data, finished
    /// maneuver) and nothing is queued, falls back to the menu.
    pub fn frame(&mut self, raw_delta: f64) -> Result<StepResult, AppError> {
        let delta = self.ctx.frame_clock.delta(raw_delta);
        let result = self.controller.tick(&mut self.ctx, delta);

        if self.resolve_follow_up()? {
            return Ok(StepResult::Continue);
        }

        if !result.is_continue()
            && self.follow_up.is_none()
            && self.current_mode() != Some(MenuMode::NAME)
        {
            tracing::info!(
                "Mode {} stopped, returning to menu",
                self.current_mode().unwrap_or("none")
            );
            self.controller.set_mode(&mut self.ctx, MenuMode::NAME)?;
        }
        Ok(result)
    }

    /// Switch to the queued mode once its maneuver completed. Returns true if
    /// a switch happened.
    fn resolve_follow_up(&mut self) -> Result<bool, AppError> {
        let Some(follow_up) = &self.follow_up else {
            return Ok(false);
        };
        match follow_up.handle.status() {
            ManeuverStatus::Pending => Ok(false),
            ManeuverStatus::Cancelled => {
                tracing::debug!("Maneuver cancelled, dropping follow-up {}", follow_up.mode);
                self.follow_up = None;
                Ok(false)
            }
            ManeuverStatus::Completed => {
                let mode = follow_up.mode.clone();
                self.follow_up = None;
                self.controller.set_mode(&mut self.ctx, &mode)?;
                Ok(true)
            }
        }
    }

    /// Enter auto mode and fly to `body`. With `then`, switch to that mode
    /// once the flight completes.
    pub fn fly_to(&mut self, body: &str, then: Option<&str>) -> Result<ManeuverHandle, AppError> {
        if let Some(mode) = then
            && self.controller.mode(mode).is_none()
        {
            return Err(FlightError::UnknownMode(mode.to_string()).into());
        }
        if !self.ctx.bodies.contains(body) {
            return Err(FlightError::UnknownBody(body.to_string()).into());
        }

        self.follow_up = None;
        let auto = self
            .controller
            .set_mode(&mut self.ctx, AutoMode::NAME)?
            .downcast_mut::<AutoMode>()
            .ok_or_else(|| FlightError::UnknownMode(AutoMode::NAME.to_string()))?;
        let handle = auto.fly_to(&mut self.ctx, body)?;

        self.follow_up = then.map(|mode| FollowUp {
            handle: handle.clone(),
            mode: mode.to_string(),
        });
        Ok(handle)
    }

    /// Fly to `body`, then orbit it.
    pub fn orbit(&mut self, body: &str) -> Result<ManeuverHandle, AppError> {
        let orbit = self
            .controller
            .mode_as_mut::<OrbitMode>()
            .ok_or_else(|| FlightError::UnknownMode(OrbitMode::NAME.to_string()))?;
        orbit.set_target_body(&mut self.ctx, body)?;
        self.fly_to(body, Some(OrbitMode::NAME))
    }

    pub fn apply_setting(&mut self, setting: Setting) -> Result<(), AppError> {
        self.controller.apply_setting(&mut self.ctx, setting)?;
        Ok(())
    }

    pub fn on_pointer_lock_change(&mut self, locked: bool) -> Result<(), AppError> {
        self.controller.on_pointer_lock_change(&mut self.ctx, locked)?;
        Ok(())
    }

    pub fn set_pilot_input(&mut self, input: PilotInput) {
        self.ctx.pilot.set_input(input);
    }

    pub fn push_orbit_input(&mut self, input: OrbitInput) {
        self.ctx.orbit_controls.push_input(input);
    }

    /// Snapshot for reporting.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            julian: self.ctx.clock.julian(),
            mode: self.current_mode(),
            camera: self.ctx.camera.position,
            nearest: self
                .ctx
                .bodies
                .sorted_distances(self.ctx.camera.position, None)
                .into_iter()
                .next(),
        }
    }
}

/// Where a session ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub julian: i64,
    pub mode: Option<&'static str>,
    pub camera: DVec3,
    pub nearest: Option<BodyDistance>,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "julian day: {}", self.julian)?;
        writeln!(f, "mode:       {}", self.mode.unwrap_or("none"))?;
        write!(
            f,
            "camera:     ({:.6}, {:.6}, {:.6}) AU",
            self.camera.x, self.camera.y, self.camera.z
        )?;
        if let Some(nearest) = &self.nearest {
            write!(f, "\nnearest:    {} at {:.6} AU", nearest.name, nearest.distance)?;
        }
        Ok(())
    }
}
