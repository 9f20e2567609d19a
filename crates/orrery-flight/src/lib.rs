//! Flight modes for the orrery camera and the controller that switches
//! between them.
//!
//! A [`FlightController`] holds one instance of each [`FlightMode`] and at
//! most one current mode. All modes read and write a shared
//! [`SpaceContext`], which owns the camera, the bodies, the ephemeris and
//! the simulated clock.

mod collaborators;
mod context;
mod controller;
mod error;
mod maneuver;
mod mode;
pub mod modes;
mod orbit_controls;
mod pilot;
mod setting;

pub use collaborators::{
    HeadlessPointerLock, Notice, Overlay, OverlayState, PointerLock, PointerLockLog,
    RecordingOverlay,
};
pub use context::{FrameClock, MIN_SPEED_MULTIPLIER, SpaceContext};
pub use controller::FlightController;
pub use error::FlightError;
pub use maneuver::{ManeuverHandle, ManeuverStatus};
pub use mode::{FlightMode, ModeState, StepResult};
pub use modes::{AutoMode, AutoPhase, FreeMode, MenuMode, OrbitMode, PAN_STEP};
pub use orbit_controls::{OrbitControls, OrbitInput};
pub use pilot::{PilotControls, PilotInput};
pub use setting::Setting;
