//! Orrery application framework.
//!
//! Assembles the solar system, the ephemeris store and the flight modes into
//! an [`Orrery`], and drives it with a fixed-timestep [`GameLoop`].

mod app;
mod error;
pub mod game_loop;
pub mod platform;

pub use app::{Orrery, SessionSummary};
pub use error::AppError;
pub use game_loop::{FIXED_DT, GameLoop, MAX_FRAME_TIME};
pub use platform::{PlatformDirs, PlatformError};
