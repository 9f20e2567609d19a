//! Application error type.

use orrery_config::ConfigError;
use orrery_ephemeris::EphemerisError;
use orrery_flight::FlightError;
use orrery_space::SpaceError;

use crate::platform::PlatformError;

/// Anything that can stop the application from starting or running a
/// scripted command.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("ephemeris: {0}")]
    Ephemeris(#[from] EphemerisError),

    #[error(transparent)]
    Space(#[from] SpaceError),

    #[error(transparent)]
    Flight(#[from] FlightError),

    #[error(transparent)]
    Platform(#[from] PlatformError),
}
