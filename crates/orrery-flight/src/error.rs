//! Flight error types.

use orrery_space::SpaceError;

/// Errors from mode switching, maneuvers and settings.
#[derive(Debug, thiserror::Error)]
pub enum FlightError {
    /// No mode is registered under this name.
    #[error("unknown flight mode: {0}")]
    UnknownMode(String),

    /// Orbit mode was enabled before a target body was set.
    #[error("orbit mode needs a target body")]
    MissingTargetBody,

    /// No body is registered under this name.
    #[error("unknown body: {0}")]
    UnknownBody(String),

    /// A `key=value` setting could not be parsed.
    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    #[error(transparent)]
    Space(SpaceError),
}

impl From<SpaceError> for FlightError {
    fn from(err: SpaceError) -> Self {
        match err {
            SpaceError::UnknownBody(name) => FlightError::UnknownBody(name),
            other => FlightError::Space(other),
        }
    }
}
