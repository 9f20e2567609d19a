//! Space error types.

/// Errors from body registry operations.
#[derive(Debug, thiserror::Error)]
pub enum SpaceError {
    /// No body is registered under this name.
    #[error("unknown body: {0}")]
    UnknownBody(String),

    /// Two bodies share a name.
    #[error("duplicate body: {0}")]
    DuplicateBody(String),

    /// The registry was already populated.
    #[error("body registry is already populated")]
    AlreadyPopulated,
}
