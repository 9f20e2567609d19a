//! Ephemeris error types.

use std::path::PathBuf;

/// Errors surfaced while loading or walking through ephemeris batches.
#[derive(Debug, thiserror::Error)]
pub enum EphemerisError {
    /// The batch file could not be read.
    #[error("failed to read batch {julian} from {path}: {source}")]
    Io {
        julian: i64,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The batch file is not a map of day to position triples.
    #[error("failed to parse batch: {0}")]
    Parse(#[from] serde_json::Error),

    /// The batch holds no days at all.
    #[error("batch contains no days")]
    EmptyBatch,

    /// The batch skips a day.
    #[error("batch is not contiguous: expected day {expected}, found {found}")]
    NonContiguous { expected: i64, found: i64 },

    /// The source has nothing starting at this day.
    #[error("no batch starts at julian day {julian}")]
    MissingBatch { julian: i64 },

    /// The file for one batch holds days starting somewhere else.
    #[error("batch file for julian day {expected} starts at {found}")]
    MislabelledBatch { expected: i64, found: i64 },

    /// The background loader thread has shut down.
    #[error("batch loader worker is no longer running")]
    WorkerGone,

    /// No loaded or loadable data covers this day.
    #[error("no ephemeris data for julian day {julian}: {source}")]
    EndOfData {
        julian: i64,
        #[source]
        source: Box<EphemerisError>,
    },
}
