//! Time-indexed body positions: batch files, on-demand loading, and the
//! simulated clock that walks through them.

mod batch;
mod clock;
mod error;
mod source;
mod store;

pub use batch::{Batch, Position};
pub use clock::{SimClock, TimeAdvance};
pub use error::EphemerisError;
pub use source::{BatchSource, DirectorySource, MemorySource};
pub use store::{EphemerisStore, LoadEvent, LoadPurpose, LoadToken};
