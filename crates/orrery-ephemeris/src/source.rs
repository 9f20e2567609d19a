//! Where batches come from.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::batch::Batch;
use crate::error::EphemerisError;

/// Fetches the batch that starts at a given Julian day.
///
/// Implementations may block; the store calls them either inline or from its
/// worker thread.
pub trait BatchSource: Send + Sync {
    /// Fetch the batch whose first day is `first_julian`.
    fn fetch(&self, first_julian: i64) -> Result<Batch, EphemerisError>;
}

/// Reads `<dir>/<julian>.json` files.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    /// A source rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory batches are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file holding the batch starting at `julian`.
    pub fn path_for(&self, julian: i64) -> PathBuf {
        self.dir.join(format!("{julian}.json"))
    }
}

impl BatchSource for DirectorySource {
    fn fetch(&self, first_julian: i64) -> Result<Batch, EphemerisError> {
        let path = self.path_for(first_julian);
        tracing::debug!("Reading ephemeris batch {}", path.display());
        let contents = std::fs::read_to_string(&path).map_err(|source| EphemerisError::Io {
            julian: first_julian,
            path: path.clone(),
            source,
        })?;
        let batch = Batch::from_json(&contents)?;
        if batch.first_julian() != first_julian {
            return Err(EphemerisError::MislabelledBatch {
                expected: first_julian,
                found: batch.first_julian(),
            });
        }
        Ok(batch)
    }
}

/// Batches held in memory, keyed by first day. Counts fetches.
#[derive(Debug, Default)]
pub struct MemorySource {
    batches: Mutex<HashMap<i64, Batch>>,
    fetches: AtomicUsize,
}

impl MemorySource {
    /// An empty source; every fetch fails with [`EphemerisError::MissingBatch`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a batch, keyed by its first day.
    pub fn insert(&self, batch: Batch) {
        if let Ok(mut batches) = self.batches.lock() {
            batches.insert(batch.first_julian(), batch);
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_batch(self, batch: Batch) -> Self {
        self.insert(batch);
        self
    }

    /// Number of fetches served so far, successful or not.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

impl BatchSource for MemorySource {
    fn fetch(&self, first_julian: i64) -> Result<Batch, EphemerisError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        self.batches
            .lock()
            .ok()
            .and_then(|batches| batches.get(&first_julian).cloned())
            .ok_or(EphemerisError::MissingBatch {
                julian: first_julian,
            })
    }
}
