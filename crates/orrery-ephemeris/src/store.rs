//! The in-memory ephemeris: one active batch, an optional staged successor,
//! and at most one load in flight.
//!
//! Loads complete asynchronously. Results are only applied inside
//! [`EphemerisStore::poll`], so the active batch never changes in the middle
//! of a frame. Every request supersedes the previous one; completions for
//! superseded requests are discarded (last load wins).

use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::batch::{Batch, Position};
use crate::error::EphemerisError;
use crate::source::BatchSource;

/// Identifies one batch request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadToken(u64);

/// What a completed load does to the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadPurpose {
    /// Replace the active batch as soon as it arrives.
    Replace,
    /// Stage the batch; it becomes active when time leaves the current one.
    Preload,
}

/// Outcome of an applied load, reported by [`EphemerisStore::poll`].
#[derive(Debug)]
pub enum LoadEvent {
    /// The batch starting at `julian` is now the active batch.
    Activated { julian: i64 },
    /// The batch starting at `julian` is staged.
    Staged { julian: i64 },
    /// The load for `julian` failed; the store is unchanged.
    Failed {
        julian: i64,
        purpose: LoadPurpose,
        error: EphemerisError,
    },
}

#[derive(Debug)]
struct LoadRequest {
    token: LoadToken,
    julian: i64,
    purpose: LoadPurpose,
}

struct LoadResult {
    request: LoadRequest,
    result: Result<Batch, EphemerisError>,
}

enum Loader {
    Inline(Arc<dyn BatchSource>),
    Worker {
        tasks: Sender<LoadRequest>,
        _thread: JoinHandle<()>,
    },
}

/// Holds the active batch and serves position lookups.
pub struct EphemerisStore {
    loader: Loader,
    results_tx: Sender<LoadResult>,
    results_rx: Receiver<LoadResult>,
    active: Option<Batch>,
    staged: Option<Batch>,
    next_token: u64,
    in_flight: Option<(LoadToken, i64, LoadPurpose)>,
    epoch_julian: i64,
    batch_limit: i64,
}

impl EphemerisStore {
    /// A store that fetches on the calling thread. Results still arrive on
    /// the next [`poll`](Self::poll), like background loads do.
    pub fn inline(source: Arc<dyn BatchSource>, epoch_julian: i64, batch_limit: i64) -> Self {
        let (results_tx, results_rx) = unbounded();
        Self::with_loader(
            Loader::Inline(source),
            results_tx,
            results_rx,
            epoch_julian,
            batch_limit,
        )
    }

    /// A store that fetches on a dedicated worker thread.
    ///
    /// # Errors
    ///
    /// Returns [`EphemerisError::WorkerGone`] if the thread cannot be spawned.
    pub fn with_worker(
        source: Arc<dyn BatchSource>,
        epoch_julian: i64,
        batch_limit: i64,
    ) -> Result<Self, EphemerisError> {
        let (results_tx, results_rx) = unbounded::<LoadResult>();
        let (tasks, task_rx) = unbounded::<LoadRequest>();
        let sender = results_tx.clone();

        let thread = std::thread::Builder::new()
            .name("ephemeris-loader".into())
            .spawn(move || {
                while let Ok(request) = task_rx.recv() {
                    let result = source.fetch(request.julian);
                    if sender.send(LoadResult { request, result }).is_err() {
                        break;
                    }
                }
            })
            .map_err(|_| EphemerisError::WorkerGone)?;

        Ok(Self::with_loader(
            Loader::Worker {
                tasks,
                _thread: thread,
            },
            results_tx,
            results_rx,
            epoch_julian,
            batch_limit,
        ))
    }

    fn with_loader(
        loader: Loader,
        results_tx: Sender<LoadResult>,
        results_rx: Receiver<LoadResult>,
        epoch_julian: i64,
        batch_limit: i64,
    ) -> Self {
        Self {
            loader,
            results_tx,
            results_rx,
            active: None,
            staged: None,
            next_token: 0,
            in_flight: None,
            epoch_julian,
            batch_limit: batch_limit.max(1),
        }
    }

    /// Request the batch starting at `julian`. Supersedes any load in flight.
    pub fn request_batch(&mut self, julian: i64, purpose: LoadPurpose) -> LoadToken {
        self.next_token += 1;
        let token = LoadToken(self.next_token);
        if let Some((_, previous, _)) = self.in_flight {
            tracing::debug!("Batch {previous} superseded by request for {julian}");
        }
        self.in_flight = Some((token, julian, purpose));
        tracing::info!("Loading ephemeris batch {julian} ({purpose:?})");

        let request = LoadRequest {
            token,
            julian,
            purpose,
        };
        match &self.loader {
            Loader::Inline(source) => {
                let result = source.fetch(julian);
                let _ = self.results_tx.send(LoadResult { request, result });
            }
            Loader::Worker { tasks, .. } => {
                if let Err(err) = tasks.send(request) {
                    let request = err.into_inner();
                    let _ = self.results_tx.send(LoadResult {
                        request,
                        result: Err(EphemerisError::WorkerGone),
                    });
                }
            }
        }
        token
    }

    /// Apply every completed load. Superseded completions are dropped.
    pub fn poll(&mut self) -> Vec<LoadEvent> {
        let mut events = Vec::new();
        while let Ok(completed) = self.results_rx.try_recv() {
            if let Some(event) = self.apply(completed) {
                events.push(event);
            }
        }
        events
    }

    /// Request the batch starting at `julian` and wait for it to become active.
    pub fn load_blocking(&mut self, julian: i64) -> Result<(), EphemerisError> {
        let token = self.request_batch(julian, LoadPurpose::Replace);
        loop {
            let completed = self
                .results_rx
                .recv()
                .map_err(|_| EphemerisError::WorkerGone)?;
            let matches = completed.request.token == token;
            match self.apply(completed) {
                Some(LoadEvent::Failed { error, .. }) if matches => return Err(error),
                Some(_) if matches => return Ok(()),
                _ => {}
            }
        }
    }

    fn apply(&mut self, completed: LoadResult) -> Option<LoadEvent> {
        let LoadResult { request, result } = completed;
        match self.in_flight {
            Some((token, _, _)) if token == request.token => self.in_flight = None,
            _ => {
                tracing::debug!("Discarding superseded batch {}", request.julian);
                return None;
            }
        }

        match result {
            Ok(batch) => {
                let julian = batch.first_julian();
                if request.purpose == LoadPurpose::Replace || self.active.is_none() {
                    tracing::info!(
                        "Loaded ephemeris batch {julian}..={}",
                        batch.last_julian()
                    );
                    self.active = Some(batch);
                    self.staged = None;
                    Some(LoadEvent::Activated { julian })
                } else {
                    tracing::info!("Staged ephemeris batch {julian}");
                    self.staged = Some(batch);
                    Some(LoadEvent::Staged { julian })
                }
            }
            Err(error) => {
                tracing::warn!("Failed to load ephemeris batch {}: {error}", request.julian);
                Some(LoadEvent::Failed {
                    julian: request.julian,
                    purpose: request.purpose,
                    error,
                })
            }
        }
    }

    /// Make the staged batch active. Returns false if nothing was staged.
    pub fn promote_staged(&mut self) -> bool {
        match self.staged.take() {
            Some(batch) => {
                tracing::debug!("Promoting staged batch {}", batch.first_julian());
                self.active = Some(batch);
                true
            }
            None => false,
        }
    }

    /// Position of body `index` on day `julian`, or `None` outside the active batch.
    pub fn position_at(&self, julian: i64, index: usize) -> Option<Position> {
        self.active.as_ref()?.position(julian, index)
    }

    /// Whether the active batch covers `julian`.
    pub fn contains(&self, julian: i64) -> bool {
        self.active.as_ref().is_some_and(|batch| batch.contains(julian))
    }

    /// Whether the staged batch covers `julian`.
    pub fn staged_contains(&self, julian: i64) -> bool {
        self.staged.as_ref().is_some_and(|batch| batch.contains(julian))
    }

    /// First day of the active batch.
    pub fn first_julian(&self) -> Option<i64> {
        self.active.as_ref().map(Batch::first_julian)
    }

    /// Last day of the active batch.
    pub fn last_julian(&self) -> Option<i64> {
        self.active.as_ref().map(Batch::last_julian)
    }

    /// First day of the staged batch.
    pub fn staged_first_julian(&self) -> Option<i64> {
        self.staged.as_ref().map(Batch::first_julian)
    }

    /// Whether a request is still outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// First day of the outstanding request, if any.
    pub fn loading_julian(&self) -> Option<i64> {
        self.in_flight.map(|(_, julian, _)| julian)
    }

    /// The first day of the batch file that covers `julian`.
    pub fn batch_start_for(&self, julian: i64) -> i64 {
        self.epoch_julian + (julian - self.epoch_julian).div_euclid(self.batch_limit) * self.batch_limit
    }
}
