//! Simulated time, walked forward one step of whole days per frame.

use crate::error::EphemerisError;
use crate::store::{EphemerisStore, LoadEvent, LoadPurpose};

/// Result of one [`SimClock::advance`].
#[derive(Debug)]
pub enum TimeAdvance {
    /// Time moved to `julian`; positions for it are in the active batch.
    Advanced { julian: i64 },
    /// The batch holding `julian` is still loading. Time did not move.
    Pending { julian: i64 },
    /// No data can be loaded for the next day. Time did not move.
    Failed(EphemerisError),
}

/// The simulated Julian day and how far it moves per advance.
#[derive(Debug, Clone)]
pub struct SimClock {
    julian: i64,
    step: i64,
    pending: Option<i64>,
    preload_offset: i64,
    preload_requested_for: Option<i64>,
}

impl SimClock {
    pub fn new(start_julian: i64, preload_offset: i64) -> Self {
        Self {
            julian: start_julian,
            step: 0,
            pending: None,
            preload_offset: preload_offset.max(0),
            preload_requested_for: None,
        }
    }

    /// Current simulated day.
    pub fn julian(&self) -> i64 {
        self.julian
    }

    /// Days moved per advance.
    pub fn step(&self) -> i64 {
        self.step
    }

    pub fn set_step(&mut self, step: i64) {
        self.step = step;
    }

    /// The day the clock is waiting on, if a load is outstanding.
    pub fn pending(&self) -> Option<i64> {
        self.pending
    }

    /// Move time forward by one step.
    ///
    /// Applies finished loads first. A target in the staged batch promotes it;
    /// a target in neither batch triggers a load and reports
    /// [`TimeAdvance::Pending`] until it lands. A load that fails, or lands
    /// without covering the target, ends time with
    /// [`EphemerisError::EndOfData`].
    pub fn advance(&mut self, store: &mut EphemerisStore) -> TimeAdvance {
        for event in store.poll() {
            let LoadEvent::Failed {
                julian,
                purpose,
                error,
            } = event
            else {
                continue;
            };
            match (purpose, self.pending.take()) {
                (LoadPurpose::Replace, Some(target)) => {
                    return TimeAdvance::Failed(EphemerisError::EndOfData {
                        julian: target,
                        source: Box::new(error),
                    });
                }
                (_, pending) => {
                    self.pending = pending;
                    tracing::warn!("Load of batch {julian} ({purpose:?}) failed: {error}");
                }
            }
        }

        let target = self.pending.unwrap_or(self.julian + self.step);

        if !store.contains(target) {
            if store.staged_contains(target) {
                store.promote_staged();
            } else if self.pending.is_some() && !store.is_loading() {
                self.pending = None;
                let batch = store.batch_start_for(target);
                return TimeAdvance::Failed(EphemerisError::EndOfData {
                    julian: target,
                    source: Box::new(EphemerisError::MissingBatch { julian: batch }),
                });
            } else {
                if self.pending.is_none() {
                    let batch = store.batch_start_for(target);
                    tracing::debug!("Day {target} is outside the loaded batch, loading {batch}");
                    store.request_batch(batch, LoadPurpose::Replace);
                }
                self.pending = Some(target);
                return TimeAdvance::Pending { julian: target };
            }
        }

        self.pending = None;
        self.julian = target;
        self.preload_next(store);
        TimeAdvance::Advanced { julian: target }
    }

    fn preload_next(&mut self, store: &mut EphemerisStore) {
        let Some(last) = store.last_julian() else {
            return;
        };
        let next = last + 1;
        if last - self.julian > self.preload_offset
            || self.preload_requested_for == Some(next)
            || store.staged_contains(next)
            || store.is_loading()
        {
            return;
        }
        self.preload_requested_for = Some(next);
        store.request_batch(next, LoadPurpose::Preload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::Batch;
    use crate::source::MemorySource;
    use std::sync::Arc;

    fn batch(first: i64, days: usize) -> Batch {
        let days = (0..days)
            .map(|d| vec![[(first + d as i64) as f64, 0.0, 0.0]])
            .collect();
        Batch::new(first, days).unwrap()
    }

    fn store(source: Arc<MemorySource>) -> EphemerisStore {
        let mut store = EphemerisStore::inline(source, 0, 10);
        store.load_blocking(0).unwrap();
        store
    }

    #[test]
    fn test_advance_within_batch() {
        let source = Arc::new(MemorySource::new().with_batch(batch(0, 10)));
        let mut store = store(source);
        let mut clock = SimClock::new(0, 0);
        clock.set_step(3);

        assert!(matches!(
            clock.advance(&mut store),
            TimeAdvance::Advanced { julian: 3 }
        ));
        assert!(matches!(
            clock.advance(&mut store),
            TimeAdvance::Advanced { julian: 6 }
        ));
        assert_eq!(clock.julian(), 6);
    }

    #[test]
    fn test_preload_then_promote() {
        let source = Arc::new(
            MemorySource::new()
                .with_batch(batch(0, 10))
                .with_batch(batch(10, 10)),
        );
        let mut store = store(source.clone());
        let mut clock = SimClock::new(5, 4);
        clock.set_step(1);

        // Day 6 is within four days of the end: preload batch 10.
        assert!(matches!(
            clock.advance(&mut store),
            TimeAdvance::Advanced { julian: 6 }
        ));
        assert_eq!(store.loading_julian(), Some(10));

        for expected in 7..=12 {
            assert!(matches!(
                clock.advance(&mut store),
                TimeAdvance::Advanced { julian } if julian == expected
            ));
        }
        assert_eq!(store.first_julian(), Some(10));
        assert_eq!(store.position_at(12, 0), Some([12.0, 0.0, 0.0]));
        // One startup load plus one preload.
        assert_eq!(source.fetch_count(), 2);
    }

    #[test]
    fn test_jump_past_batch_waits_for_reload() {
        let source = Arc::new(
            MemorySource::new()
                .with_batch(batch(0, 10))
                .with_batch(batch(10, 10)),
        );
        let mut store = store(source);
        let mut clock = SimClock::new(9, 0);
        clock.set_step(5);

        assert!(matches!(
            clock.advance(&mut store),
            TimeAdvance::Pending { julian: 14 }
        ));
        assert_eq!(clock.julian(), 9);
        assert_eq!(clock.pending(), Some(14));

        assert!(matches!(
            clock.advance(&mut store),
            TimeAdvance::Advanced { julian: 14 }
        ));
        assert_eq!(clock.pending(), None);
    }

    #[test]
    fn test_failed_reload_is_end_of_data() {
        let source = Arc::new(MemorySource::new().with_batch(batch(0, 10)));
        let mut store = store(source);
        let mut clock = SimClock::new(9, 0);
        clock.set_step(5);

        assert!(matches!(
            clock.advance(&mut store),
            TimeAdvance::Pending { julian: 14 }
        ));
        match clock.advance(&mut store) {
            TimeAdvance::Failed(EphemerisError::EndOfData { julian, source }) => {
                assert_eq!(julian, 14);
                assert!(matches!(*source, EphemerisError::MissingBatch { julian: 10 }));
            }
            other => panic!("expected end of data, got {other:?}"),
        }
        assert_eq!(clock.julian(), 9);
        assert_eq!(clock.pending(), None);
    }

    #[test]
    fn test_failed_preload_does_not_stop_time() {
        let source = Arc::new(MemorySource::new().with_batch(batch(0, 10)));
        let mut store = store(source.clone());
        let mut clock = SimClock::new(0, 100);
        clock.set_step(1);

        for expected in 1..=3 {
            assert!(matches!(
                clock.advance(&mut store),
                TimeAdvance::Advanced { julian } if julian == expected
            ));
        }
        // The failed preload is not retried every frame.
        assert_eq!(source.fetch_count(), 2);
    }

    #[test]
    fn test_unawaited_reload_failure_does_not_stop_time() {
        let source = Arc::new(MemorySource::new().with_batch(batch(0, 10)));
        let mut store = store(source);
        let mut clock = SimClock::new(0, 100);
        clock.set_step(1);

        // No day waits on this load, so its failure is only logged.
        store.request_batch(30, LoadPurpose::Replace);
        assert!(matches!(
            clock.advance(&mut store),
            TimeAdvance::Advanced { julian: 1 }
        ));
        assert_eq!(clock.pending(), None);
    }
}
