//! Handles for camera maneuvers that complete over several frames.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Where a maneuver stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ManeuverStatus {
    Pending = 0,
    Completed = 1,
    Cancelled = 2,
}

impl ManeuverStatus {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => ManeuverStatus::Completed,
            2 => ManeuverStatus::Cancelled,
            _ => ManeuverStatus::Pending,
        }
    }
}

/// Shared view of one maneuver. Poll it after each frame; cancel it to stop
/// the maneuver before its next step.
///
/// A handle leaves `Pending` at most once.
#[derive(Clone, Debug)]
pub struct ManeuverHandle {
    status: Arc<AtomicU8>,
}

impl ManeuverHandle {
    pub(crate) fn new() -> Self {
        Self {
            status: Arc::new(AtomicU8::new(ManeuverStatus::Pending as u8)),
        }
    }

    pub fn status(&self) -> ManeuverStatus {
        ManeuverStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    pub fn is_pending(&self) -> bool {
        self.status() == ManeuverStatus::Pending
    }

    pub fn is_completed(&self) -> bool {
        self.status() == ManeuverStatus::Completed
    }

    pub fn is_cancelled(&self) -> bool {
        self.status() == ManeuverStatus::Cancelled
    }

    /// Returns false if the maneuver had already finished.
    pub fn cancel(&self) -> bool {
        self.transition(ManeuverStatus::Cancelled)
    }

    pub(crate) fn complete(&self) -> bool {
        self.transition(ManeuverStatus::Completed)
    }

    fn transition(&self, to: ManeuverStatus) -> bool {
        self.status
            .compare_exchange(
                ManeuverStatus::Pending as u8,
                to as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}
