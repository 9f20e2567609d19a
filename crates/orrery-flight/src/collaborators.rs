//! Seams to the outside world: pointer capture and on-screen overlays.
//!
//! The headless implementations record what was asked of them behind a
//! shared handle, so a caller can keep a clone and inspect it after boxing
//! the original into a [`SpaceContext`](crate::SpaceContext).

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// A message shown to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    FlyingTo(String),
    LookingAt(String),
    EndOfTime,
    PointerLockError,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::FlyingTo(name) => write!(f, "Flying to {name}..."),
            Notice::LookingAt(name) => write!(f, "Looking at {name}..."),
            Notice::EndOfTime => write!(
                f,
                "The clock has stopped because the stored ephemeris data ends here."
            ),
            Notice::PointerLockError => write!(
                f,
                "Pointer capture failed; mouse look may not be available."
            ),
        }
    }
}

/// Exclusive pointer capture. Grant and loss are reported back through
/// [`FlightController::on_pointer_lock_change`](crate::FlightController::on_pointer_lock_change).
pub trait PointerLock {
    fn request(&mut self);
    fn exit(&mut self);
}

/// Menu, HUD and notices.
pub trait Overlay {
    fn show_menu(&mut self);
    fn hide_menu(&mut self);
    fn show_hud(&mut self);
    fn hide_hud(&mut self);
    fn notice(&mut self, notice: Notice);
    fn clear_notice(&mut self);
}

fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Requests and exits seen by a [`HeadlessPointerLock`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PointerLockLog {
    pub requests: usize,
    pub exits: usize,
    /// True between a request and the next exit.
    pub requested: bool,
}

/// Pointer capture with no device behind it.
#[derive(Clone, Debug, Default)]
pub struct HeadlessPointerLock {
    log: Arc<Mutex<PointerLockLog>>,
}

impl HeadlessPointerLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> PointerLockLog {
        lock(&self.log).clone()
    }
}

impl PointerLock for HeadlessPointerLock {
    fn request(&mut self) {
        let mut log = lock(&self.log);
        log.requests += 1;
        log.requested = true;
        tracing::debug!("Pointer lock requested");
    }

    fn exit(&mut self) {
        let mut log = lock(&self.log);
        log.exits += 1;
        log.requested = false;
        tracing::debug!("Pointer lock released");
    }
}

/// What a [`RecordingOverlay`] currently shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverlayState {
    pub menu_visible: bool,
    pub hud_visible: bool,
    pub notice: Option<Notice>,
    /// Every notice ever shown, oldest first.
    pub history: Vec<Notice>,
}

/// Overlay that logs instead of drawing.
#[derive(Clone, Debug, Default)]
pub struct RecordingOverlay {
    state: Arc<Mutex<OverlayState>>,
}

impl RecordingOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> OverlayState {
        lock(&self.state).clone()
    }
}

impl Overlay for RecordingOverlay {
    fn show_menu(&mut self) {
        lock(&self.state).menu_visible = true;
    }

    fn hide_menu(&mut self) {
        lock(&self.state).menu_visible = false;
    }

    fn show_hud(&mut self) {
        lock(&self.state).hud_visible = true;
    }

    fn hide_hud(&mut self) {
        lock(&self.state).hud_visible = false;
    }

    fn notice(&mut self, notice: Notice) {
        tracing::info!("Notice: {notice}");
        let mut state = lock(&self.state);
        state.history.push(notice.clone());
        state.notice = Some(notice);
    }

    fn clear_notice(&mut self) {
        lock(&self.state).notice = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_clone_shares_state() {
        let overlay = RecordingOverlay::new();
        let mut boxed: Box<dyn Overlay> = Box::new(overlay.clone());
        boxed.show_menu();
        boxed.notice(Notice::FlyingTo("Mars".into()));
        boxed.clear_notice();

        let state = overlay.state();
        assert!(state.menu_visible);
        assert_eq!(state.notice, None);
        assert_eq!(state.history, [Notice::FlyingTo("Mars".into())]);
    }

    #[test]
    fn test_pointer_lock_counts() {
        let pointer = HeadlessPointerLock::new();
        let mut boxed: Box<dyn PointerLock> = Box::new(pointer.clone());
        boxed.request();
        assert!(pointer.log().requested);
        boxed.exit();
        assert_eq!(
            pointer.log(),
            PointerLockLog {
                requests: 1,
                exits: 1,
                requested: false
            }
        );
    }

    #[test]
    fn test_notice_text() {
        assert_eq!(Notice::LookingAt("Venus".into()).to_string(), "Looking at Venus...");
    }
}
