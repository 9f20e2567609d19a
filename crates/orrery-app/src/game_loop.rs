//! Fixed-timestep frame driver.
//!
//! Flight modes step by whole frames (a pan advances a fixed amount per
//! step), so the simulation runs at a fixed 60 Hz regardless of how often the
//! host calls in. Leftover time carries over in an accumulator.

use std::time::Instant;
use tracing::warn;

/// Fixed simulation timestep: 60 Hz.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Longest frame time accepted in one call. Anything longer is clamped and
/// the simulation falls behind wall-clock time instead of running dozens of
/// catch-up steps.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Accumulator-based loop state.
///
/// Use [`tick`](Self::tick) with wall-clock timing, or
/// [`advance`](Self::advance) with an explicit frame time for scripted runs.
#[derive(Debug)]
pub struct GameLoop {
    previous_time: Instant,
    accumulator: f64,
    total_sim_time: f64,
    frame_count: u64,
    update_count: u64,
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            previous_time: Instant::now(),
            accumulator: 0.0,
            total_sim_time: 0.0,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Measure the time since the previous call and [`advance`](Self::advance)
    /// by it.
    pub fn tick(&mut self, update_fn: impl FnMut(f64, f64), render_fn: impl FnMut(f64)) {
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous_time).as_secs_f64();
        self.previous_time = now;
        self.advance(frame_time, update_fn, render_fn);
    }

    /// Run as many fixed steps as `frame_time` covers, then render once.
    ///
    /// - `update_fn(FIXED_DT, total_sim_time)` runs zero or more times.
    /// - `render_fn(alpha)` runs exactly once with the leftover fraction of a
    ///   step, in `[0.0, 1.0)`.
    pub fn advance(
        &mut self,
        frame_time: f64,
        mut update_fn: impl FnMut(f64, f64),
        mut render_fn: impl FnMut(f64),
    ) {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;

        while self.accumulator >= FIXED_DT {
            update_fn(FIXED_DT, self.total_sim_time);
            self.total_sim_time += FIXED_DT;
            self.accumulator -= FIXED_DT;
            self.update_count += 1;
        }

        render_fn(self.alpha());
        self.frame_count += 1;
    }

    /// Run exactly one fixed step and render.
    pub fn step_once(&mut self, update_fn: impl FnMut(f64, f64), render_fn: impl FnMut(f64)) {
        // A hair over one step so accumulated rounding cannot skip it.
        let needed = (FIXED_DT - self.accumulator).max(0.0) + f64::EPSILON;
        self.advance(needed, update_fn, render_fn);
    }

    /// Leftover fraction of a step.
    pub fn alpha(&self) -> f64 {
        if self.accumulator > 0.0 {
            self.accumulator / FIXED_DT
        } else {
            0.0
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Simulated seconds so far.
    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
