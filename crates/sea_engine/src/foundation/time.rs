//! Time management utilities
//!
//! The main loop runs logical updates at a fixed rate and renders as often as
//! it can. [`FixedTimestep`] turns elapsed wall-clock time into a whole number
//! of updates; [`RateCounter`] reports frames and updates per second.

use std::time::{Duration, Instant};

/// Accumulator for fixed-rate logical updates
pub struct FixedTimestep {
    step: Duration,
    accumulator: Duration,
    last_tick: Instant,
}

impl FixedTimestep {
    /// Create a timestep running `rate_hz` updates per second
    ///
    /// A rate of zero is treated as one update per second.
    pub fn new(rate_hz: u32) -> Self {
        Self {
            step: Duration::from_secs(1) / rate_hz.max(1),
            accumulator: Duration::ZERO,
            last_tick: Instant::now(),
        }
    }

    /// Measure time since the previous tick and return the number of updates due
    pub fn tick(&mut self) -> u32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.advance(elapsed)
    }

    /// Add `elapsed` to the accumulator and drain it in whole steps
    ///
    /// The remainder carries over to the next call.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;

        let mut updates = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            updates += 1;
        }
        updates
    }

    /// Length of one logical update
    pub fn step(&self) -> Duration {
        self.step
    }

    /// Length of one logical update in seconds
    pub fn step_seconds(&self) -> f32 {
        self.step.as_secs_f32()
    }

    /// Fraction of a step currently accumulated, in `[0, 1)`
    pub fn alpha(&self) -> f32 {
        self.accumulator.as_secs_f32() / self.step.as_secs_f32()
    }
}

/// Frame and update counts over one-second windows
pub struct RateCounter {
    window_start: Instant,
    frames: u32,
    updates: u32,
}

/// Counts gathered over one reporting window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateReport {
    /// Frames rendered in the window
    pub frames: u32,
    /// Logical updates run in the window
    pub updates: u32,
}

impl Default for RateCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateCounter {
    /// Create a counter whose first window starts now
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a counter whose first window starts at `start`
    pub fn starting_at(start: Instant) -> Self {
        Self {
            window_start: start,
            frames: 0,
            updates: 0,
        }
    }

    /// Record one rendered frame
    pub fn record_frame(&mut self) {
        self.frames += 1;
    }

    /// Record `count` logical updates
    pub fn record_updates(&mut self, count: u32) {
        self.updates += count;
    }

    /// Return and reset the counts once a full second has passed since the window start
    ///
    /// The window advances by exactly one second so reports do not drift.
    pub fn report(&mut self, now: Instant) -> Option<RateReport> {
        if now.duration_since(self.window_start) < Duration::from_secs(1) {
            return None;
        }

        self.window_start += Duration::from_secs(1);
        let report = RateReport {
            frames: self.frames,
            updates: self.updates,
        };
        self.frames = 0;
        self.updates = 0;
        Some(report)
    }
}
