//! Injected time source
//!
//! The simulation mixes two timing bases: wall-clock milliseconds (death
//! timer, spawn intervals, spring compression, rope grace window, oscillating
//! obstacles) and frame counts (jump cooldown; momentum decays once per
//! player update). Both are read through [`Clock`] so tests can drive either
//! without sleeping.

use std::time::Instant;

/// Source of elapsed wall time and elapsed ticks
pub trait Clock {
    /// Milliseconds since the clock started
    fn now_ms(&self) -> u64;
    /// Simulation ticks started so far
    fn tick_count(&self) -> u64;
}

/// Hand-driven clock for tests and the headless runner
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: u64,
    ticks: u64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(now_ms: u64) -> Self {
        Self { now_ms, ticks: 0 }
    }

    /// Advance by one tick lasting `frame_ms`
    pub fn advance(&mut self, frame_ms: u64) {
        self.now_ms += frame_ms;
        self.ticks += 1;
    }

    /// Jump wall time forward without counting a tick
    pub fn skip(&mut self, ms: u64) {
        self.now_ms += ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn tick_count(&self) -> u64 {
        self.ticks
    }
}

/// Real-time clock backed by [`Instant`]
#[derive(Debug, Clone)]
pub struct WallClock {
    started: Instant,
    ticks: u64,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            ticks: 0,
        }
    }

    /// Mark the start of a simulation tick
    pub fn begin_tick(&mut self) {
        self.ticks += 1;
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn tick_count(&self) -> u64 {
        self.ticks
    }
}
