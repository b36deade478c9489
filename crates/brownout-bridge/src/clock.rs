//! Simulated time sources.
//!
//! The bridge only ever reads the clock; whoever drives the loop owns it and
//! moves it forward.

use std::cell::Cell;
use std::time::{SystemTime, UNIX_EPOCH};

/// Read-only view of "now" as seen by the driving loop, in seconds.
pub trait SimClock {
    fn now(&self) -> f64;
}

/// Clock advanced explicitly by a discrete-event driver.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self { now: Cell::new(start) }
    }

    /// Move time forward. Going backwards is ignored.
    pub fn advance_to(&self, t: f64) {
        if t > self.now.get() {
            self.now.set(t);
        }
    }

    pub fn advance_by(&self, dt: f64) {
        self.advance_to(self.now.get() + dt);
    }
}

impl SimClock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

/// Wall-clock seconds since the Unix epoch, for a real server loop.
#[derive(Debug, Default, Clone, Copy)]
pub struct WallClock;

impl SimClock for WallClock {
    fn now(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }
}
