//! Time source for the stress-test loop.
//!
//! The driver only ever asks two things of time: how long the run has been
//! going and to suspend for a simulated transmission delay. Tests swap in
//! [`SimulatedClock`] so a run completes instantly with the same logical
//! structure.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub trait Clock: Send {
    /// Time since the clock was created, i.e. since run start.
    fn elapsed(&self) -> Duration;

    /// Suspend the caller for `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// Wall-clock time; `sleep` blocks the current thread.
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Virtual time that only advances when someone sleeps on it. Clones share
/// the same timeline, so a test can keep a handle and inspect it after the
/// driver has consumed its copy.
#[derive(Debug, Clone, Default)]
pub struct SimulatedClock {
    now: Arc<Mutex<Duration>>,
}

impl SimulatedClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward without a sleep, e.g. to model time spent outside
    /// the transmission delay.
    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now += duration;
    }
}

impl Clock for SimulatedClock {
    fn elapsed(&self) -> Duration {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn sleep(&mut self, duration: Duration) {
        self.advance(duration);
    }
}
