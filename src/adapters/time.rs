//! Host monotonic time adapter.
//!
//! The controller only needs a monotonic millisecond count; on the robot
//! the host framework supplies its own.  This wraps `std::time::Instant`
//! for the replay tool and host-side runs.

use std::time::Instant;

pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Milliseconds since construction (monotonic).
    pub fn uptime_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
