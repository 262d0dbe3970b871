//! Real time source backed by the operating system's monotonic clock.

use std::time::{Duration, Instant};

use crate::pal::abstractions::TimeSource;

/// Reads `std::time::Instant`, reporting time elapsed since the time source was created.
#[derive(Debug, Clone)]
pub(crate) struct RealTimeSource {
    origin: Instant,
}

impl RealTimeSource {
    pub(crate) fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl TimeSource for RealTimeSource {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}
