//! Fake time source for testing.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::pal::abstractions::TimeSource;

/// Fake implementation of the time source for testing.
///
/// This implementation allows tests to control the clock instead of relying on the real
/// one. Multiple clones of the same `FakeTimeSource` share the same clock, allowing tests to
/// move time forward after handing the time source to a timer.
#[derive(Clone, Debug)]
pub(crate) struct FakeTimeSource {
    now: Rc<Cell<Duration>>,
}

impl FakeTimeSource {
    /// Creates a new fake time source reading zero.
    pub(crate) fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    /// Sets the clock to an absolute reading.
    pub(crate) fn set_now(&self, now: Duration) {
        self.now.set(now);
    }

    /// Moves the clock forward.
    pub(crate) fn advance(&self, delta: Duration) {
        self.now.set(
            self.now
                .get()
                .checked_add(delta)
                .expect("fake clock overflows Duration - this indicates an unrealistic scenario"),
        );
    }
}

impl TimeSource for FakeTimeSource {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn initializes_with_zero_time() {
        let source = FakeTimeSource::new();
        assert_eq!(source.now(), Duration::ZERO);
    }

    #[test]
    fn advances_from_current_reading() {
        let source = FakeTimeSource::new();
        source.set_now(Duration::from_millis(100));
        source.advance(Duration::from_millis(50));

        assert_eq!(source.now(), Duration::from_millis(150));
    }

    #[test]
    fn shared_state_between_clones() {
        let source1 = FakeTimeSource::new();
        let source2 = source1.clone();

        source1.set_now(Duration::from_millis(100));
        assert_eq!(source2.now(), Duration::from_millis(100));

        source2.advance(Duration::from_millis(10));
        assert_eq!(source1.now(), Duration::from_millis(110));
    }
}
