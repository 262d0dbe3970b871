//! Platform abstraction trait definitions.

use std::fmt::Debug;
use std::time::Duration;

/// Provides readings of a monotonic clock.
///
/// Readings are measured from an arbitrary origin that stays fixed for the lifetime of the
/// time source. Only differences between two readings are meaningful.
pub(crate) trait TimeSource: Debug + 'static {
    /// Gets the current reading of the clock.
    ///
    /// Consecutive readings never decrease.
    fn now(&self) -> Duration;
}
