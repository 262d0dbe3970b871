//! Time source facade for switching between real, custom and fake implementations.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::pal::abstractions::TimeSource;
#[cfg(test)]
use crate::pal::fake::FakeTimeSource;
use crate::pal::real::RealTimeSource;

/// Facade that allows switching between time source implementations.
#[derive(Clone)]
pub(crate) enum TimeSourceFacade {
    /// The operating system's monotonic clock.
    Real(RealTimeSource),

    /// A clock function supplied by the user of the package.
    Custom(Rc<dyn Fn() -> Duration>),

    /// Fake clock for testing.
    #[cfg(test)]
    Fake(FakeTimeSource),
}

impl TimeSourceFacade {
    pub(crate) fn real() -> Self {
        Self::Real(RealTimeSource::new())
    }

    pub(crate) fn custom(now: impl Fn() -> Duration + 'static) -> Self {
        Self::Custom(Rc::new(now))
    }

    #[cfg(test)]
    pub(crate) fn fake(fake_time_source: FakeTimeSource) -> Self {
        Self::Fake(fake_time_source)
    }
}

impl TimeSource for TimeSourceFacade {
    fn now(&self) -> Duration {
        match self {
            Self::Real(source) => source.now(),
            Self::Custom(now) => now(),
            #[cfg(test)]
            Self::Fake(source) => source.now(),
        }
    }
}

impl fmt::Debug for TimeSourceFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(source) => f.debug_tuple("Real").field(source).finish(),
            Self::Custom(_) => f.debug_tuple("Custom").field(&"dyn Fn() -> Duration").finish(),
            #[cfg(test)]
            Self::Fake(source) => f.debug_tuple("Fake").field(source).finish(),
        }
    }
}
