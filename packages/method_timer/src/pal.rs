//! Platform abstraction layer for reading the monotonic clock.
//!
//! This module allows switching between the real clock of the operating system, a clock supplied
//! by the user of the package and a fake clock for testing purposes.

mod abstractions;
mod facade;
#[cfg(test)]
mod fake;
mod real;

pub(crate) use abstractions::TimeSource;
pub(crate) use facade::TimeSourceFacade;
#[cfg(test)]
pub(crate) use fake::FakeTimeSource;
