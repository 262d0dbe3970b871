use std::time::Duration;

use crate::{Error, Result};

/// A single named accumulator of elapsed time.
///
/// The stopwatch does not read the clock itself; its owner passes in the current clock reading
/// so that every stopwatch of a registry shares one time source.
#[derive(Clone, Debug, Default)]
pub(crate) struct Stopwatch {
    // Clock reading at the time the in-progress measurement started.
    start_mark: Option<Duration>,
    completed: Vec<Duration>,
}

impl Stopwatch {
    pub(crate) fn start(&mut self, name: &str, now: Duration) -> Result<()> {
        if self.start_mark.is_some() {
            return Err(Error::AlreadyStarted {
                name: name.to_string(),
            });
        }

        self.start_mark = Some(now);
        Ok(())
    }

    pub(crate) fn stop(&mut self, name: &str, now: Duration) -> Result<()> {
        let start_mark = self.start_mark.take().ok_or_else(|| Error::NotStarted {
            name: name.to_string(),
        })?;

        self.completed.push(now.saturating_sub(start_mark));
        Ok(())
    }

    /// Sum of all completed measurements plus the in-progress one, if any.
    pub(crate) fn elapsed(&self, now: Duration) -> Duration {
        let in_flight = self
            .start_mark
            .map_or(Duration::ZERO, |start_mark| now.saturating_sub(start_mark));

        self.completed
            .iter()
            .fold(in_flight, |total, lap| total.saturating_add(*lap))
    }

    pub(crate) fn is_running(&self) -> bool {
        self.start_mark.is_some()
    }

    /// Durations of the completed measurements, oldest first.
    pub(crate) fn laps(&self) -> &[Duration] {
        &self.completed
    }
}
