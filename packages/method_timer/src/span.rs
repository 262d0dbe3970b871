//! Scoped measurements that stop their stopwatch when dropped.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::warn;

use crate::timer::Registry;

/// Keeps one stopwatch of a [`Timer`](crate::Timer) measuring until the span is dropped.
///
/// Created by [`Timer::scope()`](crate::Timer::scope) and
/// [`Timer::measure()`](crate::Timer::measure). The span does not borrow the timer, so the
/// object that owns the timer remains fully usable while the span is alive.
///
/// # Examples
///
/// ```
/// use method_timer::Timer;
///
/// # fn main() -> Result<(), method_timer::Error> {
/// let timer = Timer::new();
/// {
///     let _span = timer.measure("load")?;
///     // Work happens here.
/// } // The "load" stopwatch stops here.
///
/// assert!(!timer.is_running("load"));
/// assert_eq!(timer.laps("load").len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
#[must_use = "The stopwatch stops as soon as the span is dropped"]
pub struct TimerSpan {
    registry: Rc<RefCell<Registry>>,
    name: String,
    stopped: bool,
}

impl TimerSpan {
    pub(crate) fn start(registry: &Rc<RefCell<Registry>>, name: &str) -> crate::Result<Self> {
        registry.borrow_mut().start(name)?;

        Ok(Self {
            registry: Rc::clone(registry),
            name: name.to_string(),
            stopped: false,
        })
    }

    /// Name of the stopwatch this span keeps running.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stops the stopwatch now instead of when the span is dropped.
    ///
    /// # Errors
    ///
    /// [`Error::NotStarted`](crate::Error::NotStarted) if the stopwatch was already stopped
    /// through the timer while the span was alive.
    pub fn finish(mut self) -> crate::Result<()> {
        self.stopped = true;
        self.registry.borrow_mut().stop(&self.name)
    }
}

impl Drop for TimerSpan {
    fn drop(&mut self) {
        if self.stopped {
            return;
        }

        self.stopped = true;

        if let Err(error) = self.registry.borrow_mut().stop(&self.name) {
            warn!(
                stopwatch = self.name.as_str(),
                %error,
                "stopwatch was stopped by someone else while a span was measuring it"
            );
        }
    }
}
