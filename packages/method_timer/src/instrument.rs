//! Access to the timer owned by an instrumented object.

use crate::Timer;

/// An object that owns a [`Timer`] measuring its own methods.
///
/// Usually implemented via `#[derive(Timed)]` and used together with the
/// [`#[timed]`](crate::timed) attribute, which wraps public methods so that each call is
/// measured by a stopwatch named after the method. The timer is an ordinary field that the
/// constructor initializes, so it always exists before any method runs.
///
/// # Examples
///
/// ```
/// use method_timer::{Timed, Timer};
///
/// #[derive(Debug, Default, Timed)]
/// struct Trainer {
///     timer: Timer,
///     epochs: u32,
/// }
///
/// # fn main() -> Result<(), method_timer::Error> {
/// let mut trainer = Trainer::default();
///
/// let epochs = trainer.call_timed("epoch", |trainer| {
///     trainer.epochs += 1;
///     trainer.epochs
/// })?;
///
/// assert_eq!(epochs, 1);
/// assert_eq!(trainer.timer().laps("epoch").len(), 1);
/// # Ok(())
/// # }
/// ```
pub trait Timed {
    /// The registry that holds this object's stopwatches.
    fn timer(&self) -> &Timer;

    /// Calls a closure with exclusive access to the object while the stopwatch with the given
    /// name is measuring.
    ///
    /// The stopwatch is stopped before the closure's result is returned, and also if the
    /// closure panics. The closure's result, including any error it carries, is returned
    /// unchanged.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyStarted`](crate::Error::AlreadyStarted) if the stopwatch is already
    /// measuring, for example because the closure calls back into itself through this method.
    /// The closure is not called in that case.
    fn call_timed<R>(&mut self, name: &str, f: impl FnOnce(&mut Self) -> R) -> crate::Result<R>
    where
        Self: Sized,
    {
        let span = self.timer().measure(name)?;
        let result = f(self);
        drop(span);

        Ok(result)
    }
}
