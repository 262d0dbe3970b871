use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tracing::trace;

use crate::pal::{TimeSource, TimeSourceFacade};
use crate::stopwatch::Stopwatch;
use crate::{Report, TimerSpan};

/// State shared between a [`Timer`] and the spans it hands out.
#[derive(Debug)]
pub(crate) struct Registry {
    stopwatches: HashMap<String, Stopwatch>,
    time_source: TimeSourceFacade,
}

impl Registry {
    fn new(time_source: TimeSourceFacade) -> Self {
        Self {
            stopwatches: HashMap::new(),
            time_source,
        }
    }

    pub(crate) fn start(&mut self, name: &str) -> crate::Result<()> {
        let now = self.time_source.now();
        self.stopwatch_mut(name).start(name, now)?;

        trace!(stopwatch = name, "stopwatch started");
        Ok(())
    }

    pub(crate) fn stop(&mut self, name: &str) -> crate::Result<()> {
        let now = self.time_source.now();
        self.stopwatch_mut(name).stop(name, now)?;

        trace!(stopwatch = name, "stopwatch stopped");
        Ok(())
    }

    fn stopwatch_mut(&mut self, name: &str) -> &mut Stopwatch {
        // Avoid allocating the key for names we have already seen.
        if !self.stopwatches.contains_key(name) {
            self.stopwatches.insert(name.to_string(), Stopwatch::default());
        }

        self.stopwatches
            .get_mut(name)
            .expect("we just ensured the stopwatch exists")
    }

    fn elapsed(&self) -> Duration {
        let now = self.time_source.now();

        if let Some(main) = self.stopwatches.get(Timer::MAIN) {
            return main.elapsed(now);
        }

        self.stopwatches
            .values()
            .fold(Duration::ZERO, |total, stopwatch| {
                total.saturating_add(stopwatch.elapsed(now))
            })
    }

    fn elapsed_of(&self, name: &str) -> Duration {
        self.stopwatches
            .get(name)
            .map_or(Duration::ZERO, |stopwatch| {
                stopwatch.elapsed(self.time_source.now())
            })
    }
}

/// A registry of named stopwatches.
///
/// Stopwatches are created on first use of their name and live as long as the registry.
/// Each stopwatch is either idle or measuring; starting a measuring stopwatch or stopping an
/// idle one is an error.
///
/// A timer is meant to be owned by exactly one object. It is not `Clone`, `Send` or `Sync`.
///
/// # Examples
///
/// ```
/// use method_timer::Timer;
///
/// # fn main() -> Result<(), method_timer::Error> {
/// let timer = Timer::new();
///
/// timer.start("load")?;
/// std::hint::black_box(42);
/// timer.stop("load")?;
///
/// let answer = timer.time("compute", || 6 * 7)?;
/// assert_eq!(answer, 42);
///
/// // Without a "main" stopwatch, the total of all stopwatches is reported.
/// assert_eq!(
///     timer.elapsed(),
///     timer.elapsed_of("load") + timer.elapsed_of("compute")
/// );
/// # Ok(())
/// # }
/// ```
pub struct Timer {
    registry: Rc<RefCell<Registry>>,
}

impl Timer {
    /// Name of the stopwatch used by [`scope()`][Self::scope] and preferred by
    /// [`elapsed()`][Self::elapsed].
    pub const MAIN: &'static str = "main";

    /// Creates an empty registry that reads the operating system's monotonic clock.
    #[must_use]
    pub fn new() -> Self {
        Self::from_time_source(TimeSourceFacade::real())
    }

    /// Creates an empty registry that reads a custom monotonic clock.
    ///
    /// The function must never return a smaller value than it returned before.
    /// Only differences between readings are used, so the origin can be anything.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    /// use std::time::Duration;
    ///
    /// use method_timer::Timer;
    ///
    /// # fn main() -> Result<(), method_timer::Error> {
    /// let clock = Rc::new(Cell::new(Duration::ZERO));
    /// let timer = Timer::with_time_source({
    ///     let clock = Rc::clone(&clock);
    ///     move || clock.get()
    /// });
    ///
    /// timer.start_main()?;
    /// clock.set(Duration::from_secs(3));
    /// timer.stop_main()?;
    ///
    /// assert_eq!(timer.elapsed(), Duration::from_secs(3));
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn with_time_source(now: impl Fn() -> Duration + 'static) -> Self {
        Self::from_time_source(TimeSourceFacade::custom(now))
    }

    pub(crate) fn from_time_source(time_source: TimeSourceFacade) -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry::new(time_source))),
        }
    }

    /// Starts the stopwatch with the given name, creating it if it does not exist yet.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyStarted`](crate::Error::AlreadyStarted) if the stopwatch is already measuring.
    pub fn start(&self, name: &str) -> crate::Result<()> {
        self.registry.borrow_mut().start(name)
    }

    /// Stops the stopwatch with the given name, recording the measured duration.
    ///
    /// # Errors
    ///
    /// [`Error::NotStarted`](crate::Error::NotStarted) if the stopwatch is not measuring.
    pub fn stop(&self, name: &str) -> crate::Result<()> {
        self.registry.borrow_mut().stop(name)
    }

    /// Starts the [`MAIN`][Self::MAIN] stopwatch.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyStarted`](crate::Error::AlreadyStarted) if the stopwatch is already measuring.
    pub fn start_main(&self) -> crate::Result<()> {
        self.start(Self::MAIN)
    }

    /// Stops the [`MAIN`][Self::MAIN] stopwatch.
    ///
    /// # Errors
    ///
    /// [`Error::NotStarted`](crate::Error::NotStarted) if the stopwatch is not measuring.
    pub fn stop_main(&self) -> crate::Result<()> {
        self.stop(Self::MAIN)
    }

    /// Elapsed time of the registry as a whole.
    ///
    /// If a stopwatch named [`MAIN`][Self::MAIN] exists, this is the elapsed time of that
    /// stopwatch alone and all other stopwatches are ignored. Otherwise, this is the sum of the
    /// elapsed time of all stopwatches. Measurements in progress are included.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.registry.borrow().elapsed()
    }

    /// Elapsed time of one stopwatch, including a measurement in progress.
    ///
    /// Returns zero for names that have never been used. This does not create the stopwatch.
    #[must_use]
    pub fn elapsed_of(&self, name: &str) -> Duration {
        self.registry.borrow().elapsed_of(name)
    }

    /// Whether the stopwatch with the given name is currently measuring.
    #[must_use]
    pub fn is_running(&self, name: &str) -> bool {
        self.registry
            .borrow()
            .stopwatches
            .get(name)
            .is_some_and(Stopwatch::is_running)
    }

    /// Names of all stopwatches in the registry, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.registry.borrow().stopwatches.keys().cloned().collect();
        names.sort();
        names
    }

    /// Durations of the completed measurements of one stopwatch, oldest first.
    ///
    /// Returns an empty list for names that have never been used.
    #[must_use]
    pub fn laps(&self, name: &str) -> Vec<Duration> {
        self.registry
            .borrow()
            .stopwatches
            .get(name)
            .map(|stopwatch| stopwatch.laps().to_vec())
            .unwrap_or_default()
    }

    /// Starts the [`MAIN`][Self::MAIN] stopwatch and stops it when the returned span is dropped.
    ///
    /// The stopwatch is stopped exactly once on every exit path from the scope that holds the
    /// span, including early returns, error propagation and panics.
    ///
    /// # Examples
    ///
    /// ```
    /// use method_timer::Timer;
    ///
    /// fn parse(timer: &Timer, input: &str) -> Result<u32, Box<dyn std::error::Error>> {
    ///     let _scope = timer.scope()?;
    ///     Ok(input.parse()?)
    /// }
    ///
    /// let timer = Timer::new();
    /// assert!(parse(&timer, "not a number").is_err());
    /// assert!(!timer.is_running(Timer::MAIN));
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyStarted`](crate::Error::AlreadyStarted) if the stopwatch is already measuring.
    pub fn scope(&self) -> crate::Result<TimerSpan> {
        self.measure(Self::MAIN)
    }

    /// Starts the stopwatch with the given name and stops it when the returned span is dropped.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyStarted`](crate::Error::AlreadyStarted) if the stopwatch is already measuring.
    pub fn measure(&self, name: &str) -> crate::Result<TimerSpan> {
        TimerSpan::start(&self.registry, name)
    }

    /// Runs a closure while the stopwatch with the given name is measuring.
    ///
    /// The stopwatch is stopped before the closure's result is returned, and also if the
    /// closure panics.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyStarted`](crate::Error::AlreadyStarted) if the stopwatch is already
    /// measuring. The closure is not called in that case.
    pub fn time<R>(&self, name: &str, f: impl FnOnce() -> R) -> crate::Result<R> {
        let _span = self.measure(name)?;
        Ok(f())
    }

    /// Creates a snapshot of the time accumulated by every stopwatch.
    ///
    /// Measurements in progress are included up to the moment of the snapshot.
    #[must_use]
    pub fn to_report(&self) -> Report {
        let registry = self.registry.borrow();
        let now = registry.time_source.now();

        Report::from_stopwatches(
            registry
                .stopwatches
                .iter()
                .map(|(name, stopwatch)| (name.as_str(), stopwatch)),
            now,
        )
    }

    /// Prints the statistics of all stopwatches to stdout.
    ///
    /// This is a convenience method equivalent to `self.to_report().print_to_stdout()`.
    /// Prints nothing if no stopwatch has recorded anything.
    #[cfg_attr(test, mutants::skip)] // Too difficult to test stdout output reliably - manually tested.
    pub fn print_to_stdout(&self) {
        self.to_report().print_to_stdout();
    }

    /// Whether no stopwatch has recorded anything yet, completed or in progress.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry
            .borrow()
            .stopwatches
            .values()
            .all(|stopwatch| stopwatch.laps().is_empty() && !stopwatch.is_running())
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.registry.try_borrow() {
            Ok(registry) => f
                .debug_struct("Timer")
                .field("stopwatches", &registry.stopwatches)
                .field("time_source", &registry.time_source)
                .finish(),
            Err(_) => f.debug_struct("Timer").finish_non_exhaustive(),
        }
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Delegate to Report's Display implementation for consistency
        write!(f, "{}", self.to_report())
    }
}
