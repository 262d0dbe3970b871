//! Snapshots of the time accumulated by a timer.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::stopwatch::Stopwatch;

/// Snapshot of the time accumulated by every stopwatch of a [`Timer`](crate::Timer).
///
/// Unlike the timer itself, a report is plain data: it can be cloned, sent to other threads,
/// and merged with reports taken from other timers.
///
/// # Examples
///
/// ```
/// use method_timer::{Report, Timer};
///
/// # fn main() -> Result<(), method_timer::Error> {
/// let first = Timer::new();
/// let second = Timer::new();
///
/// first.time("load", || std::hint::black_box(1))?;
/// second.time("load", || std::hint::black_box(2))?;
/// second.time("save", || std::hint::black_box(3))?;
///
/// let merged = Report::merge(&first.to_report(), &second.to_report());
///
/// assert_eq!(merged.get("load").map(|entry| entry.laps()), Some(2));
/// assert_eq!(merged.get("save").map(|entry| entry.laps()), Some(1));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct Report {
    entries: HashMap<String, ReportEntry>,
}

/// Statistics of a single stopwatch in a [`Report`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ReportEntry {
    total: Duration,
    laps: u64,
    running: bool,
}

impl Report {
    pub(crate) fn from_stopwatches<'a>(
        stopwatches: impl IntoIterator<Item = (&'a str, &'a Stopwatch)>,
        now: Duration,
    ) -> Self {
        let entries = stopwatches
            .into_iter()
            .map(|(name, stopwatch)| {
                (
                    name.to_string(),
                    ReportEntry {
                        total: stopwatch.elapsed(now),
                        laps: u64::try_from(stopwatch.laps().len())
                            .expect("lap count fits in u64 on all supported platforms"),
                        running: stopwatch.is_running(),
                    },
                )
            })
            .collect();

        Self { entries }
    }

    /// Merges two reports into a new report.
    ///
    /// Stopwatches with the same name have their statistics combined: totals and lap counts
    /// are added up, and the entry counts as running if it was running in either report.
    #[must_use]
    pub fn merge(a: &Self, b: &Self) -> Self {
        let mut merged_entries = a.entries.clone();

        for (name, b_entry) in &b.entries {
            merged_entries
                .entry(name.clone())
                .and_modify(|a_entry| {
                    a_entry.total = a_entry.total.saturating_add(b_entry.total);
                    a_entry.laps = a_entry.laps.saturating_add(b_entry.laps);
                    a_entry.running |= b_entry.running;
                })
                .or_insert_with(|| b_entry.clone());
        }

        Self {
            entries: merged_entries,
        }
    }

    /// Statistics of the stopwatch with the given name, if the timer had one.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ReportEntry> {
        self.entries.get(name)
    }

    /// Returns an iterator over the stopwatch names and their statistics, in arbitrary order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ReportEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Whether there is any recorded activity in this report.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries
            .values()
            .all(|entry| entry.laps == 0 && !entry.running)
    }

    /// Prints the statistics to stdout.
    ///
    /// Prints nothing if no activity was captured, so that callers speaking a line-based
    /// output protocol are not disturbed by empty reports.
    #[cfg_attr(test, mutants::skip)] // Too difficult to test stdout output reliably - manually tested.
    pub fn print_to_stdout(&self) {
        if self.is_empty() {
            return;
        }
        println!("{self}");
    }
}

impl ReportEntry {
    /// Total measured time, including a measurement that was in progress when the report was taken.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Number of completed measurements.
    #[must_use]
    pub fn laps(&self) -> u64 {
        self.laps
    }

    /// Whether a measurement was in progress when the report was taken.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Mean duration of a completed measurement.
    ///
    /// Returns the total if there are no completed measurements.
    #[must_use]
    pub fn mean(&self) -> Duration {
        if self.laps == 0 {
            return self.total;
        }

        Duration::from_nanos(
            self.total
                .as_nanos()
                .checked_div(u128::from(self.laps))
                .expect("guarded by if condition")
                .try_into()
                .expect("all realistic values fit in u64"),
        )
    }
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} total", self.total)?;

        if self.laps > 1 {
            write!(f, ", {} laps, {:?} mean", self.laps, self.mean())?;
        }

        if self.running {
            write!(f, " (running)")?;
        }

        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            writeln!(f, "No timing statistics captured.")?;
        } else {
            writeln!(f, "Timing statistics:")?;
            // Sort stopwatches by name for consistent output
            let mut sorted_entries: Vec<_> = self.entries.iter().collect();
            sorted_entries.sort_by_key(|(name, _)| *name);
            for (name, entry) in sorted_entries {
                writeln!(f, "  {name}: {entry}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::Timer;
    use crate::pal::{FakeTimeSource, TimeSourceFacade};

    const fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn create_test_timer() -> (Timer, FakeTimeSource) {
        let clock = FakeTimeSource::new();
        let timer = Timer::from_time_source(TimeSourceFacade::fake(clock.clone()));
        (timer, clock)
    }

    fn record(timer: &Timer, clock: &FakeTimeSource, name: &str, duration: Duration) {
        timer.start(name).unwrap();
        clock.advance(duration);
        timer.stop(name).unwrap();
    }

    #[test]
    fn default_report_is_empty() {
        let report = Report::default();
        assert!(report.is_empty());
        assert_eq!(report.entries().count(), 0);
    }

    #[test]
    fn report_from_empty_timer_is_empty() {
        let (timer, _clock) = create_test_timer();
        assert!(timer.to_report().is_empty());
    }

    #[test]
    fn report_with_only_idle_stopwatches_is_empty() {
        let (timer, _clock) = create_test_timer();
        assert!(timer.stop("never_started").is_err());

        let report = timer.to_report();
        assert!(report.is_empty());
        assert_eq!(report.entries().count(), 1);
    }

    #[test]
    fn report_captures_totals_and_laps() {
        let (timer, clock) = create_test_timer();
        record(&timer, &clock, "fit", ms(100));
        record(&timer, &clock, "fit", ms(300));

        let report = timer.to_report();
        let entry = report.get("fit").unwrap();

        assert_eq!(entry.total(), ms(400));
        assert_eq!(entry.laps(), 2);
        assert_eq!(entry.mean(), ms(200));
        assert!(!entry.is_running());
    }

    #[test]
    fn report_includes_running_measurement() {
        let (timer, clock) = create_test_timer();
        timer.start_main().unwrap();
        clock.advance(ms(60));

        let report = timer.to_report();
        let entry = report.get(Timer::MAIN).unwrap();

        assert!(!report.is_empty());
        assert!(entry.is_running());
        assert_eq!(entry.laps(), 0);
        assert_eq!(entry.total(), ms(60));
        assert_eq!(entry.mean(), ms(60));
    }

    #[test]
    fn report_is_a_snapshot() {
        let (timer, clock) = create_test_timer();
        record(&timer, &clock, "fit", ms(10));

        let report = timer.to_report();
        record(&timer, &clock, "fit", ms(10));

        assert_eq!(report.get("fit").unwrap().laps(), 1);
        assert_eq!(timer.to_report().get("fit").unwrap().laps(), 2);
    }

    #[test]
    fn merge_different_stopwatches() {
        let (timer1, clock1) = create_test_timer();
        let (timer2, clock2) = create_test_timer();
        record(&timer1, &clock1, "load", ms(5));
        record(&timer2, &clock2, "save", ms(7));

        let merged = Report::merge(&timer1.to_report(), &timer2.to_report());

        assert_eq!(merged.entries().count(), 2);
        assert_eq!(merged.get("load").unwrap().total(), ms(5));
        assert_eq!(merged.get("save").unwrap().total(), ms(7));
    }

    #[test]
    fn merge_same_stopwatches() {
        let (timer1, clock1) = create_test_timer();
        let (timer2, clock2) = create_test_timer();
        record(&timer1, &clock1, "fit", ms(100));
        record(&timer2, &clock2, "fit", ms(50));
        record(&timer2, &clock2, "fit", ms(30));
        timer2.start("fit").unwrap();

        let merged = Report::merge(&timer1.to_report(), &timer2.to_report());
        let entry = merged.get("fit").unwrap();

        assert_eq!(entry.total(), ms(180));
        assert_eq!(entry.laps(), 3);
        assert!(entry.is_running());
    }

    #[test]
    fn merge_with_empty_report() {
        let (timer, clock) = create_test_timer();
        record(&timer, &clock, "fit", ms(1));
        let report = timer.to_report();

        let merged1 = Report::merge(&Report::default(), &report);
        let merged2 = Report::merge(&report, &Report::default());

        assert_eq!(merged1.get("fit"), report.get("fit"));
        assert_eq!(merged2.get("fit"), report.get("fit"));
    }

    #[test]
    fn display_of_empty_report() {
        let report = Report::default();
        assert_eq!(report.to_string(), "No timing statistics captured.\n");
    }

    #[test]
    fn display_is_sorted_by_name() {
        let (timer, clock) = create_test_timer();
        record(&timer, &clock, "predict", ms(2));
        record(&timer, &clock, "fit", ms(100));
        record(&timer, &clock, "fit", ms(100));

        let display = timer.to_report().to_string();

        assert_eq!(
            display,
            "Timing statistics:\n  fit: 200ms total, 2 laps, 100ms mean\n  predict: 2ms total\n"
        );
    }

    #[test]
    fn display_marks_running_entries() {
        let (timer, clock) = create_test_timer();
        timer.start("fit").unwrap();
        clock.advance(ms(3));

        let display = timer.to_report().to_string();
        assert!(display.contains("fit: 3ms total (running)"), "got {display}");
    }

    static_assertions::assert_impl_all!(Report: Send, Sync);
    static_assertions::assert_impl_all!(ReportEntry: Send, Sync);
}
