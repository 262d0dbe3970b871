//! This module contains logically private things that must be technically public
//! because they are accessed from macro-generated code.

use crate::{Timer, TimerSpan};

/// This is meant to be used via the `#[timed]` macro, never directly called.
///
/// Starts the stopwatch of a timed method. Methods rewritten by the macro keep their original
/// signature, so there is no error channel to report a stopwatch that is already running
/// (e.g. due to recursion). That is a programming error, so we panic.
#[inline]
#[track_caller]
pub fn enter(timer: &Timer, method_name: &'static str) -> TimerSpan {
    timer
        .measure(method_name)
        .unwrap_or_else(|error| panic!("cannot time call to method `{method_name}`: {error}"))
}
