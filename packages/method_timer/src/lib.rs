#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Named stopwatch registries with automatic timing of public methods.
//!
//! The core functionality includes:
//! - [`Timer`] - A registry of named stopwatches, created lazily on first use
//! - [`TimerSpan`] - Keeps one stopwatch running from creation until it is dropped
//! - [`Timed`] - Gives timing machinery access to the [`Timer`] owned by an object
//! - [`timed`] - Attribute that wraps every public method of an `impl` block in a span
//! - [`Report`] - A snapshot of the time accumulated by each stopwatch of a registry
//!
//! # Timing a block of code
//!
//! ```
//! use method_timer::Timer;
//!
//! # fn main() -> Result<(), method_timer::Error> {
//! let timer = Timer::new();
//!
//! {
//!     let _scope = timer.scope()?;
//!     // Work measured by the "main" stopwatch.
//!     std::hint::black_box(42 * 2);
//! }
//!
//! println!("took {:?}", timer.elapsed());
//! # Ok(())
//! # }
//! ```
//!
//! # Timing every public method of a type
//!
//! ```
//! use method_timer::{Timed, Timer, timed};
//!
//! #[derive(Debug, Default, Timed)]
//! pub struct Model {
//!     timer: Timer,
//!     weights: Vec<f64>,
//! }
//!
//! #[timed]
//! impl Model {
//!     pub fn fit(&mut self, samples: &[f64]) {
//!         self.weights = samples.to_vec();
//!     }
//!
//!     pub fn predict(&self) -> f64 {
//!         self.weights.iter().sum()
//!     }
//!
//!     // Private methods are not timed.
//!     fn reset(&mut self) {
//!         self.weights.clear();
//!     }
//! }
//!
//! let mut model = Model::default();
//! model.fit(&[1.0, 2.0]);
//! assert_eq!(model.predict(), 3.0);
//!
//! let report = model.timer().to_report();
//! assert_eq!(report.get("fit").map(|entry| entry.laps()), Some(1));
//! assert_eq!(report.get("predict").map(|entry| entry.laps()), Some(1));
//! ```
//!
//! # Threading
//!
//! A [`Timer`] belongs to exactly one object and is used from one thread. The types in this
//! package are neither `Send` nor `Sync`. Use one registry per thread and merge the
//! [`Report`]s if you need a combined view.

pub mod __private;

mod error;
mod instrument;
mod pal;
mod report;
mod span;
mod stopwatch;
mod timer;

pub use error::*;
pub use instrument::Timed;
pub use report::*;
pub use span::*;
pub use timer::*;

/// Wraps methods so that each call is measured by a stopwatch named after the method.
///
/// # Usage
///
/// Apply the attribute to an inherent or trait `impl` block of a type that implements
/// [`Timed`]. Every method in the block that
///
/// 1. is visible outside the type (`pub`, `pub(crate)`, `pub(in ...)`),
/// 2. takes a `self` receiver,
/// 3. and whose name does not start with an underscore
///
/// runs its body inside a [`TimerSpan`] named after the method. In a trait `impl` block every
/// method counts as visible. Associated functions without a receiver, private methods,
/// underscore-prefixed methods and `const` or `async` methods are left as they are.
///
/// A stopwatch is named after the method without any `r#` prefix, so `r#type` records into
/// `"type"`.
///
/// To time only specific methods, list them explicitly. Listed methods are timed regardless
/// of visibility, but they must take a `self` receiver:
///
/// ```
/// use method_timer::{Timed, Timer, timed};
///
/// #[derive(Debug, Default, Timed)]
/// struct Loader {
///     timer: Timer,
/// }
///
/// #[timed(methods(load))]
/// impl Loader {
///     pub fn load(&self) -> usize {
///         42
///     }
///
///     pub fn describe(&self) -> &'static str {
///         "not timed"
///     }
/// }
///
/// let loader = Loader::default();
/// loader.load();
/// loader.describe();
/// assert_eq!(loader.timer().names(), vec!["load".to_string()]);
/// ```
///
/// The attribute can also be applied to a single method inside an `impl` block.
///
/// Listing a `const` or `async` method, or applying the attribute to one directly, is a compile
/// error: a timer cannot be used during constant evaluation, and a span held across `.await`
/// points would count suspended time and make the future `!Send`.
///
/// # Panics
///
/// A wrapped method panics if its stopwatch is already running when it is called, which
/// happens when the method recurses into itself. Errors and panics raised by the method body
/// are propagated unchanged after the stopwatch has been stopped.
pub use method_timer_macros::__macro_timed as timed;

/// Implements [`Timed`] for a struct that owns a [`Timer`].
///
/// The field marked with `#[timer]` is used. Without a marker, the field named `timer` is used.
///
/// ```
/// use method_timer::{Timed, Timer};
///
/// #[derive(Debug, Timed)]
/// struct Pipeline {
///     #[timer]
///     stopwatches: Timer,
/// }
///
/// let pipeline = Pipeline {
///     stopwatches: Timer::new(),
/// };
/// assert!(pipeline.timer().is_empty());
/// ```
pub use method_timer_macros::Timed;

// This is so procedural macros can produce code which refers to
// ::method_timer::* which will work also in the current crate.
#[doc(hidden)]
extern crate self as method_timer;
