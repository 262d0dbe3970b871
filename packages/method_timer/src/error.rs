use thiserror::Error;

/// Errors raised when a stopwatch is used in a way that violates its start/stop discipline.
///
/// All of these indicate a programming error in the caller. They are never retried.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// `start` was called on a stopwatch that is already measuring.
    #[error("stopwatch '{name}' is already started")]
    AlreadyStarted {
        /// Name of the stopwatch in its registry.
        name: String,
    },

    /// `stop` was called on a stopwatch that is not measuring.
    #[error("stopwatch '{name}' is not started")]
    NotStarted {
        /// Name of the stopwatch in its registry.
        name: String,
    },
}

/// A specialized `Result` type for timing operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn messages_name_the_stopwatch() {
        let started = Error::AlreadyStarted {
            name: "fit".to_string(),
        };
        let not_started = Error::NotStarted {
            name: "predict".to_string(),
        };

        assert_eq!(started.to_string(), "stopwatch 'fit' is already started");
        assert_eq!(not_started.to_string(), "stopwatch 'predict' is not started");
    }
}
