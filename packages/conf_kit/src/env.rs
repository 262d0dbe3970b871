//! Temporary overrides of process environment variables.

use std::env;
use std::ffi::{OsStr, OsString};

use tracing::debug;

/// Sets environment variables until the returned guard is dropped.
///
/// Dropping the [`EnvGuard`] restores the value each variable had before this call, or removes
/// the variable if it was not set. Overriding the same variable more than once in a single call
/// still restores the value from before the call.
///
/// # Safety
///
/// Modifying the process environment is only sound if no other thread reads or writes the
/// environment until the guard is dropped. See [`std::env::set_var`].
///
/// # Examples
///
/// ```
/// use std::env;
///
/// // SAFETY: The doctest is single-threaded.
/// let guard = unsafe { conf_kit::set_env([("CONF_KIT_DOCTEST_MODE", "fast")]) };
/// assert_eq!(env::var("CONF_KIT_DOCTEST_MODE").as_deref(), Ok("fast"));
///
/// drop(guard);
/// assert!(env::var("CONF_KIT_DOCTEST_MODE").is_err());
/// ```
#[must_use = "the previous values are restored as soon as the guard is dropped"]
pub unsafe fn set_env<I, K, V>(vars: I) -> EnvGuard
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<OsString>,
    V: AsRef<OsStr>,
{
    let mut previous = Vec::new();

    for (key, value) in vars {
        let key = key.into();
        let old_value = env::var_os(&key);

        debug!(key = ?key, value = ?value.as_ref(), "overriding environment variable");

        // SAFETY: Forwarding the caller's guarantee that nothing else touches the environment.
        unsafe {
            env::set_var(&key, value);
        }

        previous.push((key, old_value));
    }

    EnvGuard { previous }
}

/// Restores overridden environment variables when dropped.
///
/// Returned by [`set_env()`].
#[derive(Debug)]
pub struct EnvGuard {
    previous: Vec<(OsString, Option<OsString>)>,
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // Reverse order, so the oldest value of a variable that was overridden twice wins.
        for (key, old_value) in self.previous.drain(..).rev() {
            match old_value {
                // SAFETY: The creator of the guard promised exclusive access to the
                // environment for the lifetime of the guard.
                Some(value) => unsafe {
                    env::set_var(&key, value);
                },
                // SAFETY: As above.
                None => unsafe {
                    env::remove_var(&key);
                },
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use serial_test::serial;

    use super::*;

    static_assertions::assert_not_impl_any!(EnvGuard: Clone);

    #[test]
    #[serial]
    fn unset_variable_is_removed_again() {
        // SAFETY: Environment tests are serialized.
        let guard = unsafe { set_env([("CONF_KIT_TEST_UNSET", "1")]) };
        assert_eq!(env::var("CONF_KIT_TEST_UNSET").as_deref(), Ok("1"));

        drop(guard);
        assert!(env::var_os("CONF_KIT_TEST_UNSET").is_none());
    }

    #[test]
    #[serial]
    fn previous_value_is_restored() {
        // SAFETY: Environment tests are serialized.
        let outer = unsafe { set_env([("CONF_KIT_TEST_SET", "before")]) };

        {
            // SAFETY: Environment tests are serialized.
            let _inner = unsafe { set_env([("CONF_KIT_TEST_SET", "during")]) };
            assert_eq!(env::var("CONF_KIT_TEST_SET").as_deref(), Ok("during"));
        }

        assert_eq!(env::var("CONF_KIT_TEST_SET").as_deref(), Ok("before"));

        drop(outer);
        assert!(env::var_os("CONF_KIT_TEST_SET").is_none());
    }

    #[test]
    #[serial]
    fn empty_value_is_restored_as_empty() {
        // SAFETY: Environment tests are serialized.
        let outer = unsafe { set_env([("CONF_KIT_TEST_EMPTY", "")]) };

        {
            // SAFETY: Environment tests are serialized.
            let _inner = unsafe { set_env([("CONF_KIT_TEST_EMPTY", "value")]) };
        }

        assert_eq!(env::var("CONF_KIT_TEST_EMPTY").as_deref(), Ok(""));
        drop(outer);
    }

    #[test]
    #[serial]
    fn repeated_key_restores_original() {
        // SAFETY: Environment tests are serialized.
        let guard = unsafe {
            set_env([
                ("CONF_KIT_TEST_REPEATED", "first"),
                ("CONF_KIT_TEST_REPEATED", "second"),
            ])
        };
        assert_eq!(env::var("CONF_KIT_TEST_REPEATED").as_deref(), Ok("second"));

        drop(guard);
        assert!(env::var_os("CONF_KIT_TEST_REPEATED").is_none());
    }

    #[test]
    #[serial]
    fn several_variables_at_once() {
        // SAFETY: Environment tests are serialized.
        let guard = unsafe {
            set_env(vec![
                ("CONF_KIT_TEST_A".to_string(), "a".to_string()),
                ("CONF_KIT_TEST_B".to_string(), "b".to_string()),
            ])
        };

        assert_eq!(env::var("CONF_KIT_TEST_A").as_deref(), Ok("a"));
        assert_eq!(env::var("CONF_KIT_TEST_B").as_deref(), Ok("b"));

        drop(guard);
        assert!(env::var_os("CONF_KIT_TEST_A").is_none());
        assert!(env::var_os("CONF_KIT_TEST_B").is_none());
    }
}
