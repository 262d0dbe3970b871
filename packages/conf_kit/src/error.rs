use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading configuration or touching the filesystem.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A file or directory could not be read, written or resolved.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        /// The path that was being accessed.
        path: PathBuf,

        /// The underlying operating system error.
        source: std::io::Error,
    },

    /// A configuration file is not valid YAML.
    #[error("invalid YAML in '{}': {source}", path.display())]
    Yaml {
        /// The configuration file that failed to parse or serialize.
        path: PathBuf,

        /// The underlying parser error.
        source: serde_yaml::Error,
    },

    /// A configuration file is valid YAML but its top level is not a mapping.
    #[error("configuration file '{}' does not contain a mapping", path.display())]
    NotAMapping {
        /// The offending configuration file.
        path: PathBuf,
    },

    /// The key exists neither in the user configuration nor in the packaged defaults.
    #[error("configuration key '{key}' is not defined")]
    MissingKey {
        /// The key that was looked up.
        key: String,
    },

    /// The configuration value exists but does not have the requested type.
    #[error("configuration key '{key}' has an unexpected value: {source}")]
    InvalidValue {
        /// The key that was looked up.
        key: String,

        /// The underlying deserialization error.
        source: serde_yaml::Error,
    },

    /// The caller asked for a data location that does not exist.
    #[error("unknown data kind '{value}', expected 'userdata' or 'usermodel'")]
    UnknownDataKind {
        /// The value that was provided.
        value: String,
    },

    /// The home directory of the current user could not be determined.
    #[error("cannot determine the home directory of the current user")]
    NoHomeDirectory,
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A specialized `Result` type for configuration operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
