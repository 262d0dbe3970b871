//! YAML-backed configuration with lazy population from packaged defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::Error;

/// Defaults shipped with the package.
const PACKAGED_DEFAULTS: &str = include_str!("../conf.yml");

/// Pseudo-path used in errors about the packaged defaults.
const PACKAGED_DEFAULTS_PATH: &str = "<packaged conf.yml>";

/// Location of the user configuration file, relative to the home directory.
const USER_FILE: &str = ".conf_kit/conf.yml";

/// Configuration values read from a user YAML file, falling back to packaged defaults.
///
/// Every lookup reads the user file again, so edits made by other tools are picked up.
/// When a key is missing from the user file but present in the defaults, the default value is
/// copied into the user file, which lets users discover and edit every setting they have used.
///
/// # Examples
///
/// ```
/// use conf_kit::ConfigStore;
///
/// # fn main() -> Result<(), conf_kit::Error> {
/// let directory = tempfile::tempdir().expect("temporary directory can be created");
/// let store = ConfigStore::with_user_file(directory.path().join("conf.yml"))?;
///
/// // Not in the user file yet, so the packaged default is used and saved.
/// let username: String = store.get_as("github_username")?;
/// assert!(!username.is_empty());
///
/// store.set("github_username", "someone-else")?;
/// assert_eq!(store.get_as::<String>("github_username")?, "someone-else");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigStore {
    user_file: PathBuf,
    defaults: Mapping,
}

impl ConfigStore {
    /// Opens the configuration stored in `~/.conf_kit/conf.yml`.
    ///
    /// The file does not need to exist. It is created on the first write.
    ///
    /// # Errors
    ///
    /// [`Error::NoHomeDirectory`] if the home directory cannot be determined.
    pub fn open() -> crate::Result<Self> {
        let home = dirs::home_dir().ok_or(Error::NoHomeDirectory)?;
        Self::with_user_file(home.join(USER_FILE))
    }

    /// Opens the configuration stored in the given file, with the packaged defaults.
    ///
    /// # Errors
    ///
    /// [`Error::Yaml`] if the packaged defaults cannot be parsed.
    pub fn with_user_file(user_file: impl Into<PathBuf>) -> crate::Result<Self> {
        Self::with_defaults(user_file, PACKAGED_DEFAULTS)
    }

    /// Opens the configuration stored in the given file, with custom defaults given as
    /// YAML text.
    ///
    /// # Errors
    ///
    /// [`Error::Yaml`] or [`Error::NotAMapping`] if the defaults are not a YAML mapping.
    pub fn with_defaults(user_file: impl Into<PathBuf>, defaults: &str) -> crate::Result<Self> {
        let defaults = parse_mapping(defaults, Path::new(PACKAGED_DEFAULTS_PATH))?;

        Ok(Self {
            user_file: user_file.into(),
            defaults,
        })
    }

    /// Path of the user configuration file.
    #[must_use]
    pub fn user_file(&self) -> &Path {
        &self.user_file
    }

    /// Looks up a configuration value.
    ///
    /// Reads the user file first. If the key is not there, the packaged default is copied into
    /// the user file and returned.
    ///
    /// # Errors
    ///
    /// [`Error::MissingKey`] if the key is defined nowhere. [`Error::Io`], [`Error::Yaml`] or
    /// [`Error::NotAMapping`] if the user file cannot be read or written.
    pub fn get(&self, key: &str) -> crate::Result<Value> {
        let mut user = self.read_user()?;

        if let Some(value) = user.get(key) {
            return Ok(value.clone());
        }

        let value = self
            .defaults
            .get(key)
            .cloned()
            .ok_or_else(|| Error::MissingKey {
                key: key.to_string(),
            })?;

        debug!(
            key,
            path = %self.user_file.display(),
            "copying packaged default into user configuration"
        );

        user.insert(Value::from(key), value.clone());
        self.write_user(&user)?;

        Ok(value)
    }

    /// Looks up a configuration value and deserializes it.
    ///
    /// # Errors
    ///
    /// As [`get()`][Self::get], plus [`Error::InvalidValue`] if the value does not
    /// deserialize into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> crate::Result<T> {
        let value = self.get(key)?;

        serde_yaml::from_value(value).map_err(|source| Error::InvalidValue {
            key: key.to_string(),
            source,
        })
    }

    /// Stores a configuration value in the user file.
    ///
    /// # Errors
    ///
    /// [`Error::Io`], [`Error::Yaml`] or [`Error::NotAMapping`] if the user file cannot be read
    /// or written.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> crate::Result<()> {
        let mut user = self.read_user()?;
        user.insert(Value::from(key), value.into());
        self.write_user(&user)
    }

    /// Looks up a value in the packaged defaults only, ignoring the user file.
    ///
    /// # Errors
    ///
    /// [`Error::MissingKey`] if the defaults do not define the key.
    pub fn package_info(&self, key: &str) -> crate::Result<&Value> {
        self.defaults.get(key).ok_or_else(|| Error::MissingKey {
            key: key.to_string(),
        })
    }

    fn read_user(&self) -> crate::Result<Mapping> {
        match fs::read_to_string(&self.user_file) {
            Ok(text) => parse_mapping(&text, &self.user_file),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(Mapping::new()),
            Err(source) => Err(Error::io(&self.user_file, source)),
        }
    }

    fn write_user(&self, user: &Mapping) -> crate::Result<()> {
        if let Some(parent) = self.user_file.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::io(parent, source))?;
        }

        let text = serde_yaml::to_string(user).map_err(|source| Error::Yaml {
            path: self.user_file.clone(),
            source,
        })?;

        fs::write(&self.user_file, text).map_err(|source| Error::io(&self.user_file, source))
    }
}

/// Parses YAML text whose top level must be a mapping. An empty document is an empty mapping.
fn parse_mapping(text: &str, path: &Path) -> crate::Result<Mapping> {
    let value: Value = serde_yaml::from_str(text).map_err(|source| Error::Yaml {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => Err(Error::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}
