//! Where datasets come from and where user data lives.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::debug;

use crate::{ConfigStore, Error, expand_home};

/// Release of the dataset repository that published datasets are downloaded from.
const DATASET_RELEASE: &str = "v0.1.1";

/// A directory that holds user files.
///
/// The string form of each kind is both the configuration key and the name of the environment
/// variable that overrides it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum DataKind {
    /// Datasets created or downloaded by the user.
    UserData,

    /// Models trained by the user.
    UserModel,
}

impl DataKind {
    /// Configuration key and environment variable name of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UserData => "userdata",
            Self::UserModel => "usermodel",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataKind {
    type Err = Error;

    fn from_str(value: &str) -> crate::Result<Self> {
        match value {
            "userdata" => Ok(Self::UserData),
            "usermodel" => Ok(Self::UserModel),
            _ => Err(Error::UnknownDataKind {
                value: value.to_string(),
            }),
        }
    }
}

/// Download URL of a published dataset.
///
/// # Errors
///
/// [`Error::MissingKey`] or [`Error::InvalidValue`] if the packaged defaults do not name the
/// GitHub account that publishes the datasets.
///
/// # Examples
///
/// ```
/// # fn main() -> Result<(), conf_kit::Error> {
/// let directory = tempfile::tempdir().expect("temporary directory can be created");
/// let store = conf_kit::ConfigStore::with_user_file(directory.path().join("conf.yml"))?;
///
/// let url = conf_kit::dataset_url(&store, "elements")?;
/// assert!(url.starts_with("https://github.com/"));
/// assert!(url.ends_with("/dataset/releases/download/v0.1.1/elements.pkl.pd_"));
/// # Ok(())
/// # }
/// ```
pub fn dataset_url(config: &ConfigStore, name: &str) -> crate::Result<String> {
    const KEY: &str = "github_username";

    let username: String = serde_yaml::from_value(config.package_info(KEY)?.clone()).map_err(
        |source| Error::InvalidValue {
            key: KEY.to_string(),
            source,
        },
    )?;

    Ok(format!(
        "https://github.com/{username}/dataset/releases/download/{DATASET_RELEASE}/{name}.pkl.pd_"
    ))
}

/// Directory that holds files of the given kind, with `~` expanded.
///
/// A non-empty environment variable named after the kind (`userdata`, `usermodel`) takes
/// precedence over the configuration.
///
/// # Errors
///
/// Any error of [`ConfigStore::get_as()`] if the location comes from the configuration.
pub fn data_location(config: &ConfigStore, kind: DataKind) -> crate::Result<PathBuf> {
    if let Some(overridden) = env::var_os(kind.as_str()).filter(|value| !value.is_empty()) {
        debug!(%kind, "data location overridden by environment variable");
        return Ok(expand_home(PathBuf::from(overridden)));
    }

    let configured: String = config.get_as(kind.as_str())?;
    Ok(expand_home(configured))
}
