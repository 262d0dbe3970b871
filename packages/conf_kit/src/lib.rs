#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Small utilities shared by data processing tools:
//!
//! - [`ConfigStore`] - YAML configuration in the user's home directory, lazily populated from
//!   defaults shipped with the package
//! - [`dataset_url()`] and [`data_location()`] - where datasets are downloaded from and where
//!   user files are kept
//! - [`absolute_path()`] and [`expand_home()`] - path normalization
//! - [`sha256_file()`] - file checksums for verifying downloads
//! - [`set_env()`] - temporary environment variable overrides
//!
//! # Example
//!
//! ```
//! use conf_kit::{ConfigStore, DataKind};
//!
//! # fn main() -> Result<(), conf_kit::Error> {
//! let directory = tempfile::tempdir().expect("temporary directory can be created");
//! let store = ConfigStore::with_user_file(directory.path().join("conf.yml"))?;
//!
//! store.set("usermodel", directory.path().join("models").display().to_string())?;
//! let models = conf_kit::data_location(&store, DataKind::UserModel)?;
//!
//! assert_eq!(models, directory.path().join("models"));
//! # Ok(())
//! # }
//! ```

mod config;
mod data;
mod env;
mod error;
mod hash;
mod path;

pub use config::*;
pub use data::*;
pub use env::*;
pub use error::*;
pub use hash::*;
pub use path::*;
