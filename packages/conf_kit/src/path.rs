//! Home directory expansion and path absolutization.

use std::borrow::Cow;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::Error;

/// Replaces a leading `~` with the home directory of the current user.
///
/// Paths that do not start with `~` (or are not valid UTF-8) are returned unchanged.
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// let expanded = conf_kit::expand_home("~/datasets");
/// assert!(!expanded.starts_with("~"));
///
/// assert_eq!(conf_kit::expand_home("/opt/data"), Path::new("/opt/data"));
/// ```
#[must_use]
pub fn expand_home(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();

    match path.to_str() {
        Some(text) => match shellexpand::tilde(text) {
            Cow::Borrowed(_) => path.to_path_buf(),
            Cow::Owned(expanded) => PathBuf::from(expanded),
        },
        None => path.to_path_buf(),
    }
}

/// Expands a leading `~` and turns the path into an absolute path.
///
/// With `strict == false` the path does not need to exist. It is joined to the current working
/// directory if relative, the longest leading part that exists is resolved by the filesystem
/// (following symbolic links), and the remaining `.` and `..` components are resolved lexically.
/// With `strict == true` the whole path must exist and is fully resolved by the filesystem.
///
/// # Errors
///
/// [`Error::Io`] if the current working directory cannot be determined or, in strict mode,
/// if the path does not exist.
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// # fn main() -> Result<(), conf_kit::Error> {
/// let path = conf_kit::absolute_path("/conf_kit_example/models/../data/./iris.csv", false)?;
/// assert!(path.ends_with("conf_kit_example/data/iris.csv"));
/// # Ok(())
/// # }
/// ```
pub fn absolute_path(path: impl AsRef<Path>, strict: bool) -> crate::Result<PathBuf> {
    let expanded = expand_home(path);

    if strict {
        return fs::canonicalize(&expanded).map_err(|source| Error::io(expanded, source));
    }

    let absolute =
        std::path::absolute(&expanded).map_err(|source| Error::io(&expanded, source))?;

    Ok(resolve_existing_prefix(&absolute))
}

/// Canonicalizes the longest existing ancestor of an absolute path and appends the rest of the
/// path to it lexically.
fn resolve_existing_prefix(path: &Path) -> PathBuf {
    for ancestor in path.ancestors() {
        let Ok(resolved) = fs::canonicalize(ancestor) else {
            continue;
        };

        let remainder = path
            .strip_prefix(ancestor)
            .expect("every ancestor of a path is a prefix of it");

        return push_lexically(resolved, remainder);
    }

    push_lexically(PathBuf::new(), path)
}

/// Appends `path` to `base`, resolving `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root.
fn push_lexically(mut base: PathBuf, path: &Path) -> PathBuf {
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Popping a root or prefix is a no-op, which is what we want.
                base.pop();
            }
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                base.push(component);
            }
        }
    }

    base
}
