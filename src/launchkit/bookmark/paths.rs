//! # Store Locations
//!
//! A store file can live in two places:
//!
//! - the **user copy** at `<user-data-dir>/<app>/<file>`, which the launcher
//!   reads and rewrites, and
//! - a **system default** at `<system-data-dir>/<app>/<file>`, shipped by the
//!   distribution or an administrator and never written.
//!
//! Resolution runs on every read and every write, so an administrator
//! flipping the policy flag or a user deleting their copy takes effect on the
//! next reload.
//!
//! ```text
//! policy allows user edits?
//!   yes: user copy exists or we are writing  → user copy   (User)
//!   first system copy found                  → that copy   (Default / DefaultOnly)
//!   writing anyway                           → user copy   (User)
//!   otherwise                                → nothing
//! ```

use crate::error::{LaunchError, Result};
use directories::{BaseDirs, UserDirs};
use serde::Serialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "launchkit";
pub const HOME_ENV: &str = "LAUNCHKIT_HOME";
const DEFAULT_SYSTEM_DIRS: &str = "/usr/local/share:/usr/share";

/// Where a store's contents currently come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreLocation {
    /// Policy forbids user edits; the system copy is all there is.
    DefaultOnly,
    /// User edits allowed, but no user copy exists yet.
    Default,
    /// Reading and writing the user copy.
    User,
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StoreLocation::DefaultOnly => "default (locked)",
            StoreLocation::Default => "default",
            StoreLocation::User => "user",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub path: PathBuf,
    pub location: StoreLocation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub app_dir: String,
    pub user_data_dir: PathBuf,
    pub system_data_dirs: Vec<PathBuf>,
    /// Where blank-document sentinels are materialized.
    pub documents_dir: PathBuf,
}

impl StorePaths {
    pub fn new(user_data_dir: impl Into<PathBuf>, system_data_dirs: Vec<PathBuf>) -> Self {
        let user_data_dir = user_data_dir.into();
        Self {
            app_dir: APP_DIR.to_string(),
            documents_dir: user_data_dir.join("Documents"),
            user_data_dir,
            system_data_dirs,
        }
    }

    pub fn with_documents_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.documents_dir = dir.into();
        self
    }

    /// Platform locations, overridable with `LAUNCHKIT_HOME` and
    /// `XDG_DATA_DIRS`.
    pub fn from_env() -> Result<Self> {
        let system_data_dirs = system_dirs_from(env::var("XDG_DATA_DIRS").ok().as_deref());

        if let Some(home) = env::var_os(HOME_ENV) {
            let home = PathBuf::from(home);
            return Ok(Self::new(home.join("data"), system_data_dirs)
                .with_documents_dir(home.join("Documents")));
        }

        let base = BaseDirs::new()
            .ok_or_else(|| LaunchError::Api("Could not determine home directory".into()))?;
        let documents_dir = UserDirs::new()
            .and_then(|u| u.document_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| base.home_dir().join("Documents"));

        Ok(Self::new(base.data_dir(), system_data_dirs).with_documents_dir(documents_dir))
    }

    pub fn user_path(&self, file_name: &str) -> PathBuf {
        self.user_data_dir.join(&self.app_dir).join(file_name)
    }

    pub fn system_path(&self, file_name: &str) -> Option<PathBuf> {
        self.system_data_dirs
            .iter()
            .map(|dir| dir.join(&self.app_dir).join(file_name))
            .find(|candidate| candidate.is_file())
    }

    /// Pick the file to read (or, with `for_write`, to write).
    ///
    /// `Ok(None)` means there is nothing to read. Parent directories of a
    /// write target are created.
    pub fn resolve(
        &self,
        file_name: &str,
        user_modifiable: bool,
        for_write: bool,
    ) -> Result<Option<Resolution>> {
        let user = self.user_path(file_name);

        if user_modifiable && (user.exists() || for_write) {
            if for_write {
                ensure_parent(&user)?;
            }
            return Ok(Some(Resolution {
                path: user,
                location: StoreLocation::User,
            }));
        }

        if let Some(path) = self.system_path(file_name) {
            let location = if user_modifiable {
                StoreLocation::Default
            } else {
                StoreLocation::DefaultOnly
            };
            return Ok(Some(Resolution { path, location }));
        }

        if for_write {
            ensure_parent(&user)?;
            return Ok(Some(Resolution {
                path: user,
                location: StoreLocation::User,
            }));
        }

        Ok(None)
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(LaunchError::Io)?;
        }
    }
    Ok(())
}

fn system_dirs_from(var: Option<&str>) -> Vec<PathBuf> {
    let raw = match var {
        Some(v) if !v.trim().is_empty() => v,
        _ => DEFAULT_SYSTEM_DIRS,
    };
    raw.split(':')
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FILE: &str = "applications.json";

    fn layout() -> (TempDir, StorePaths) {
        let root = TempDir::new().unwrap();
        let paths = StorePaths::new(
            root.path().join("user"),
            vec![root.path().join("sys1"), root.path().join("sys2")],
        );
        (root, paths)
    }

    fn put(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "{}").unwrap();
    }

    #[test]
    fn nothing_to_read() {
        let (_root, paths) = layout();
        assert_eq!(paths.resolve(FILE, true, false).unwrap(), None);
        assert_eq!(paths.resolve(FILE, false, false).unwrap(), None);
    }

    #[test]
    fn user_copy_wins_when_modifiable() {
        let (_root, paths) = layout();
        put(&paths.user_path(FILE));
        put(&paths.system_data_dirs[0].join(APP_DIR).join(FILE));

        let res = paths.resolve(FILE, true, false).unwrap().unwrap();
        assert_eq!(res.location, StoreLocation::User);
        assert_eq!(res.path, paths.user_path(FILE));
    }

    #[test]
    fn first_system_copy_when_no_user_copy() {
        let (_root, paths) = layout();
        let second = paths.system_data_dirs[1].join(APP_DIR).join(FILE);
        put(&second);

        let res = paths.resolve(FILE, true, false).unwrap().unwrap();
        assert_eq!(res.location, StoreLocation::Default);
        assert_eq!(res.path, second);

        let first = paths.system_data_dirs[0].join(APP_DIR).join(FILE);
        put(&first);
        let res = paths.resolve(FILE, true, false).unwrap().unwrap();
        assert_eq!(res.path, first);
    }

    #[test]
    fn locked_policy_ignores_user_copy() {
        let (_root, paths) = layout();
        put(&paths.user_path(FILE));
        let sys = paths.system_data_dirs[0].join(APP_DIR).join(FILE);
        put(&sys);

        let res = paths.resolve(FILE, false, false).unwrap().unwrap();
        assert_eq!(res.location, StoreLocation::DefaultOnly);
        assert_eq!(res.path, sys);
    }

    #[test]
    fn write_creates_user_parent() {
        let (_root, paths) = layout();
        let res = paths.resolve(FILE, true, true).unwrap().unwrap();
        assert_eq!(res.location, StoreLocation::User);
        assert!(res.path.parent().unwrap().is_dir());
        assert!(!res.path.exists());
    }

    #[test]
    fn locked_write_falls_back_to_user_candidate() {
        let (_root, paths) = layout();
        let res = paths.resolve(FILE, false, true).unwrap().unwrap();
        assert_eq!(res.path, paths.user_path(FILE));
    }

    #[test]
    fn system_dirs_default_and_split() {
        assert_eq!(
            system_dirs_from(None),
            vec![PathBuf::from("/usr/local/share"), PathBuf::from("/usr/share")]
        );
        assert_eq!(
            system_dirs_from(Some("/opt/a::/opt/b")),
            vec![PathBuf::from("/opt/a"), PathBuf::from("/opt/b")]
        );
    }
}
