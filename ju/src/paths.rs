//! Parent directory lookup
//!
//! Finds every copy of a file name between the current directory and the
//! filesystem root. The home directory is always consulted, even when the
//! current directory lives outside of it.

use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::error::{Result, UtilError};

/// Matches found for one lookup, split by where they came from
#[derive(Debug, Default)]
struct ParentMatches {
    /// Hit in the home directory when home is not an ancestor of cwd
    home: Option<PathBuf>,
    /// Hits from cwd outward to the root, nearest first
    walk: Vec<PathBuf>,
}

impl ParentMatches {
    fn collect(cwd: &Path, home: Option<&Path>, file_name: &str) -> Self {
        debug!(?cwd, ?home, %file_name, "ParentMatches::collect: called");
        let mut matches = Self::default();

        if let Some(home) = home
            && !cwd.starts_with(home)
        {
            let path = home.join(file_name);
            if path.exists() {
                debug!(?path, "ParentMatches::collect: found in home directory");
                matches.home = Some(path);
            }
        }

        // ancestors() yields cwd itself first and stops after the root
        for dir in cwd.ancestors() {
            let path = dir.join(file_name);
            if path.exists() {
                debug!(?path, "ParentMatches::collect: found in ancestor");
                matches.walk.push(path);
            }
        }

        matches
    }

    fn into_paths(self) -> Vec<PathBuf> {
        self.home.into_iter().chain(self.walk).collect()
    }

    fn lowest_precedence_first(self) -> Vec<PathBuf> {
        self.home.into_iter().chain(self.walk.into_iter().rev()).collect()
    }

    fn closest(self) -> Option<PathBuf> {
        self.walk.into_iter().next().or(self.home)
    }
}

/// Find every `file_name` from the current directory up to the root
///
/// Order is: home directory (only when cwd is outside home), then cwd, then
/// each ancestor nearest to farthest.
pub fn find_parent_paths(file_name: &str) -> Vec<PathBuf> {
    debug!(%file_name, "find_parent_paths: called");
    let home = dirs::home_dir();
    match std::env::current_dir() {
        Ok(cwd) => find_parent_paths_from(&cwd, home.as_deref(), file_name),
        Err(e) => {
            warn!("Failed to resolve current directory: {}", e);
            home.map(|h| h.join(file_name)).filter(|p| p.exists()).into_iter().collect()
        }
    }
}

/// Same as [`find_parent_paths`] with an explicit start and home directory
pub fn find_parent_paths_from(cwd: &Path, home: Option<&Path>, file_name: &str) -> Vec<PathBuf> {
    ParentMatches::collect(cwd, home, file_name).into_paths()
}

/// Every `file_name` ordered for layering, lowest precedence first
///
/// The home directory special case comes first, then the walk from the
/// farthest ancestor down to cwd, so later entries override earlier ones.
pub fn layered_parent_paths_from(cwd: &Path, home: Option<&Path>, file_name: &str) -> Vec<PathBuf> {
    ParentMatches::collect(cwd, home, file_name).lowest_precedence_first()
}

/// Find the `file_name` nearest to the current directory
///
/// A match in the home directory is only returned when nothing was found
/// walking up from cwd.
pub fn find_closest_parent_path(file_name: &str) -> Result<PathBuf> {
    debug!(%file_name, "find_closest_parent_path: called");
    let cwd = std::env::current_dir().map_err(|e| UtilError::fs(".", e))?;
    let home = dirs::home_dir();
    find_closest_parent_path_from(&cwd, home.as_deref(), file_name)
}

/// Same as [`find_closest_parent_path`] with an explicit start and home directory
pub fn find_closest_parent_path_from(cwd: &Path, home: Option<&Path>, file_name: &str) -> Result<PathBuf> {
    match ParentMatches::collect(cwd, home, file_name).closest() {
        Some(path) => Ok(path),
        None => {
            let err = UtilError::NotFound {
                file_name: file_name.to_string(),
            };
            error!("{}", err);
            Err(err)
        }
    }
}
