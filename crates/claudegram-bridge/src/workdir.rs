//! Working directory shared by every session.
//!
//! One process-wide directory: the assistant runs in it and `/getfile`
//! resolves relative paths against it. `/cd` changes it for all users.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use claudegram_core::utils::expand_home;
use tracing::info;

use crate::error::DirectoryNotFound;

/// Mutable confinement root, safe to share across tasks.
#[derive(Debug)]
pub struct WorkingDirectory {
    current: RwLock<PathBuf>,
}

impl WorkingDirectory {
    /// Start in `initial`. The caller validates it at startup.
    pub fn new(initial: impl Into<PathBuf>) -> Self {
        Self {
            current: RwLock::new(initial.into()),
        }
    }

    /// The current directory.
    pub fn current(&self) -> PathBuf {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Switch to `requested` if it names an existing directory.
    ///
    /// Relative paths and `~` are resolved first. On failure the current
    /// directory is left untouched.
    pub fn change(&self, requested: &str) -> Result<PathBuf, DirectoryNotFound> {
        let candidate = self.resolve(&expand_home(requested));
        if !candidate.is_dir() {
            return Err(DirectoryNotFound {
                requested: requested.to_string(),
            });
        }

        let new_dir = candidate.canonicalize().unwrap_or(candidate);
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = new_dir.clone();

        info!(dir = %new_dir.display(), "working directory changed");
        Ok(new_dir)
    }

    /// Absolute paths pass through; relative ones are joined onto `current()`.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.current().join(path)
        }
    }
}
