//! Scoped temporary working directories.
//!
//! Build steps that shell out to source-tree tooling sometimes need the
//! process to actually sit in a scratch directory. [`WorkDir`] creates a
//! fresh temporary directory, makes it the current directory, and on drop
//! restores the previous one and removes the scratch tree. Restoration
//! runs on every exit path, including unwinding.
//!
//! The current directory is process-global state: holding two guards at
//! once, or using one while other threads run, is outside the contract.

use std::env;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tempfile::TempDir;

use crate::error::Result;

/// Guard for a temporary working directory scope.
///
/// Created by [`WorkDir::enter`]; while alive, the process's current
/// directory is the temporary directory.
#[derive(Debug)]
pub struct WorkDir {
    original: PathBuf,
    tmp: TempDir,
}

impl WorkDir {
    /// Create a temporary directory and make it the current directory.
    pub fn enter() -> Result<Self> {
        let original = env::current_dir()?;
        let tmp = TempDir::new()?;
        env::set_current_dir(tmp.path())?;
        debug!("entered temporary workdir {}", tmp.path().display());
        Ok(Self { original, tmp })
    }

    /// The temporary directory this scope runs in.
    pub fn path(&self) -> &Path {
        self.tmp.path()
    }

    /// The directory that will be restored when the guard drops.
    pub fn original(&self) -> &Path {
        &self.original
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        // Restore before the TempDir field drops and removes the tree
        // underneath us.
        if let Err(err) = env::set_current_dir(&self.original) {
            warn!(
                "failed to restore working directory to {}: {err}",
                self.original.display()
            );
        }
    }
}

/// Run `body` with a fresh temporary directory as the current directory.
///
/// The closure receives the temporary path. The previous current directory
/// is restored and the temporary tree removed whether `body` succeeds,
/// returns an error, or panics.
pub fn with_temp_workdir<T, F>(body: F) -> Result<T>
where
    F: FnOnce(&Path) -> Result<T>,
{
    let guard = WorkDir::enter()?;
    body(guard.path())
}
