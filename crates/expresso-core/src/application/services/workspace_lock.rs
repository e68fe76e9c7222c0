//! Per-workspace mutual exclusion.
//!
//! The lock is an OS-level exclusive lock on a file outside the project,
//! one file per workspace root. The OS drops it when the holding process
//! exits, so an interrupted run never leaves a stale lock behind.

use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, LockHandle},
    },
    error::ExpressoResult,
};

/// Lock file used for `root` inside `lock_dir`.
///
/// The name is a v5 UUID of the root path, so the same root always maps to
/// the same file and nothing is written into the project itself.
pub fn lock_path(lock_dir: &Path, root: &Path) -> PathBuf {
    let key = Uuid::new_v5(&Uuid::NAMESPACE_URL, root.as_os_str().as_encoded_bytes());
    lock_dir.join(format!("{key}.lock"))
}

/// Held for the lifetime of a scaffold run.
pub(crate) struct WorkspaceLock {
    _handle: LockHandle,
    path: PathBuf,
}

impl WorkspaceLock {
    pub(crate) fn acquire(
        filesystem: &dyn Filesystem,
        lock_dir: &Path,
        root: &Path,
    ) -> ExpressoResult<Self> {
        let path = lock_path(lock_dir, root);

        let Some(handle) = filesystem.try_lock(&path)? else {
            return Err(ApplicationError::ScaffoldInProgress {
                path: root.to_path_buf(),
                lock: path,
            }
            .into());
        };

        debug!(lock = %path.display(), "Workspace lock acquired");
        Ok(Self {
            _handle: handle,
            path,
        })
    }
}

impl Drop for WorkspaceLock {
    fn drop(&mut self) {
        debug!(lock = %self.path.display(), "Workspace lock released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_root_maps_to_same_lock() {
        let dir = Path::new("/cache/locks");
        assert_eq!(
            lock_path(dir, Path::new("/home/me/api")),
            lock_path(dir, Path::new("/home/me/api"))
        );
    }

    #[test]
    fn different_roots_get_different_locks() {
        let dir = Path::new("/cache/locks");
        let a = lock_path(dir, Path::new("/home/me/api"));
        let b = lock_path(dir, Path::new("/home/me/web"));

        assert_ne!(a, b);
        assert!(a.starts_with(dir));
        assert_eq!(a.extension().and_then(|e| e.to_str()), Some("lock"));
    }
}
