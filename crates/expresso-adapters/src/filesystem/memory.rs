//! In-memory filesystem adapter for testing.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use expresso_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, LockHandle},
    },
    error::ExpressoResult,
};

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can keep a handle while the service owns
/// another. Every successful mutation bumps [`MemoryFilesystem::write_count`].
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
    locks: HashSet<PathBuf>,
    writes: usize,
}

/// Lock handed out by [`MemoryFilesystem::try_lock`].
struct MemoryLock {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
    path: PathBuf,
}

impl Drop for MemoryLock {
    fn drop(&mut self) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.locks.remove(&self.path);
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filesystem with `root` (and its ancestors) already present.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let fs = Self::new();
        if let Ok(mut inner) = fs.inner.write() {
            insert_ancestors(&mut inner.directories, root.as_ref());
        }
        fs
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// Number of successful mutating calls so far.
    pub fn write_count(&self) -> usize {
        self.read().writes
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryFilesystemInner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> ExpressoResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> ExpressoResult<()> {
        let mut inner = self.write()?;
        if inner.files.contains_key(path) {
            return Err(not_a_directory(path));
        }
        insert_ancestors(&mut inner.directories, path);
        inner.writes += 1;
        Ok(())
    }

    fn create_new_file(&self, path: &Path, content: &str) -> ExpressoResult<bool> {
        let mut inner = self.write()?;
        if inner.files.contains_key(path) || inner.directories.contains(path) {
            return Ok(false);
        }
        ensure_parent(&inner, path)?;

        inner.files.insert(path.to_path_buf(), content.to_string());
        inner.writes += 1;
        Ok(true)
    }

    fn write_file(&self, path: &Path, content: &str) -> ExpressoResult<()> {
        let mut inner = self.write()?;
        ensure_parent(&inner, path)?;

        inner.files.insert(path.to_path_buf(), content.to_string());
        inner.writes += 1;
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> ExpressoResult<String> {
        self.read_file(path).ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "No such file".into(),
            }
            .into()
        })
    }

    /// Locks live beside the tree, so taking one is not a write.
    fn try_lock(&self, path: &Path) -> ExpressoResult<Option<LockHandle>> {
        let mut inner = self.write()?;
        if !inner.locks.insert(path.to_path_buf()) {
            return Ok(None);
        }
        Ok(Some(Box::new(MemoryLock {
            inner: Arc::clone(&self.inner),
            path: path.to_path_buf(),
        })))
    }

    fn canonicalize(&self, path: &Path) -> ExpressoResult<PathBuf> {
        if !self.exists(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "No such file or directory".into(),
            }
            .into());
        }
        Ok(path.to_path_buf())
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.read();
        inner.files.contains_key(path) || inner.directories.contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.read().directories.contains(path)
    }
}

fn insert_ancestors(directories: &mut HashSet<PathBuf>, path: &Path) {
    let mut current = PathBuf::new();
    for component in path.components() {
        current.push(component);
        directories.insert(current.clone());
    }
}

fn ensure_parent(inner: &MemoryFilesystemInner, path: &Path) -> ExpressoResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Parent directory does not exist".into(),
            }
            .into());
        }
    }
    Ok(())
}

fn not_a_directory(path: &Path) -> expresso_core::error::ExpressoError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: "A file exists at this path".into(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_root_registers_ancestors() {
        let fs = MemoryFilesystem::with_root("/home/me/api");
        assert!(fs.is_dir(Path::new("/home")));
        assert!(fs.is_dir(Path::new("/home/me/api")));
        assert_eq!(fs.write_count(), 0);
    }

    #[test]
    fn create_new_file_keeps_existing_content() {
        let fs = MemoryFilesystem::with_root("/w");
        let path = Path::new("/w/README.md");
        fs.write_file(path, "hello").unwrap();

        assert!(!fs.create_new_file(path, "").unwrap());
        assert_eq!(fs.read_file(path).as_deref(), Some("hello"));
    }

    #[test]
    fn write_requires_parent() {
        let fs = MemoryFilesystem::with_root("/w");
        assert!(fs.write_file(Path::new("/w/src/app.js"), "x").is_err());
    }

    #[test]
    fn directory_over_file_is_rejected() {
        let fs = MemoryFilesystem::with_root("/w");
        fs.write_file(Path::new("/w/src"), "").unwrap();
        assert!(fs.create_dir_all(Path::new("/w/src")).is_err());
    }

    #[test]
    fn counts_only_successful_mutations() {
        let fs = MemoryFilesystem::with_root("/w");
        fs.create_dir_all(Path::new("/w/a/b")).unwrap();
        fs.create_new_file(Path::new("/w/a/b/c.js"), "").unwrap();
        fs.create_new_file(Path::new("/w/a/b/c.js"), "").unwrap();
        let _ = fs.write_file(Path::new("/w/missing/d.js"), "");
        let _lock = fs.try_lock(Path::new("/locks/w.lock")).unwrap();

        assert_eq!(fs.write_count(), 2);
    }

    #[test]
    fn lock_is_exclusive_until_dropped() {
        let fs = MemoryFilesystem::new();
        let other = fs.clone();
        let path = Path::new("/locks/w.lock");

        let held = fs.try_lock(path).unwrap();
        assert!(held.is_some());
        assert!(other.try_lock(path).unwrap().is_none());
        assert!(other.try_lock(Path::new("/locks/x.lock")).unwrap().is_some());

        drop(held);
        assert!(other.try_lock(path).unwrap().is_some());
    }
}
