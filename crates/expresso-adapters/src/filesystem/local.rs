//! Local filesystem adapter using std::fs.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs4::fs_std::FileExt;
use tracing::debug;

use expresso_core::{
    application::ports::{Filesystem, LockHandle},
    error::ExpressoResult,
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> ExpressoResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn create_new_file(&self, path: &Path, content: &str) -> ExpressoResult<bool> {
        // create_new is atomic: an existing file is neither opened nor truncated.
        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(map_io_error(path, e, "create file")),
        };

        file.write_all(content.as_bytes())
            .map_err(|e| map_io_error(path, e, "write file"))?;
        Ok(true)
    }

    fn write_file(&self, path: &Path, content: &str) -> ExpressoResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn read_to_string(&self, path: &Path) -> ExpressoResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn try_lock(&self, path: &Path) -> ExpressoResult<Option<LockHandle>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| map_io_error(parent, e, "create lock directory"))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(|e| map_io_error(path, e, "open lock file"))?;

        // Released by the OS when `file` is closed or the process dies.
        let acquired = match file.try_lock_exclusive() {
            Ok(acquired) => acquired,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => false,
            Err(e) => return Err(map_io_error(path, e, "lock file")),
        };

        debug!(lock = %path.display(), acquired, "Lock attempt");
        Ok(acquired.then(|| Box::new(file) as LockHandle))
    }

    fn canonicalize(&self, path: &Path) -> ExpressoResult<PathBuf> {
        std::fs::canonicalize(path).map_err(|e| map_io_error(path, e, "resolve path"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> expresso_core::error::ExpressoError {
    use expresso_core::application::ApplicationError;

    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
