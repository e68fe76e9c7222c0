//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `expresso-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::{CommandSpec, Stage};
use crate::error::ExpressoResult;

/// An exclusive lock on a file; dropping it releases the lock.
pub type LockHandle = Box<dyn std::any::Any + Send>;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `expresso_adapters::filesystem::LocalFilesystem` (production)
/// - `expresso_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> ExpressoResult<()>;

    /// Create `path` with `content` only if nothing exists there yet.
    ///
    /// Returns `false` without touching the existing entry otherwise.
    fn create_new_file(&self, path: &Path, content: &str) -> ExpressoResult<bool>;

    /// Write content to a file, replacing any previous content.
    fn write_file(&self, path: &Path, content: &str) -> ExpressoResult<()>;

    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> ExpressoResult<String>;

    /// Take an exclusive lock on `path` without blocking, creating the
    /// file and its parent directories if needed.
    ///
    /// Returns `None` when someone else holds the lock. The lock must not
    /// outlive the process that took it.
    fn try_lock(&self, path: &Path) -> ExpressoResult<Option<LockHandle>>;

    /// Absolute, normalised form of an existing path.
    fn canonicalize(&self, path: &Path) -> ExpressoResult<PathBuf>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Port for running external commands.
///
/// Implementations block until the process exits. An `Err` means the
/// process could not be run at all; a non-zero exit is reported through
/// [`ProcessOutput::success`].
#[cfg_attr(test, mockall::automock)]
pub trait ProcessRunner: Send + Sync {
    fn run(&self, command: &CommandSpec, cwd: &Path) -> ExpressoResult<ProcessOutput>;
}

/// Progress hooks for long-running pipeline stages.
pub trait ScaffoldObserver: Send + Sync {
    fn stage_started(&self, _stage: Stage, _command: &CommandSpec) {}

    fn stage_finished(&self, _stage: Stage, _succeeded: bool) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ScaffoldObserver for NoopObserver {}
