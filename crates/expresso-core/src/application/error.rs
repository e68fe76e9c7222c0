//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::Stage;
use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// No usable workspace folder.
    #[error("Please open a folder first: {reason}")]
    WorkspaceMissing { reason: String },

    /// Another run holds the workspace lock.
    #[error("A scaffold is already running in {path}")]
    ScaffoldInProgress { path: PathBuf, lock: PathBuf },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A process could not be spawned or waited on.
    #[error("Could not run `{command}`: {reason}")]
    ProcessFailed { command: String, reason: String },

    /// A pipeline stage exited unsuccessfully, or never started.
    #[error("{}: {reason}", .stage.failure_message())]
    StageFailed {
        stage: Stage,
        reason: String,
        /// Set when the process could not be run at all.
        #[source]
        source: Option<Box<ApplicationError>>,
    },

    /// Adapter state lock poisoned.
    #[error("Adapter state lock poisoned")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::WorkspaceMissing { .. } => vec![
                "Run the command from inside the project folder".into(),
                "Or pass the folder explicitly: expresso create <PATH>".into(),
            ],
            Self::ScaffoldInProgress { lock, .. } => vec![
                "Wait for the running scaffold to finish, then run again".into(),
                format!("The run holds an exclusive lock on {}", lock.display()),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Check available disk space".into(),
            ],
            Self::ProcessFailed { command, .. } => vec![
                format!("Make sure `{}` is installed and on your PATH", command),
                "Or set package_manager.program in the configuration".into(),
            ],
            Self::StageFailed {
                stage,
                source: Some(cause),
                ..
            } => {
                let mut hints = cause.suggestions();
                hints.push(format!("The `{}` stage never started; earlier steps were kept", stage));
                hints
            }
            Self::StageFailed { stage, .. } => vec![
                format!("The `{}` stage failed; earlier steps were kept", stage),
                "Check the npm output above (use -v for details)".into(),
                "Fix the problem, delete the generated folders, and run again".into(),
            ],
            Self::StoreLockError => vec!["Try again in a moment".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::WorkspaceMissing { .. } => ErrorCategory::NotFound,
            Self::ScaffoldInProgress { .. } => ErrorCategory::Validation,
            Self::FilesystemError { .. } | Self::StoreLockError => ErrorCategory::Internal,
            Self::ProcessFailed { .. } | Self::StageFailed { .. } => ErrorCategory::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_that_never_started_keeps_install_hint() {
        let err = ApplicationError::StageFailed {
            stage: Stage::Init,
            reason: "Could not run `npm init -y`: program not found".into(),
            source: Some(Box::new(ApplicationError::ProcessFailed {
                command: "npm".into(),
                reason: "program not found".into(),
            })),
        };

        let hints = err.suggestions();
        assert!(hints[0].contains("Make sure `npm` is installed"));
        assert!(hints.iter().any(|h| h.contains("package_manager.program")));
        assert!(!hints.iter().any(|h| h.contains("npm output above")));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn failed_exit_points_at_npm_output() {
        let err = ApplicationError::StageFailed {
            stage: Stage::InstallDev,
            reason: "exited with status 1".into(),
            source: None,
        };

        assert!(err.suggestions().iter().any(|h| h.contains("npm output above")));
        assert!(err.to_string().starts_with("Error installing nodemon"));
    }
}
