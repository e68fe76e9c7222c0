// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Layout invariants
    // ========================================================================
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Duplicate path in layout: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    // ========================================================================
    // Manifest
    // ========================================================================
    #[error("package.json is not valid JSON: {reason}")]
    ManifestParse { reason: String },

    #[error("package.json has an unexpected shape: {0}")]
    InvalidManifest(String),

    #[error("package.json could not be serialised: {reason}")]
    ManifestSerialize { reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ManifestParse { .. } | Self::InvalidManifest(_) => vec![
                "Inspect package.json in the project folder".into(),
                "Delete it and run the command again to let npm recreate it".into(),
            ],
            Self::InvalidLayout(_)
            | Self::DuplicatePath { .. }
            | Self::AbsolutePathNotAllowed { .. } => vec![
                "The built-in project layout is inconsistent".into(),
                "This is a bug, please report it".into(),
            ],
            Self::ManifestSerialize { .. } => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ManifestParse { .. } | Self::InvalidManifest(_) => ErrorCategory::Validation,
            _ => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Internal,
}
