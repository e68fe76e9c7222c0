// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Expresso.
//!
//! Pure data and decisions: the fixed project layout, the `package.json`
//! patch, and the dependency pipeline state machine. All I/O goes through
//! the ports defined in the application layer.
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem or process calls
//! - **Templates are data**: a path → literal content table

pub mod error;
pub mod layout;
pub mod manifest;
pub mod outcome;
pub mod pipeline;
pub mod templates;

pub use error::{DomainError, ErrorCategory};

pub use layout::{
    DIRECTORIES, GuardDecision, PLACEHOLDER_FILES, ScaffoldLayout, TEMPLATE_FILES, TemplateFile,
};

pub use manifest::{DEV_SCRIPT, MANIFEST_FILE, MODULE_TYPE, PackageManifest, START_SCRIPT};

pub use outcome::{ScaffoldOutcome, ScaffoldPlan, ScaffoldReport};

pub use pipeline::{
    CommandSpec, DEFAULT_PACKAGE_MANAGER, DEV_DEPENDENCY, PipelineState, RUNTIME_DEPENDENCY, Stage,
};
