//! Application layer for Expresso.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ScaffoldService, DependencyPipeline)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer. Layout data, manifest
//! rules and stage ordering live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{DependencyPipeline, ScaffoldService, lock_path};

pub use ports::{
    Filesystem, LockHandle, NoopObserver, ProcessOutput, ProcessRunner, ScaffoldObserver,
};

pub use error::ApplicationError;
