//! Infrastructure adapters for Expresso.
//!
//! This crate implements the ports defined in `expresso-core::application::ports`.
//! It contains all filesystem and process I/O.

pub mod filesystem;
pub mod process;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use process::{LocalProcessRunner, ScriptedProcessRunner};
