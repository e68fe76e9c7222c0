//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! the single high-level use case: "scaffold an Express project here".

pub mod dependency_pipeline;
pub mod scaffold_service;
mod workspace_lock;

pub use dependency_pipeline::DependencyPipeline;
pub use scaffold_service::ScaffoldService;
pub use workspace_lock::lock_path;
