//! Expresso Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Expresso
//! Express.js scaffolding tool, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          expresso-cli (CLI)             │
//! │     (Resolves workspace, renders)       │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (ScaffoldService, DependencyPipeline)   │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, ProcessRunner, Observer)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    expresso-adapters (Infrastructure)   │
//! │ (LocalFilesystem, LocalProcessRunner)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (ScaffoldLayout, PackageManifest, Stage)│
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use expresso_core::application::ScaffoldService;
//!
//! // Adapters come from `expresso-adapters`.
//! let service = ScaffoldService::new(filesystem, runner);
//! let root = service.resolve_workspace(Some("./my-api".into())).unwrap();
//! let outcome = service.scaffold(&root).unwrap();
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        DependencyPipeline, ScaffoldService,
        ports::{Filesystem, NoopObserver, ProcessOutput, ProcessRunner, ScaffoldObserver},
    };
    pub use crate::domain::{
        CommandSpec, GuardDecision, PackageManifest, PipelineState, ScaffoldLayout,
        ScaffoldOutcome, ScaffoldPlan, ScaffoldReport, Stage, TemplateFile,
    };
    pub use crate::error::{ExpressoError, ExpressoResult};
}
