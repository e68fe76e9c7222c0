//! Scaffold Service - main application orchestrator.
//!
//! This service coordinates the entire scaffolding workflow:
//! 1. Resolve the workspace root
//! 2. Guard against an already scaffolded workspace
//! 3. Create missing directories and placeholder files
//! 4. Overwrite the template files with their literal content
//! 5. Run the dependency pipeline
//!
//! Nothing is rolled back on failure; re-running relies on the guard and on
//! placeholders never being overwritten.

use std::path::{Path, PathBuf};

use tracing::{Span, debug, field, info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, NoopObserver, ProcessRunner, ScaffoldObserver},
        services::{dependency_pipeline::DependencyPipeline, workspace_lock::WorkspaceLock},
    },
    domain::{GuardDecision, ScaffoldLayout, ScaffoldOutcome, ScaffoldPlan, ScaffoldReport},
    error::ExpressoResult,
};

/// Main scaffolding service.
pub struct ScaffoldService {
    filesystem: Box<dyn Filesystem>,
    runner: Box<dyn ProcessRunner>,
    observer: Box<dyn ScaffoldObserver>,
    layout: ScaffoldLayout,
    pipeline: DependencyPipeline,
    lock_dir: PathBuf,
}

impl ScaffoldService {
    /// Create a new scaffold service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use expresso_core::application::ScaffoldService;
    ///
    /// let service = ScaffoldService::new(
    ///     filesystem, // impl Filesystem
    ///     runner,     // impl ProcessRunner
    /// )
    /// .with_package_manager("npm");
    /// ```
    pub fn new(filesystem: Box<dyn Filesystem>, runner: Box<dyn ProcessRunner>) -> Self {
        let layout = ScaffoldLayout::express();
        debug_assert!(layout.validate().is_ok(), "built-in layout is inconsistent");

        Self {
            filesystem,
            runner,
            observer: Box::new(NoopObserver),
            layout,
            pipeline: DependencyPipeline::default(),
            lock_dir: std::env::temp_dir().join("expresso").join("locks"),
        }
    }

    /// Use a different package manager executable.
    pub fn with_package_manager(mut self, program: impl Into<String>) -> Self {
        self.pipeline = DependencyPipeline::new(program);
        self
    }

    /// Receive stage progress events.
    pub fn with_observer(mut self, observer: Box<dyn ScaffoldObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Keep per-workspace lock files in `dir` instead of the temp directory.
    pub fn with_lock_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.lock_dir = dir.into();
        self
    }

    /// Turn an optional candidate folder into the workspace root.
    ///
    /// `None` means no folder is open (or the current directory is gone).
    pub fn resolve_workspace(&self, candidate: Option<PathBuf>) -> ExpressoResult<PathBuf> {
        let Some(candidate) = candidate else {
            return Err(ApplicationError::WorkspaceMissing {
                reason: "no folder is open".into(),
            }
            .into());
        };

        if !self.filesystem.is_dir(&candidate) {
            return Err(ApplicationError::WorkspaceMissing {
                reason: format!("'{}' is not an existing directory", candidate.display()),
            }
            .into());
        }

        let root = self.filesystem.canonicalize(&candidate)?;
        debug!(root = %root.display(), "Workspace resolved");
        Ok(root)
    }

    /// Describe what [`Self::scaffold`] would do, without writing anything.
    pub fn plan(&self, root: &Path) -> ExpressoResult<ScaffoldPlan> {
        let already_scaffolded = self
            .layout
            .guard(root, |p| self.filesystem.is_dir(p))
            .is_already_scaffolded();

        let mut plan = ScaffoldPlan {
            root: root.to_path_buf(),
            already_scaffolded,
            missing_directories: Vec::new(),
            missing_files: Vec::new(),
            templates: Vec::new(),
            commands: Vec::new(),
        };

        if already_scaffolded {
            return Ok(plan);
        }

        plan.missing_directories = self
            .layout
            .directories()
            .iter()
            .map(PathBuf::from)
            .filter(|dir| !self.filesystem.is_dir(&root.join(dir)))
            .collect();
        plan.missing_files = self
            .layout
            .placeholders()
            .iter()
            .map(PathBuf::from)
            .filter(|file| !self.filesystem.exists(&root.join(file)))
            .collect();
        plan.templates = self
            .layout
            .templates()
            .iter()
            .map(|t| PathBuf::from(t.path))
            .collect();
        plan.commands = self
            .pipeline
            .commands()
            .iter()
            .map(ToString::to_string)
            .collect();

        Ok(plan)
    }

    /// Scaffold an Express project into `root`.
    ///
    /// This is the main use case.
    #[instrument(skip_all, fields(root = %root.display(), run_id = field::Empty))]
    pub fn scaffold(&self, root: &Path) -> ExpressoResult<ScaffoldOutcome> {
        let run_id = Uuid::new_v4();
        Span::current().record("run_id", field::display(run_id));

        // 1. Guard
        let missing = match self.layout.guard(root, |p| self.filesystem.is_dir(p)) {
            GuardDecision::AlreadyScaffolded => {
                warn!("Express project structure already exists");
                return Ok(ScaffoldOutcome::AlreadyScaffolded {
                    root: root.to_path_buf(),
                });
            }
            GuardDecision::Proceed {
                missing_directories,
            } => missing_directories,
        };
        info!(missing = missing.len(), "Scaffolding Express project");

        // 2. Exclusive access for the rest of the run
        let _lock = WorkspaceLock::acquire(self.filesystem.as_ref(), &self.lock_dir, root)?;

        let mut report = ScaffoldReport::new(root);

        // 3. Skeleton
        self.write_skeleton(root, &mut report)?;

        // 4. Templates
        self.materialize_templates(root, &mut report)?;

        // 5. Package manager
        report.completed_stages = self.pipeline.run(
            root,
            self.runner.as_ref(),
            self.filesystem.as_ref(),
            self.observer.as_ref(),
        )?;

        info!(
            directories = report.created_directories.len(),
            files = report.created_files.len(),
            "Express project setup complete"
        );
        Ok(ScaffoldOutcome::Completed(report))
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Create missing directories, then missing placeholder files.
    fn write_skeleton(&self, root: &Path, report: &mut ScaffoldReport) -> ExpressoResult<()> {
        for dir in self.layout.directories() {
            let path = root.join(dir);
            if self.filesystem.is_dir(&path) {
                continue;
            }
            self.filesystem.create_dir_all(&path)?;
            report.created_directories.push(PathBuf::from(dir));
        }

        for file in self.layout.placeholders() {
            if self.filesystem.create_new_file(&root.join(file), "")? {
                report.created_files.push(PathBuf::from(file));
            } else {
                debug!(file, "Placeholder already present, leaving it untouched");
            }
        }

        Ok(())
    }

    /// Always overwrite: these files are meant to hold starter code.
    fn materialize_templates(
        &self,
        root: &Path,
        report: &mut ScaffoldReport,
    ) -> ExpressoResult<()> {
        for template in self.layout.templates() {
            self.filesystem
                .write_file(&root.join(template.path), template.content)?;
            report.written_templates.push(PathBuf::from(template.path));
        }
        Ok(())
    }
}
