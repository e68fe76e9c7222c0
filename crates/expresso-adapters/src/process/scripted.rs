//! Scripted process runner for testing.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use expresso_core::{
    application::ports::{Filesystem, ProcessOutput, ProcessRunner},
    domain::{CommandSpec, MANIFEST_FILE, Stage},
    error::ExpressoResult,
};

use crate::filesystem::MemoryFilesystem;

/// A recorded call to [`ScriptedProcessRunner::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: CommandSpec,
    pub cwd: PathBuf,
}

/// Test double that records invocations instead of spawning processes.
///
/// Every command succeeds unless it matches the stage configured with
/// [`ScriptedProcessRunner::failing_at`]. With
/// [`ScriptedProcessRunner::with_init_manifest`], the `init` stage writes a
/// `package.json` the way `npm init -y` would.
#[derive(Debug, Clone, Default)]
pub struct ScriptedProcessRunner {
    invocations: Arc<Mutex<Vec<Invocation>>>,
    failing: Option<Stage>,
    init_manifest: Option<(MemoryFilesystem, String)>,
}

impl ScriptedProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exit with status 1 when `stage` runs.
    pub fn failing_at(mut self, stage: Stage) -> Self {
        self.failing = Some(stage);
        self
    }

    /// Write `manifest` into `filesystem` when the `init` stage runs.
    pub fn with_init_manifest(
        mut self,
        filesystem: MemoryFilesystem,
        manifest: impl Into<String>,
    ) -> Self {
        self.init_manifest = Some((filesystem, manifest.into()));
        self
    }

    /// Invocations so far, in order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.lock().clone()
    }

    /// Invocations rendered as command lines.
    pub fn command_lines(&self) -> Vec<String> {
        self.lock().iter().map(|i| i.command.to_string()).collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Invocation>> {
        self.invocations.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn stage_of(command: &CommandSpec) -> Option<Stage> {
        Stage::ALL
            .into_iter()
            .find(|stage| command.args.iter().map(String::as_str).eq(stage.args().iter().copied()))
    }
}

impl ProcessRunner for ScriptedProcessRunner {
    fn run(&self, command: &CommandSpec, cwd: &Path) -> ExpressoResult<ProcessOutput> {
        self.lock().push(Invocation {
            command: command.clone(),
            cwd: cwd.to_path_buf(),
        });

        let stage = Self::stage_of(command);
        if stage.is_some() && stage == self.failing {
            return Ok(ProcessOutput::failure(1, format!("{command} failed")));
        }

        if stage == Some(Stage::Init) {
            if let Some((filesystem, manifest)) = &self.init_manifest {
                filesystem.write_file(&cwd.join(MANIFEST_FILE), manifest)?;
            }
        }

        Ok(ProcessOutput::success(format!("{command} ok")))
    }
}
