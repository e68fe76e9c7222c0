//! Process runner backed by `std::process::Command`.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, instrument};

use expresso_core::{
    application::{
        ApplicationError,
        ports::{ProcessOutput, ProcessRunner},
    },
    domain::CommandSpec,
    error::ExpressoResult,
};

/// Runs commands on the host, blocking until they exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalProcessRunner;

impl LocalProcessRunner {
    pub fn new() -> Self {
        Self
    }

    /// Look the program up on `PATH` so `npm.cmd` and friends resolve on
    /// Windows. Unresolvable names are passed through and fail at spawn.
    fn resolve_program(program: &str) -> PathBuf {
        match which::which(program) {
            Ok(path) => path,
            Err(e) => {
                debug!(program, error = %e, "Program not found on PATH");
                PathBuf::from(program)
            }
        }
    }
}

impl ProcessRunner for LocalProcessRunner {
    #[instrument(skip_all, fields(command = %command, cwd = %cwd.display()))]
    fn run(&self, command: &CommandSpec, cwd: &Path) -> ExpressoResult<ProcessOutput> {
        let program = Self::resolve_program(&command.program);

        let output = Command::new(&program)
            .args(&command.args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| ApplicationError::ProcessFailed {
                command: command.program.clone(),
                reason: e.to_string(),
            })?;

        debug!(status = ?output.status, "Process exited");

        Ok(ProcessOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
