//! Dependency Pipeline - the ordered package manager chain.
//!
//! ```text
//! init ──▶ patch package.json ──▶ install express ──▶ install --save-dev nodemon
//! ```
//!
//! Each stage blocks until its process exits. The first failure halts the
//! chain; nothing already done is undone.

use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, ProcessRunner, ScaffoldObserver},
    },
    domain::{
        CommandSpec, DEFAULT_PACKAGE_MANAGER, MANIFEST_FILE, PackageManifest, PipelineState, Stage,
    },
    error::{ExpressoError, ExpressoResult},
};

/// Runs the three package manager stages plus the manifest patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyPipeline {
    program: String,
}

impl DependencyPipeline {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Commands in execution order.
    pub fn commands(&self) -> Vec<CommandSpec> {
        Stage::ALL
            .iter()
            .map(|stage| CommandSpec::for_stage(&self.program, *stage))
            .collect()
    }

    /// Run every stage in `root`, returning the stages that completed.
    #[instrument(skip_all, fields(root = %root.display(), program = %self.program))]
    pub fn run(
        &self,
        root: &Path,
        runner: &dyn ProcessRunner,
        filesystem: &dyn Filesystem,
        observer: &dyn ScaffoldObserver,
    ) -> ExpressoResult<Vec<Stage>> {
        let mut state = PipelineState::start();
        let mut completed = Vec::with_capacity(Stage::ALL.len());

        while let Some(stage) = state.current_stage() {
            let command = CommandSpec::for_stage(&self.program, stage);
            observer.stage_started(stage, &command);

            let result = self.run_stage(stage, &command, root, runner);
            observer.stage_finished(stage, result.is_ok());
            state = state.advance(result.is_ok());

            if let Err(err) = result {
                warn!(%stage, ?state, "Pipeline halted");
                return Err(err);
            }

            if stage == Stage::Init {
                patch_manifest(root, filesystem)?;
            }

            completed.push(stage);
        }

        debug_assert_eq!(state, PipelineState::Done);
        info!(stages = completed.len(), "Dependency pipeline finished");
        Ok(completed)
    }

    fn run_stage(
        &self,
        stage: Stage,
        command: &CommandSpec,
        root: &Path,
        runner: &dyn ProcessRunner,
    ) -> ExpressoResult<()> {
        info!(%stage, command = %command, "Running stage");

        let output = runner.run(command, root).map_err(|e| match e {
            ExpressoError::Application(cause) => ApplicationError::StageFailed {
                stage,
                reason: cause.to_string(),
                source: Some(Box::new(cause)),
            }
            .into(),
            other => other,
        })?;

        let stdout = output.stdout.trim_end();
        if !stdout.is_empty() {
            info!(%stage, "{stdout}");
        }

        if !output.success {
            let stderr = output.stderr.trim_end();
            if !stderr.is_empty() {
                warn!(%stage, "{stderr}");
            }

            let reason = match output.code {
                Some(code) => format!("`{command}` exited with status {code}"),
                None => format!("`{command}` was terminated by a signal"),
            };
            return Err(ApplicationError::StageFailed {
                stage,
                reason,
                source: None,
            }
            .into());
        }

        Ok(())
    }
}

impl Default for DependencyPipeline {
    fn default() -> Self {
        Self::new(DEFAULT_PACKAGE_MANAGER)
    }
}

/// Read-merge-write of `package.json` after `init`.
pub fn patch_manifest(root: &Path, filesystem: &dyn Filesystem) -> ExpressoResult<()> {
    let path = root.join(MANIFEST_FILE);

    let source = filesystem.read_to_string(&path)?;
    let mut manifest = PackageManifest::parse(&source)?;
    manifest.apply_express_defaults()?;
    filesystem.write_file(&path, &manifest.to_pretty_string()?)?;

    debug!(manifest = %path.display(), "package.json patched");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    use mockall::{Sequence, predicate::always};

    use super::*;
    use crate::application::ports::{
        MockFilesystem, MockProcessRunner, NoopObserver, ProcessOutput,
    };
    use crate::domain::{DEV_SCRIPT, START_SCRIPT};
    use crate::error::ExpressoError;

    const ROOT: &str = "/work";

    const EXPECTED_ARGS: [&[&str]; 3] = [
        &["init", "-y"],
        &["install", "express"],
        &["install", "--save-dev", "nodemon"],
    ];

    fn manifest_fs(written: Arc<Mutex<Option<String>>>) -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_read_to_string()
            .withf(|p| p == Path::new("/work/package.json"))
            .returning(|_| Ok(r#"{"name":"demo","X":1,"scripts":{"test":"jest"}}"#.into()));
        fs.expect_write_file()
            .withf(|p, _| p == Path::new("/work/package.json"))
            .returning(move |_, content| {
                *written.lock().unwrap() = Some(content.to_string());
                Ok(())
            });
        fs
    }

    #[test]
    fn runs_stages_in_order_and_patches_manifest() {
        let written = Arc::new(Mutex::new(None));
        let fs = manifest_fs(written.clone());

        let mut seq = Sequence::new();
        let mut runner = MockProcessRunner::new();
        for args in EXPECTED_ARGS {
            runner
                .expect_run()
                .withf(move |cmd, cwd| cmd.program == "npm" && cmd.args == args && cwd == Path::new(ROOT))
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _| Ok(ProcessOutput::success("ok")));
        }

        let stages = DependencyPipeline::default()
            .run(Path::new(ROOT), &runner, &fs, &NoopObserver)
            .unwrap();

        assert_eq!(stages, Stage::ALL);

        let manifest = written.lock().unwrap().clone().unwrap();
        let manifest = PackageManifest::parse(&manifest).unwrap();
        assert_eq!(manifest.script("start"), Some(START_SCRIPT));
        assert_eq!(manifest.script("dev"), Some(DEV_SCRIPT));
        assert_eq!(manifest.script("test"), Some("jest"));
        assert_eq!(manifest.get("X"), Some(&serde_json::json!(1)));
    }

    #[test]
    fn init_failure_runs_exactly_one_process() {
        // No manifest expectations: touching the filesystem would panic.
        let fs = MockFilesystem::new();
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .times(1)
            .returning(|_, _| Ok(ProcessOutput::failure(1, "npm ERR!")));

        let err = DependencyPipeline::default()
            .run(Path::new(ROOT), &runner, &fs, &NoopObserver)
            .unwrap_err();

        assert_eq!(err.stage(), Some(Stage::Init));
        assert!(err.to_string().contains("exited with status 1"));
    }

    #[test]
    fn runtime_install_failure_skips_dev_install() {
        let fs = manifest_fs(Arc::new(Mutex::new(None)));
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .withf(|cmd, _| cmd.args[0] == "init")
            .times(1)
            .returning(|_, _| Ok(ProcessOutput::success("")));
        runner
            .expect_run()
            .withf(|cmd, _| cmd.args == ["install", "express"])
            .times(1)
            .returning(|_, _| Ok(ProcessOutput::failure(254, "")));
        runner
            .expect_run()
            .withf(|cmd, _| cmd.args.contains(&"--save-dev".to_string()))
            .never();

        let err = DependencyPipeline::default()
            .run(Path::new(ROOT), &runner, &fs, &NoopObserver)
            .unwrap_err();

        assert_eq!(err.stage(), Some(Stage::InstallRuntime));
    }

    #[test]
    fn spawn_error_keeps_install_hint() {
        let fs = MockFilesystem::new();
        let mut runner = MockProcessRunner::new();
        runner.expect_run().with(always(), always()).times(1).returning(|cmd, _| {
            Err(ApplicationError::ProcessFailed {
                command: cmd.program.clone(),
                reason: "not found".into(),
            }
            .into())
        });

        let err = DependencyPipeline::new("pnpm")
            .run(Path::new(ROOT), &runner, &fs, &NoopObserver)
            .unwrap_err();

        assert!(matches!(
            err,
            ExpressoError::Application(ApplicationError::StageFailed {
                stage: Stage::Init,
                source: Some(_),
                ..
            })
        ));
        assert_eq!(
            err.suggestions()[0],
            "Make sure `pnpm` is installed and on your PATH"
        );
    }

    #[test]
    fn unparseable_manifest_halts_before_install() {
        let mut fs = MockFilesystem::new();
        fs.expect_read_to_string()
            .returning(|_| Ok("not json".into()));
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .times(1)
            .returning(|_, _| Ok(ProcessOutput::success("")));

        let err = DependencyPipeline::default()
            .run(Path::new(ROOT), &runner, &fs, &NoopObserver)
            .unwrap_err();

        assert!(matches!(err, ExpressoError::Domain(_)));
        assert_eq!(err.stage(), None);
    }

    #[test]
    fn commands_follow_stage_order() {
        let commands: Vec<String> = DependencyPipeline::new("npm.cmd")
            .commands()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            commands,
            [
                "npm.cmd init -y",
                "npm.cmd install express",
                "npm.cmd install --save-dev nodemon"
            ]
        );
    }

    #[test]
    fn patch_manifest_reads_from_root() {
        let written = Arc::new(Mutex::new(None));
        let fs = manifest_fs(written.clone());
        patch_manifest(&PathBuf::from(ROOT), &fs).unwrap();
        assert!(written.lock().unwrap().as_deref().unwrap().contains("\"type\": \"module\""));
    }
}
