use std::fmt;

use serde::Serialize;

/// Package installed as a runtime dependency.
pub const RUNTIME_DEPENDENCY: &str = "express";

/// Package installed as a development dependency.
pub const DEV_DEPENDENCY: &str = "nodemon";

/// Default package manager executable.
pub const DEFAULT_PACKAGE_MANAGER: &str = "npm";

/// One external-process step of the dependency pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Init,
    InstallRuntime,
    InstallDev,
}

impl Stage {
    /// Stages in execution order.
    pub const ALL: [Stage; 3] = [Stage::Init, Stage::InstallRuntime, Stage::InstallDev];

    /// Arguments passed to the package manager for this stage.
    pub fn args(self) -> &'static [&'static str] {
        match self {
            Self::Init => &["init", "-y"],
            Self::InstallRuntime => &["install", RUNTIME_DEPENDENCY],
            Self::InstallDev => &["install", "--save-dev", DEV_DEPENDENCY],
        }
    }

    /// User-facing message reported when this stage fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Init => "Error initializing npm project",
            Self::InstallRuntime => "Error installing express",
            Self::InstallDev => "Error installing nodemon",
        }
    }

    pub fn next(self) -> Option<Stage> {
        match self {
            Self::Init => Some(Self::InstallRuntime),
            Self::InstallRuntime => Some(Self::InstallDev),
            Self::InstallDev => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::InstallRuntime => "install-runtime",
            Self::InstallDev => "install-dev",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved external command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn for_stage(program: &str, stage: Stage) -> Self {
        Self::new(program, stage.args().iter().copied())
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Position of a run within the stage chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Init,
    InstallRuntime,
    InstallDev,
    Done,
    Failed(Stage),
}

impl PipelineState {
    pub fn start() -> Self {
        Self::Init
    }

    /// The stage that runs next, if any.
    pub fn current_stage(self) -> Option<Stage> {
        match self {
            Self::Init => Some(Stage::Init),
            Self::InstallRuntime => Some(Stage::InstallRuntime),
            Self::InstallDev => Some(Stage::InstallDev),
            Self::Done | Self::Failed(_) => None,
        }
    }

    /// Transition after the current stage finished.
    ///
    /// Terminal states never move.
    pub fn advance(self, succeeded: bool) -> Self {
        let Some(stage) = self.current_stage() else {
            return self;
        };

        if !succeeded {
            return Self::Failed(stage);
        }

        match stage.next() {
            Some(Stage::InstallRuntime) => Self::InstallRuntime,
            Some(Stage::InstallDev) => Self::InstallDev,
            Some(Stage::Init) | None => Self::Done,
        }
    }
}
