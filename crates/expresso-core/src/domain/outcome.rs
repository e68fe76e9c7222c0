use std::path::PathBuf;

use serde::Serialize;

use crate::domain::pipeline::Stage;

/// What a scaffold run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScaffoldOutcome {
    /// Every skeleton directory already existed; nothing was touched.
    AlreadyScaffolded { root: PathBuf },
    /// Files were written and every pipeline stage succeeded.
    Completed(ScaffoldReport),
}

/// Paths are relative to `root`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScaffoldReport {
    pub root: PathBuf,
    pub created_directories: Vec<PathBuf>,
    pub created_files: Vec<PathBuf>,
    pub written_templates: Vec<PathBuf>,
    pub completed_stages: Vec<Stage>,
}

impl ScaffoldReport {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }
}

/// Dry-run preview of a scaffold run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaffoldPlan {
    pub root: PathBuf,
    pub already_scaffolded: bool,
    pub missing_directories: Vec<PathBuf>,
    pub missing_files: Vec<PathBuf>,
    pub templates: Vec<PathBuf>,
    pub commands: Vec<String>,
}
