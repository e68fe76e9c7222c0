use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::{error::DomainError, templates};

/// Directories that make up the project skeleton.
///
/// Their joint existence is what marks a workspace as already scaffolded.
pub const DIRECTORIES: [&str; 11] = [
    "src/config",
    "src/controllers",
    "src/middlewares",
    "src/models",
    "src/routes",
    "src/services",
    "src/utils",
    "src/views",
    "public/css",
    "public/js",
    "public/images",
];

/// Files created empty when absent. Existing files are never touched.
pub const PLACEHOLDER_FILES: [&str; 15] = [
    "src/config/database.js",
    "src/config/dotenv.js",
    "src/controllers/userController.js",
    "src/controllers/authController.js",
    "src/middlewares/authMiddleware.js",
    "src/models/User.js",
    "src/routes/userRoutes.js",
    "src/routes/authRoutes.js",
    "src/routes/index.js",
    "src/utils/helpers.js",
    "src/app.js",
    "src/server.js",
    ".env",
    ".gitignore",
    "README.md",
];

/// Files that always receive their literal content, overwriting whatever is there.
pub const TEMPLATE_FILES: [TemplateFile; 5] = [
    TemplateFile::new("src/routes/index.js", templates::INDEX_ROUTES),
    TemplateFile::new("src/app.js", templates::APP),
    TemplateFile::new("src/server.js", templates::SERVER),
    TemplateFile::new(".env", templates::ENV),
    TemplateFile::new(".gitignore", templates::GITIGNORE),
];

/// A relative path bound to fixed content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemplateFile {
    pub path: &'static str,
    #[serde(skip)]
    pub content: &'static str,
}

impl TemplateFile {
    pub const fn new(path: &'static str, content: &'static str) -> Self {
        Self { path, content }
    }
}

/// Result of checking the directory set against a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Every directory is present; nothing must be written.
    AlreadyScaffolded,
    /// At least one directory is missing. Partial state is treated like an
    /// empty workspace.
    Proceed { missing_directories: Vec<PathBuf> },
}

impl GuardDecision {
    pub fn is_already_scaffolded(&self) -> bool {
        matches!(self, Self::AlreadyScaffolded)
    }
}

/// The fixed Express.js project layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaffoldLayout {
    directories: &'static [&'static str],
    placeholders: &'static [&'static str],
    templates: &'static [TemplateFile],
}

impl ScaffoldLayout {
    /// The one layout this tool knows how to produce.
    pub const fn express() -> Self {
        Self {
            directories: &DIRECTORIES,
            placeholders: &PLACEHOLDER_FILES,
            templates: &TEMPLATE_FILES,
        }
    }

    pub fn directories(&self) -> &'static [&'static str] {
        self.directories
    }

    pub fn placeholders(&self) -> &'static [&'static str] {
        self.placeholders
    }

    pub fn templates(&self) -> &'static [TemplateFile] {
        self.templates
    }

    /// Decide whether scaffolding should run for `root`.
    ///
    /// `is_dir` is the only probe used; files are never consulted.
    pub fn guard(&self, root: &Path, is_dir: impl Fn(&Path) -> bool) -> GuardDecision {
        let missing_directories: Vec<PathBuf> = self
            .directories
            .iter()
            .map(PathBuf::from)
            .filter(|dir| !is_dir(&root.join(dir)))
            .collect();

        if missing_directories.is_empty() {
            GuardDecision::AlreadyScaffolded
        } else {
            GuardDecision::Proceed {
                missing_directories,
            }
        }
    }

    /// Check the structural invariants of the layout.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.directories.is_empty() {
            return Err(DomainError::InvalidLayout(
                "layout has no directories".into(),
            ));
        }

        for group in [self.directories, self.placeholders] {
            let mut seen = HashSet::new();
            for path in group {
                ensure_relative(path)?;
                if !seen.insert(*path) {
                    return Err(DomainError::DuplicatePath {
                        path: (*path).to_string(),
                    });
                }
            }
        }

        for template in self.templates {
            ensure_relative(template.path)?;
            if !self.placeholders.contains(&template.path) {
                return Err(DomainError::InvalidLayout(format!(
                    "template '{}' is not part of the placeholder set",
                    template.path
                )));
            }
        }

        // Every placeholder must land in the root or in a layout directory.
        for file in self.placeholders {
            let parent = Path::new(file).parent().unwrap_or(Path::new(""));
            let covered = parent.as_os_str().is_empty()
                || self
                    .directories
                    .iter()
                    .any(|dir| Path::new(dir).starts_with(parent));
            if !covered {
                return Err(DomainError::InvalidLayout(format!(
                    "'{}' has no parent directory in the layout",
                    file
                )));
            }
        }

        Ok(())
    }
}

impl Default for ScaffoldLayout {
    fn default() -> Self {
        Self::express()
    }
}

fn ensure_relative(path: &str) -> Result<(), DomainError> {
    if Path::new(path).is_absolute() {
        return Err(DomainError::AbsolutePathNotAllowed {
            path: path.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn express_layout_is_valid() {
        ScaffoldLayout::express().validate().unwrap();
    }

    #[test]
    fn layout_sizes() {
        let layout = ScaffoldLayout::express();
        assert_eq!(layout.directories().len(), 11);
        assert_eq!(layout.placeholders().len(), 15);
        assert_eq!(layout.templates().len(), 5);
    }

    #[test]
    fn guard_short_circuits_when_every_directory_exists() {
        let layout = ScaffoldLayout::express();
        let decision = layout.guard(Path::new("/work"), |_| true);
        assert_eq!(decision, GuardDecision::AlreadyScaffolded);
    }

    #[test]
    fn guard_proceeds_on_empty_workspace() {
        let layout = ScaffoldLayout::express();
        match layout.guard(Path::new("/work"), |_| false) {
            GuardDecision::Proceed {
                missing_directories,
            } => assert_eq!(missing_directories.len(), 11),
            other => panic!("unexpected decision: {other:?}"),
        }
    }

    #[test]
    fn guard_treats_partial_state_as_missing() {
        let layout = ScaffoldLayout::express();
        let root = Path::new("/work");
        let decision = layout.guard(root, |p| p != root.join("public/images"));

        assert_eq!(
            decision,
            GuardDecision::Proceed {
                missing_directories: vec![PathBuf::from("public/images")]
            }
        );
    }

    #[test]
    fn app_template_is_bound_to_app_js() {
        let app = TEMPLATE_FILES
            .iter()
            .find(|t| t.path == "src/app.js")
            .unwrap();
        assert!(app.content.starts_with("import express from 'express';"));
        assert!(app.content.contains("app.use('/', indexRoutes);"));
    }

    #[test]
    fn env_template_declares_port() {
        let env = TEMPLATE_FILES.iter().find(|t| t.path == ".env").unwrap();
        assert!(env.content.lines().any(|l| l == "PORT=3000"));
        assert!(env.content.lines().any(|l| l.starts_with("DATABASE_URL=")));
        assert!(env.content.lines().any(|l| l.starts_with("SECRET_KEY=")));
    }

    #[test]
    fn duplicate_directories_are_rejected() {
        static DIRS: [&str; 2] = ["src", "src"];
        let layout = ScaffoldLayout {
            directories: &DIRS,
            placeholders: &[],
            templates: &[],
        };
        assert!(matches!(
            layout.validate(),
            Err(DomainError::DuplicatePath { .. })
        ));
    }

    #[test]
    fn orphan_placeholder_is_rejected() {
        static DIRS: [&str; 1] = ["src"];
        static FILES: [&str; 1] = ["lib/index.js"];
        let layout = ScaffoldLayout {
            directories: &DIRS,
            placeholders: &FILES,
            templates: &[],
        };
        assert!(matches!(
            layout.validate(),
            Err(DomainError::InvalidLayout(_))
        ));
    }
}
