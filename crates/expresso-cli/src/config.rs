//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `EXPRESSO_<SECTION>__<KEY>`, e.g.
//!    `EXPRESSO_PACKAGE_MANAGER__PROGRAM=pnpm`
//! 3. Config file: `--config FILE`, else [`AppConfig::config_path`] if present
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use expresso_core::domain::DEFAULT_PACKAGE_MANAGER;

const ENV_PREFIX: &str = "EXPRESSO";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Output settings.
    pub output: OutputConfig,
    /// Package manager settings.
    pub package_manager: PackageManagerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManagerConfig {
    /// Executable used for `init` and both installs.
    pub program: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output: OutputConfig {
                no_color: false,
                format: "human".into(),
            },
            package_manager: PackageManagerConfig {
                program: DEFAULT_PACKAGE_MANAGER.into(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the config file, and the environment.
    ///
    /// An explicit `config_file` must exist; the default location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        Self::load_from(&path, required)
    }

    fn load_from(path: &Path, required: bool) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let settings = Config::builder()
            .set_default("output.no_color", defaults.output.no_color)?
            .set_default("output.format", defaults.output.format)?
            .set_default("package_manager.program", defaults.package_manager.program)?
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from '{}'", path.display()))?;

        let config: Self = settings
            .try_deserialize()
            .context("Configuration has invalid values")?;

        if config.package_manager.program.trim().is_empty() {
            anyhow::bail!("package_manager.program must not be empty");
        }

        Ok(config)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.expresso.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "expresso", "expresso")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".expresso.toml"))
    }

    /// Directory holding per-workspace run locks.
    ///
    /// Lives in the user cache so nothing lands in the project being scaffolded.
    pub fn lock_dir() -> PathBuf {
        directories::ProjectDirs::from("com", "expresso", "expresso")
            .map(|d| d.cache_dir().join("locks"))
            .unwrap_or_else(|| std::env::temp_dir().join("expresso").join("locks"))
    }
}
