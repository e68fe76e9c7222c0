//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "expresso",
    bin_name = "expresso",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{2615} Express.js project setup in one command",
    long_about = "Expresso lays out a conventional Express.js project in the \
                  current folder, writes starter code, and installs express \
                  and nodemon with npm.",
    after_help = "EXAMPLES:\n\
        \x20 expresso create\n\
        \x20 expresso create ./my-api --dry-run\n\
        \x20 expresso layout --format json\n\
        \x20 expresso completions bash > /usr/share/bash-completion/completions/expresso",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scaffold an Express project into a folder.
    #[command(
        visible_alias = "c",
        about = "Set up an Express project in a folder",
        after_help = "EXAMPLES:\n\
            \x20 expresso create            # current folder\n\
            \x20 expresso create ../my-api  # an existing folder\n\
            \x20 expresso create --dry-run  # show the plan only"
    )]
    Create(CreateArgs),

    /// Show the files and commands a scaffold produces.
    #[command(
        visible_alias = "ls",
        about = "Show the project layout",
        after_help = "EXAMPLES:\n\
            \x20 expresso layout\n\
            \x20 expresso layout --format list\n\
            \x20 expresso layout --format json"
    )]
    Layout(LayoutArgs),

    /// Initialise an Expresso configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 expresso init\n\
            \x20 expresso init --force  # overwrite an existing file"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 expresso completions bash > ~/.local/share/bash-completion/completions/expresso\n\
            \x20 expresso completions zsh  > ~/.zfunc/_expresso\n\
            \x20 expresso completions fish > ~/.config/fish/completions/expresso.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Expresso configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 expresso config get package_manager.program\n\
            \x20 expresso config list\n\
            \x20 expresso config path"
    )]
    Config(ConfigCommands),
}

// ── create ────────────────────────────────────────────────────────────────────

/// Arguments for `expresso create`.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Folder to scaffold into. Must already exist.
    #[arg(
        value_name = "PATH",
        help = "Existing folder to scaffold into (default: current directory)"
    )]
    pub path: Option<PathBuf>,

    /// Preview what would be created without writing any files.
    #[arg(
        long = "dry-run",
        help = "Show what would be created without creating it"
    )]
    pub dry_run: bool,
}

// ── layout ────────────────────────────────────────────────────────────────────

/// Arguments for `expresso layout`.
#[derive(Debug, Args)]
pub struct LayoutArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: LayoutFormat,
}

/// Output format for the `layout` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutFormat {
    /// Grouped, human-readable listing.
    Table,
    /// One path per line.
    List,
    /// JSON object.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `expresso init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `expresso completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `expresso config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `package_manager.program`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
