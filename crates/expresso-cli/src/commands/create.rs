//! Implementation of the `expresso create` command.
//!
//! Responsibility: wire the adapters into a `ScaffoldService`, run it, and
//! display the single terminal message. No business logic lives here.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument};

use expresso_adapters::{LocalFilesystem, LocalProcessRunner};
use expresso_core::{
    application::ScaffoldService,
    domain::{ScaffoldOutcome, ScaffoldPlan},
};

use crate::{
    cli::{CreateArgs, OutputFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
    progress::SpinnerObserver,
};

/// JSON document printed with `--output-format json`.
#[derive(Debug, Serialize)]
struct CreateReport<'a> {
    #[serde(flatten)]
    outcome: &'a ScaffoldOutcome,
    package_manager: &'a str,
    finished_at: DateTime<Utc>,
}

/// Execute the `expresso create` command.
///
/// Dispatch sequence:
/// 1. Resolve the workspace root (explicit path, else the current directory)
/// 2. Early-exit with the plan if `--dry-run`
/// 3. Scaffold via `ScaffoldService`
/// 4. Print the outcome
#[instrument(skip_all, fields(path = ?args.path))]
pub fn execute(args: CreateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let program = config.package_manager.program.clone();
    let mut service = ScaffoldService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(LocalProcessRunner::new()),
    )
    .with_package_manager(program.as_str())
    .with_lock_dir(AppConfig::lock_dir());

    if output.shows_progress() {
        service = service.with_observer(Box::new(SpinnerObserver::new(output.supports_color())));
    }

    // 1. Resolve workspace
    let root = service.resolve_workspace(candidate_root(args.path))?;
    debug!(root = %root.display(), program = %program, "Workspace resolved");

    // 2. Dry run: describe but do not write.
    if args.dry_run {
        let plan = service.plan(&root)?;
        return show_plan(&plan, &output);
    }

    // 3. Scaffold
    info!(root = %root.display(), "Scaffold started");

    let outcome = service.scaffold(&root)?;

    // 4. Report
    if output.format() == OutputFormat::Json {
        output.json(&CreateReport {
            outcome: &outcome,
            package_manager: &program,
            finished_at: Utc::now(),
        })?;
        return Ok(());
    }

    // Exactly one line per run; details go to the log.
    match outcome {
        ScaffoldOutcome::AlreadyScaffolded { .. } => {
            output.warning("Express project structure already exists.")?;
        }
        ScaffoldOutcome::Completed(report) => {
            info!(
                directories = report.created_directories.len(),
                files = report.created_files.len(),
                templates = report.written_templates.len(),
                "Next: {program} run dev"
            );
            output.success("Express project setup complete!")?;
        }
    }

    Ok(())
}

/// `None` when no path was given and the current directory is unusable.
fn candidate_root(path: Option<PathBuf>) -> Option<PathBuf> {
    path.or_else(|| std::env::current_dir().ok())
}

fn show_plan(plan: &ScaffoldPlan, output: &OutputManager) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        output.json(plan)?;
        return Ok(());
    }

    if plan.already_scaffolded {
        output.warning("Express project structure already exists. Nothing would change.")?;
        return Ok(());
    }

    output.info(&format!("Dry run: would scaffold {}", plan.root.display()))?;
    output.print("")?;
    output.print("Directories to create:")?;
    for dir in &plan.missing_directories {
        output.print(&format!("  {}/", dir.display()))?;
    }
    output.print("Files to create:")?;
    for file in &plan.missing_files {
        output.print(&format!("  {}", file.display()))?;
    }
    output.print("Files to overwrite with starter code:")?;
    for template in &plan.templates {
        output.print(&format!("  {}", template.display()))?;
    }
    output.print("Commands to run:")?;
    for command in &plan.commands {
        output.print(&format!("  {command}"))?;
    }

    Ok(())
}
