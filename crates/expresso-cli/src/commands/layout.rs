//! `expresso layout`: show the fixed project layout and pipeline.

use serde::Serialize;

use expresso_core::{application::DependencyPipeline, domain::ScaffoldLayout};

use crate::{
    cli::{LayoutArgs, LayoutFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct LayoutDocument<'a> {
    directories: &'a [&'static str],
    placeholders: &'a [&'static str],
    templates: Vec<&'static str>,
    commands: Vec<String>,
}

impl<'a> LayoutDocument<'a> {
    fn new(layout: &'a ScaffoldLayout, pipeline: &DependencyPipeline) -> Self {
        Self {
            directories: layout.directories(),
            placeholders: layout.placeholders(),
            templates: layout.templates().iter().map(|t| t.path).collect(),
            commands: pipeline.commands().iter().map(ToString::to_string).collect(),
        }
    }
}

pub fn execute(args: LayoutArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let layout = ScaffoldLayout::express();
    let pipeline = DependencyPipeline::new(config.package_manager.program);
    let doc = LayoutDocument::new(&layout, &pipeline);

    match args.format {
        LayoutFormat::Json => output.json(&doc)?,
        LayoutFormat::List => {
            for dir in doc.directories {
                output.print(&format!("{dir}/"))?;
            }
            for file in doc.placeholders {
                output.print(file)?;
            }
        }
        LayoutFormat::Table => {
            output.header("Directories")?;
            for dir in doc.directories {
                output.print(&format!("  {dir}/"))?;
            }
            output.print("")?;
            output.header("Files")?;
            for file in doc.placeholders {
                let marker = if doc.templates.contains(file) {
                    "starter code"
                } else {
                    "empty"
                };
                output.print(&format!("  {file:<36} {marker}"))?;
            }
            output.print("")?;
            output.header("Commands")?;
            for command in &doc.commands {
                output.print(&format!("  {command}"))?;
            }
        }
    }

    Ok(())
}
