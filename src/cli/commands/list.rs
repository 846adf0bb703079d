//! List command implementation
//!
//! Prints the projects, baselines and requirement types the configured
//! source offers, so export settings can be filled in.

use crate::adapters::source::{create_source, RequirementSource};
use crate::cli::commands::export::{exit_code_for_error, EXIT_CONFIG};
use crate::config::load_config;
use crate::domain::Result;
use clap::Args;

/// Arguments for the list command
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Only show this project
    #[arg(long)]
    pub project: Option<String>,
}

impl ListArgs {
    /// Execute the list command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let source = match create_source(&config.source).await {
            Ok(source) => source,
            Err(e) => {
                eprintln!("Failed to open requirement source: {e}");
                return Ok(exit_code_for_error(&e));
            }
        };

        match self.render(source.as_ref()).await {
            Ok(text) => {
                print!("{text}");
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to list source contents");
                eprintln!("Failed to list source contents: {e}");
                Ok(exit_code_for_error(&e))
            }
        }
    }

    /// Builds the listing as an indented outline
    pub async fn render(&self, source: &dyn RequirementSource) -> Result<String> {
        let info = source.info();
        let mut out = format!("Repository: {} ({})\n", info.repository_id, info.tool);

        let projects = match &self.project {
            Some(name) => vec![source.project(name).await?],
            None => source.list_projects().await?,
        };

        for project in &projects {
            out.push_str(&format!("Project: {project}\n"));
            for baseline in source.list_baselines(project).await? {
                out.push_str(&format!("  Baseline: {baseline}\n"));
                for ty in source.list_requirement_types(project, &baseline).await? {
                    out.push_str(&format!(
                        "    {} [{}] ({} attributes)\n",
                        ty.name,
                        ty.raw_tag,
                        ty.attributes.len()
                    ));
                }
            }
        }
        Ok(out)
    }
}
