//! Export command implementation
//!
//! This module implements the `export` command, which writes one project (or
//! one requirement type) to an Excel workbook or a ReqIF file.

use crate::adapters::source::create_source;
use crate::config::{load_config, ReqportConfig};
use crate::core::export::{ExportCoordinator, ExportOutcome, ExportSummary};
use crate::domain::ReqportError;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::sync::watch;

/// Completed without errors
pub const EXIT_OK: i32 = 0;
/// Completed, but the archive could not be packaged
pub const EXIT_PACKAGING: i32 = 1;
/// Invalid or missing configuration
pub const EXIT_CONFIG: i32 = 2;
/// Stopped by the row limit; the partial output is kept
pub const EXIT_LIMIT: i32 = 3;
/// The requirement source failed
pub const EXIT_SOURCE: i32 = 4;
/// Any other failure
pub const EXIT_FATAL: i32 = 5;
/// Cancelled by a signal
pub const EXIT_CANCELLED: i32 = 130;

const PROGRESS_POLL: Duration = Duration::from_millis(100);

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Override output format (xlsx, reqif or reqifz)
    #[arg(long)]
    pub format: Option<String>,

    /// Override project name
    #[arg(long)]
    pub project: Option<String>,

    /// Override baseline name
    #[arg(long)]
    pub baseline: Option<String>,

    /// Export a single requirement type instead of the whole project
    #[arg(long = "type", value_name = "TYPE")]
    pub requirement_type: Option<String>,

    /// Override output directory
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Override the maximum number of exported requirements
    #[arg(long)]
    pub max_rows: Option<usize>,

    /// Swap source and target of exported relations
    #[arg(long)]
    pub reverse_traces: bool,

    /// Add the Folder/Functional classification attribute
    #[arg(long)]
    pub include_type_attribute: bool,

    /// Keep original image references instead of converting images
    #[arg(long)]
    pub skip_images: bool,

    /// Export descriptions as plain text
    #[arg(long)]
    pub plaintext: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("{e}");
                return Ok(EXIT_CONFIG);
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG);
        }

        let source = match create_source(&config.source).await {
            Ok(source) => source,
            Err(e) => {
                tracing::error!(error = %e, "Failed to open requirement source");
                eprintln!("Failed to open requirement source: {e}");
                return Ok(exit_code_for_error(&e));
            }
        };

        let coordinator = ExportCoordinator::new(config, source, shutdown_signal);
        let bar = self.progress_bar();
        let progress = coordinator.progress();

        let export = coordinator.execute_export();
        tokio::pin!(export);
        let mut ticker = tokio::time::interval(PROGRESS_POLL);
        let result = loop {
            tokio::select! {
                result = &mut export => break result,
                _ = ticker.tick() => bar.set_position(u64::from(progress.get())),
            }
        };
        bar.set_position(u64::from(progress.get()));
        bar.finish_and_clear();

        let summary = match result {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(exit_code_for_error(&e));
            }
        };

        print_summary(&summary);
        Ok(exit_code_for_summary(&summary))
    }

    fn apply_overrides(&self, config: &mut ReqportConfig) {
        let export = &mut config.export;
        if let Some(format) = &self.format {
            tracing::info!(format = %format, "Overriding output format from CLI");
            export.format = format.clone();
        }
        if let Some(project) = &self.project {
            export.project = project.clone();
        }
        if let Some(baseline) = &self.baseline {
            export.baseline = baseline.clone();
        }
        if let Some(requirement_type) = &self.requirement_type {
            export.requirement_type = Some(requirement_type.clone());
        }
        if let Some(output_dir) = &self.output_dir {
            export.output_dir = output_dir.clone();
        }
        if let Some(max_rows) = self.max_rows {
            export.max_row_count = max_rows;
        }
        export.reverse_traces |= self.reverse_traces;
        export.include_type_attribute |= self.include_type_attribute;
        export.skip_images |= self.skip_images;
        export.plaintext |= self.plaintext;
    }

    fn progress_bar(&self) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(100);
        if let Ok(style) =
            ProgressStyle::with_template("  {spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }
        bar.set_message("exporting");
        bar.enable_steady_tick(PROGRESS_POLL);
        bar
    }
}

/// Exit code for an error that ended the command
pub fn exit_code_for_error(error: &ReqportError) -> i32 {
    match error {
        ReqportError::Configuration(_) | ReqportError::Validation(_) => EXIT_CONFIG,
        ReqportError::Source(_) => EXIT_SOURCE,
        ReqportError::LimitReached { .. } => EXIT_LIMIT,
        ReqportError::Cancelled => EXIT_CANCELLED,
        ReqportError::Packaging(_) => EXIT_PACKAGING,
        _ => EXIT_FATAL,
    }
}

/// Exit code for a run that produced a summary
pub fn exit_code_for_summary(summary: &ExportSummary) -> i32 {
    match summary.outcome {
        ExportOutcome::Cancelled => EXIT_CANCELLED,
        ExportOutcome::LimitReached => EXIT_LIMIT,
        ExportOutcome::Completed if summary.errors.is_empty() => EXIT_OK,
        ExportOutcome::Completed => EXIT_PACKAGING,
    }
}

fn print_summary(summary: &ExportSummary) {
    println!();
    println!("Export Summary:");
    println!("  Outcome: {}", summary.outcome);
    println!("  Requirement types: {}", summary.types);
    println!("  Requirements exported: {}", summary.exported);
    println!("  Skipped traces: {}", summary.skipped_traces);
    println!("  Dropped images: {}", summary.dropped_images);
    if let Some(path) = &summary.output_path {
        println!("  Output: {}", path.display());
    }
    if let Some(path) = &summary.archive_path {
        println!("  Archive: {}", path.display());
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());

    if !summary.errors.is_empty() {
        println!();
        println!("Errors encountered:");
        for error in &summary.errors {
            println!("  - {:?}: {}", error.error_type, error.message);
            if let Some(context) = &error.context {
                println!("    Context: {context}");
            }
        }
    }

    match summary.outcome {
        ExportOutcome::Completed if summary.errors.is_empty() => {
            println!("Export completed successfully.")
        }
        ExportOutcome::Completed => println!("Export completed with errors."),
        ExportOutcome::LimitReached => {
            println!("Export limit reached, the partial output was kept.")
        }
        ExportOutcome::Cancelled => println!("Export cancelled."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::export::{ExportError, ExportErrorType};
    use crate::domain::SourceError;
    use test_case::test_case;

    #[test_case(ReqportError::Configuration("x".into()), EXIT_CONFIG ; "configuration")]
    #[test_case(ReqportError::Source(SourceError::ProjectNotFound("x".into())), EXIT_SOURCE ; "source")]
    #[test_case(ReqportError::LimitReached { limit: 1 }, EXIT_LIMIT ; "limit")]
    #[test_case(ReqportError::Cancelled, EXIT_CANCELLED ; "cancelled")]
    #[test_case(ReqportError::Packaging("x".into()), EXIT_PACKAGING ; "packaging")]
    #[test_case(ReqportError::Format("x".into()), EXIT_FATAL ; "format")]
    fn test_exit_code_for_error(error: ReqportError, expected: i32) {
        assert_eq!(exit_code_for_error(&error), expected);
    }

    #[test]
    fn test_exit_code_for_summary() {
        let mut summary = ExportSummary::new();
        assert_eq!(exit_code_for_summary(&summary), EXIT_OK);

        summary.add_error(ExportError::new(
            ExportErrorType::Packaging,
            "zip".to_string(),
        ));
        assert_eq!(exit_code_for_summary(&summary), EXIT_PACKAGING);

        summary.outcome = ExportOutcome::LimitReached;
        assert_eq!(exit_code_for_summary(&summary), EXIT_LIMIT);

        summary.outcome = ExportOutcome::Cancelled;
        assert_eq!(exit_code_for_summary(&summary), EXIT_CANCELLED);
    }

    #[test]
    fn test_export_args_defaults() {
        let args = ExportArgs::default();
        assert!(args.format.is_none());
        assert!(args.requirement_type.is_none());
        assert!(!args.quiet);
    }
}
