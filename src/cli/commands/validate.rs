//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Reqport configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        // load_config validates as well
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Source: {} ({})", config.source.kind, config.source.path);
        println!("  Format: {}", config.export.format);
        println!("  Project: {}", config.export.project);
        println!("  Baseline: {}", config.export.baseline);
        println!(
            "  Requirement Type: {}",
            config
                .export
                .requirement_type
                .as_deref()
                .unwrap_or("(all types)")
        );
        println!("  Output Directory: {}", config.export.output_dir);
        println!("  Max Rows: {}", config.export.max_row_count);
        println!();
        Ok(0)
    }
}
