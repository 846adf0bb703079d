//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "reqport.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::sample_config()) {
            Ok(_) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Point [source] path at your requirement snapshot");
                println!("  2. Set [export] project (and requirement_type for a single type)");
                println!("  3. Validate configuration: reqport validate-config");
                println!("  4. Run export: reqport export");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Sample configuration with every recognized setting
    pub fn sample_config() -> &'static str {
        r#"# Reqport Configuration File
# Requirements export to ReqIF and Excel

[application]
log_level = "info"

[source]
kind = "snapshot"
path = "requirements.json"
# images_dir = "./images"
# repository_id = "rm.example.com"

[export]
# xlsx | reqif | reqifz
format = "reqif"
project = "Demo"
baseline = "Current"
# Export a single type; omit to export every type of the project
# requirement_type = "Feature"
output_dir = "./exports"
max_row_count = 10000
reverse_traces = false
include_type_attribute = false
skip_images = false
plaintext = false

[logging]
local_enabled = false
local_path = "./logs"
# daily | hourly | never
local_rotation = "daily"
"#
    }
}
