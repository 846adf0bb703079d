//! Configuration schema types

use crate::adapters::writer::OutputFormat;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Main Reqport configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReqportConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Requirement source
    pub source: SourceConfig,

    /// Export settings
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ReqportConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.source.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Requirement source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Source implementation; only "snapshot" is built in
    #[serde(default = "default_source_kind")]
    pub kind: String,

    /// Path to the snapshot file
    pub path: String,

    /// Directory holding embedded images; defaults to `images` next to the snapshot
    #[serde(default)]
    pub images_dir: Option<String>,

    /// Overrides the repository identifier recorded in exported headers
    #[serde(default)]
    pub repository_id: Option<String>,
}

impl SourceConfig {
    fn validate(&self) -> Result<(), String> {
        if self.kind != "snapshot" {
            return Err(format!(
                "Invalid source.kind '{}'. Must be one of: snapshot",
                self.kind
            ));
        }
        if self.path.trim().is_empty() {
            return Err("source.path cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output format: excel, reqif or reqifz
    #[serde(default = "default_format")]
    pub format: String,

    /// Project to export
    pub project: String,

    /// Baseline name; "Current" is the live baseline
    #[serde(default = "default_baseline")]
    pub baseline: String,

    /// Single requirement type to export; the whole project when absent
    #[serde(default)]
    pub requirement_type: Option<String>,

    /// Directory receiving the export file, images and archive
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Caps the total number of exported requirements
    #[serde(default = "default_max_row_count")]
    pub max_row_count: usize,

    /// Swap relation source and target
    #[serde(default)]
    pub reverse_traces: bool,

    /// Add the synthetic Folder/Functional classification attribute
    #[serde(default)]
    pub include_type_attribute: bool,

    /// Keep original image references instead of converting them
    #[serde(default)]
    pub skip_images: bool,

    /// Strip rich text instead of sanitizing it
    #[serde(default)]
    pub plaintext: bool,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        OutputFormat::from_str(&self.format).map_err(|e| e.to_string())?;

        if self.project.trim().is_empty() {
            return Err("export.project cannot be empty".to_string());
        }
        if self.baseline.trim().is_empty() {
            return Err("export.baseline cannot be empty".to_string());
        }
        if self.max_row_count == 0 {
            return Err("export.max_row_count must be greater than 0".to_string());
        }
        if self.output_dir.trim().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }
        Ok(())
    }

    /// Parsed output format
    pub fn output_format(&self) -> crate::domain::Result<OutputFormat> {
        OutputFormat::from_str(&self.format)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_source_kind() -> String {
    "snapshot".to_string()
}

fn default_format() -> String {
    "reqif".to_string()
}

fn default_baseline() -> String {
    crate::domain::Baseline::CURRENT.to_string()
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_max_row_count() -> usize {
    10_000
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
