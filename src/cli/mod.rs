//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Reqport using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Reqport - Requirements export to ReqIF and Excel
#[derive(Parser, Debug)]
#[command(name = "reqport")]
#[command(version, about, long_about = None)]
#[command(author = "Reqport Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "reqport.toml", env = "REQPORT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "REQPORT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export requirements to an Excel workbook or a ReqIF file
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// List projects, baselines and requirement types of the source
    List(commands::list::ListArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
