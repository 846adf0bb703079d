// Reqport - Requirements export to ReqIF and Excel
// Copyright (c) 2025 Reqport Contributors
// Licensed under the MIT License

//! # Reqport - Requirements export to ReqIF and Excel
//!
//! Reqport exports hierarchical requirement sets from a requirements
//! management source into exchange formats: an Excel workbook, a ReqIF XML
//! file, or a `.reqifz` archive bundling the ReqIF file with its images.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Reading** projects, baselines, requirement types and requirement trees
//!   from a read-only source
//! - **Walking** requirement trees depth-first with a shared row limit
//! - **Transforming** typed attribute values and rich-text descriptions
//! - **Writing** workbooks and ReqIF documents phase by phase
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (export pipeline, traversal, transformation)
//! - [`adapters`] - Requirement sources and output writers
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reqport::adapters::source::create_source;
//! use reqport::config::load_config;
//! use reqport::core::export::ExportCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("reqport.toml")?;
//!     let source = create_source(&config.source).await?;
//!
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     let coordinator = ExportCoordinator::new(config, source, shutdown_rx);
//!     let summary = coordinator.execute_export().await?;
//!
//!     println!("Exported {} requirements", summary.exported);
//!     Ok(())
//! }
//! ```
//!
//! ## Export phases
//!
//! Every writer goes through the same phases: open, definitions,
//! requirements, traces, specifications, close. Only the requirements phase
//! counts against the row limit. When the limit is hit the writer closes what
//! it has written so far and the run ends with a limit-reached outcome.
//!
//! ## Error Handling
//!
//! Reqport uses the [`domain::ReqportError`] type for all errors:
//!
//! ```rust,no_run
//! use reqport::domain::ReqportError;
//!
//! fn example() -> Result<(), ReqportError> {
//!     let config = reqport::config::load_config("reqport.toml")?;
//!     println!("{}", config.export.project);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
