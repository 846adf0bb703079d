//! Core business logic for Reqport.
//!
//! # Modules
//!
//! - [`export`] - Export orchestration, phase pipeline and per-run context
//! - [`transform`] - Attribute values, rich text and images
//! - [`walk`] - Depth-first traversal shared by every phase
//!
//! # Export Workflow
//!
//! 1. **Resolve**: project, baseline and requirement types from the source
//! 2. **Open**: create the destination file
//! 3. **Definitions**: data types and spec types, or sheets
//! 4. **Requirements**: one record per requirement, counted against the limit
//! 5. **Traces**: relations between exported requirements
//! 6. **Specifications**: ordered hierarchies
//! 7. **Close**: flush the destination, then bundle the archive if requested
//!
//! # Example
//!
//! ```rust,no_run
//! use reqport::adapters::source::create_source;
//! use reqport::config::load_config;
//! use reqport::core::export::ExportCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("reqport.toml")?;
//! let source = create_source(&config.source).await?;
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let coordinator = ExportCoordinator::new(config, source, shutdown_rx);
//!
//! let summary = coordinator.execute_export().await?;
//! println!("Exported {} requirements", summary.exported);
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod transform;
pub mod walk;
