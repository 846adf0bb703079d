//! Configuration management for Reqport.
//!
//! Reqport reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `REQPORT_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [source]
//! kind = "snapshot"
//! path = "${REQPORT_SNAPSHOT}"
//!
//! [export]
//! format = "reqifz"
//! project = "Demo"
//! baseline = "Current"
//! requirement_type = "Feature"
//! output_dir = "./exports"
//! max_row_count = 10000
//!
//! [logging]
//! local_enabled = true
//! local_path = "./logs"
//! ```
//!
//! # Loading
//!
//! ```rust,no_run
//! use reqport::config::load_config;
//!
//! # fn example() {
//! match load_config("reqport.toml") {
//!     Ok(config) => println!("Exporting project {}", config.export.project),
//!     Err(e) => eprintln!("Configuration error: {}", e),
//! }
//! # }
//! ```

pub mod loader;
pub mod schema;

pub use loader::load_config;
pub use schema::{ApplicationConfig, ExportConfig, LoggingConfig, ReqportConfig, SourceConfig};
