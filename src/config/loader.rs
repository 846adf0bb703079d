//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ReqportConfig;
use crate::domain::errors::ReqportError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ReqportConfig
/// 4. Applies environment variable overrides (REQPORT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns a configuration error if the file is missing or unreadable, a
/// referenced variable is unset, parsing fails or validation fails.
///
/// # Examples
///
/// ```no_run
/// use reqport::config::loader::load_config;
///
/// let config = load_config("reqport.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ReqportConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ReqportError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ReqportError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: ReqportConfig = toml::from_str(&contents)
        .map_err(|e| ReqportError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        ReqportError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ReqportError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(ReqportError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides using the REQPORT_* prefix
///
/// Variables follow the pattern `REQPORT_<SECTION>_<KEY>`, for example
/// `REQPORT_EXPORT_FORMAT` or `REQPORT_SOURCE_PATH`. Unparseable numeric or
/// boolean values are ignored.
fn apply_env_overrides(config: &mut ReqportConfig) {
    if let Ok(val) = std::env::var("REQPORT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Source overrides
    if let Ok(val) = std::env::var("REQPORT_SOURCE_PATH") {
        config.source.path = val;
    }
    if let Ok(val) = std::env::var("REQPORT_SOURCE_IMAGES_DIR") {
        config.source.images_dir = Some(val);
    }
    if let Ok(val) = std::env::var("REQPORT_SOURCE_REPOSITORY_ID") {
        config.source.repository_id = Some(val);
    }

    // Export overrides
    if let Ok(val) = std::env::var("REQPORT_EXPORT_FORMAT") {
        config.export.format = val;
    }
    if let Ok(val) = std::env::var("REQPORT_EXPORT_PROJECT") {
        config.export.project = val;
    }
    if let Ok(val) = std::env::var("REQPORT_EXPORT_BASELINE") {
        config.export.baseline = val;
    }
    if let Ok(val) = std::env::var("REQPORT_EXPORT_REQUIREMENT_TYPE") {
        config.export.requirement_type = Some(val);
    }
    if let Ok(val) = std::env::var("REQPORT_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Ok(val) = std::env::var("REQPORT_EXPORT_MAX_ROW_COUNT") {
        if let Ok(limit) = val.parse() {
            config.export.max_row_count = limit;
        }
    }
    override_bool("REQPORT_EXPORT_REVERSE_TRACES", &mut config.export.reverse_traces);
    override_bool(
        "REQPORT_EXPORT_INCLUDE_TYPE_ATTRIBUTE",
        &mut config.export.include_type_attribute,
    );
    override_bool("REQPORT_EXPORT_SKIP_IMAGES", &mut config.export.skip_images);
    override_bool("REQPORT_EXPORT_PLAINTEXT", &mut config.export.plaintext);

    // Logging overrides
    override_bool("REQPORT_LOGGING_LOCAL_ENABLED", &mut config.logging.local_enabled);
    if let Ok(val) = std::env::var("REQPORT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("REQPORT_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
}

fn override_bool(var: &str, target: &mut bool) {
    if let Ok(val) = std::env::var(var) {
        if let Ok(parsed) = val.parse() {
            *target = parsed;
        }
    }
}
