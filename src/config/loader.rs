//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{StoreBackend, TombolaConfig};
use crate::domain::errors::TombolaError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into TombolaConfig
/// 4. Applies environment variable overrides (TOMBOLA_* prefix)
/// 5. Validates the configuration
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use tombola::config::loader::load_config;
///
/// let config = load_config("tombola.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<TombolaConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(TombolaError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        TombolaError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: TombolaConfig = toml::from_str(&contents)
        .map_err(|e| TombolaError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        TombolaError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(TombolaError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using TOMBOLA_* prefix
///
/// Environment variables follow the pattern: TOMBOLA_<SECTION>_<KEY>
/// For example: TOMBOLA_STORE_BACKEND, TOMBOLA_EXPORT_OUTPUT_DIR
fn apply_env_overrides(config: &mut TombolaConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("TOMBOLA_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Store overrides
    if let Ok(val) = std::env::var("TOMBOLA_STORE_BACKEND") {
        config.store.backend = match val.as_str() {
            "memory" => StoreBackend::Memory,
            "postgresql" => StoreBackend::PostgreSQL,
            other => {
                return Err(TombolaError::Configuration(format!(
                    "Invalid TOMBOLA_STORE_BACKEND '{}'. Must be 'memory' or 'postgresql'",
                    other
                )))
            }
        };
    }

    // PostgreSQL overrides (only if PostgreSQL is configured)
    if let Some(ref mut pg_config) = config.postgresql {
        if let Ok(val) = std::env::var("TOMBOLA_POSTGRESQL_CONNECTION_STRING") {
            pg_config.connection_string = val;
        }
        if let Ok(val) = std::env::var("TOMBOLA_POSTGRESQL_MAX_CONNECTIONS") {
            if let Ok(parsed) = val.parse() {
                pg_config.max_connections = parsed;
            }
        }
        if let Ok(val) = std::env::var("TOMBOLA_POSTGRESQL_MAX_RETRIES") {
            if let Ok(parsed) = val.parse() {
                pg_config.max_retries = parsed;
            }
        }
    }

    // Generation overrides
    if let Ok(val) = std::env::var("TOMBOLA_GENERATION_TARGET_SHEETS") {
        if let Ok(parsed) = val.parse() {
            config.generation.target_sheets = parsed;
        }
    }

    // Export overrides
    if let Ok(val) = std::env::var("TOMBOLA_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Ok(val) = std::env::var("TOMBOLA_EXPORT_RETENTION_HOURS") {
        if let Ok(parsed) = val.parse() {
            config.export.retention_hours = parsed;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("TOMBOLA_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("TOMBOLA_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
