//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variables bound onto `storage.stackdriver.*`.
pub const ENV_PROJECT_ID: &str = "STORAGE_STACKDRIVER_PROJECT_ID";
pub const ENV_API_HOST: &str = "STORAGE_STACKDRIVER_API_HOST";
pub const ENV_LOG_LEVEL: &str = "STACKDRIVER_TRACE_LOG_LEVEL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file, then apply
/// environment overrides.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), "Configuration file read");
    load_config_str(&content, |name| std::env::var(name).ok())
}

/// Parse, override and validate configuration from TOML text.
///
/// `env` looks up environment variables; tests pass a closure over a map.
pub fn load_config_str<F>(content: &str, env: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config: AppConfig = toml::from_str(content)?;
    apply_env_overrides(&mut config, env)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Applies environment overrides on top of file values.
pub fn apply_env_overrides<F>(config: &mut AppConfig, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let bindings = [("project-id", ENV_PROJECT_ID), ("api-host", ENV_API_HOST)];
    for (property, variable) in bindings {
        if let Some(value) = env(variable) {
            tracing::debug!(variable, "Environment override applied");
            config.storage.stackdriver.bind_property(property, &value)?;
        }
    }

    if let Some(level) = env(ENV_LOG_LEVEL) {
        config.observability.log_level = level;
    }

    Ok(())
}

/// Binds a dotted property such as `storage.stackdriver.api-host`.
pub fn bind_property(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key.split_once('.') {
        Some(("storage", rest)) => match rest.split_once('.') {
            Some(("stackdriver", property)) => {
                config.storage.stackdriver.bind_property(property, value)
            }
            _ => Err(ConfigError::UnknownProperty(key.to_string())),
        },
        _ => Err(ConfigError::UnknownProperty(key.to_string())),
    }
}
