//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Require the settings the storage backend cannot run without
//! - Validate value formats (log level, bind address)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs after environment overrides, before config is handed out

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("storage.stackdriver.project-id must be set")]
    MissingProjectId,

    #[error("storage.stackdriver.api-host must not be blank")]
    BlankApiHost,

    #[error("propagation.extract must list at least one style")]
    NoExtractStyles,

    #[error("invalid log level {0:?}")]
    InvalidLogLevel(String),

    #[error("invalid bind address {0:?}")]
    InvalidBindAddress(String),
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let stackdriver = &config.storage.stackdriver;
    match stackdriver.project_id() {
        Some(project_id) if !project_id.trim().is_empty() => {}
        _ => errors.push(ValidationError::MissingProjectId),
    }
    // An unset host is allowed; the client falls back to its own default.
    if let Some(host) = stackdriver.api_host() {
        if host.trim().is_empty() {
            errors.push(ValidationError::BlankApiHost);
        }
    }

    if config.propagation.extract.is_empty() {
        errors.push(ValidationError::NoExtractStyles);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
