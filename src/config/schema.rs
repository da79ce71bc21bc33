//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Keys are kebab-case, matching the property names used for binding.

use serde::{Deserialize, Serialize};

use crate::config::storage::StackdriverStorageConfig;
use crate::propagation::PropagationStyle;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct AppConfig {
    /// Storage backends (`storage.*`).
    pub storage: StorageConfig,

    /// Trace context extraction settings.
    pub propagation: PropagationConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,

    /// Diagnostic HTTP listener.
    pub listener: ListenerConfig,
}

/// Storage backend settings, keyed by backend name.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct StorageConfig {
    pub stackdriver: StackdriverStorageConfig,
}

/// Propagation configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct PropagationConfig {
    /// Header formats to try, in order.
    pub extract: Vec<PropagationStyle>,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            extract: PropagationStyle::STACKDRIVER.to_vec(),
        }
    }
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}
