//! Stackdriver storage settings.
//!
//! Bound from the `storage.stackdriver` key space. Serializable so the
//! settings can be shipped to worker processes unchanged.

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::loader::ConfigError;

/// Default Cloud Trace API endpoint.
pub const DEFAULT_API_HOST: &str = "cloudtrace.googleapis.com:443";

/// Settings for the Stackdriver storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StackdriverStorageConfig {
    project_id: Option<String>,

    /// Never holds an empty string; empty input is stored as `None`.
    #[serde(deserialize_with = "empty_as_none")]
    api_host: Option<String>,
}

impl Default for StackdriverStorageConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            api_host: Some(DEFAULT_API_HOST.to_string()),
        }
    }
}

impl StackdriverStorageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn set_project_id(&mut self, project_id: impl Into<String>) {
        self.project_id = Some(project_id.into());
    }

    pub fn api_host(&self) -> Option<&str> {
        self.api_host.as_deref()
    }

    /// Stores the host; an empty string unsets it.
    pub fn set_api_host(&mut self, api_host: impl Into<String>) {
        let api_host = api_host.into();
        self.api_host = if api_host.is_empty() {
            None
        } else {
            Some(api_host)
        };
    }

    /// Binds a single `storage.stackdriver.*` property by its relaxed name.
    pub fn bind_property(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match normalize_key(key).as_str() {
            "projectid" => self.set_project_id(value),
            "apihost" => self.set_api_host(value),
            _ => return Err(ConfigError::UnknownProperty(key.to_string())),
        }
        Ok(())
    }
}

/// `project-id`, `project_id` and `projectId` all bind to the same field.
fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '-' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty()))
}
