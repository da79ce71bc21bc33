//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides, property binding)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is populated once at startup and read-only afterwards
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Empty strings for the Stackdriver API host mean "unset"

pub mod loader;
pub mod schema;
pub mod storage;
pub mod validation;

pub use loader::{load_config, load_config_str, ConfigError};
pub use schema::{AppConfig, ListenerConfig, LogFormat, ObservabilityConfig, PropagationConfig};
pub use storage::StackdriverStorageConfig;
pub use validation::ValidationError;
