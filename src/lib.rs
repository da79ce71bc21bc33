//! Stackdriver trace propagation and storage configuration.
//!
//! - [`propagation`]: extract trace contexts from carriers, trying several
//!   header formats in order
//! - [`config`]: Stackdriver storage settings and their binding from
//!   TOML, environment and properties

pub mod config;
pub mod http;
pub mod observability;
pub mod propagation;

pub use config::{AppConfig, StackdriverStorageConfig};
pub use http::HttpServer;
pub use propagation::{CompositeExtractor, Extractor, TraceContextOrSamplingFlags};
