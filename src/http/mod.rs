//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup)
//!     → observability::tracing (extract trace context into extensions)
//!     → handler (echo context as JSON)
//!     → Send to client
//! ```

pub mod server;

pub use server::{context_json, HttpServer};
