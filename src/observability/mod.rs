//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → tracing.rs (request spans carrying the extracted trace context)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Handlers reading TraceContextOrSamplingFlags from request extensions
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Trace context is extracted once per request, at the edge
//! - Malformed trace headers degrade to an empty context, never a 4xx

pub mod logging;
pub mod tracing;
