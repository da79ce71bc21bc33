//! Trace context propagation subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming carrier (HTTP headers, message attributes)
//!     → extractor.rs (Getter reads header values)
//!     → composite.rs (tries each extractor in order)
//!         → cloud_trace.rs  (X-Cloud-Trace-Context)
//!         → b3.rs           (X-B3-*, b3)
//!         → trace_parent.rs (traceparent)
//!     → context.rs (TraceContextOrSamplingFlags)
//! ```
//!
//! # Design Decisions
//! - Extractors are immutable and shared via Arc
//! - First non-empty result wins; an extractor error ends the chain
//! - Absent or unparseable headers yield an empty result, so the next
//!   format still gets a chance; only an `Err` stops the chain
//! - stackdriver.rs maps configured styles onto a composite chain

pub mod b3;
pub mod cloud_trace;
pub mod composite;
pub mod context;
pub mod extractor;
pub mod stackdriver;
pub mod trace_parent;

pub use b3::B3Extractor;
pub use cloud_trace::CloudTraceExtractor;
pub use composite::CompositeExtractor;
pub use context::{SamplingFlags, TraceContext, TraceContextOrSamplingFlags};
pub use extractor::{Extractor, Getter, PropagationError};
pub use stackdriver::{extractor_for_styles, stackdriver_extractor, PropagationStyle};
pub use trace_parent::TraceParentExtractor;
