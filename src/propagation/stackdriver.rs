//! Stackdriver propagation: builds extractor chains from configured styles.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::propagation::b3::B3Extractor;
use crate::propagation::cloud_trace::CloudTraceExtractor;
use crate::propagation::composite::CompositeExtractor;
use crate::propagation::extractor::{Extractor, Getter, PropagationError};
use crate::propagation::trace_parent::TraceParentExtractor;

/// A header format the extractor chain can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropagationStyle {
    /// `X-Cloud-Trace-Context`
    CloudTrace,
    /// `X-B3-*` and `b3`
    B3,
    /// W3C `traceparent`
    TraceParent,
}

impl PropagationStyle {
    /// Default order: Google's header first, B3 as the fallback.
    pub const STACKDRIVER: [PropagationStyle; 2] =
        [PropagationStyle::CloudTrace, PropagationStyle::B3];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropagationStyle::CloudTrace => "cloud-trace",
            PropagationStyle::B3 => "b3",
            PropagationStyle::TraceParent => "trace-parent",
        }
    }

    fn extractor<C: Getter + ?Sized>(&self) -> Arc<dyn Extractor<C>> {
        match self {
            PropagationStyle::CloudTrace => Arc::new(CloudTraceExtractor::new()),
            PropagationStyle::B3 => Arc::new(B3Extractor::new()),
            PropagationStyle::TraceParent => Arc::new(TraceParentExtractor::new()),
        }
    }
}

impl fmt::Display for PropagationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropagationStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cloud-trace" | "x-cloud-trace-context" | "stackdriver" => Ok(PropagationStyle::CloudTrace),
            "b3" => Ok(PropagationStyle::B3),
            "trace-parent" | "traceparent" | "w3c" => Ok(PropagationStyle::TraceParent),
            other => Err(format!("unknown propagation style: {}", other)),
        }
    }
}

/// Extractor chain trying the given styles in order.
pub fn extractor_for_styles<C: Getter + ?Sized>(
    styles: &[PropagationStyle],
) -> Result<CompositeExtractor<C>, PropagationError> {
    if styles.is_empty() {
        return Err(PropagationError::InvalidArgument(
            "at least one propagation style is required",
        ));
    }
    let extractors: Vec<Arc<dyn Extractor<C>>> = styles.iter().map(|s| s.extractor()).collect();
    tracing::debug!(
        styles = ?styles.iter().map(PropagationStyle::as_str).collect::<Vec<_>>(),
        "Extractor chain built"
    );
    CompositeExtractor::new(&extractors)
}

/// `X-Cloud-Trace-Context` with B3 fallback.
pub fn stackdriver_extractor<C: Getter + ?Sized>() -> CompositeExtractor<C> {
    CompositeExtractor::from_non_empty(
        PropagationStyle::STACKDRIVER
            .iter()
            .map(|s| s.extractor())
            .collect(),
    )
}
