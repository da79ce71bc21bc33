//! Shared utilities for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::http::HeaderMap;
use stackdriver_trace::propagation::{
    Extractor, PropagationError, TraceContext, TraceContextOrSamplingFlags,
};

/// Call log shared between scripted extractors.
pub type CallLog = Arc<Mutex<Vec<&'static str>>>;

/// An extractor that returns a fixed outcome and records each invocation.
pub struct ScriptedExtractor {
    pub name: &'static str,
    pub outcome: Result<TraceContextOrSamplingFlags, PropagationError>,
    pub log: CallLog,
    pub calls: AtomicUsize,
}

impl ScriptedExtractor {
    pub fn new(
        name: &'static str,
        outcome: Result<TraceContextOrSamplingFlags, PropagationError>,
        log: &CallLog,
    ) -> Arc<Self> {
        Arc::new(Self {
            name,
            outcome,
            log: log.clone(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Extractor<HeaderMap> for ScriptedExtractor {
    fn extract(&self, _carrier: &HeaderMap) -> Result<TraceContextOrSamplingFlags, PropagationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(self.name);
        self.outcome.clone()
    }
}

#[allow(dead_code)]
pub fn context(trace_id: u64, span_id: u64) -> TraceContextOrSamplingFlags {
    TraceContext {
        trace_id_high: 0,
        trace_id,
        parent_id: None,
        span_id,
        sampled: Some(true),
        debug: false,
    }
    .into()
}

/// Upcast for building extractor lists.
#[allow(dead_code)]
pub fn erased(extractor: &Arc<ScriptedExtractor>) -> Arc<dyn Extractor<HeaderMap>> {
    extractor.clone()
}
