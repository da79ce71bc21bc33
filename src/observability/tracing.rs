//! Distributed tracing support.
//!
//! # Responsibilities
//! - Extract trace context from incoming requests
//! - Make the result available to handlers via request extensions
//! - Create a span per request tagged with the incoming ids
//!
//! # Design Decisions
//! - One extraction per request, using a shared immutable extractor chain
//! - Extraction errors are logged and treated as "no context"

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

use crate::propagation::{CompositeExtractor, TraceContextOrSamplingFlags};

/// Extractor chain shared by all requests.
pub type HeaderExtractor = Arc<CompositeExtractor<HeaderMap>>;

/// Runs the extractor chain and stores the result in request extensions.
pub fn extract_from_headers(
    extractor: &CompositeExtractor<HeaderMap>,
    headers: &HeaderMap,
) -> TraceContextOrSamplingFlags {
    match extractor.extract(headers) {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(error = %e, "Trace context extraction failed");
            TraceContextOrSamplingFlags::EMPTY
        }
    }
}

/// Middleware function for trace context extraction.
pub async fn trace_context_middleware(
    State(extractor): State<HeaderExtractor>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let extracted = extract_from_headers(&extractor, request.headers());

    let span = match extracted.context() {
        Some(ctx) => tracing::info_span!(
            "request",
            trace_id = %ctx.trace_id_string(),
            span_id = %ctx.span_id_string(),
            sampled = ?ctx.sampled,
        ),
        None => tracing::info_span!("request", sampled = ?extracted.sampled()),
    };

    request.extensions_mut().insert(extracted);
    next.run(request).instrument(span).await
}
