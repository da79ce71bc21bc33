//! `X-Cloud-Trace-Context` extraction.
//!
//! # Format
//! ```text
//! X-Cloud-Trace-Context: TRACE_ID[/SPAN_ID][;o=OPTIONS]
//! ```
//! - `TRACE_ID`: 32 hex characters
//! - `SPAN_ID`: unsigned decimal
//! - `OPTIONS`: `1` traced, `0` not traced

use crate::propagation::context::{SamplingFlags, TraceContext, TraceContextOrSamplingFlags};
use crate::propagation::extractor::{or_empty, parse_hex_u64, Extractor, Getter, PropagationError};

pub const X_CLOUD_TRACE_CONTEXT: &str = "x-cloud-trace-context";

/// Reads Google Cloud's trace header.
///
/// An unparseable header is logged and treated as absent, so a chain can
/// still fall back to another format.
#[derive(Debug, Clone, Copy, Default)]
pub struct CloudTraceExtractor;

impl CloudTraceExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl<C: Getter + ?Sized> Extractor<C> for CloudTraceExtractor {
    fn extract(&self, carrier: &C) -> Result<TraceContextOrSamplingFlags, PropagationError> {
        match carrier.get(X_CLOUD_TRACE_CONTEXT) {
            Some(value) => Ok(or_empty(parse(value))),
            None => Ok(TraceContextOrSamplingFlags::EMPTY),
        }
    }
}

fn parse(value: &str) -> Result<TraceContextOrSamplingFlags, PropagationError> {
    let malformed = |reason: &str| PropagationError::malformed(X_CLOUD_TRACE_CONTEXT, reason);

    let (trace_part, rest) = match value.split_once('/') {
        Some((trace, rest)) => (trace, Some(rest)),
        None => (value, None),
    };

    // Options may directly follow the trace id when the span id is omitted.
    let (trace_hex, trailing_options) = match trace_part.split_once(';') {
        Some((trace, options)) => (trace, Some(options)),
        None => (trace_part, None),
    };

    if trace_hex.len() != 32 || !trace_hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(malformed("trace id must be 32 hex characters"));
    }
    let trace_id_high = parse_hex_u64(&trace_hex[..16]).ok_or_else(|| malformed("trace id is not hex"))?;
    let trace_id = parse_hex_u64(&trace_hex[16..]).ok_or_else(|| malformed("trace id is not hex"))?;
    if trace_id_high == 0 && trace_id == 0 {
        return Err(malformed("trace id is zero"));
    }

    let (span_part, options) = match rest {
        Some(rest) => match rest.split_once(';') {
            Some((span, options)) => (span, Some(options)),
            None => (rest, None),
        },
        None => ("", trailing_options),
    };

    let sampled = options.and_then(parse_trace_option);

    if span_part.is_empty() {
        return Ok(TraceContextOrSamplingFlags::from_flags(SamplingFlags {
            sampled,
            debug: false,
        }));
    }

    if !span_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed("span id is not an unsigned decimal"));
    }
    let span_id: u64 = span_part
        .parse()
        .map_err(|_| malformed("span id is out of range"))?;
    if span_id == 0 {
        return Err(malformed("span id is zero"));
    }

    Ok(TraceContext {
        trace_id_high,
        trace_id,
        parent_id: None,
        span_id,
        sampled,
        debug: false,
    }
    .into())
}

/// Reads the `o=` entry out of `;`-separated options.
fn parse_trace_option(options: &str) -> Option<bool> {
    let option = options
        .split(';')
        .find_map(|entry| entry.trim().strip_prefix("o="))?;
    match option {
        "1" => Some(true),
        "0" => Some(false),
        _ => None,
    }
}
