//! W3C Trace Context `traceparent` extraction.

use crate::propagation::context::{TraceContext, TraceContextOrSamplingFlags};
use crate::propagation::extractor::{or_empty, parse_hex_u64, Extractor, Getter, PropagationError};

pub const TRACEPARENT: &str = "traceparent";

const SAMPLED_FLAG: u8 = 0x01;

#[derive(Debug, Clone, Copy, Default)]
pub struct TraceParentExtractor;

impl TraceParentExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl<C: Getter + ?Sized> Extractor<C> for TraceParentExtractor {
    fn extract(&self, carrier: &C) -> Result<TraceContextOrSamplingFlags, PropagationError> {
        match carrier.get(TRACEPARENT) {
            Some(value) => Ok(or_empty(parse(value.trim()))),
            None => Ok(TraceContextOrSamplingFlags::EMPTY),
        }
    }
}

fn parse(value: &str) -> Result<TraceContextOrSamplingFlags, PropagationError> {
    let malformed = |reason: &str| PropagationError::malformed(TRACEPARENT, reason);

    let fields: Vec<&str> = value.split('-').collect();
    let [version, trace_hex, span_hex, flags_hex, ..] = fields.as_slice() else {
        return Err(malformed("expected version-traceid-parentid-flags"));
    };

    if version.len() != 2 || !is_lower_hex(version) || *version == "ff" {
        return Err(malformed("invalid version"));
    }
    // Version 00 has exactly four fields; later versions may append more.
    if *version == "00" && fields.len() != 4 {
        return Err(malformed("unexpected trailing fields"));
    }

    if trace_hex.len() != 32 || !is_lower_hex(trace_hex) {
        return Err(malformed("trace id must be 32 lower-hex characters"));
    }
    let trace_id_high = parse_hex_u64(&trace_hex[..16]).ok_or_else(|| malformed("invalid trace id"))?;
    let trace_id = parse_hex_u64(&trace_hex[16..]).ok_or_else(|| malformed("invalid trace id"))?;
    if trace_id_high == 0 && trace_id == 0 {
        return Err(malformed("trace id is zero"));
    }

    if span_hex.len() != 16 || !is_lower_hex(span_hex) {
        return Err(malformed("parent id must be 16 lower-hex characters"));
    }
    let span_id = parse_hex_u64(span_hex)
        .filter(|id| *id != 0)
        .ok_or_else(|| malformed("parent id is zero"))?;

    if flags_hex.len() != 2 || !is_lower_hex(flags_hex) {
        return Err(malformed("invalid trace flags"));
    }
    let flags = u8::from_str_radix(flags_hex, 16).map_err(|_| malformed("invalid trace flags"))?;

    Ok(TraceContext {
        trace_id_high,
        trace_id,
        parent_id: None,
        span_id,
        sampled: Some(flags & SAMPLED_FLAG != 0),
        debug: false,
    }
    .into())
}

fn is_lower_hex(s: &str) -> bool {
    s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
