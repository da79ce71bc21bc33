//! B3 extraction (Zipkin headers).
//!
//! Multi-header form is tried first, then the single `b3` header:
//! ```text
//! X-B3-TraceId / X-B3-SpanId / X-B3-ParentSpanId / X-B3-Sampled / X-B3-Flags
//! b3: {trace_id}-{span_id}[-{sampling}[-{parent_span_id}]]
//! b3: {sampling}
//! ```

use crate::propagation::context::{SamplingFlags, TraceContext, TraceContextOrSamplingFlags};
use crate::propagation::extractor::{
    or_empty, parse_hex_u64, parse_trace_id, Extractor, Getter, PropagationError,
};

pub const TRACE_ID: &str = "x-b3-traceid";
pub const SPAN_ID: &str = "x-b3-spanid";
pub const PARENT_SPAN_ID: &str = "x-b3-parentspanid";
pub const SAMPLED: &str = "x-b3-sampled";
pub const FLAGS: &str = "x-b3-flags";
pub const SINGLE: &str = "b3";

/// Reads B3 headers, multi-header first.
///
/// Headers that fail to parse are logged and skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct B3Extractor;

impl B3Extractor {
    pub fn new() -> Self {
        Self
    }
}

impl<C: Getter + ?Sized> Extractor<C> for B3Extractor {
    fn extract(&self, carrier: &C) -> Result<TraceContextOrSamplingFlags, PropagationError> {
        let multi = or_empty(extract_multi(carrier));
        if !multi.is_empty() {
            return Ok(multi);
        }
        Ok(match carrier.get(SINGLE) {
            Some(value) => or_empty(parse_single(value)),
            None => TraceContextOrSamplingFlags::EMPTY,
        })
    }
}

fn extract_multi<C: Getter + ?Sized>(
    carrier: &C,
) -> Result<TraceContextOrSamplingFlags, PropagationError> {
    let debug = carrier.get(FLAGS) == Some("1");
    let sampled = match carrier.get(SAMPLED) {
        Some(value) => parse_sampled(value).ok_or_else(|| {
            PropagationError::malformed(SAMPLED, format!("unexpected value {:?}", value))
        })?,
        None => None,
    };
    let flags = SamplingFlags {
        sampled: if debug { Some(true) } else { sampled },
        debug,
    };

    let Some(trace_hex) = carrier.get(TRACE_ID) else {
        return Ok(TraceContextOrSamplingFlags::from_flags(flags));
    };

    let (trace_id_high, trace_id) = parse_trace_id(trace_hex)
        .filter(|ids| *ids != (0, 0))
        .ok_or_else(|| PropagationError::malformed(TRACE_ID, "expected 16 or 32 hex characters"))?;

    let span_hex = carrier
        .get(SPAN_ID)
        .ok_or_else(|| PropagationError::malformed(SPAN_ID, "missing while trace id is present"))?;
    let span_id = parse_span_id(span_hex).ok_or_else(|| {
        PropagationError::malformed(SPAN_ID, "expected 16 non-zero hex characters")
    })?;

    let parent_id = match carrier.get(PARENT_SPAN_ID) {
        Some(parent_hex) => Some(parse_span_id(parent_hex).ok_or_else(|| {
            PropagationError::malformed(PARENT_SPAN_ID, "expected 16 non-zero hex characters")
        })?),
        None => None,
    };

    Ok(TraceContext {
        trace_id_high,
        trace_id,
        parent_id,
        span_id,
        sampled: flags.sampled,
        debug: flags.debug,
    }
    .into())
}

fn parse_single(value: &str) -> Result<TraceContextOrSamplingFlags, PropagationError> {
    let malformed = |reason: &str| PropagationError::malformed(SINGLE, reason);

    let fields: Vec<&str> = value.split('-').collect();
    if fields.len() == 1 {
        return parse_sampling_state(fields[0])
            .map(TraceContextOrSamplingFlags::from_flags)
            .ok_or_else(|| malformed("unexpected sampling state"));
    }
    if fields.len() > 4 {
        return Err(malformed("too many fields"));
    }

    let (trace_id_high, trace_id) = parse_trace_id(fields[0])
        .filter(|ids| *ids != (0, 0))
        .ok_or_else(|| malformed("invalid trace id"))?;
    let span_id = parse_span_id(fields[1]).ok_or_else(|| malformed("invalid span id"))?;

    let flags = match fields.get(2) {
        Some(state) => parse_sampling_state(state).ok_or_else(|| malformed("unexpected sampling state"))?,
        None => SamplingFlags::EMPTY,
    };

    let parent_id = match fields.get(3) {
        Some(parent) => Some(parse_span_id(parent).ok_or_else(|| malformed("invalid parent span id"))?),
        None => None,
    };

    Ok(TraceContext {
        trace_id_high,
        trace_id,
        parent_id,
        span_id,
        sampled: flags.sampled,
        debug: flags.debug,
    }
    .into())
}

fn parse_span_id(s: &str) -> Option<u64> {
    if s.len() != 16 {
        return None;
    }
    parse_hex_u64(s).filter(|id| *id != 0)
}

fn parse_sampled(value: &str) -> Option<Option<bool>> {
    match value {
        "1" | "true" => Some(Some(true)),
        "0" | "false" => Some(Some(false)),
        _ => None,
    }
}

fn parse_sampling_state(value: &str) -> Option<SamplingFlags> {
    match value {
        "1" => Some(SamplingFlags::SAMPLED),
        "0" => Some(SamplingFlags::NOT_SAMPLED),
        "d" => Some(SamplingFlags::DEBUG),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn carrier(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn extract(entries: &[(&str, &str)]) -> Result<TraceContextOrSamplingFlags, PropagationError> {
        B3Extractor::new().extract(&carrier(entries))
    }

    #[test]
    fn test_multi_header() {
        let result = extract(&[
            ("X-B3-TraceId", "463ac35c9f6413ad48485a3953bb6124"),
            ("X-B3-SpanId", "a2fb4a1d1a96d312"),
            ("X-B3-ParentSpanId", "0020000000000001"),
            ("X-B3-Sampled", "1"),
        ])
        .unwrap();
        let ctx = result.context().unwrap();
        assert_eq!(ctx.trace_id_high, 0x463ac35c9f6413ad);
        assert_eq!(ctx.trace_id, 0x48485a3953bb6124);
        assert_eq!(ctx.span_id, 0xa2fb4a1d1a96d312);
        assert_eq!(ctx.parent_id, Some(0x0020000000000001));
        assert_eq!(ctx.sampled, Some(true));
        assert!(!ctx.debug);
    }

    #[test]
    fn test_debug_flag_implies_sampled() {
        let result = extract(&[
            ("x-b3-traceid", "48485a3953bb6124"),
            ("x-b3-spanid", "a2fb4a1d1a96d312"),
            ("x-b3-flags", "1"),
        ])
        .unwrap();
        let ctx = result.context().unwrap();
        assert_eq!(ctx.trace_id_high, 0);
        assert_eq!(ctx.sampled, Some(true));
        assert!(ctx.debug);
    }

    #[test]
    fn test_sampling_only_headers() {
        assert_eq!(
            extract(&[("x-b3-sampled", "0")]).unwrap(),
            TraceContextOrSamplingFlags::SamplingFlags(SamplingFlags::NOT_SAMPLED)
        );
        assert_eq!(
            extract(&[("b3", "d")]).unwrap(),
            TraceContextOrSamplingFlags::SamplingFlags(SamplingFlags::DEBUG)
        );
    }

    #[test]
    fn test_single_header() {
        let result = extract(&[(
            "b3",
            "80f198ee56343ba864fe8b2a57d3eff7-e457b5a2e4d86bd1-1-05e3ac9a4f6e3b90",
        )])
        .unwrap();
        let ctx = result.context().unwrap();
        assert_eq!(ctx.trace_id_string(), "80f198ee56343ba864fe8b2a57d3eff7");
        assert_eq!(ctx.span_id_string(), "e457b5a2e4d86bd1");
        assert_eq!(ctx.parent_id, Some(0x05e3ac9a4f6e3b90));
        assert_eq!(ctx.sampled, Some(true));
    }

    #[test]
    fn test_single_header_without_sampling() {
        let result = extract(&[("b3", "80f198ee56343ba864fe8b2a57d3eff7-e457b5a2e4d86bd1")]).unwrap();
        assert_eq!(result.context().unwrap().sampled, None);
    }

    #[test]
    fn test_absent_headers_are_empty() {
        assert!(extract(&[("content-type", "text/plain")]).unwrap().is_empty());
    }

    const MALFORMED: [&[(&str, &str)]; 6] = [
        &[("x-b3-traceid", "48485a3953bb6124")],
        &[("x-b3-traceid", "xyz"), ("x-b3-spanid", "a2fb4a1d1a96d312")],
        &[("x-b3-traceid", "48485a3953bb6124"), ("x-b3-spanid", "0000000000000000")],
        &[("x-b3-sampled", "maybe")],
        &[("b3", "48485a3953bb6124")],
        &[("b3", "48485a3953bb6124-a2fb4a1d1a96d312-x")],
    ];

    #[test]
    fn test_malformed_headers_are_rejected_by_parsers() {
        for entries in MALFORMED {
            let carrier = carrier(entries);
            let result = match carrier.get(SINGLE) {
                Some(value) => parse_single(value),
                None => extract_multi(&carrier),
            };
            assert!(
                matches!(result, Err(PropagationError::MalformedHeader { .. })),
                "expected malformed for {:?}",
                entries
            );
        }
    }

    #[test]
    fn test_malformed_headers_extract_as_empty() {
        for entries in MALFORMED {
            assert_eq!(
                extract(entries),
                Ok(TraceContextOrSamplingFlags::EMPTY),
                "expected empty for {:?}",
                entries
            );
        }
    }

    #[test]
    fn test_malformed_multi_falls_back_to_single() {
        let result = extract(&[
            ("x-b3-traceid", "xyz"),
            ("x-b3-spanid", "a2fb4a1d1a96d312"),
            ("b3", "80f198ee56343ba864fe8b2a57d3eff7-e457b5a2e4d86bd1-1"),
        ])
        .unwrap();
        assert_eq!(result.context().unwrap().span_id_string(), "e457b5a2e4d86bd1");
    }

    #[test]
    fn test_multibyte_trace_id_does_not_panic() {
        let entries = [
            ("x-b3-traceid", "aaaaaaaaaaaaaaa\u{e9}bbbbbbbbbbbbbbb"),
            ("x-b3-spanid", "a2fb4a1d1a96d312"),
        ];
        assert!(extract_multi(&carrier(&entries)).is_err());
        assert!(extract(&entries).unwrap().is_empty());
    }
}
