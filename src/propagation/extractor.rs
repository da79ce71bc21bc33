//! Extraction capability and carrier access.

use std::collections::HashMap;

use axum::http::HeaderMap;
use thiserror::Error;

use crate::propagation::context::TraceContextOrSamplingFlags;

/// Errors raised while building or running extractors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropagationError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("malformed {header} header: {reason}")]
    MalformedHeader {
        header: &'static str,
        reason: String,
    },
}

impl PropagationError {
    pub(crate) fn malformed(header: &'static str, reason: impl Into<String>) -> Self {
        PropagationError::MalformedHeader {
            header,
            reason: reason.into(),
        }
    }
}

/// Something that reads a trace context out of a carrier of type `C`.
///
/// Implementations return `Ok(EMPTY)` when the carrier holds nothing they
/// understand. The built-in header formats also return `Ok(EMPTY)` for a
/// header they cannot parse; an `Err` aborts a [`CompositeExtractor`] chain.
///
/// [`CompositeExtractor`]: crate::propagation::CompositeExtractor
pub trait Extractor<C: ?Sized>: Send + Sync {
    fn extract(&self, carrier: &C) -> Result<TraceContextOrSamplingFlags, PropagationError>;
}

impl<C, F> Extractor<C> for F
where
    C: ?Sized,
    F: Fn(&C) -> Result<TraceContextOrSamplingFlags, PropagationError> + Send + Sync,
{
    fn extract(&self, carrier: &C) -> Result<TraceContextOrSamplingFlags, PropagationError> {
        self(carrier)
    }
}

/// Read access to a carrier's string-keyed entries.
pub trait Getter {
    fn get(&self, key: &str) -> Option<&str>;
}

impl Getter for HeaderMap {
    fn get(&self, key: &str) -> Option<&str> {
        HeaderMap::get(self, key).and_then(|v| v.to_str().ok())
    }
}

impl Getter for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        if let Some(value) = HashMap::get(self, key) {
            return Some(value.as_str());
        }
        self.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// Parses 1 to 16 hex characters into a u64.
pub(crate) fn parse_hex_u64(s: &str) -> Option<u64> {
    if s.is_empty() || s.len() > 16 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u64::from_str_radix(s, 16).ok()
}

/// Logs a malformed header and degrades it to [`TraceContextOrSamplingFlags::EMPTY`].
pub(crate) fn or_empty(
    result: Result<TraceContextOrSamplingFlags, PropagationError>,
) -> TraceContextOrSamplingFlags {
    match result {
        Ok(extracted) => extracted,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring unparseable trace header");
            TraceContextOrSamplingFlags::EMPTY
        }
    }
}

/// Parses a 16 or 32 character hex trace id into (high, low).
pub(crate) fn parse_trace_id(s: &str) -> Option<(u64, u64)> {
    // Slicing below is only safe on ASCII input.
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match s.len() {
        32 => {
            let high = parse_hex_u64(&s[..16])?;
            let low = parse_hex_u64(&s[16..])?;
            Some((high, low))
        }
        1..=16 => Some((0, parse_hex_u64(s)?)),
        _ => None,
    }
}
