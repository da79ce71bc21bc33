//! Trace context model produced by extractors.

use std::fmt;

/// Identifiers of a single span, as read from a carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceContext {
    /// Upper 64 bits of a 128-bit trace id; zero for 64-bit trace ids.
    pub trace_id_high: u64,

    /// Lower 64 bits of the trace id. Never zero.
    pub trace_id: u64,

    /// Parent span id, if the carrier had one.
    pub parent_id: Option<u64>,

    /// Span id. Never zero.
    pub span_id: u64,

    /// Sampling decision; `None` defers the decision downstream.
    pub sampled: Option<bool>,

    /// Debug flag. Implies `sampled == Some(true)`.
    pub debug: bool,
}

impl TraceContext {
    /// Trace id as 16 or 32 lower-hex characters.
    pub fn trace_id_string(&self) -> String {
        if self.trace_id_high != 0 {
            format!("{:016x}{:016x}", self.trace_id_high, self.trace_id)
        } else {
            format!("{:016x}", self.trace_id)
        }
    }

    /// Span id as 16 lower-hex characters.
    pub fn span_id_string(&self) -> String {
        format!("{:016x}", self.span_id)
    }

    pub fn sampling_flags(&self) -> SamplingFlags {
        SamplingFlags {
            sampled: self.sampled,
            debug: self.debug,
        }
    }
}

impl fmt::Display for TraceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.trace_id_string(), self.span_id_string())
    }
}

/// Sampling decision without any identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SamplingFlags {
    pub sampled: Option<bool>,
    pub debug: bool,
}

impl SamplingFlags {
    pub const EMPTY: SamplingFlags = SamplingFlags {
        sampled: None,
        debug: false,
    };

    pub const SAMPLED: SamplingFlags = SamplingFlags {
        sampled: Some(true),
        debug: false,
    };

    pub const NOT_SAMPLED: SamplingFlags = SamplingFlags {
        sampled: Some(false),
        debug: false,
    };

    pub const DEBUG: SamplingFlags = SamplingFlags {
        sampled: Some(true),
        debug: true,
    };

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

/// Result of an extraction attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TraceContextOrSamplingFlags {
    /// Nothing usable was found in the carrier.
    #[default]
    Empty,

    /// A complete span context.
    Context(TraceContext),

    /// Only a sampling decision was found.
    SamplingFlags(SamplingFlags),
}

impl TraceContextOrSamplingFlags {
    /// Canonical empty result.
    pub const EMPTY: TraceContextOrSamplingFlags = TraceContextOrSamplingFlags::Empty;

    pub fn is_empty(&self) -> bool {
        matches!(self, TraceContextOrSamplingFlags::Empty)
    }

    /// Builds a result from sampling flags, collapsing empty flags to [`Self::EMPTY`].
    pub fn from_flags(flags: SamplingFlags) -> Self {
        if flags.is_empty() {
            Self::EMPTY
        } else {
            TraceContextOrSamplingFlags::SamplingFlags(flags)
        }
    }

    pub fn context(&self) -> Option<&TraceContext> {
        match self {
            TraceContextOrSamplingFlags::Context(ctx) => Some(ctx),
            _ => None,
        }
    }

    pub fn sampled(&self) -> Option<bool> {
        match self {
            TraceContextOrSamplingFlags::Empty => None,
            TraceContextOrSamplingFlags::Context(ctx) => ctx.sampled,
            TraceContextOrSamplingFlags::SamplingFlags(flags) => flags.sampled,
        }
    }
}

impl From<TraceContext> for TraceContextOrSamplingFlags {
    fn from(ctx: TraceContext) -> Self {
        TraceContextOrSamplingFlags::Context(ctx)
    }
}

impl fmt::Display for TraceContextOrSamplingFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceContextOrSamplingFlags::Empty => write!(f, "empty"),
            TraceContextOrSamplingFlags::Context(ctx) => write!(f, "context {}", ctx),
            TraceContextOrSamplingFlags::SamplingFlags(flags) => {
                write!(f, "sampling flags sampled={:?} debug={}", flags.sampled, flags.debug)
            }
        }
    }
}
