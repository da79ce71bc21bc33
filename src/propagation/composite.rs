//! Ordered fallback over several extractors.

use std::fmt;
use std::sync::Arc;

use crate::propagation::context::TraceContextOrSamplingFlags;
use crate::propagation::extractor::{Extractor, PropagationError};

/// Tries several extractors, in order, until one returns a non-empty result.
///
/// The extractor list is copied at construction and never changes afterwards,
/// so one instance can be shared across threads and reused for any number of
/// carriers.
///
/// An error from any extractor ends the extraction: later extractors are not
/// consulted.
pub struct CompositeExtractor<C: ?Sized> {
    extractors: Vec<Arc<dyn Extractor<C>>>,
}

impl<C: ?Sized> CompositeExtractor<C> {
    /// Copy the given extractors into a new composite.
    pub fn new(extractors: &[Arc<dyn Extractor<C>>]) -> Result<Self, PropagationError> {
        if extractors.is_empty() {
            return Err(PropagationError::InvalidArgument(
                "there must be one or more extractors",
            ));
        }
        Ok(Self {
            extractors: extractors.to_vec(),
        })
    }

    /// Like [`CompositeExtractor::new`], for callers whose list may be missing.
    pub fn from_optional(
        extractors: Option<&[Arc<dyn Extractor<C>>]>,
    ) -> Result<Self, PropagationError> {
        match extractors {
            Some(extractors) => Self::new(extractors),
            None => Err(PropagationError::InvalidArgument(
                "the extractors list can't be missing",
            )),
        }
    }

    /// For crate-internal chains whose length is fixed and non-zero.
    pub(crate) fn from_non_empty(extractors: Vec<Arc<dyn Extractor<C>>>) -> Self {
        debug_assert!(!extractors.is_empty());
        Self { extractors }
    }

    /// The extractors in the order they are tried.
    pub fn extractors(&self) -> &[Arc<dyn Extractor<C>>] {
        &self.extractors
    }

    pub fn extract(&self, carrier: &C) -> Result<TraceContextOrSamplingFlags, PropagationError> {
        let mut context = TraceContextOrSamplingFlags::EMPTY;

        for (index, extractor) in self.extractors.iter().enumerate() {
            context = extractor.extract(carrier)?;
            if !context.is_empty() {
                tracing::trace!(extractor = index, "Trace context extracted");
                break;
            }
        }

        Ok(context)
    }
}

impl<C: ?Sized> Extractor<C> for CompositeExtractor<C> {
    fn extract(&self, carrier: &C) -> Result<TraceContextOrSamplingFlags, PropagationError> {
        CompositeExtractor::extract(self, carrier)
    }
}

impl<C: ?Sized> Clone for CompositeExtractor<C> {
    fn clone(&self) -> Self {
        Self {
            extractors: self.extractors.clone(),
        }
    }
}

impl<C: ?Sized> fmt::Debug for CompositeExtractor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeExtractor")
            .field("extractors", &self.extractors.len())
            .finish()
    }
}
