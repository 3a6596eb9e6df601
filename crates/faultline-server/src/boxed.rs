//! Capability probe over boxed transport errors
//!
//! Errors reach the filter from tower middleware as opaque `BoxError`
//! values. [`BoxedException`] adapts one to the capability contract:
//! downcasts recover errors raised through the crate's own types, and a
//! body-length-limit failure anywhere in the source chain is recognized
//! as the oversized-entity condition.

use std::error::Error as StdError;

use axum::BoxError;
use faultline_core::{ExceptionPayload, HttpException, OVERSIZED_ENTITY_KIND, OversizedEntity, ThrownError};
use http::StatusCode;
use http_body_util::LengthLimitError;

/// Boxed transport error adapted to the capability contract
pub struct BoxedException {
    inner: BoxError,
    limit: Option<u64>,
}

impl BoxedException {
    /// Wrap a boxed error
    #[must_use]
    pub fn new(inner: BoxError) -> Self {
        Self { inner, limit: None }
    }

    /// Wrap a boxed error, advertising the configured body limit for
    /// oversized-entity messages when the error itself carries none
    #[must_use]
    pub fn with_limit(inner: BoxError, limit: Option<u64>) -> Self {
        Self { inner, limit }
    }

    fn as_structured(&self) -> Option<&HttpException> {
        self.inner.downcast_ref()
    }

    fn as_oversized(&self) -> Option<&OversizedEntity> {
        self.inner.downcast_ref()
    }

    fn length_limited(&self) -> bool {
        find_cause::<LengthLimitError>(self.inner.as_ref()).is_some()
    }
}

impl ThrownError for BoxedException {
    fn status(&self) -> Option<StatusCode> {
        self.as_structured().and_then(ThrownError::status)
    }

    fn payload(&self) -> Option<ExceptionPayload> {
        self.as_structured().and_then(ThrownError::payload)
    }

    fn kind(&self) -> Option<&str> {
        if let Some(oversized) = self.as_oversized() {
            return oversized.kind();
        }
        self.length_limited().then_some(OVERSIZED_ENTITY_KIND)
    }

    fn observed_length(&self) -> Option<u64> {
        self.as_oversized().and_then(ThrownError::observed_length)
    }

    fn size_limit(&self) -> Option<u64> {
        self.as_oversized().and_then(ThrownError::size_limit).or(self.limit)
    }

    fn stack_trace(&self) -> Option<String> {
        Some(render_chain(self.inner.as_ref()))
    }
}

/// Find a typed cause anywhere in an error's source chain
#[must_use]
pub fn find_cause<'a, T: StdError + 'static>(error: &'a (dyn StdError + 'static)) -> Option<&'a T> {
    if let Some(found) = error.downcast_ref() {
        return Some(found);
    }
    let mut source = error.source();
    while let Some(cause) = source {
        if let Some(found) = cause.downcast_ref() {
            return Some(found);
        }
        source = cause.source();
    }
    None
}

/// Render an error and its causes as a trace
fn render_chain(error: &(dyn StdError + 'static)) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str("\ncaused by: ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
