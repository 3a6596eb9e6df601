//! Classification of arbitrary raised values
//!
//! Raised values share no common structure: some honor the structured
//! status-plus-payload contract, some only carry ad hoc fields, most
//! carry nothing useful. [`ThrownError`] expresses those capabilities as
//! optional accessors and [`classify`] resolves them, in a fixed order,
//! into a small closed set of shapes.

use http::StatusCode;
use thiserror::Error;

use crate::payload::{ExceptionPayload, MessageField, PayloadFields};

/// Marker value identifying an oversized-request-entity condition
pub const OVERSIZED_ENTITY_KIND: &str = "entity.too.large";

/// Capabilities an arbitrary raised value may expose
///
/// Every accessor defaults to `None`; implementors surface only what
/// their error actually carries. Any type exposing both [`status`] and
/// [`payload`] is honored as a structured exception regardless of its
/// origin.
///
/// [`status`]: ThrownError::status
/// [`payload`]: ThrownError::payload
pub trait ThrownError: Send + Sync {
    /// Response status, when the structured contract is honored
    fn status(&self) -> Option<StatusCode> {
        None
    }

    /// Response payload, when the structured contract is honored
    fn payload(&self) -> Option<ExceptionPayload> {
        None
    }

    /// Ad hoc condition marker (e.g. `entity.too.large`)
    fn kind(&self) -> Option<&str> {
        None
    }

    /// Observed request entity size in bytes
    fn observed_length(&self) -> Option<u64> {
        None
    }

    /// Configured request entity limit in bytes
    fn size_limit(&self) -> Option<u64> {
        None
    }

    /// Captured stack or error-chain trace
    fn stack_trace(&self) -> Option<String> {
        None
    }
}

/// Shape of a raised value after capability probing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorClass {
    /// Both accessors present; status and payload are trusted as-is
    Structured {
        /// Status reported by the exception
        status: StatusCode,
        /// Payload reported by the exception
        payload: ExceptionPayload,
    },
    /// Ad hoc marker matched the oversized-entity condition
    OversizedEntity,
    /// Nothing recognizable; handled as an internal error
    Opaque,
}

impl ErrorClass {
    /// Status this shape resolves to
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Structured { status, .. } => *status,
            Self::OversizedEntity => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Opaque => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Resolve a raised value into its shape
///
/// Probing order: the structured contract wins when both accessors
/// answer; otherwise the `kind` marker is compared against the
/// configured oversized-entity marker; anything else is opaque. Total
/// over every input, absence of expected shape degrades rather than
/// failing.
#[must_use]
pub fn classify(error: &dyn ThrownError, oversized_marker: &str) -> ErrorClass {
    if let (Some(status), Some(payload)) = (error.status(), error.payload()) {
        return ErrorClass::Structured { status, payload };
    }

    if error.kind() == Some(oversized_marker) {
        return ErrorClass::OversizedEntity;
    }

    ErrorClass::Opaque
}

/// Structured exception honoring the status-plus-payload contract
///
/// The ready-made structured variant for hosts that raise their own
/// errors into the filter.
#[derive(Debug, Clone, Error)]
#[error("{status}")]
pub struct HttpException {
    status: StatusCode,
    payload: ExceptionPayload,
}

impl HttpException {
    /// Build from an explicit status and payload
    #[must_use]
    pub const fn new(status: StatusCode, payload: ExceptionPayload) -> Self {
        Self { status, payload }
    }

    /// Build from a status and a message string
    ///
    /// The payload carries the status's canonical reason phrase as its
    /// `error` field, so the code token is derived from the status.
    #[must_use]
    pub fn from_message(status: StatusCode, message: impl Into<String>) -> Self {
        let fields = PayloadFields {
            error: status.canonical_reason().map(str::to_owned),
            message: Some(MessageField::Text(message.into())),
        };
        Self::new(status, ExceptionPayload::Object(fields))
    }
}

impl ThrownError for HttpException {
    fn status(&self) -> Option<StatusCode> {
        Some(self.status)
    }

    fn payload(&self) -> Option<ExceptionPayload> {
        Some(self.payload.clone())
    }
}

/// Request entity exceeded the configured size limit
///
/// Mirrors the ad hoc shape raised by body-size enforcement: a `kind`
/// marker plus optional observed/configured sizes, with no payload.
#[derive(Debug, Clone, Copy, Default, Error)]
#[error("request entity too large")]
pub struct OversizedEntity {
    /// Observed request entity size in bytes, when known
    pub length: Option<u64>,
    /// Configured request entity limit in bytes, when known
    pub limit: Option<u64>,
}

impl ThrownError for OversizedEntity {
    fn kind(&self) -> Option<&str> {
        Some(OVERSIZED_ENTITY_KIND)
    }

    fn observed_length(&self) -> Option<u64> {
        self.length
    }

    fn size_limit(&self) -> Option<u64> {
        self.limit
    }
}
