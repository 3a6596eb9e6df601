//! The classify / normalize / route pipeline
//!
//! One synchronous pass per caught error: the classifier resolves the
//! raised value's shape, the normalizer derives code and message, the
//! router buckets the status into a severity and hands a directive to
//! the injected sink. Total over every input; error handling never
//! raises a secondary error.

use std::sync::Arc;

use http::{HeaderMap, Method, StatusCode, Uri};
use serde::Serialize;

use crate::config::FilterConfig;
use crate::exception::{ErrorClass, ThrownError, classify};
use crate::normalize::{extract_code, extract_message, format_error_code};
use crate::severity::{ErrorSink, LogContext, LogDirective, Severity};

/// Generic message for errors that expose nothing usable
const OPAQUE_MESSAGE: &str = "An internal server error occurred.";

/// Placeholder for absent length/limit fields in the oversized message
const UNKNOWN_SIZE: &str = "unknown";

/// Request fields captured at the transport boundary
#[derive(Debug, Clone)]
pub struct RequestMeta {
    /// Request method
    pub method: Method,
    /// Request URI
    pub uri: Uri,
    /// Request headers
    pub headers: HeaderMap,
}

impl RequestMeta {
    /// Capture the fields of an incoming request
    #[must_use]
    pub fn from_parts(parts: &http::request::Parts) -> Self {
        Self {
            method: parts.method.clone(),
            uri: parts.uri.clone(),
            headers: parts.headers.clone(),
        }
    }

    /// Minimal metadata for embedded (non-HTTP) use
    #[must_use]
    pub fn empty() -> Self {
        Self {
            method: Method::GET,
            uri: Uri::from_static("/"),
            headers: HeaderMap::new(),
        }
    }
}

/// The wire-visible error shape
///
/// Serialized as the response body with `status` repeated as the outer
/// response status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedError {
    /// Uppercase snake code token (e.g. `BAD_REQUEST`)
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Numeric response status
    pub status: u16,
}

impl NormalizedError {
    /// Status as an `http` status code
    ///
    /// Falls back to 500 should the stored value ever be out of range.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Bucket a resolved error and assemble the response and log directive
///
/// The log line embeds status, method and URI; the directive carries
/// the request headers and whatever trace the error exposed.
#[must_use]
pub fn route(
    status: StatusCode,
    code: String,
    message: String,
    stack_trace: Option<String>,
    meta: &RequestMeta,
) -> (NormalizedError, LogDirective) {
    let severity = Severity::from_status(status);
    let status_value = status.as_u16();
    let (method, uri) = (&meta.method, &meta.uri);

    let log_message = match severity {
        Severity::Critical => format!("{status_value} [{method} {uri}] has thrown a critical error"),
        Severity::Warning | Severity::None => {
            format!("{status_value} [{method} {uri}] has thrown an HTTP client error")
        }
    };

    let response = NormalizedError {
        code,
        message,
        status: status_value,
    };
    let directive = LogDirective {
        severity,
        message: log_message,
        context: LogContext {
            method: meta.method.clone(),
            uri: meta.uri.clone(),
            headers: meta.headers.clone(),
        },
        stack_trace: stack_trace.unwrap_or_default(),
    };

    (response, directive)
}

/// Catches raised values and normalizes them into wire responses
///
/// Holds the process-wide configuration and the injected logging
/// collaborator; carries no per-request state, so one instance serves
/// concurrent requests without locking.
pub struct ExceptionFilter {
    config: FilterConfig,
    sink: Arc<dyn ErrorSink>,
}

impl ExceptionFilter {
    /// Build a filter over a logging sink
    #[must_use]
    pub fn new(config: FilterConfig, sink: Arc<dyn ErrorSink>) -> Self {
        Self { config, sink }
    }

    /// Filter configuration
    #[must_use]
    pub const fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Normalize one raised value
    ///
    /// Classifies the value, extracts code and message, emits a log
    /// directive for client and server errors, and returns the
    /// normalized response for the transport to serialize.
    pub fn catch(&self, error: &dyn ThrownError, meta: &RequestMeta) -> NormalizedError {
        let (status, mut code, mut message) = match classify(error, &self.config.oversized_entity_marker) {
            ErrorClass::Structured { status, payload } => {
                (status, extract_code(&payload), extract_message(&payload))
            }
            ErrorClass::OversizedEntity => (StatusCode::PAYLOAD_TOO_LARGE, String::new(), String::new()),
            ErrorClass::Opaque => (
                StatusCode::INTERNAL_SERVER_ERROR,
                canonical_code(StatusCode::INTERNAL_SERVER_ERROR),
                OPAQUE_MESSAGE.to_owned(),
            ),
        };

        // 413 wins over whatever the payload said, structured or not
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            code = canonical_code(StatusCode::PAYLOAD_TOO_LARGE);
            message = oversized_message(error.observed_length(), error.size_limit());
        }

        let (response, directive) = route(status, code, message, error.stack_trace(), meta);
        if directive.severity != Severity::None {
            self.sink.emit(&directive);
        }

        response
    }
}

/// Code token for a status's canonical reason phrase
#[must_use]
pub fn canonical_code(status: StatusCode) -> String {
    status.canonical_reason().map(format_error_code).unwrap_or_default()
}

/// Fixed template for oversized request entities
fn oversized_message(length: Option<u64>, limit: Option<u64>) -> String {
    let length = render_size(length);
    let limit = render_size(limit);
    format!("Your request entity size is too big for the server to process it: request size: {length}; request limit: {limit}.")
}

fn render_size(size: Option<u64>) -> String {
    match size {
        Some(bytes) => bytes.to_string(),
        None => UNKNOWN_SIZE.to_owned(),
    }
}
