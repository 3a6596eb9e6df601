//! Normalization of heterogeneous raised errors into a stable wire shape
//!
//! Raised values entering a request pipeline share no structure: some
//! honor a status-plus-payload contract, some carry ad hoc marker
//! fields, most carry nothing. This crate classifies them, extracts a
//! code token and message (including nested validation-failure trees),
//! buckets the status into a logging severity, and always produces the
//! same `{code, message, status}` response shape.
//!
//! The crate is pure and synchronous; transports and logging sinks are
//! collaborators injected at the boundary.

#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod exception;
pub mod filter;
pub mod normalize;
pub mod payload;
pub mod severity;

pub use config::{ConfigError, FilterConfig};
pub use exception::{ErrorClass, HttpException, OVERSIZED_ENTITY_KIND, OversizedEntity, ThrownError, classify};
pub use filter::{ExceptionFilter, NormalizedError, RequestMeta, canonical_code, route};
pub use normalize::{extract_code, extract_message, format_error_code};
pub use payload::{ExceptionPayload, MessageField, MessageItem, PayloadFields, ValidationFailure};
pub use severity::{ErrorSink, LogContext, LogDirective, Severity};
