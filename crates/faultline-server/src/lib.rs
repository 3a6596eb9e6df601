//! Axum integration for the faultline exception filter
//!
//! Wires the pure core into a tower/axum pipeline: boxed middleware
//! errors are probed for capabilities, normalized by the filter, logged
//! through `tracing`, and serialized as the JSON wire shape.
//!
//! ```ignore
//! let filter = Arc::new(ExceptionFilter::new(config, Arc::new(TracingSink)));
//! let app = with_error_filter(Router::new().route("/", get(root)), filter)?;
//! ```

pub mod boxed;
pub mod limit;
pub mod respond;
pub mod sink;

use std::sync::Arc;

use axum::error_handling::HandleErrorLayer;
use axum::response::Response;
use axum::{BoxError, Router};
use faultline_core::{ExceptionFilter, RequestMeta};
use http::{HeaderMap, Method, Uri};
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;

pub use boxed::{BoxedException, find_cause};
pub use limit::BodyLimitLayer;
pub use respond::reply;
pub use sink::TracingSink;

/// Filter handle shared across concurrent requests
pub type SharedFilter = Arc<ExceptionFilter>;

/// Normalize one boxed middleware error into a response
///
/// The single entry point for transport errors: adapts the boxed error
/// to the capability contract, runs the filter pipeline (which emits
/// any log directive), and serializes the result.
#[must_use]
pub fn handle(filter: &ExceptionFilter, method: Method, uri: &Uri, headers: &HeaderMap, error: BoxError) -> Response {
    let exception = BoxedException::with_limit(error, filter.config().body_limit);
    let meta = RequestMeta {
        method,
        uri: uri.clone(),
        headers: headers.clone(),
    };
    reply(&filter.catch(&exception, &meta))
}

/// Attach the exception filter and its configured layers to a router
///
/// Every error produced by the layered middleware flows through
/// [`handle`]. A configured request timeout surfaces expiry as an
/// opaque internal error; a configured body limit refuses oversized
/// request entities with the normalized 413. The error handler is only
/// stacked when a fallible layer is configured, since the bare router's
/// services cannot error.
///
/// # Errors
///
/// Returns an error if the configured request timeout is not a
/// parseable duration
pub fn with_error_filter(router: Router, filter: SharedFilter) -> anyhow::Result<Router> {
    let timeout = filter.config().request_timeout_duration()?;
    let body_limit = filter.config().body_limit;

    let handler = {
        let filter = filter.clone();
        move |method: Method, uri: Uri, headers: HeaderMap, error: BoxError| {
            std::future::ready(handle(&filter, method, &uri, &headers, error))
        }
    };

    let router = match (timeout, body_limit) {
        (Some(timeout), Some(limit)) => router.layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handler))
                .layer(TimeoutLayer::new(timeout))
                .layer(BodyLimitLayer::new(limit)),
        ),
        (Some(timeout), None) => router.layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handler))
                .layer(TimeoutLayer::new(timeout)),
        ),
        (None, Some(limit)) => router.layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handler))
                .layer(BodyLimitLayer::new(limit)),
        ),
        (None, None) => router,
    };

    Ok(router)
}
