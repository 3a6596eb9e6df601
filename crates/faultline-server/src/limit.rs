//! Request body size enforcement
//!
//! A fallible tower middleware: a request whose declared body size
//! exceeds the configured limit is refused with an [`OversizedEntity`]
//! error carrying both numbers, which flows to the error handler and
//! through the filter as the normalized 413. Bodies without a declared
//! size are capped in flight, so a lying or chunked client cannot
//! stream past the limit.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::BoxError;
use axum::body::Body;
use axum::response::Response;
use faultline_core::OversizedEntity;
use http::{HeaderMap, Request, header};
use http_body_util::Limited;
use tower::{Layer, Service};

/// Layer enforcing a request body size limit
#[derive(Debug, Clone, Copy)]
pub struct BodyLimitLayer {
    limit: u64,
}

impl BodyLimitLayer {
    /// Enforce a limit in bytes
    #[must_use]
    pub const fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl<S> Layer<S> for BodyLimitLayer {
    type Service = BodyLimit<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BodyLimit {
            inner,
            limit: self.limit,
        }
    }
}

/// Service produced by [`BodyLimitLayer`]
#[derive(Debug, Clone)]
pub struct BodyLimit<S> {
    inner: S,
    limit: u64,
}

impl<S> Service<Request<Body>> for BodyLimit<S>
where
    S: Service<Request<Body>, Response = Response>,
    S::Error: Into<BoxError>,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Response, BoxError>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        if let Some(length) = declared_length(request.headers())
            && length > self.limit
        {
            let error = OversizedEntity {
                length: Some(length),
                limit: Some(self.limit),
            };
            return Box::pin(std::future::ready(Err(error.into())));
        }

        let cap = usize::try_from(self.limit).unwrap_or(usize::MAX);
        let request = request.map(|body| Body::new(Limited::new(body, cap)));
        let future = self.inner.call(request);
        Box::pin(async move { future.await.map_err(Into::into) })
    }
}

/// Body size declared by the request, when parseable
fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers.get(header::CONTENT_LENGTH)?.to_str().ok()?.parse().ok()
}
