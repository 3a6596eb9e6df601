use axum::Json;
use axum::response::{IntoResponse, Response};
use faultline_core::NormalizedError;

/// Serialize a normalized error as the outgoing response
///
/// JSON body `{code, message, status}` sent with the same numeric
/// status.
#[must_use]
pub fn reply(error: &NormalizedError) -> Response {
    (error.status_code(), Json(error)).into_response()
}
