//! End-to-end checks of the error pipeline through axum layers

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::routing::get;
use axum::Router;
use faultline_core::{ExceptionFilter, FilterConfig, HttpException, OversizedEntity};
use faultline_server::{TracingSink, handle, with_error_filter};
use http::{HeaderMap, Method, Request, StatusCode, Uri};
use tower::ServiceExt;

fn filter(config: FilterConfig) -> Arc<ExceptionFilter> {
    Arc::new(ExceptionFilter::new(config, Arc::new(TracingSink)))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn timeout_expiry_surfaces_as_an_opaque_500() {
    let config = FilterConfig {
        request_timeout: Some("50ms".to_owned()),
        ..FilterConfig::default()
    };
    let app = Router::new().route(
        "/slow",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "done"
        }),
    );
    let app = with_error_filter(app, filter(config)).unwrap();

    let request = Request::builder().uri("/slow").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INTERNAL_SERVER_ERROR");
    assert_eq!(json["message"], "An internal server error occurred.");
    assert_eq!(json["status"], 500);
}

#[tokio::test]
async fn routes_without_errors_pass_through_untouched() {
    let app = Router::new().route("/healthy", get(|| async { "ok" }));
    let app = with_error_filter(app, filter(FilterConfig::default())).unwrap();

    let request = Request::builder().uri("/healthy").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn rejects_an_unparseable_configured_timeout() {
    let config = FilterConfig {
        request_timeout: Some("whenever".to_owned()),
        ..FilterConfig::default()
    };
    assert!(with_error_filter(Router::new(), filter(config)).is_err());
}

#[tokio::test]
async fn oversized_bodies_get_the_normalized_413_through_the_router() {
    let config = FilterConfig {
        body_limit: Some(1024),
        ..FilterConfig::default()
    };
    let app = Router::new().route("/upload", axum::routing::post(|_body: axum::body::Bytes| async { "stored" }));
    let app = with_error_filter(app, filter(config)).unwrap();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(http::header::CONTENT_LENGTH, 2_048_000)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "PAYLOAD_TOO_LARGE");
    assert_eq!(json["status"], 413);
    let message = json["message"].as_str().unwrap();
    assert!(message.contains("request size: 2048000"));
    assert!(message.contains("request limit: 1024"));
}

#[tokio::test]
async fn structured_errors_keep_the_wire_shape() {
    let filter = filter(FilterConfig::default());
    let error = HttpException::from_message(StatusCode::UNPROCESSABLE_ENTITY, "name must not be empty");

    let response = handle(
        &filter,
        Method::POST,
        &Uri::from_static("/widgets"),
        &HeaderMap::new(),
        Box::new(error),
    );

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNPROCESSABLE_ENTITY");
    assert_eq!(json["message"], "name must not be empty");
    assert_eq!(json["status"], 422);
}

#[tokio::test]
async fn oversized_entities_advertise_the_configured_limit() {
    let config = FilterConfig {
        body_limit: Some(1_048_576),
        ..FilterConfig::default()
    };
    let filter = filter(config);
    let error = OversizedEntity {
        length: Some(2_048_000),
        limit: None,
    };

    let response = handle(
        &filter,
        Method::POST,
        &Uri::from_static("/upload"),
        &HeaderMap::new(),
        Box::new(error),
    );

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "PAYLOAD_TOO_LARGE");
    let message = json["message"].as_str().unwrap();
    assert!(message.contains("2048000"));
    assert!(message.contains("1048576"));
}
