//! Tests for middleware module

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    routing::get,
    Router,
};
use tower::ServiceExt; // for `oneshot`

/// Test helper: create a simple handler that returns OK
async fn test_handler() -> &'static str {
    "OK"
}

fn app() -> Router {
    Router::new()
        .route("/test", get(test_handler))
        .layer(middleware::from_fn(tracing_middleware))
}

/// Test that every response carries a UUID request ID
#[tokio::test]
async fn test_tracing_middleware_sets_request_id() {
    let request = Request::builder().uri("/test").body(Body::empty()).unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let request_id = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .expect("request id header")
        .to_str()
        .unwrap();
    assert!(uuid::Uuid::parse_str(request_id).is_ok());
}

/// Test that request IDs differ between requests
#[tokio::test]
async fn test_tracing_middleware_request_ids_are_unique() {
    let first = app()
        .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let second = app()
        .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_ne!(
        first.headers().get(REQUEST_ID_HEADER),
        second.headers().get(REQUEST_ID_HEADER)
    );
}

/// Test that error statuses pass through unchanged
#[tokio::test]
async fn test_tracing_middleware_keeps_status() {
    let request = Request::builder().uri("/missing").body(Body::empty()).unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
