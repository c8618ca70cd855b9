//! HTTP routing configuration
//!
//! - POST   /generate_configs - Generate every tenant's configuration
//! - GET    /health - Health check

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};

use crate::{handlers, middleware as api_middleware, AppState};

/// Create the API router with all routes and middleware configured.
///
/// No request timeout layer is installed; a run is bounded by the per-call
/// timeouts of its schema fetch and downstream requests.
pub fn create_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().include_headers(true))
        .on_response(DefaultOnResponse::new().include_headers(true));

    Router::new()
        .route("/generate_configs", post(handlers::generate_configs))
        .route("/health", get(handlers::health_check))
        .layer(middleware::from_fn(api_middleware::tracing_middleware))
        .layer(trace_layer)
        .with_state(state)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
