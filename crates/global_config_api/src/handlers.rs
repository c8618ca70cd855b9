//! HTTP request handlers

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use global_config_core::GlobalConfigGenerator;
use serde::{Deserialize, Serialize};

use crate::AppState;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// POST /generate_configs
///
/// Generates the configuration of every tenant and returns the report as
/// text. Runs that abort before reaching the tenants answer with 500 and
/// the partial report followed by the cause.
pub async fn generate_configs(State(state): State<AppState>) -> Response {
    let run = tokio::spawn(async move {
        GlobalConfigGenerator::new(state.settings, state.collaborators)
            .run()
            .await
    });

    match run.await {
        Ok(report) if report.is_success() => text_response(StatusCode::OK, report.render()),
        Ok(report) => {
            let mut body = report.render();
            if let Some(error) = report.error() {
                body.push_str(&format!("\n\nGeneration aborted: {error}\n"));
            }
            text_response(StatusCode::INTERNAL_SERVER_ERROR, body)
        }
        Err(join_error) => {
            tracing::error!(error = %join_error, "Generation task failed");
            text_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("\n\nGeneration aborted: {join_error}\n"),
            )
        }
    }
}

fn text_response(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, TEXT_PLAIN)], body).into_response()
}

/// GET /health
///
/// Returns service health status with version and timestamp.
pub async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,

    /// Current timestamp (RFC 3339)
    pub timestamp: String,
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
