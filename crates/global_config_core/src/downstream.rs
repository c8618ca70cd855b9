//! Downstream config generation.
//!
//! Once a tenant's documents are written, the config generator service is
//! asked to produce the per-service configuration and permission files for
//! that tenant. Its textual response is classified into a report level.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::{
    errors::{GenerationError, GenerationResult},
    report_log::LogLevel,
    tenant::TenantId,
};

#[cfg(test)]
#[path = "downstream_tests.rs"]
mod tests;

/// Default base URL of the config generator service.
pub const DEFAULT_CONFIG_GENERATOR_SERVICE_URL: &str = "http://qwc-config-service:9090";

/// Endpoint below the base URL that generates one tenant's configs.
pub const GENERATE_CONFIGS_ENDPOINT: &str = "generate_configs";

/// Marker of an unhandled exception in the service's response.
pub const UNHANDLED_EXCEPTION_MARKER: &str = "Exception:";
pub const CRITICAL_MARKER: &str = "CRITICAL";
pub const ERROR_MARKER: &str = "ERROR";
pub const WARNING_MARKER: &str = "WARNING";

/// Textual response of the config generator service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownstreamResponse {
    pub status: u16,
    pub body: String,
}

impl DownstreamResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Classifies the response by its content, most severe marker first.
    pub fn classify(&self) -> LogLevel {
        let body = self.body.as_str();
        if body.contains(UNHANDLED_EXCEPTION_MARKER) || body.contains(CRITICAL_MARKER) {
            LogLevel::Critical
        } else if body.contains(ERROR_MARKER) {
            LogLevel::Error
        } else if body.contains(WARNING_MARKER) {
            LogLevel::Warning
        } else {
            LogLevel::Info
        }
    }
}

/// Triggers config and permission generation for one tenant.
#[async_trait]
pub trait DownstreamGenerator: Send + Sync {
    /// Asks the service at `base_url` to generate configs for `tenant`.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Transport` if the service cannot be reached
    /// or does not answer in time. Any answer, whatever its status, is a
    /// response to classify.
    async fn generate_configs(
        &self,
        base_url: &str,
        tenant: &TenantId,
    ) -> GenerationResult<DownstreamResponse>;
}

/// Calls the config generator service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDownstreamGenerator {
    client: reqwest::Client,
}

impl HttpDownstreamGenerator {
    /// Creates a client whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> GenerationResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Transport {
                url: String::new(),
                reason: format!("failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

/// Resolves the generation endpoint against `base_url`.
pub fn generate_configs_url(base_url: &str) -> GenerationResult<Url> {
    Url::parse(base_url)
        .and_then(|base| base.join(GENERATE_CONFIGS_ENDPOINT))
        .map_err(|e| GenerationError::Transport {
            url: base_url.to_string(),
            reason: format!("invalid config generator service URL: {e}"),
        })
}

#[async_trait]
impl DownstreamGenerator for HttpDownstreamGenerator {
    #[instrument(skip_all, fields(tenant = %tenant, base_url = %base_url))]
    async fn generate_configs(
        &self,
        base_url: &str,
        tenant: &TenantId,
    ) -> GenerationResult<DownstreamResponse> {
        let url = generate_configs_url(base_url)?;
        let transport = |e: reqwest::Error| GenerationError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        };

        debug!(url = %url, "Requesting config generation");
        let response = self
            .client
            .post(url.clone())
            .query(&[("tenant", tenant.as_str())])
            .send()
            .await
            .map_err(transport)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;
        debug!(status, "Config generator service responded");

        Ok(DownstreamResponse::new(status, body))
    }
}
