//! GlobalConfigGenerator API Server
//!
//! # Environment Variables
//!
//! - `API_PORT`: Port to listen on (default: 5010)
//! - `API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `RUST_LOG`: Log level (default: info)
//! - `INPUT_CONFIG_PATH`: Directory holding `globalConfig.json` and `index.html` (default: config-in/)
//! - `CONFIG_GENERATOR_SERVICE_URL`: Config generator service base URL (default: http://qwc-config-service:9090)
//! - `REQUEST_TIMEOUT_SECS`: Timeout of outbound requests (default: 30)
//! - `SCHEMA_VALIDATION`: `advisory` or `enforce` (default: advisory)

use global_config_api::{ApiConfig, ApiServer, AppState};
use global_config_core::{Collaborators, GeneratorSettings};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ApiConfig::from_env()?;
    let settings = GeneratorSettings::from_env()?;
    let collaborators = Collaborators::http(settings.request_timeout)?;

    tracing::info!("Starting GlobalConfigGenerator API server");
    tracing::info!(
        input_dir = %settings.input_dir.display(),
        config_generator_service_url = %settings.config_generator_service_url,
        validation_policy = %settings.validation_policy,
        "Generator settings loaded"
    );

    let server = ApiServer::new(config, AppState::new(settings, collaborators));
    server.serve().await
}
