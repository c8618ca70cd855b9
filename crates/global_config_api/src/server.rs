//! HTTP server configuration and startup

use anyhow::Context;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;

use crate::{routes, AppState, DEFAULT_PORT};

pub const API_HOST_VAR: &str = "API_HOST";
pub const API_PORT_VAR: &str = "API_PORT";

/// API server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl ApiConfig {
    /// Reads `API_HOST` and `API_PORT` from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`; unset values use defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the port is not a valid port number.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup(API_HOST_VAR).filter(|h| !h.trim().is_empty()) {
            config.host = host;
        }

        if let Some(port) = lookup(API_PORT_VAR).filter(|p| !p.trim().is_empty()) {
            config.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid {API_PORT_VAR} '{port}'"))?;
        }

        Ok(config)
    }
}

/// API server
pub struct ApiServer {
    config: ApiConfig,
    state: AppState,
}

impl ApiServer {
    /// Create a new API server with the given configuration.
    pub fn new(config: ApiConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Build the Axum router with all routes and middleware.
    pub fn router(&self) -> Router {
        routes::create_router(self.state.clone())
    }

    /// Start the server and listen for requests.
    ///
    /// Runs until CTRL+C (SIGINT) or SIGTERM is received.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address.
    pub async fn serve(self) -> anyhow::Result<()> {
        let ip = self
            .config
            .host
            .parse::<std::net::IpAddr>()
            .with_context(|| format!("Invalid {API_HOST_VAR} '{}'", self.config.host))?;
        let addr = SocketAddr::from((ip, self.config.port));

        tracing::info!("Starting API server on {}", addr);

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        let app = self.router();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Wait for shutdown signal (CTRL+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!(%error, "Failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received CTRL+C, initiating graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
