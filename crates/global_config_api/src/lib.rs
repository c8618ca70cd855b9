//! GlobalConfigGenerator HTTP API
//!
//! Exposes the generation run over HTTP:
//!
//! - `POST /generate_configs` runs a full generation and answers with the
//!   text report
//! - `GET /health` reports service health
//!
//! This crate only translates between HTTP and `global_config_core`; all
//! generation behavior lives in the core crate.

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

pub use server::{ApiConfig, ApiServer};

use global_config_core::{Collaborators, GeneratorSettings};

/// Default API port
pub const DEFAULT_PORT: u16 = 5010;

/// Application state shared across handlers
///
/// Every request builds a fresh generator from these.
#[derive(Clone)]
pub struct AppState {
    pub settings: GeneratorSettings,
    pub collaborators: Collaborators,
}

impl AppState {
    pub fn new(settings: GeneratorSettings, collaborators: Collaborators) -> Self {
        Self {
            settings,
            collaborators,
        }
    }
}
