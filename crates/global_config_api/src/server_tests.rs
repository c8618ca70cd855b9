//! Tests for server module

use super::*;
use global_config_core::{Collaborators, GeneratorSettings};
use std::collections::HashMap;
use std::time::Duration;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let values: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| values.get(name).cloned()
}

#[test]
fn test_default_config() {
    let config = ApiConfig::default();
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.port, 5010);
    assert_eq!(config.host, "0.0.0.0");
}

#[test]
fn test_config_from_lookup() {
    let config =
        ApiConfig::from_lookup(lookup_from(&[("API_HOST", "127.0.0.1"), ("API_PORT", "8080")]))
            .unwrap();
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 8080);

    assert_eq!(ApiConfig::from_lookup(lookup_from(&[])).unwrap(), ApiConfig::default());
}

#[test]
fn test_invalid_port_is_rejected() {
    let error = ApiConfig::from_lookup(lookup_from(&[("API_PORT", "http")])).unwrap_err();
    assert!(error.to_string().contains("Invalid API_PORT 'http'"));
}

#[tokio::test]
async fn test_invalid_host_fails_to_serve() {
    let config = ApiConfig {
        port: 0,
        host: "not-an-ip".to_string(),
    };
    let state = AppState::new(
        GeneratorSettings::default(),
        Collaborators::http(Duration::from_secs(1)).unwrap(),
    );

    let result = ApiServer::new(config, state).serve().await;

    assert!(result.is_err());
}

#[test]
fn test_server_creation() {
    let state = AppState::new(
        GeneratorSettings::default(),
        Collaborators::http(Duration::from_secs(1)).unwrap(),
    );
    let server = ApiServer::new(ApiConfig::default(), state);
    let _router = server.router();
}
