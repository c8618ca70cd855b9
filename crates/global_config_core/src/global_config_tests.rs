//! Tests for the global configuration document model.

use super::*;
use serde_json::json;

fn sample_document() -> Value {
    json!({
        "$schema": "https://example.com/root.schema.json",
        "config": {
            "config_generator_service_url": "http://config-service:9090",
            "default_qgis_server_url": "http://qgis-server/ows/"
        },
        "common_config": {
            "config-generator-service": {"config": {"config_db_url": "postgresql:///?service=qwc"}},
            "qwc2config": {"a": 1}
        },
        "specific_configs": [
            {"tenant": "alpha", "qwc2config": {"b": 2}},
            {"tenant": "bob"}
        ]
    })
}

#[test]
fn test_parses_sections() {
    let config = GlobalConfig::from_document(sample_document()).unwrap();

    assert_eq!(
        config.config_generator_service_url(),
        Some("http://config-service:9090")
    );
    assert_eq!(
        config.generator_settings().extra["default_qgis_server_url"],
        "http://qgis-server/ows/"
    );
    assert_eq!(config.specific_configs().len(), 2);
    assert_eq!(
        config.common_section(ArtifactType::Qwc2Config).unwrap(),
        json!({"a": 1})
    );
}

#[test]
fn test_missing_sections_default_to_empty() {
    let config = GlobalConfig::from_document(json!({})).unwrap();
    assert!(config.specific_configs().is_empty());
    assert!(config.common_config().is_empty());
    assert_eq!(config.config_generator_service_url(), None);
    assert_eq!(config.schema_url(), None);
    assert_eq!(
        config
            .common_section(ArtifactType::ConfigGeneratorService)
            .unwrap(),
        json!({})
    );
}

#[test]
fn test_non_object_document_is_parse_error() {
    let result = GlobalConfig::from_document(json!([1, 2]));
    assert!(matches!(result, Err(GenerationError::Parse { .. })));
}

#[test]
fn test_wrongly_shaped_section_is_parse_error() {
    let result = GlobalConfig::from_document(json!({"specific_configs": {"tenant": "a"}}));
    assert!(matches!(result, Err(GenerationError::Parse { .. })));
}

#[test]
fn test_schema_url_prefers_config_section() {
    let config = GlobalConfig::from_document(sample_document()).unwrap();
    assert_eq!(
        config.schema_url(),
        Some("https://example.com/root.schema.json")
    );

    let mut document = sample_document();
    document["config"]["schema_url"] = json!("https://example.com/explicit.json");
    let config = GlobalConfig::from_document(document).unwrap();
    assert_eq!(config.schema_url(), Some("https://example.com/explicit.json"));
}

#[test]
fn test_blank_urls_are_ignored() {
    let config = GlobalConfig::from_document(json!({
        "$schema": " ",
        "config": {"config_generator_service_url": ""}
    }))
    .unwrap();
    assert_eq!(config.schema_url(), None);
    assert_eq!(config.config_generator_service_url(), None);
}

#[test]
fn test_document_key_order_is_preserved() {
    let text = r#"{"specific_configs": [], "config": {}, "common_config": {}}"#;
    let document: Value = serde_json::from_str(text).unwrap();
    let config = GlobalConfig::from_document(document).unwrap();
    let keys: Vec<&String> = config.document().as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["specific_configs", "config", "common_config"]);
}

#[test]
fn test_common_section_must_be_object() {
    let config =
        GlobalConfig::from_document(json!({"common_config": {"qwc2config": [1]}})).unwrap();
    match config.common_section(ArtifactType::Qwc2Config) {
        Err(GenerationError::IncompatibleDocument { path, found, .. }) => {
            assert_eq!(path, "common_config/qwc2config");
            assert_eq!(found, "an array");
        }
        other => panic!("expected incompatible document, got {other:?}"),
    }
}

#[test]
fn test_specific_config_entry() {
    let entry = json!({"tenant": "alpha", "qwc2config": {"b": 2}});
    let specific = SpecificConfig::from_entry(&entry).unwrap();
    assert_eq!(specific.tenant.as_str(), "alpha");
    assert_eq!(
        specific.section(ArtifactType::Qwc2Config).unwrap(),
        json!({"b": 2})
    );
    assert_eq!(
        specific
            .section(ArtifactType::ConfigGeneratorService)
            .unwrap(),
        json!({})
    );
}

#[test]
fn test_specific_config_without_tenant_is_rejected() {
    for entry in [
        json!({"qwc2config": {}}),
        json!({"tenant": ""}),
        json!({"tenant": 42}),
        json!("alpha"),
    ] {
        assert!(
            matches!(
                SpecificConfig::from_entry(&entry),
                Err(GenerationError::InvalidTenant { .. })
            ),
            "entry {entry} should be rejected"
        );
    }
}

#[test]
fn test_specific_section_must_be_object() {
    let entry = json!({"tenant": "alpha", "config-generator-service": "oops"});
    let specific = SpecificConfig::from_entry(&entry).unwrap();
    assert!(matches!(
        specific.section(ArtifactType::ConfigGeneratorService),
        Err(GenerationError::IncompatibleDocument { .. })
    ));
}
