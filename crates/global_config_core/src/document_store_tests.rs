//! Tests for input loading and tenant output writing.

use super::*;
use serde_json::json;
use tempfile::TempDir;

fn store_with(files: &[(&str, &str)]) -> (TempDir, DocumentStore) {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    let store = DocumentStore::new(dir.path());
    (dir, store)
}

fn tenant(id: &str) -> TenantId {
    TenantId::try_new(id).unwrap()
}

#[test]
fn test_paths() {
    let store = DocumentStore::new("config-in");
    assert_eq!(
        store.global_config_path(),
        Path::new("config-in/globalConfig.json")
    );
    assert_eq!(store.index_html_path(), Path::new("config-in/index.html"));
    assert_eq!(store.tenant_dir(&tenant("alpha")), Path::new("config-in/alpha"));
}

#[test]
fn test_load_global_config() {
    let (_dir, store) = store_with(&[(
        GLOBAL_CONFIG_FILENAME,
        r#"{"config": {}, "specific_configs": [{"tenant": "alpha"}]}"#,
    )]);
    let config = store.load_global_config().unwrap();
    assert_eq!(config.specific_configs().len(), 1);
}

#[test]
fn test_missing_global_config_is_not_found() {
    let (_dir, store) = store_with(&[]);
    match store.load_global_config() {
        Err(GenerationError::NotFound { path }) => assert!(path.ends_with("globalConfig.json")),
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn test_malformed_global_config_is_parse_error() {
    let (_dir, store) = store_with(&[(GLOBAL_CONFIG_FILENAME, "{ \"config\": ")]);
    assert!(matches!(
        store.load_global_config(),
        Err(GenerationError::Parse { .. })
    ));
}

#[test]
fn test_load_html_template_verbatim() {
    let html = "<!DOCTYPE html>\n<html><body>QWC2</body></html>\n";
    let (_dir, store) = store_with(&[(INDEX_HTML_FILENAME, html)]);
    assert_eq!(store.load_html_template().unwrap(), html);
}

#[test]
fn test_missing_html_template_is_not_found() {
    let (_dir, store) = store_with(&[]);
    assert!(matches!(
        store.load_html_template(),
        Err(GenerationError::NotFound { .. })
    ));
}

#[test]
fn test_write_json_uses_four_space_indent_and_keeps_order() {
    let (dir, store) = store_with(&[]);
    let document = json!({"z": 1, "a": {"name": "Zürich"}});

    let path = store
        .write_json(&tenant("alpha"), "config.json", &document)
        .unwrap();

    assert_eq!(path, dir.path().join("alpha").join("config.json"));
    let written = fs::read_to_string(path).unwrap();
    assert_eq!(
        written,
        "{\n    \"z\": 1,\n    \"a\": {\n        \"name\": \"Zürich\"\n    }\n}"
    );
}

#[test]
fn test_ensure_tenant_dir_is_idempotent() {
    let (dir, store) = store_with(&[]);
    store.ensure_tenant_dir(&tenant("alpha")).unwrap();
    store.ensure_tenant_dir(&tenant("alpha")).unwrap();
    assert!(dir.path().join("alpha").is_dir());
}

#[test]
fn test_write_fails_when_tenant_dir_is_a_file() {
    let (_dir, store) = store_with(&[("blocked", "not a directory")]);
    let result = store.write_text(&tenant("blocked"), "index.html", "<html/>");
    assert!(matches!(result, Err(GenerationError::Io { .. })));
}
