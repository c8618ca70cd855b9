use super::*;
use serde_json::json;

#[test]
fn test_default_placeholder() {
    let substitutor = PlaceholderSubstitutor::default();
    assert_eq!(substitutor.placeholder(), "%tenant%");
}

#[test]
fn test_empty_placeholder_is_rejected() {
    assert_eq!(
        PlaceholderSubstitutor::with_placeholder(""),
        Err(Error::EmptyPlaceholder)
    );
}

#[test]
fn test_substitutes_nested_string_values() {
    let document = json!({
        "config": {
            "config_db_url": "postgresql:///?service=qwc_configdb",
            "qgis_projects_base_dir": "/data/%tenant%",
            "permissions_default_allow": true
        },
        "services": [
            {"name": "mapViewer", "config": {"qwc2_path": "/qwc2/%tenant%/"}},
            {"name": "ogc", "tags": ["%tenant%", "wms"]}
        ]
    });

    let result = substitute_tenant(&document, "alpha").unwrap();

    assert_eq!(result["config"]["qgis_projects_base_dir"], "/data/alpha");
    assert_eq!(result["config"]["permissions_default_allow"], true);
    assert_eq!(result["services"][0]["config"]["qwc2_path"], "/qwc2/alpha/");
    assert_eq!(result["services"][1]["tags"], json!(["alpha", "wms"]));
}

#[test]
fn test_multiple_occurrences_in_one_string() {
    let result = substitute_tenant(&json!("%tenant%-%tenant%"), "x").unwrap();
    assert_eq!(result, json!("x-x"));
}

#[test]
fn test_keys_and_non_string_values_are_untouched() {
    let document = json!({"%tenant%": {"n": 1, "b": false, "z": null}});
    let result = substitute_tenant(&document, "alpha").unwrap();
    assert_eq!(result, document);
}

/// Substitution of a plain identifier only changes placeholder occurrences.
#[test]
fn test_round_trip_with_plain_identifier() {
    let document = json!({"title": "Map of %tenant%", "zoom": 4, "layers": ["a", "b"]});
    let result = substitute_tenant(&document, "bob").unwrap();

    let reparsed: Value = serde_json::from_str(&result.to_string()).unwrap();
    assert_eq!(
        reparsed,
        json!({"title": "Map of bob", "zoom": 4, "layers": ["a", "b"]})
    );
}

/// Identifiers that need escaping in JSON text cannot corrupt the document.
#[test]
fn test_json_special_characters_are_safe() {
    let tenant = "we\"ird\\tenant";
    let result = substitute_tenant(&json!({"path": "/srv/%tenant%"}), tenant).unwrap();
    assert_eq!(result["path"], format!("/srv/{tenant}"));

    let reparsed: Value = serde_json::from_str(&result.to_string()).unwrap();
    assert_eq!(reparsed, result);
}

#[test]
fn test_key_order_is_preserved() {
    let document = json!({"z": "%tenant%", "a": 1, "m": "x"});
    let result = substitute_tenant(&document, "t").unwrap();
    let keys: Vec<&String> = result.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[test]
fn test_value_containing_placeholder_is_rejected() {
    let result = substitute_tenant(&json!({}), "a%tenant%");
    assert!(matches!(result, Err(Error::RecursiveSubstitution { .. })));
}

#[test]
fn test_custom_placeholder() {
    let substitutor = PlaceholderSubstitutor::with_placeholder("{{tenant}}").unwrap();
    let result = substitutor
        .substitute(&json!({"a": "{{tenant}} and %tenant%"}), "t1")
        .unwrap();
    assert_eq!(result, json!({"a": "t1 and %tenant%"}));
}

#[test]
fn test_contains_placeholder() {
    let substitutor = PlaceholderSubstitutor::new();
    assert!(substitutor.contains_placeholder(&json!({"a": [{"b": "x%tenant%"}]})));
    assert!(!substitutor.contains_placeholder(&json!({"%tenant%": "plain"})));
}
