use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let values: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| values.get(name).cloned()
}

#[test]
fn test_defaults_when_nothing_is_set() {
    let settings = GeneratorSettings::from_lookup(lookup_from(&[])).unwrap();

    assert_eq!(settings, GeneratorSettings::default());
    assert_eq!(settings.input_dir, PathBuf::from("config-in/"));
    assert_eq!(
        settings.config_generator_service_url,
        "http://qwc-config-service:9090"
    );
    assert_eq!(settings.request_timeout, Duration::from_secs(30));
    assert_eq!(settings.validation_policy, ValidationPolicy::Advisory);
}

#[test]
fn test_all_variables_are_read() {
    let settings = GeneratorSettings::from_lookup(lookup_from(&[
        ("INPUT_CONFIG_PATH", "/srv/config-in"),
        ("CONFIG_GENERATOR_SERVICE_URL", "http://localhost:5010"),
        ("REQUEST_TIMEOUT_SECS", "5"),
        ("SCHEMA_VALIDATION", "Enforce"),
    ]))
    .unwrap();

    assert_eq!(settings.input_dir, PathBuf::from("/srv/config-in"));
    assert_eq!(settings.config_generator_service_url, "http://localhost:5010");
    assert_eq!(settings.request_timeout, Duration::from_secs(5));
    assert_eq!(settings.validation_policy, ValidationPolicy::Enforce);
}

#[test]
fn test_blank_values_fall_back_to_defaults() {
    let settings = GeneratorSettings::from_lookup(lookup_from(&[
        ("INPUT_CONFIG_PATH", "  "),
        ("SCHEMA_VALIDATION", ""),
    ]))
    .unwrap();

    assert_eq!(settings, GeneratorSettings::default());
}

#[test]
fn test_invalid_timeout_is_rejected() {
    for value in ["soon", "-1", "0"] {
        let result =
            GeneratorSettings::from_lookup(lookup_from(&[("REQUEST_TIMEOUT_SECS", value)]));
        assert!(
            matches!(result, Err(GenerationError::InvalidSetting { ref name, .. }) if name == "REQUEST_TIMEOUT_SECS"),
            "value {value:?} should be rejected"
        );
    }
}

#[test]
fn test_validation_policy_parsing() {
    assert_eq!("advisory".parse::<ValidationPolicy>().unwrap(), ValidationPolicy::Advisory);
    assert_eq!(" ENFORCE ".parse::<ValidationPolicy>().unwrap(), ValidationPolicy::Enforce);
    assert!("strict".parse::<ValidationPolicy>().is_err());
    assert_eq!(ValidationPolicy::Enforce.to_string(), "enforce");
}

#[test]
fn test_builder_methods() {
    let settings = GeneratorSettings::for_input_dir("/tmp/in")
        .with_config_generator_service_url("http://svc")
        .with_request_timeout(Duration::from_secs(2))
        .with_validation_policy(ValidationPolicy::Enforce);

    assert_eq!(settings.input_dir, PathBuf::from("/tmp/in"));
    assert_eq!(settings.config_generator_service_url, "http://svc");
    assert_eq!(settings.request_timeout, Duration::from_secs(2));
    assert_eq!(settings.validation_policy, ValidationPolicy::Enforce);
}
