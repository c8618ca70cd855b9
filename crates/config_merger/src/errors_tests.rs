use super::*;

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MergeError>();
}

#[test]
fn test_schema_parse_error_display() {
    let error = MergeError::SchemaParse {
        name: "qwc2config".to_string(),
        reason: "expected value at line 1 column 1".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Failed to parse merge schema 'qwc2config': expected value at line 1 column 1"
    );
}

#[test]
fn test_invalid_rule_error_display() {
    let error = MergeError::InvalidRule {
        path: "services".to_string(),
        reason: "path must start with '/'".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Invalid merge rule at 'services': path must start with '/'"
    );
}

#[test]
fn test_identity_merge_error_display() {
    let error = MergeError::IdentityMerge {
        path: "/services".to_string(),
        index: 2,
        id_ref: "name".to_string(),
        reason: "element has no 'name' field".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Array item 2 at '/services' cannot be merged by 'name': element has no 'name' field"
    );
}
