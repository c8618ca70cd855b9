use super::*;

#[test]
fn test_error_debug_format() {
    let error = Error::RecursiveSubstitution {
        value: "a%tenant%".to_string(),
        placeholder: "%tenant%".to_string(),
    };
    let debug_output = format!("{error:?}");
    assert!(debug_output.contains("RecursiveSubstitution"));
    assert!(debug_output.contains("a%tenant%"));
}

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Error>();
}

#[test]
fn test_empty_placeholder_error_display() {
    assert_eq!(
        Error::EmptyPlaceholder.to_string(),
        "Placeholder token cannot be empty"
    );
}

#[test]
fn test_recursive_substitution_error_display() {
    let error = Error::RecursiveSubstitution {
        value: "x%tenant%".to_string(),
        placeholder: "%tenant%".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Substitution value 'x%tenant%' contains the placeholder '%tenant%'"
    );
}
