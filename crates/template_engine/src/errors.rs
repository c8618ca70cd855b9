use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Error types that can occur while preparing a placeholder substitution.
///
/// Substitution itself walks parsed documents and cannot produce invalid
/// JSON, so every error is raised before a document is touched.
///
/// # Examples
///
/// ```rust
/// use template_engine::{Error, PlaceholderSubstitutor};
///
/// match PlaceholderSubstitutor::with_placeholder("") {
///     Err(Error::EmptyPlaceholder) => {}
///     _ => panic!("an empty placeholder must be rejected"),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The placeholder token is empty and would match everywhere.
    #[error("Placeholder token cannot be empty")]
    EmptyPlaceholder,

    /// The substituted value would reintroduce the placeholder.
    #[error("Substitution value '{value}' contains the placeholder '{placeholder}'")]
    RecursiveSubstitution {
        /// The value that was to be substituted
        value: String,
        /// The placeholder token it contains
        placeholder: String,
    },
}
