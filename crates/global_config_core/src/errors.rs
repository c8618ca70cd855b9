//! Generation error types.
//!
//! Every failure the generator can run into while producing tenant
//! configuration. Errors are converted into report entries at the smallest
//! enclosing step; only a missing global document or HTML template (or a
//! rejected document under an enforcing validation policy) aborts a run.

use config_merger::MergeError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors raised while generating tenant configuration.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("File '{path}' does not exist.")]
    NotFound { path: String },

    #[error("Error loading {source_name}:\n{reason}")]
    Parse { source_name: String, reason: String },

    #[error("globalConfig.json is invalid against schema '{schema_url}':\n{}", messages.join("\n"))]
    Validation {
        schema_url: String,
        messages: Vec<String>,
    },

    #[error("Template substitution failed: {0}")]
    Template(#[from] template_engine::Error),

    #[error("Merge failed: {0}")]
    Merge(#[from] MergeError),

    #[error("Expected {expected} at '{path}' but found {found}")]
    IncompatibleDocument {
        path: String,
        expected: String,
        found: String,
    },

    #[error("I/O error on '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("Request to '{url}' failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("Unable to generate service configurations for tenant '{tenant}':\n{body}")]
    DownstreamFailure { tenant: String, body: String },

    #[error("Invalid specific config: {reason}")]
    InvalidTenant { reason: String },

    #[error("Invalid value '{value}' for {name}: {reason}")]
    InvalidSetting {
        name: String,
        value: String,
        reason: String,
    },
}

impl GenerationError {
    /// Wraps an I/O error together with the path it occurred on.
    pub fn io(path: impl AsRef<std::path::Path>, error: std::io::Error) -> Self {
        GenerationError::Io {
            path: path.as_ref().display().to_string(),
            reason: error.to_string(),
        }
    }
}

/// Result type alias for generation operations.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Human readable JSON type name used in structural error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
