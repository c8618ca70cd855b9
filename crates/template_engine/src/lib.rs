//! Template Engine for GlobalConfigGenerator
//!
//! This crate handles tenant placeholder substitution in JSON documents.
//! Common configuration documents may mention the reserved token `%tenant%`
//! anywhere inside string values; before a tenant's documents are merged the
//! token is replaced by the tenant identifier.
//!
//! Substitution walks the parsed document and only rewrites string leaf
//! values. Object keys, numbers and booleans are never touched, and because
//! the document is never re-serialized in between, identifiers containing
//! quotes, backslashes or other JSON-special characters cannot corrupt it.

use serde_json::{Map, Value};
use tracing::debug;

mod errors;
pub use errors::Error;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Reserved token replaced by the tenant identifier.
pub const TENANT_PLACEHOLDER: &str = "%tenant%";

/// Replaces a placeholder token inside the string values of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderSubstitutor {
    placeholder: String,
}

impl PlaceholderSubstitutor {
    /// Creates a substitutor for the reserved `%tenant%` token.
    pub fn new() -> Self {
        Self {
            placeholder: TENANT_PLACEHOLDER.to_string(),
        }
    }

    /// Creates a substitutor for a custom token.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyPlaceholder` if `placeholder` is empty.
    pub fn with_placeholder(placeholder: impl Into<String>) -> Result<Self, Error> {
        let placeholder = placeholder.into();
        if placeholder.is_empty() {
            return Err(Error::EmptyPlaceholder);
        }
        Ok(Self { placeholder })
    }

    /// The token this substitutor replaces.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Returns a copy of `document` with every occurrence of the placeholder
    /// inside string values replaced by `value`.
    ///
    /// # Errors
    ///
    /// Returns `Error::RecursiveSubstitution` if `value` itself contains the
    /// placeholder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_json::json;
    /// use template_engine::PlaceholderSubstitutor;
    ///
    /// let substitutor = PlaceholderSubstitutor::new();
    /// let document = json!({"db": "postgres:///%tenant%_config", "%tenant%": 1});
    ///
    /// let result = substitutor.substitute(&document, "alpha")?;
    /// assert_eq!(result, json!({"db": "postgres:///alpha_config", "%tenant%": 1}));
    /// # Ok::<(), template_engine::Error>(())
    /// ```
    pub fn substitute(&self, document: &Value, value: &str) -> Result<Value, Error> {
        if value.contains(&self.placeholder) {
            return Err(Error::RecursiveSubstitution {
                value: value.to_string(),
                placeholder: self.placeholder.clone(),
            });
        }

        let mut replaced = 0usize;
        let result = self.substitute_value(document, value, &mut replaced);
        debug!(
            placeholder = %self.placeholder,
            replacements = replaced,
            "Substituted placeholder in document"
        );
        Ok(result)
    }

    /// Returns true if any string value of `document` contains the placeholder.
    pub fn contains_placeholder(&self, document: &Value) -> bool {
        match document {
            Value::String(text) => text.contains(&self.placeholder),
            Value::Array(items) => items.iter().any(|item| self.contains_placeholder(item)),
            Value::Object(map) => map.values().any(|item| self.contains_placeholder(item)),
            _ => false,
        }
    }

    fn substitute_value(&self, document: &Value, value: &str, replaced: &mut usize) -> Value {
        match document {
            Value::String(text) if text.contains(&self.placeholder) => {
                *replaced += text.matches(&self.placeholder).count();
                Value::String(text.replace(&self.placeholder, value))
            }
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.substitute_value(item, value, replaced))
                    .collect(),
            ),
            Value::Object(map) => {
                let mut result = Map::with_capacity(map.len());
                for (key, item) in map {
                    result.insert(key.clone(), self.substitute_value(item, value, replaced));
                }
                Value::Object(result)
            }
            other => other.clone(),
        }
    }
}

impl Default for PlaceholderSubstitutor {
    fn default() -> Self {
        Self::new()
    }
}

/// Replaces `%tenant%` with `tenant` throughout `document`.
///
/// # Errors
///
/// See [`PlaceholderSubstitutor::substitute`].
pub fn substitute_tenant(document: &Value, tenant: &str) -> Result<Value, Error> {
    PlaceholderSubstitutor::new().substitute(document, tenant)
}
