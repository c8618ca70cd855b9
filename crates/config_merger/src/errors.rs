//! Merge system error types.
//!
//! Errors raised while loading merge-strategy documents or while applying
//! an identity-keyed array merge to two documents.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur while loading merge schemas or merging documents.
///
/// Type conflicts between the base and overlay documents are not errors: the
/// overlay value always wins. Only structurally incompatible input at a path
/// governed by an identity-merge rule is reported.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MergeError {
    /// A merge-strategy document could not be parsed.
    #[error("Failed to parse merge schema '{name}': {reason}")]
    SchemaParse { name: String, reason: String },

    /// A merge-strategy document contains a rule that can never apply.
    #[error("Invalid merge rule at '{path}': {reason}")]
    InvalidRule { path: String, reason: String },

    /// An overlay array element cannot take part in an identity merge.
    #[error("Array item {index} at '{path}' cannot be merged by '{id_ref}': {reason}")]
    IdentityMerge {
        path: String,
        index: usize,
        id_ref: String,
        reason: String,
    },
}

/// Result type alias for merge operations.
pub type MergeResult<T> = Result<T, MergeError>;
