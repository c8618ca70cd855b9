//! Typed merge-strategy documents.
//!
//! A merge schema tells the [`DocumentMerger`](crate::DocumentMerger) how to
//! combine arrays found at specific locations of a document. Locations are
//! RFC 6901 pointers from the document root. When the merger recurses into
//! the elements of an identity-merged array, the element segment is written
//! as `*`, so rules below such an array look like `/services/*/resources/...`.
//!
//! ```json
//! {
//!   "arrays": {
//!     "/services": { "strategy": "mergeById", "idRef": "name" },
//!     "/searchProviders": { "strategy": "append" }
//!   }
//! }
//! ```
//!
//! Any array without a rule is replaced wholesale by the overlay.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{MergeError, MergeResult};

#[cfg(test)]
#[path = "merge_schema_tests.rs"]
mod tests;

/// Segment used for "any element" of an identity-merged array.
pub const ANY_ELEMENT: &str = "*";

/// How two arrays found at the same location are combined.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "camelCase")]
pub enum ArrayMergeStrategy {
    /// The overlay array replaces the base array entirely.
    #[default]
    Replace,

    /// Overlay elements are appended after the base elements.
    Append,

    /// Objects sharing the same value of `id_ref` are merged recursively,
    /// overlay elements without a match are appended.
    MergeById {
        #[serde(rename = "idRef")]
        id_ref: String,
    },
}

/// Array merge rules for one artifact type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MergeSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    #[serde(default)]
    arrays: BTreeMap<String, ArrayMergeStrategy>,
}

impl MergeSchema {
    /// Creates an empty schema. Every array is replaced by the overlay.
    pub const fn new() -> Self {
        Self {
            description: None,
            arrays: BTreeMap::new(),
        }
    }

    /// Parses and checks a merge-strategy document.
    ///
    /// `name` only identifies the document in error messages.
    ///
    /// # Errors
    ///
    /// Returns `MergeError::SchemaParse` for malformed JSON or unknown
    /// strategies, and `MergeError::InvalidRule` for rules that can never
    /// apply (relative paths, empty identity fields).
    pub fn from_json_str(name: &str, source: &str) -> MergeResult<Self> {
        let schema: MergeSchema =
            serde_json::from_str(source).map_err(|e| MergeError::SchemaParse {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        schema.check_rules()?;
        Ok(schema)
    }

    /// Adds or replaces the rule for `path`.
    ///
    /// # Errors
    ///
    /// Returns `MergeError::InvalidRule` when the rule can never apply.
    pub fn with_rule(
        mut self,
        path: impl Into<String>,
        strategy: ArrayMergeStrategy,
    ) -> MergeResult<Self> {
        let path = path.into();
        check_rule(&path, &strategy)?;
        self.arrays.insert(path, strategy);
        Ok(self)
    }

    /// Returns the strategy for the array at `pointer`.
    pub fn strategy_for(&self, pointer: &str) -> &ArrayMergeStrategy {
        static REPLACE: ArrayMergeStrategy = ArrayMergeStrategy::Replace;
        self.arrays.get(pointer).unwrap_or(&REPLACE)
    }

    /// Returns the human readable description of the document, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Number of explicit rules.
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    /// Returns true when every array is merged by replacement.
    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    fn check_rules(&self) -> MergeResult<()> {
        for (path, strategy) in &self.arrays {
            check_rule(path, strategy)?;
        }
        Ok(())
    }
}

fn check_rule(path: &str, strategy: &ArrayMergeStrategy) -> MergeResult<()> {
    if !path.is_empty() && !path.starts_with('/') {
        return Err(MergeError::InvalidRule {
            path: path.to_string(),
            reason: "path must be empty or start with '/'".to_string(),
        });
    }

    if let ArrayMergeStrategy::MergeById { id_ref } = strategy {
        if id_ref.trim().is_empty() {
            return Err(MergeError::InvalidRule {
                path: path.to_string(),
                reason: "'idRef' must name a field".to_string(),
            });
        }
    }

    Ok(())
}

/// Appends one escaped reference token to a JSON pointer.
pub fn child_pointer(parent: &str, segment: &str) -> String {
    let escaped = segment.replace('~', "~0").replace('/', "~1");
    format!("{parent}/{escaped}")
}
