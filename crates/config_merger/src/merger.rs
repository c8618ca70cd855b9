//! Schema-directed deep merge of JSON documents.
//!
//! The merger combines a base document (the common configuration shared by
//! every tenant) with an overlay document (the tenant's overrides):
//!
//! - **Objects** present on both sides are merged key by key, recursively.
//!   Keys only present in the base are kept, keys only present in the overlay
//!   are appended in overlay order.
//! - **Arrays** present on both sides are combined with the strategy the
//!   [`MergeSchema`] declares for their location, defaulting to replacement.
//! - **Everything else**, including type conflicts, resolves to the overlay
//!   value. There is no coercion.
//!
//! Merging is pure: both inputs are borrowed and a new document is returned.

use serde_json::{Map, Value};
use tracing::trace;

use crate::{
    errors::{MergeError, MergeResult},
    merge_schema::{child_pointer, ArrayMergeStrategy, MergeSchema, ANY_ELEMENT},
};

#[cfg(test)]
#[path = "merger_tests.rs"]
mod tests;

/// Document merging engine.
///
/// Stateless; a single instance can be shared across every tenant of a run.
///
/// # Examples
///
/// ```rust
/// use config_merger::{ArrayMergeStrategy, DocumentMerger, MergeSchema};
/// use serde_json::json;
///
/// let schema = MergeSchema::new().with_rule(
///     "/services",
///     ArrayMergeStrategy::MergeById { id_ref: "name".to_string() },
/// )?;
///
/// let base = json!({"services": [{"name": "a", "port": 1}]});
/// let overlay = json!({"services": [{"name": "a", "port": 2}, {"name": "b"}]});
///
/// let merged = DocumentMerger::new().merge(&base, &overlay, &schema)?;
/// assert_eq!(merged, json!({"services": [{"name": "a", "port": 2}, {"name": "b"}]}));
/// # Ok::<(), config_merger::MergeError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentMerger {}

impl DocumentMerger {
    /// Creates a new document merger.
    pub fn new() -> Self {
        Self {}
    }

    /// Deep-merges `overlay` on top of `base`.
    ///
    /// # Errors
    ///
    /// Returns `MergeError::IdentityMerge` when an array governed by a
    /// `mergeById` rule contains an overlay element that is not an object or
    /// carries no identity value.
    pub fn merge(&self, base: &Value, overlay: &Value, schema: &MergeSchema) -> MergeResult<Value> {
        self.merge_at("", base, overlay, schema)
    }

    fn merge_at(
        &self,
        pointer: &str,
        base: &Value,
        overlay: &Value,
        schema: &MergeSchema,
    ) -> MergeResult<Value> {
        match (base, overlay) {
            (Value::Object(base_map), Value::Object(overlay_map)) => {
                self.merge_objects(pointer, base_map, overlay_map, schema)
            }
            (Value::Array(base_items), Value::Array(overlay_items)) => {
                match schema.strategy_for(pointer) {
                    ArrayMergeStrategy::Replace => Ok(overlay.clone()),
                    ArrayMergeStrategy::Append => {
                        let mut items = base_items.clone();
                        items.extend(overlay_items.iter().cloned());
                        Ok(Value::Array(items))
                    }
                    ArrayMergeStrategy::MergeById { id_ref } => {
                        self.merge_by_id(pointer, base_items, overlay_items, id_ref, schema)
                    }
                }
            }
            _ => Ok(overlay.clone()),
        }
    }

    fn merge_objects(
        &self,
        pointer: &str,
        base: &Map<String, Value>,
        overlay: &Map<String, Value>,
        schema: &MergeSchema,
    ) -> MergeResult<Value> {
        let mut merged = base.clone();

        for (key, overlay_value) in overlay {
            let value = match base.get(key) {
                Some(base_value) => {
                    let child = child_pointer(pointer, key);
                    self.merge_at(&child, base_value, overlay_value, schema)?
                }
                None => overlay_value.clone(),
            };
            merged.insert(key.clone(), value);
        }

        Ok(Value::Object(merged))
    }

    fn merge_by_id(
        &self,
        pointer: &str,
        base: &[Value],
        overlay: &[Value],
        id_ref: &str,
        schema: &MergeSchema,
    ) -> MergeResult<Value> {
        let element_pointer = child_pointer(pointer, ANY_ELEMENT);
        let mut merged = base.to_vec();

        for (index, item) in overlay.iter().enumerate() {
            let id = identity_of(item, id_ref).ok_or_else(|| MergeError::IdentityMerge {
                path: pointer.to_string(),
                index,
                id_ref: id_ref.to_string(),
                reason: if item.is_object() {
                    format!("element has no '{id_ref}' field")
                } else {
                    "element is not an object".to_string()
                },
            })?;

            match merged
                .iter()
                .position(|existing| identity_of(existing, id_ref) == Some(id))
            {
                Some(position) => {
                    trace!(path = pointer, id = %id, "Merging array element by identity");
                    let combined =
                        self.merge_at(&element_pointer, &merged[position], item, schema)?;
                    merged[position] = combined;
                }
                None => merged.push(item.clone()),
            }
        }

        Ok(Value::Array(merged))
    }
}

fn identity_of<'a>(item: &'a Value, id_ref: &str) -> Option<&'a Value> {
    item.as_object()?
        .get(id_ref)
        .filter(|value| !value.is_null())
}
