//! Schema-directed document merging for GlobalConfigGenerator.
//!
//! This crate merges a common baseline document with per-tenant overrides.
//! How arrays combine is not hard-coded: every [`ArtifactType`] carries a
//! packaged [`MergeSchema`] that names, per array location, whether arrays
//! are replaced, appended, or merged element-by-element on an identity field.

pub mod artifact;
pub mod errors;
pub mod merge_schema;
pub mod merger;

pub use artifact::ArtifactType;
pub use errors::{MergeError, MergeResult};
pub use merge_schema::{ArrayMergeStrategy, MergeSchema};
pub use merger::DocumentMerger;
