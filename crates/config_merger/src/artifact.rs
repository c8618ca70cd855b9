//! Output artifacts produced for every tenant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{
    errors::{MergeError, MergeResult},
    merge_schema::MergeSchema,
};

#[cfg(test)]
#[path = "artifact_tests.rs"]
mod tests;

/// Identifies one merged document written into a tenant's output directory.
///
/// Each artifact has its own section in the global configuration document,
/// its own output file name and its own packaged merge-strategy document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactType {
    /// Input document of the downstream config generator service.
    #[serde(rename = "config-generator-service")]
    ConfigGeneratorService,

    /// Front-end (map viewer) configuration.
    #[serde(rename = "qwc2config")]
    Qwc2Config,
}

impl ArtifactType {
    /// Artifacts in generation order.
    pub const ALL: [ArtifactType; 2] = [ArtifactType::ConfigGeneratorService, ArtifactType::Qwc2Config];

    /// Key of this artifact in `common_config` and in each specific config.
    pub fn section_key(&self) -> &'static str {
        match self {
            ArtifactType::ConfigGeneratorService => "config-generator-service",
            ArtifactType::Qwc2Config => "qwc2config",
        }
    }

    /// File name written into the tenant's output directory.
    pub fn output_file_name(&self) -> &'static str {
        match self {
            ArtifactType::ConfigGeneratorService => "tenantConfig.json",
            ArtifactType::Qwc2Config => "config.json",
        }
    }

    fn merge_schema_source(&self) -> &'static str {
        match self {
            ArtifactType::ConfigGeneratorService => {
                include_str!("../merge_schemas/config_generator_service.json")
            }
            ArtifactType::Qwc2Config => include_str!("../merge_schemas/qwc2_config.json"),
        }
    }

    /// Parses the packaged merge-strategy document for this artifact.
    ///
    /// # Errors
    ///
    /// Returns a `MergeError` if the packaged document is malformed.
    pub fn merge_schema(&self) -> MergeResult<MergeSchema> {
        MergeSchema::from_json_str(self.section_key(), self.merge_schema_source())
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section_key())
    }
}

impl FromStr for ArtifactType {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArtifactType::ALL
            .into_iter()
            .find(|artifact| artifact.section_key() == s)
            .ok_or_else(|| MergeError::SchemaParse {
                name: s.to_string(),
                reason: "unknown artifact type".to_string(),
            })
    }
}
