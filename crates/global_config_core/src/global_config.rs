//! The global configuration document.
//!
//! ```json
//! {
//!   "$schema": "https://example.com/global-config.schema.json",
//!   "config": { "config_generator_service_url": "http://qwc-config-service:9090" },
//!   "common_config": {
//!     "config-generator-service": { ... },
//!     "qwc2config": { ... }
//!   },
//!   "specific_configs": [
//!     { "tenant": "alpha", "qwc2config": { ... } }
//!   ]
//! }
//! ```

use config_merger::ArtifactType;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    errors::{json_type_name, GenerationError, GenerationResult},
    tenant::{TenantId, MISSING_TENANT_MESSAGE},
};

#[cfg(test)]
#[path = "global_config_tests.rs"]
mod tests;

/// Generator settings carried by the `config` section of the document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GeneratorSection {
    /// Base URL of the downstream config generator service.
    #[serde(default)]
    pub config_generator_service_url: Option<String>,

    /// URL of the JSON Schema the whole document is validated against.
    #[serde(default)]
    pub schema_url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Parsed global configuration document.
///
/// Keeps the raw document (for schema validation) next to the typed view.
/// Key order of the raw document is preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalConfig {
    document: Value,
    schema: Option<String>,
    config: GeneratorSection,
    common_config: Map<String, Value>,
    specific_configs: Vec<Value>,
}

#[derive(Deserialize)]
struct RawGlobalConfig {
    #[serde(rename = "$schema", default)]
    schema: Option<String>,
    #[serde(default)]
    config: GeneratorSection,
    #[serde(default)]
    common_config: Map<String, Value>,
    #[serde(default)]
    specific_configs: Vec<Value>,
}

impl GlobalConfig {
    /// Builds the typed view of a parsed document.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Parse` if the document is not an object or
    /// one of its sections has the wrong shape.
    pub fn from_document(document: Value) -> GenerationResult<Self> {
        if !document.is_object() {
            return Err(GenerationError::Parse {
                source_name: "globalConfig.json".to_string(),
                reason: format!("expected an object, found {}", json_type_name(&document)),
            });
        }

        let raw: RawGlobalConfig =
            serde_json::from_value(document.clone()).map_err(|e| GenerationError::Parse {
                source_name: "globalConfig.json".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            document,
            schema: raw.schema,
            config: raw.config,
            common_config: raw.common_config,
            specific_configs: raw.specific_configs,
        })
    }

    /// The document exactly as it was read.
    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn generator_settings(&self) -> &GeneratorSection {
        &self.config
    }

    /// Schema reference: `config.schema_url`, falling back to the root `$schema`.
    pub fn schema_url(&self) -> Option<&str> {
        self.config
            .schema_url
            .as_deref()
            .or(self.schema.as_deref())
            .filter(|url| !url.trim().is_empty())
    }

    /// Downstream service URL declared by the document, if any.
    pub fn config_generator_service_url(&self) -> Option<&str> {
        self.config
            .config_generator_service_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }

    pub fn common_config(&self) -> &Map<String, Value> {
        &self.common_config
    }

    /// Baseline document for `artifact`, an empty object when absent.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::IncompatibleDocument` if the section exists
    /// but is not an object.
    pub fn common_section(&self, artifact: ArtifactType) -> GenerationResult<Value> {
        section_of(&self.common_config, artifact, "common_config")
    }

    /// Per-tenant override entries in declaration order.
    pub fn specific_configs(&self) -> &[Value] {
        &self.specific_configs
    }
}

/// A single `specific_configs` entry with a validated tenant.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecificConfig<'a> {
    pub tenant: TenantId,
    entry: &'a Map<String, Value>,
}

impl<'a> SpecificConfig<'a> {
    /// Validates one `specific_configs` entry.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::InvalidTenant` if the entry is not an object
    /// or its `tenant` field is missing, empty or unusable.
    pub fn from_entry(entry: &'a Value) -> GenerationResult<Self> {
        let entry = entry.as_object().ok_or_else(|| GenerationError::InvalidTenant {
            reason: format!(
                "specific config must be an object, found {}",
                json_type_name(entry)
            ),
        })?;

        let tenant = match entry.get("tenant") {
            Some(Value::String(id)) => TenantId::try_new(id.as_str())?,
            _ => {
                return Err(GenerationError::InvalidTenant {
                    reason: MISSING_TENANT_MESSAGE.to_string(),
                })
            }
        };

        Ok(Self { tenant, entry })
    }

    /// Override document for `artifact`, an empty object when absent.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::IncompatibleDocument` if the section exists
    /// but is not an object.
    pub fn section(&self, artifact: ArtifactType) -> GenerationResult<Value> {
        section_of(
            self.entry,
            artifact,
            &format!("specific_configs[{}]", self.tenant),
        )
    }
}

fn section_of(
    map: &Map<String, Value>,
    artifact: ArtifactType,
    parent: &str,
) -> GenerationResult<Value> {
    match map.get(artifact.section_key()) {
        None | Some(Value::Null) => Ok(Value::Object(Map::new())),
        Some(section @ Value::Object(_)) => Ok(section.clone()),
        Some(other) => Err(GenerationError::IncompatibleDocument {
            path: format!("{parent}/{}", artifact.section_key()),
            expected: "an object".to_string(),
            found: json_type_name(other).to_string(),
        }),
    }
}
