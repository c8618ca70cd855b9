//! Input documents and per-tenant output files.
//!
//! The input directory holds `globalConfig.json` and `index.html`. Every
//! tenant gets a subdirectory of the input directory holding its merged
//! documents and a verbatim copy of `index.html`.

use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{
    errors::{GenerationError, GenerationResult},
    global_config::GlobalConfig,
    tenant::TenantId,
};

#[cfg(test)]
#[path = "document_store_tests.rs"]
mod tests;

/// File name of the global configuration document.
pub const GLOBAL_CONFIG_FILENAME: &str = "globalConfig.json";

/// File name of the static HTML template.
pub const INDEX_HTML_FILENAME: &str = "index.html";

/// Reads input documents from, and writes tenant output below, one directory.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    input_dir: PathBuf,
}

impl DocumentStore {
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
        }
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn global_config_path(&self) -> PathBuf {
        self.input_dir.join(GLOBAL_CONFIG_FILENAME)
    }

    pub fn index_html_path(&self) -> PathBuf {
        self.input_dir.join(INDEX_HTML_FILENAME)
    }

    /// Output directory of `tenant`.
    pub fn tenant_dir(&self, tenant: &TenantId) -> PathBuf {
        self.input_dir.join(tenant.as_str())
    }

    /// Loads `globalConfig.json`, keeping the declared key order.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::NotFound` if the file is missing,
    /// `GenerationError::Io` if it cannot be read and
    /// `GenerationError::Parse` if it is not a valid global document.
    pub fn load_global_config(&self) -> GenerationResult<GlobalConfig> {
        let path = self.global_config_path();
        let content = read_existing(&path)?;

        let document: Value =
            serde_json::from_str(&content).map_err(|e| GenerationError::Parse {
                source_name: "GlobalConfigGenerator config".to_string(),
                reason: e.to_string(),
            })?;

        debug!(path = %path.display(), "Loaded global configuration");
        GlobalConfig::from_document(document)
    }

    /// Loads `index.html` verbatim.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::NotFound` if the file is missing and
    /// `GenerationError::Io` if it cannot be read.
    pub fn load_html_template(&self) -> GenerationResult<String> {
        read_existing(&self.index_html_path())
    }

    /// Creates the output directory of `tenant` if it does not exist yet.
    pub fn ensure_tenant_dir(&self, tenant: &TenantId) -> GenerationResult<PathBuf> {
        let dir = self.tenant_dir(tenant);
        fs::create_dir_all(&dir).map_err(|e| GenerationError::io(&dir, e))?;
        Ok(dir)
    }

    /// Writes `document` as four-space indented JSON into the tenant directory.
    pub fn write_json(
        &self,
        tenant: &TenantId,
        file_name: &str,
        document: &Value,
    ) -> GenerationResult<PathBuf> {
        let path = self.ensure_tenant_dir(tenant)?.join(file_name);
        let content = to_pretty_json(document).map_err(|e| GenerationError::Parse {
            source_name: file_name.to_string(),
            reason: e.to_string(),
        })?;
        fs::write(&path, content).map_err(|e| GenerationError::io(&path, e))?;
        Ok(path)
    }

    /// Writes `content` verbatim into the tenant directory.
    pub fn write_text(
        &self,
        tenant: &TenantId,
        file_name: &str,
        content: &str,
    ) -> GenerationResult<PathBuf> {
        let path = self.ensure_tenant_dir(tenant)?.join(file_name);
        fs::write(&path, content).map_err(|e| GenerationError::io(&path, e))?;
        Ok(path)
    }
}

fn read_existing(path: &Path) -> GenerationResult<String> {
    if !path.exists() {
        return Err(GenerationError::NotFound {
            path: path.display().to_string(),
        });
    }
    fs::read_to_string(path).map_err(|e| GenerationError::io(path, e))
}

fn to_pretty_json(document: &Value) -> serde_json::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    document.serialize(&mut serializer)?;
    Ok(buffer)
}
