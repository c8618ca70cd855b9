//! Per-tenant generation pipeline.
//!
//! Every tenant walks the same strictly sequential stages:
//!
//! ```text
//! Start -> TemplateApplied -> GeneratorMerged -> FrontendMerged
//!       -> FilesWritten -> DownstreamTriggered -> Classified -> Done
//! ```
//!
//! A failing stage is reported as a single error entry naming the tenant and
//! the step, and the tenant is abandoned. Nothing a tenant does can affect
//! the tenants processed after it.

use config_merger::{ArtifactType, DocumentMerger, MergeSchema};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use template_engine::PlaceholderSubstitutor;
use tracing::{debug, info_span, Instrument};

use crate::{
    document_store::{DocumentStore, INDEX_HTML_FILENAME},
    downstream::{DownstreamGenerator, DownstreamResponse},
    errors::{json_type_name, GenerationError, GenerationResult},
    global_config::{GlobalConfig, SpecificConfig},
    report_log::{LogLevel, ReportLog},
    tenant::TenantId,
};

#[cfg(test)]
#[path = "tenant_pipeline_tests.rs"]
mod tests;

/// Position of one tenant in the generation sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TenantStage {
    Start,
    TemplateApplied,
    GeneratorMerged,
    FrontendMerged,
    FilesWritten,
    DownstreamTriggered,
    Classified,
    Done,
}

impl TenantStage {
    /// The stage reached once this one succeeds. `Done` is terminal.
    pub fn next(self) -> Option<Self> {
        match self {
            TenantStage::Start => Some(TenantStage::TemplateApplied),
            TenantStage::TemplateApplied => Some(TenantStage::GeneratorMerged),
            TenantStage::GeneratorMerged => Some(TenantStage::FrontendMerged),
            TenantStage::FrontendMerged => Some(TenantStage::FilesWritten),
            TenantStage::FilesWritten => Some(TenantStage::DownstreamTriggered),
            TenantStage::DownstreamTriggered => Some(TenantStage::Classified),
            TenantStage::Classified => Some(TenantStage::Done),
            TenantStage::Done => None,
        }
    }

    /// Step performed to leave this stage, as used in failure reports.
    pub fn action(&self) -> &'static str {
        match self {
            TenantStage::Start => "apply tenant template",
            TenantStage::TemplateApplied => "merge tenantConfig.json",
            TenantStage::GeneratorMerged => "merge config.json",
            TenantStage::FrontendMerged => "write config files",
            TenantStage::FilesWritten => "trigger config generation",
            TenantStage::DownstreamTriggered => "classify config generation response",
            TenantStage::Classified | TenantStage::Done => "finish",
        }
    }
}

/// Result of running one `specific_configs` entry through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantOutcome {
    /// Every stage ran; `level` is the classification of the downstream response.
    Completed { tenant: TenantId, level: LogLevel },

    /// The step leaving `stage` failed.
    Failed { tenant: TenantId, stage: TenantStage },

    /// The entry carried no usable tenant and was not processed.
    Skipped,
}

/// Merge-strategy documents shared by every tenant of a run.
#[derive(Debug, Clone, Default)]
pub struct MergeSchemas {
    schemas: HashMap<ArtifactType, MergeSchema>,
}

impl MergeSchemas {
    /// Loads the packaged strategy document of every artifact type.
    ///
    /// A document that cannot be parsed is reported and replaced by the
    /// empty schema, so its arrays are replaced wholesale.
    pub fn packaged(log: &mut ReportLog) -> Self {
        let mut schemas = HashMap::new();
        for artifact in ArtifactType::ALL {
            let schema = artifact.merge_schema().unwrap_or_else(|error| {
                log.error(format!(
                    "Error loading merge schema for {artifact} config:\n{error}"
                ));
                MergeSchema::new()
            });
            schemas.insert(artifact, schema);
        }
        Self { schemas }
    }

    pub fn with_schema(mut self, artifact: ArtifactType, schema: MergeSchema) -> Self {
        self.schemas.insert(artifact, schema);
        self
    }

    /// Strategy document for `artifact`; the empty schema if none was loaded.
    pub fn for_artifact(&self, artifact: ArtifactType) -> &MergeSchema {
        static EMPTY: MergeSchema = MergeSchema::new();
        self.schemas.get(&artifact).unwrap_or(&EMPTY)
    }
}

/// Working state of a single tenant. Dropped once the tenant is done.
#[derive(Debug, Clone)]
pub struct TenantContext {
    tenant: TenantId,
    stage: TenantStage,
    common: HashMap<ArtifactType, Value>,
    overrides: HashMap<ArtifactType, Value>,
    merged: HashMap<ArtifactType, Value>,
    written: Vec<PathBuf>,
    response: Option<DownstreamResponse>,
    level: LogLevel,
}

impl TenantContext {
    pub fn new(tenant: TenantId) -> Self {
        Self {
            tenant,
            stage: TenantStage::Start,
            common: HashMap::new(),
            overrides: HashMap::new(),
            merged: HashMap::new(),
            written: Vec::new(),
            response: None,
            level: LogLevel::Info,
        }
    }

    pub fn tenant(&self) -> &TenantId {
        &self.tenant
    }

    pub fn stage(&self) -> TenantStage {
        self.stage
    }

    /// Merged document for `artifact`, once its merge stage has run.
    pub fn merged(&self, artifact: ArtifactType) -> Option<&Value> {
        self.merged.get(&artifact)
    }

    /// Files written so far, in write order.
    pub fn written_files(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn response(&self) -> Option<&DownstreamResponse> {
        self.response.as_ref()
    }

    fn advance(&mut self) {
        if let Some(next) = self.stage.next() {
            self.stage = next;
        }
    }
}

/// Runs `specific_configs` entries through the generation stages.
///
/// Borrows everything that is shared across a run; one pipeline serves every
/// tenant of that run.
pub struct TenantPipeline<'a> {
    store: &'a DocumentStore,
    config: &'a GlobalConfig,
    html: &'a str,
    schemas: &'a MergeSchemas,
    downstream: &'a dyn DownstreamGenerator,
    service_url: &'a str,
    merger: DocumentMerger,
    substitutor: PlaceholderSubstitutor,
}

impl<'a> TenantPipeline<'a> {
    pub fn new(
        store: &'a DocumentStore,
        config: &'a GlobalConfig,
        html: &'a str,
        schemas: &'a MergeSchemas,
        downstream: &'a dyn DownstreamGenerator,
        service_url: &'a str,
    ) -> Self {
        Self {
            store,
            config,
            html,
            schemas,
            downstream,
            service_url,
            merger: DocumentMerger::new(),
            substitutor: PlaceholderSubstitutor::new(),
        }
    }

    /// Processes one `specific_configs` entry, reporting into `log`.
    pub async fn process(&self, entry: &Value, log: &mut ReportLog) -> TenantOutcome {
        let specific = match SpecificConfig::from_entry(entry) {
            Ok(specific) => specific,
            Err(GenerationError::InvalidTenant { reason }) => {
                log.error(reason);
                return TenantOutcome::Skipped;
            }
            Err(other) => {
                log.error(other.to_string());
                return TenantOutcome::Skipped;
            }
        };

        let span = info_span!("tenant", tenant = %specific.tenant);
        self.run_stages(&specific, log).instrument(span).await
    }

    async fn run_stages(&self, specific: &SpecificConfig<'_>, log: &mut ReportLog) -> TenantOutcome {
        let mut context = TenantContext::new(specific.tenant.clone());

        while context.stage != TenantStage::Done {
            let stage = context.stage;
            debug!(stage = ?stage, "Running tenant stage");

            if let Err(error) = self.run_stage(&mut context, specific, log).await {
                log.error(format!(
                    "Failed to {} for tenant '{}': {}",
                    stage.action(),
                    context.tenant,
                    error
                ));
                return TenantOutcome::Failed {
                    tenant: context.tenant,
                    stage,
                };
            }
            context.advance();
        }

        TenantOutcome::Completed {
            tenant: context.tenant,
            level: context.level,
        }
    }

    async fn run_stage(
        &self,
        context: &mut TenantContext,
        specific: &SpecificConfig<'_>,
        log: &mut ReportLog,
    ) -> GenerationResult<()> {
        match context.stage {
            TenantStage::Start => self.apply_template(context, specific),
            TenantStage::TemplateApplied => {
                self.merge_artifact(context, ArtifactType::ConfigGeneratorService)
            }
            TenantStage::GeneratorMerged => self.merge_artifact(context, ArtifactType::Qwc2Config),
            TenantStage::FrontendMerged => self.write_files(context, log),
            TenantStage::FilesWritten => {
                let response = self
                    .downstream
                    .generate_configs(self.service_url, &context.tenant)
                    .await?;
                context.response = Some(response);
                Ok(())
            }
            TenantStage::DownstreamTriggered => {
                self.classify(context, log);
                Ok(())
            }
            TenantStage::Classified | TenantStage::Done => Ok(()),
        }
    }

    /// Substitutes the tenant into the common sections and collects the
    /// tenant's overrides, with the tenant injected into the generator's
    /// `config.tenant`.
    fn apply_template(
        &self,
        context: &mut TenantContext,
        specific: &SpecificConfig<'_>,
    ) -> GenerationResult<()> {
        for artifact in ArtifactType::ALL {
            let common = self.config.common_section(artifact)?;
            let common = self.substitutor.substitute(&common, &context.tenant)?;
            context.common.insert(artifact, common);

            let mut overlay = specific.section(artifact)?;
            if artifact == ArtifactType::ConfigGeneratorService {
                inject_tenant(&mut overlay, &context.tenant, artifact)?;
            }
            context.overrides.insert(artifact, overlay);
        }
        Ok(())
    }

    fn merge_artifact(&self, context: &mut TenantContext, artifact: ArtifactType) -> GenerationResult<()> {
        let empty = Value::Object(Map::new());
        let base = context.common.get(&artifact).unwrap_or(&empty);
        let overlay = context.overrides.get(&artifact).unwrap_or(&empty);

        let merged = self
            .merger
            .merge(base, overlay, self.schemas.for_artifact(artifact))?;
        debug!(artifact = %artifact, "Merged tenant document");
        context.merged.insert(artifact, merged);
        Ok(())
    }

    /// Writes both merged documents and the HTML copy. Files written before
    /// a failure are left in place.
    fn write_files(&self, context: &mut TenantContext, log: &mut ReportLog) -> GenerationResult<()> {
        let tenant = context.tenant.clone();

        for artifact in ArtifactType::ALL {
            let file_name = artifact.output_file_name();
            let document = context.merged.get(&artifact).ok_or_else(|| {
                GenerationError::IncompatibleDocument {
                    path: file_name.to_string(),
                    expected: "a merged document".to_string(),
                    found: "nothing".to_string(),
                }
            })?;

            let path = self.store.write_json(&tenant, file_name, document)?;
            log.info(format!("{file_name} merged for tenant '{tenant}'"));
            log.debug(format!("Merged {file_name} path is '{}'", path.display()));
            context.written.push(path);
        }

        let path = self.store.write_text(&tenant, INDEX_HTML_FILENAME, self.html)?;
        log.info(format!("{INDEX_HTML_FILENAME} created for tenant '{tenant}'."));
        log.debug(format!("{INDEX_HTML_FILENAME} path is '{}'", path.display()));
        context.written.push(path);

        Ok(())
    }

    /// Records exactly one entry describing the downstream response.
    fn classify(&self, context: &mut TenantContext, log: &mut ReportLog) {
        let Some(response) = context.response.as_ref() else {
            return;
        };
        let tenant = &context.tenant;
        let level = response.classify();

        match level {
            LogLevel::Debug | LogLevel::Info => log.info(format!(
                "Config files and permissions generated for tenant '{tenant}'."
            )),
            LogLevel::Warning => log.warning(format!(
                "Config files and permissions generated for tenant '{tenant}' with warnings:\n{}",
                response.body
            )),
            LogLevel::Error | LogLevel::Critical => {
                let failure = GenerationError::DownstreamFailure {
                    tenant: tenant.to_string(),
                    body: response.body.clone(),
                };
                log.record(level, failure.to_string());
            }
        }

        context.level = level;
    }
}

/// Sets `config.tenant` of a config-generator override document.
fn inject_tenant(overlay: &mut Value, tenant: &TenantId, artifact: ArtifactType) -> GenerationResult<()> {
    let incompatible = |path: String, found: &Value| GenerationError::IncompatibleDocument {
        path,
        expected: "an object".to_string(),
        found: json_type_name(found).to_string(),
    };

    let Value::Object(section) = overlay else {
        return Err(incompatible(artifact.section_key().to_string(), overlay));
    };

    let config = section
        .entry("config")
        .or_insert_with(|| Value::Object(Map::new()));
    if config.is_null() {
        *config = Value::Object(Map::new());
    }

    match config {
        Value::Object(config) => {
            config.insert("tenant".to_string(), Value::String(tenant.to_string()));
            Ok(())
        }
        other => Err(incompatible(
            format!("{}/config", artifact.section_key()),
            other,
        )),
    }
}
