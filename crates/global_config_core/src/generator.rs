//! Run orchestration.
//!
//! A [`GlobalConfigGenerator`] is built fresh for every trigger. It reads the
//! input documents once, validates the global document, and then runs every
//! declared tenant through the [`TenantPipeline`] in declaration order.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::{
    document_store::DocumentStore,
    downstream::{DownstreamGenerator, HttpDownstreamGenerator},
    errors::{GenerationError, GenerationResult},
    global_config::GlobalConfig,
    report_log::ReportLog,
    schema_validator::{HttpSchemaFetcher, SchemaFetcher, SchemaValidator},
    settings::{GeneratorSettings, ValidationPolicy},
    tenant_pipeline::{MergeSchemas, TenantOutcome, TenantPipeline},
};

#[cfg(test)]
#[path = "generator_tests.rs"]
mod tests;

/// Reported when the run cannot start without its input documents.
pub const INPUTS_MISSING_MESSAGE: &str = "globalConfig.json or index.html not defined.";

/// External services a run talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub schema_fetcher: Arc<dyn SchemaFetcher>,
    pub downstream: Arc<dyn DownstreamGenerator>,
}

impl Collaborators {
    pub fn new(
        schema_fetcher: Arc<dyn SchemaFetcher>,
        downstream: Arc<dyn DownstreamGenerator>,
    ) -> Self {
        Self {
            schema_fetcher,
            downstream,
        }
    }

    /// HTTP collaborators whose requests time out after `timeout`.
    pub fn http(timeout: Duration) -> GenerationResult<Self> {
        Ok(Self {
            schema_fetcher: Arc::new(HttpSchemaFetcher::new(timeout)?),
            downstream: Arc::new(HttpDownstreamGenerator::new(timeout)?),
        })
    }
}

/// Tenant counts of a run that got past its input documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub tenants_declared: usize,
    pub completed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &TenantOutcome) {
        match outcome {
            TenantOutcome::Completed { .. } => self.completed += 1,
            TenantOutcome::Failed { .. } => self.failed += 1,
            TenantOutcome::Skipped => self.skipped += 1,
        }
    }
}

/// Everything a run hands back to its trigger.
#[derive(Debug)]
pub struct GenerationReport {
    log: ReportLog,
    result: GenerationResult<RunSummary>,
}

impl GenerationReport {
    /// True unless the run was aborted before attempting its tenants.
    ///
    /// Tenant failures are part of a successful run's report.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn log(&self) -> &ReportLog {
        &self.log
    }

    pub fn summary(&self) -> Option<&RunSummary> {
        self.result.as_ref().ok()
    }

    /// Why the run was aborted, if it was.
    pub fn error(&self) -> Option<&GenerationError> {
        self.result.as_ref().err()
    }

    /// The `LEVEL: message` report text.
    pub fn render(&self) -> String {
        self.log.render()
    }
}

/// Generates every tenant's configuration from one input directory.
pub struct GlobalConfigGenerator {
    settings: GeneratorSettings,
    collaborators: Collaborators,
    store: DocumentStore,
    config: GenerationResult<GlobalConfig>,
    html: GenerationResult<String>,
    log: ReportLog,
}

impl GlobalConfigGenerator {
    /// Reads the input documents. Failures are reported in the run's log and
    /// surface when the generator is run.
    pub fn new(settings: GeneratorSettings, collaborators: Collaborators) -> Self {
        let store = DocumentStore::new(&settings.input_dir);
        let mut log = ReportLog::new();

        let config = store.load_global_config();
        if let Err(error) = &config {
            log.error(error.to_string());
        }

        let html = store.load_html_template();
        if let Err(error) = &html {
            log.error(error.to_string());
        }

        Self {
            settings,
            collaborators,
            store,
            config,
            html,
            log,
        }
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Downstream base URL for this run; the global document wins over settings.
    pub fn config_generator_service_url(&self) -> &str {
        self.config
            .as_ref()
            .ok()
            .and_then(GlobalConfig::config_generator_service_url)
            .unwrap_or(self.settings.config_generator_service_url.as_str())
    }

    /// Generates the configuration of every declared tenant.
    #[instrument(skip_all, fields(input_dir = %self.settings.input_dir.display()))]
    pub async fn run(self) -> GenerationReport {
        let service_url = self.config_generator_service_url().to_string();
        let Self {
            settings,
            collaborators,
            store,
            config,
            html,
            mut log,
        } = self;

        let (config, html) = match (config, html) {
            (Ok(config), Ok(html)) => (config, html),
            (Err(error), _) | (_, Err(error)) => {
                log.error(INPUTS_MISSING_MESSAGE);
                return GenerationReport {
                    log,
                    result: Err(error),
                };
            }
        };

        let validator = SchemaValidator::new(collaborators.schema_fetcher.clone());
        if let Err(error) = validator.validate_reporting(&config, &mut log).await {
            if settings.validation_policy == ValidationPolicy::Enforce {
                log.error("Schema validation failed, no tenant configuration generated.");
                return GenerationReport {
                    log,
                    result: Err(error),
                };
            }
        }

        let schemas = MergeSchemas::packaged(&mut log);
        debug!(service_url = %service_url, "Using config generator service");

        let pipeline = TenantPipeline::new(
            &store,
            &config,
            &html,
            &schemas,
            collaborators.downstream.as_ref(),
            &service_url,
        );

        let mut summary = RunSummary {
            tenants_declared: config.specific_configs().len(),
            ..RunSummary::default()
        };
        for entry in config.specific_configs() {
            let outcome = pipeline.process(entry, &mut log).await;
            summary.record(&outcome);
        }

        info!(
            tenants = summary.tenants_declared,
            completed = summary.completed,
            failed = summary.failed,
            skipped = summary.skipped,
            "Generation run finished"
        );

        GenerationReport {
            log,
            result: Ok(summary),
        }
    }
}
