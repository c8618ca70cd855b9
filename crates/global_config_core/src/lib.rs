//! GlobalConfigGenerator core.
//!
//! Generates per-tenant configuration from a single global configuration
//! document. For every tenant declared in `specific_configs` a run:
//!
//! 1. substitutes the tenant into the common configuration,
//! 2. merges the common and tenant-specific sections of each artifact,
//! 3. writes `tenantConfig.json`, `config.json` and `index.html` into the
//!    tenant's output directory,
//! 4. asks the config generator service to finish the tenant's service
//!    configuration and permissions, and classifies its answer.
//!
//! Every outcome is recorded in a [`ReportLog`] that is handed back as the
//! run's report. A tenant's failure is reported and never stops the run.
//!
//! # Examples
//!
//! ```rust,no_run
//! use global_config_core::{Collaborators, GeneratorSettings, GlobalConfigGenerator};
//!
//! # async fn example() -> Result<(), global_config_core::GenerationError> {
//! let settings = GeneratorSettings::from_env()?;
//! let collaborators = Collaborators::http(settings.request_timeout)?;
//!
//! let report = GlobalConfigGenerator::new(settings, collaborators).run().await;
//! print!("{}", report.render());
//! # Ok(())
//! # }
//! ```

pub mod document_store;
pub mod downstream;
pub mod errors;
pub mod generator;
pub mod global_config;
pub mod report_log;
pub mod schema_validator;
pub mod settings;
pub mod tenant;
pub mod tenant_pipeline;

pub use document_store::DocumentStore;
pub use downstream::{DownstreamGenerator, DownstreamResponse, HttpDownstreamGenerator};
pub use errors::{GenerationError, GenerationResult};
pub use generator::{Collaborators, GenerationReport, GlobalConfigGenerator, RunSummary};
pub use global_config::{GlobalConfig, SpecificConfig};
pub use report_log::{LogEntry, LogLevel, ReportLog};
pub use schema_validator::{HttpSchemaFetcher, SchemaFetcher, SchemaValidator, ValidationOutcome};
pub use settings::{GeneratorSettings, ValidationPolicy};
pub use tenant::TenantId;
pub use tenant_pipeline::{MergeSchemas, TenantContext, TenantOutcome, TenantPipeline, TenantStage};

// Re-exported so callers do not need a direct dependency for artifact types.
pub use config_merger::ArtifactType;
